//! Synthetic particle cloud generation.
//!
//! Produces input data for the replay tool: a seeded random cloud of
//! charged particles stepped with a naive O(n²) pairwise-force integrator,
//! written out one CSV row per time step in the loader's column format
//! (`time, x1, y1, z1, ..., xN, yN, zN`).

use nalgebra::Vector3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, UnitSphere};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ReplayError;

/// Coupling constant for the pairwise charge force.
pub const DEFAULT_FORCE_CONSTANT: f64 = 1e-4;

/// A simulated particle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Position in the unit-cube world frame
    pub position: Vector3<f64>,

    /// Velocity in world units per second
    pub velocity: Vector3<f64>,

    pub mass: f64,
    pub charge: f64,
}

/// Initial-state parameters for a random cloud.
#[derive(Debug, Clone)]
pub struct CloudParams {
    /// Upper corner of the spawn volume (lower corner is the origin)
    pub bounds: Vector3<f64>,

    /// Initial speed of every particle
    pub velocity_max: f64,

    /// Uniform mass range `[min, max]`
    pub mass_range: [f64; 2],

    /// Uniform charge range `[min, max]`
    pub charge_range: [f64; 2],
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            bounds: Vector3::new(1.0, 1.0, 1.0),
            velocity_max: 0.1,
            mass_range: [1.0, 10.0],
            charge_range: [0.1, 1.0],
        }
    }
}

/// Spawns a random particle cloud, deterministic for a given seed.
///
/// Positions are uniform inside the bounds; velocity directions are
/// isotropic with fixed magnitude `velocity_max`; mass and charge are
/// uniform within their ranges.
pub fn spawn_cloud(seed: u64, count: usize, params: &CloudParams) -> Vec<Particle> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..count)
        .map(|_| {
            let position = Vector3::new(
                params.bounds.x * rng.gen::<f64>(),
                params.bounds.y * rng.gen::<f64>(),
                params.bounds.z * rng.gen::<f64>(),
            );

            let direction: [f64; 3] = UnitSphere.sample(&mut rng);
            let velocity = Vector3::from(direction) * params.velocity_max;

            let mass_fraction = rng.gen::<f64>();
            let mass = params.mass_range[0] * (1.0 - mass_fraction)
                + params.mass_range[1] * mass_fraction;

            let charge_fraction = rng.gen::<f64>();
            let charge = params.charge_range[0] * (1.0 - charge_fraction)
                + params.charge_range[1] * charge_fraction;

            Particle {
                position,
                velocity,
                mass,
                charge,
            }
        })
        .collect()
}

/// Naive pairwise-force particle integrator.
///
/// Each step applies the charge force `k·qᵢqⱼ/r²` along the separation
/// direction to every unordered pair, equal and opposite, then advances
/// positions by one Euler step.
pub struct NaiveSimulation {
    particles: Vec<Particle>,
    force_constant: f64,
    time: f64,
    time_step: f64,
}

impl NaiveSimulation {
    /// Creates a simulation over the given particles.
    pub fn new(particles: Vec<Particle>, force_constant: f64, time_step: f64) -> Self {
        Self {
            particles,
            force_constant,
            time: 0.0,
            time_step,
        }
    }

    /// Advances the simulation by one time step and returns the new time.
    pub fn step(&mut self) -> f64 {
        let dt = self.time_step;

        for i in 1..self.particles.len() {
            for j in 0..i {
                let delta = self.particles[j].position - self.particles[i].position;
                let r_squared = delta.norm_squared();
                if r_squared == 0.0 {
                    // Coincident pair, force is undefined
                    continue;
                }
                let r = r_squared.sqrt();

                let charge_factor = self.particles[i].charge * self.particles[j].charge;
                let force = delta * (self.force_constant * charge_factor / (r_squared * r));

                let mass_a = self.particles[i].mass;
                let mass_b = self.particles[j].mass;
                self.particles[i].velocity += force * (dt / mass_a);
                self.particles[j].velocity -= force * (dt / mass_b);
            }
        }

        for particle in &mut self.particles {
            particle.position += particle.velocity * dt;
        }

        self.time += dt;
        self.time
    }

    /// Current simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Current particle states.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

/// Generates a trajectory CSV: spawns a cloud, steps it, writes one row
/// per step in the loader's format. Returns the final simulation time.
pub fn generate_csv(
    path: &Path,
    seed: u64,
    count: usize,
    steps: usize,
    time_step: f64,
) -> Result<f64, ReplayError> {
    let particles = spawn_cloud(seed, count, &CloudParams::default());
    let mut simulation = NaiveSimulation::new(particles, DEFAULT_FORCE_CONSTANT, time_step);

    let file = File::create(path).map_err(|e| ReplayError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    for _ in 0..steps {
        let time = simulation.step();
        write!(writer, "{}", time).map_err(|e| ReplayError::io(path, e))?;
        for particle in simulation.particles() {
            write!(
                writer,
                ",{},{},{}",
                particle.position.x, particle.position.y, particle.position.z
            )
            .map_err(|e| ReplayError::io(path, e))?;
        }
        writeln!(writer).map_err(|e| ReplayError::io(path, e))?;
    }

    writer.flush().map_err(|e| ReplayError::io(path, e))?;
    Ok(simulation.time())
}
