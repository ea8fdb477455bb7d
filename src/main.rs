//! Particle trajectory replay CLI
//!
//! Replay a recorded particle trajectory CSV in the Rerun viewer, or
//! generate a synthetic trajectory to replay.

use clap::Parser;
use particle_replay::simulate;
use particle_replay::TrajectoryDataset;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Replay recorded 3D particle trajectories as an animated scatter plot
#[derive(Parser, Debug)]
#[command(name = "particle-replay")]
#[command(about = "Replay recorded 3D particle trajectories", long_about = None)]
struct Args {
    /// Trajectory CSV: one row per time step, `label,x1,y1,z1,...`
    #[arg(required_unless_present = "generate", conflicts_with = "generate")]
    data_file: Option<PathBuf>,

    /// Timeline milliseconds between frames
    #[arg(short, long, default_value = "10")]
    interval_ms: u64,

    /// Write the replay to an .rrd recording instead of spawning the viewer
    #[arg(long, value_name = "RRD")]
    save: Option<PathBuf>,

    /// Print a JSON summary of the dataset and exit (no viewer)
    #[arg(long)]
    json: bool,

    /// Generate a synthetic trajectory CSV at this path and exit
    #[arg(short, long, value_name = "CSV")]
    generate: Option<PathBuf>,

    /// Particles in the generated cloud
    #[arg(short, long, default_value = "1000")]
    particles: usize,

    /// Time steps in the generated trajectory
    #[arg(long, default_value = "100")]
    steps: usize,

    /// Integration time step in seconds for generation
    #[arg(long, default_value = "0.001")]
    dt: f64,

    /// Master seed for cloud generation (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Handle --generate mode
    if let Some(out_path) = &args.generate {
        let seed = if args.seed == 0 {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("system clock before UNIX epoch")
                .as_nanos() as u64
        } else {
            args.seed
        };

        info!(
            "Generating {} particles over {} steps (seed={})",
            args.particles, args.steps, seed
        );
        match simulate::generate_csv(out_path, seed, args.particles, args.steps, args.dt) {
            Ok(final_time) => {
                info!(
                    "Wrote {} time steps ({:.3}s of simulation) to {}",
                    args.steps,
                    final_time,
                    out_path.display()
                );
            }
            Err(e) => {
                error!("Generation failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let Some(data_file) = &args.data_file else {
        // clap's required_unless_present already enforces this
        eprintln!("Expecting data file name, none provided.");
        std::process::exit(2);
    };

    info!("Loading trajectory from {}", data_file.display());
    let dataset = match TrajectoryDataset::load(data_file) {
        Ok(dataset) => dataset,
        Err(e) => {
            error!("Failed to load {}: {}", data_file.display(), e);
            std::process::exit(1);
        }
    };
    info!(
        "Loaded {} time steps of {} particles",
        dataset.num_steps(),
        dataset.num_particles()
    );

    if args.json {
        // JSON output for CI parsing, no viewer
        println!(
            "{}",
            serde_json::to_string_pretty(&dataset.summary()).unwrap()
        );
        return;
    }

    replay(&args, &dataset);
}

#[cfg(feature = "visualization")]
fn replay(args: &Args, dataset: &TrajectoryDataset) {
    use particle_replay::{Animator, RerunScatter};
    use std::time::Duration;

    let sink = match &args.save {
        Some(path) => RerunScatter::save("particle-replay", path),
        None => RerunScatter::spawn("particle-replay"),
    };
    let mut sink = match sink {
        Ok(sink) => sink,
        Err(e) => {
            error!("Failed to start recording: {}", e);
            std::process::exit(1);
        }
    };

    let animator = Animator::new(Duration::from_millis(args.interval_ms));
    match animator.play(dataset, &mut sink) {
        Ok(updates) => {
            info!(
                "Replayed {} frames ({} updates after the initial draw)",
                dataset.num_steps(),
                updates
            );
        }
        Err(e) => {
            error!("Replay failed: {}", e);
            std::process::exit(1);
        }
    }

    match &args.save {
        Some(path) => info!("Recording written to {}", path.display()),
        None => info!("Close the Rerun viewer window to end the session"),
    }
}

#[cfg(not(feature = "visualization"))]
fn replay(_args: &Args, _dataset: &TrajectoryDataset) {
    error!("This build has no visualization support (rebuild with --features visualization)");
    std::process::exit(1);
}
