//! Rerun scatter sink for trajectory replay.
//!
//! Renders each time step as a `Points3D` batch on a `sim_time` timeline,
//! inside a static unit-cube wireframe with labeled axes. The Rerun viewer
//! process owns the interactive display loop; once the recording stream is
//! flushed this process is done, and the session ends when the user closes
//! the viewer window.
//!
//! Only available with the `visualization` feature.

use nalgebra::Vector3;
use rerun::{
    Arrows3D, Boxes3D, Color, Points3D, Position3D, Radius, RecordingStream,
    RecordingStreamBuilder,
};
use std::path::Path;
use tracing::info;

use crate::animator::FrameSink;
use crate::error::ReplayError;

/// Axis extent of the fixed plot bounds, [0, extent] on x, y and z.
const BOUNDS_EXTENT: f32 = 1.0;

/// Scene-unit radius of each rendered particle.
const POINT_RADIUS: f32 = 0.008;

/// Rerun-backed 3D scatter that replays one point batch per time step.
pub struct RerunScatter {
    rec: RecordingStream,
}

impl RerunScatter {
    /// Spawns the Rerun viewer and streams the replay into it.
    pub fn spawn(app_id: &str) -> Result<Self, ReplayError> {
        let rec = RecordingStreamBuilder::new(app_id)
            .spawn()
            .map_err(|e| ReplayError::Recording(e.to_string()))?;
        info!("Rerun viewer spawned");
        Self::with_stream(rec)
    }

    /// Writes the replay to an `.rrd` file for later viewing.
    pub fn save(app_id: &str, path: &Path) -> Result<Self, ReplayError> {
        let rec = RecordingStreamBuilder::new(app_id)
            .save(path)
            .map_err(|e| ReplayError::Recording(e.to_string()))?;
        Self::with_stream(rec)
    }

    fn with_stream(rec: RecordingStream) -> Result<Self, ReplayError> {
        let scatter = Self { rec };
        scatter.log_bounds()?;
        Ok(scatter)
    }

    /// Logs the static scene: unit bounding box and labeled X/Y/Z axes.
    fn log_bounds(&self) -> Result<(), ReplayError> {
        let half = BOUNDS_EXTENT / 2.0;
        self.rec
            .log_static(
                "world/bounds",
                &Boxes3D::from_centers_and_half_sizes(
                    [[half, half, half]],
                    [[half, half, half]],
                )
                .with_colors([Color::from_rgb(120, 120, 120)]),
            )
            .map_err(|e| ReplayError::Recording(e.to_string()))?;

        self.rec
            .log_static(
                "world/axes",
                &Arrows3D::from_vectors([
                    [BOUNDS_EXTENT, 0.0, 0.0],
                    [0.0, BOUNDS_EXTENT, 0.0],
                    [0.0, 0.0, BOUNDS_EXTENT],
                ])
                .with_origins([[0.0, 0.0, 0.0]; 3])
                .with_colors([
                    Color::from_rgb(255, 100, 100), // X
                    Color::from_rgb(100, 255, 100), // Y
                    Color::from_rgb(100, 100, 255), // Z
                ])
                .with_labels(["X", "Y", "Z"]),
            )
            .map_err(|e| ReplayError::Recording(e.to_string()))?;

        Ok(())
    }

    fn log_points(&self, seconds: f64, positions: &[Vector3<f64>]) -> Result<(), ReplayError> {
        self.rec.set_time_seconds("sim_time", seconds);

        let points: Vec<Position3D> = positions
            .iter()
            .map(|p| Position3D::new(p.x as f32, p.y as f32, p.z as f32))
            .collect();
        let colors: Vec<Color> = (0..positions.len()).map(particle_color).collect();

        self.rec
            .log(
                "world/particles",
                &Points3D::new(points)
                    .with_colors(colors)
                    .with_radii([Radius::new_scene_units(POINT_RADIUS)]),
            )
            .map_err(|e| ReplayError::Recording(e.to_string()))
    }
}

impl FrameSink for RerunScatter {
    fn init(&mut self, positions: &[Vector3<f64>]) -> Result<(), ReplayError> {
        self.log_points(0.0, positions)
    }

    fn update(
        &mut self,
        _step: usize,
        seconds: f64,
        positions: &[Vector3<f64>],
    ) -> Result<(), ReplayError> {
        self.log_points(seconds, positions)
    }
}

/// Color by particle index.
fn particle_color(index: usize) -> Color {
    match index % 6 {
        0 => Color::from_rgb(255, 100, 100), // Red
        1 => Color::from_rgb(100, 100, 255), // Blue
        2 => Color::from_rgb(255, 255, 100), // Yellow
        3 => Color::from_rgb(100, 255, 255), // Cyan
        4 => Color::from_rgb(255, 100, 255), // Magenta
        _ => Color::from_rgb(255, 165, 0),   // Orange
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        assert_eq!(particle_color(0), particle_color(6));
        assert_ne!(particle_color(0), particle_color(1));
        assert_ne!(particle_color(4), particle_color(5));
    }
}
