//! Particle trajectory replay.
//!
//! Loads a CSV of 3D particle positions over time and replays it as an
//! animated scatter plot in the Rerun viewer.
//!
//! # Pipeline
//!
//! ```text
//! ┌─────────────┐    ┌────────────────────┐    ┌──────────────────┐
//! │  CSV input  │───►│ TrajectoryDataset  │───►│     Animator     │
//! │ (one row =  │    │ [step][particle]   │    │  1 init draw +   │
//! │  one step)  │    │       [axis]       │    │ (T-1) updates    │
//! └─────────────┘    └────────────────────┘    └────────┬─────────┘
//!                                                       │ FrameSink
//!                                                  ┌────▼─────────┐
//!                                                  │ RerunScatter │
//!                                                  │ (3D viewer)  │
//!                                                  └──────────────┘
//! ```
//!
//! The dataset is built once at load and stays read-only for the rest of
//! the process. The [`simulate`] module can generate input files: a seeded
//! particle cloud stepped with a naive pairwise-force integrator.

mod animator;
mod error;
pub mod simulate;
mod trajectory;
#[cfg(feature = "visualization")]
mod visualizer;

pub use animator::{Animator, FrameSink};
pub use error::ReplayError;
pub use simulate::{spawn_cloud, CloudParams, NaiveSimulation, Particle};
pub use trajectory::{DatasetSummary, TrajectoryDataset};
#[cfg(feature = "visualization")]
pub use visualizer::RerunScatter;
