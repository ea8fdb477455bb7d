//! Frame-by-frame playback over a loaded dataset.

use nalgebra::Vector3;
use std::time::Duration;
use tracing::debug;

use crate::error::ReplayError;
use crate::trajectory::TrajectoryDataset;

/// Receiver for replayed frames.
///
/// Step 0 is the static initial draw; every later step overwrites the
/// displayed positions. Implementations own whatever plot state the frames
/// mutate, so the dataset itself stays read-only during playback.
pub trait FrameSink {
    /// Draws the initial scatter at time step 0.
    fn init(&mut self, positions: &[Vector3<f64>]) -> Result<(), ReplayError>;

    /// Redraws the scatter for `step`, stamped at `seconds` on the timeline.
    fn update(
        &mut self,
        step: usize,
        seconds: f64,
        positions: &[Vector3<f64>],
    ) -> Result<(), ReplayError>;
}

/// Drives a [`FrameSink`] through every time step of a dataset.
pub struct Animator {
    /// Timeline spacing between consecutive frames
    interval: Duration,
}

impl Default for Animator {
    fn default() -> Self {
        // 10ms per frame, matching the recorder's redraw interval
        Self::new(Duration::from_millis(10))
    }
}

impl Animator {
    /// Creates an animator with the given frame interval.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Timeline spacing between consecutive frames.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Replays the dataset into the sink.
    ///
    /// Issues one `init` for step 0 followed by exactly `num_steps - 1`
    /// `update` calls. Returns the number of updates issued. Any sink error
    /// aborts playback immediately.
    pub fn play(
        &self,
        dataset: &TrajectoryDataset,
        sink: &mut impl FrameSink,
    ) -> Result<usize, ReplayError> {
        sink.init(dataset.frame(0))?;

        let seconds_per_frame = self.interval.as_secs_f64();
        for step in 1..dataset.num_steps() {
            sink.update(step, step as f64 * seconds_per_frame, dataset.frame(step))?;
        }

        let updates = dataset.num_steps() - 1;
        debug!("Replayed {} updates after the initial draw", updates);
        Ok(updates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Sink that records every call for assertions.
    struct RecordingSink {
        inits: usize,
        updates: Vec<(usize, f64, usize)>,
        fail_at_step: Option<usize>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                inits: 0,
                updates: Vec::new(),
                fail_at_step: None,
            }
        }
    }

    impl FrameSink for RecordingSink {
        fn init(&mut self, _positions: &[Vector3<f64>]) -> Result<(), ReplayError> {
            self.inits += 1;
            Ok(())
        }

        fn update(
            &mut self,
            step: usize,
            seconds: f64,
            positions: &[Vector3<f64>],
        ) -> Result<(), ReplayError> {
            if self.fail_at_step == Some(step) {
                return Err(ReplayError::Recording("sink closed".to_string()));
            }
            self.updates.push((step, seconds, positions.len()));
            Ok(())
        }
    }

    fn dataset(rows: usize) -> TrajectoryDataset {
        let mut input = String::new();
        for r in 0..rows {
            input.push_str(&format!("t{r},0.1,0.2,0.3,0.4,0.5,0.6\n"));
        }
        TrajectoryDataset::from_reader(&mut Cursor::new(input)).unwrap()
    }

    #[test]
    fn test_update_count_is_steps_minus_one() {
        let dataset = dataset(5);
        let mut sink = RecordingSink::new();

        let updates = Animator::default().play(&dataset, &mut sink).unwrap();

        assert_eq!(updates, 4);
        assert_eq!(sink.inits, 1);
        assert_eq!(sink.updates.len(), 4);
        // Steps 1..5, never 0
        let steps: Vec<usize> = sink.updates.iter().map(|u| u.0).collect();
        assert_eq!(steps, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_single_step_dataset_only_draws_once() {
        let dataset = dataset(1);
        let mut sink = RecordingSink::new();

        let updates = Animator::default().play(&dataset, &mut sink).unwrap();

        assert_eq!(updates, 0);
        assert_eq!(sink.inits, 1);
        assert!(sink.updates.is_empty());
    }

    #[test]
    fn test_frames_spaced_by_interval() {
        let dataset = dataset(4);
        let mut sink = RecordingSink::new();

        Animator::new(Duration::from_millis(10))
            .play(&dataset, &mut sink)
            .unwrap();

        assert_eq!(sink.updates.len(), 3);
        for (step, seconds, _) in &sink.updates {
            approx::assert_relative_eq!(
                *seconds,
                *step as f64 * 0.010,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_sink_error_aborts_playback() {
        let dataset = dataset(6);
        let mut sink = RecordingSink::new();
        sink.fail_at_step = Some(3);

        let err = Animator::default().play(&dataset, &mut sink).unwrap_err();

        assert!(matches!(err, ReplayError::Recording(_)));
        // Steps 1 and 2 went through, nothing after the failure
        assert_eq!(sink.updates.len(), 2);
    }
}
