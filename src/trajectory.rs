//! Trajectory dataset loading.
//!
//! The input is plain CSV with one row per time step:
//!
//! ```text
//! <label>, x1, y1, z1, x2, y2, z2, ..., xN, yN, zN
//! ```
//!
//! The label column (the writing simulator stores its clock there) is
//! dropped, blank rows are skipped, and the remaining fields become one
//! `Vector3<f64>` per particle. Every data row must carry the same number
//! of coordinate columns, and that number must be a positive multiple of 3;
//! violations fail at load with the offending line number rather than
//! surfacing later as a shape mismatch.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::ReplayError;

/// An immutable time-indexed point cloud: `[time_step][particle][axis]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryDataset {
    /// Particle positions per time step
    frames: Vec<Vec<Vector3<f64>>>,

    /// Particles per time step (uniform across frames)
    num_particles: usize,
}

/// Serializable shape and bounds summary of a loaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Number of time steps
    pub time_steps: usize,

    /// Particles per time step
    pub particles: usize,

    /// Smallest coordinate per axis across the whole dataset
    pub min: [f64; 3],

    /// Largest coordinate per axis across the whole dataset
    pub max: [f64; 3],
}

impl TrajectoryDataset {
    /// Loads a trajectory from a CSV file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ReplayError::io(path, e))?;
        let mut reader = BufReader::new(file);
        Self::from_reader(&mut reader).map_err(|e| match e {
            ReplayError::Io { source, .. } => ReplayError::io(path, source),
            other => other,
        })
    }

    /// Parses a trajectory from any buffered reader.
    pub fn from_reader(reader: &mut impl BufRead) -> Result<Self, ReplayError> {
        let mut frames: Vec<Vec<Vector3<f64>>> = Vec::new();
        let mut expected_width: Option<usize> = None;

        let mut line = String::new();
        let mut line_number = 0usize;
        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .map_err(|e| ReplayError::io("<reader>", e))?;
            if read == 0 {
                break;
            }
            line_number += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                // Blank rows are separators, not time steps
                continue;
            }

            let mut fields = trimmed.split(',');
            // First field is a per-row label, ignored regardless of content
            let _label = fields.next();

            let mut coords = Vec::new();
            for (index, field) in fields.enumerate() {
                let field = field.trim();
                let value: f64 = field.parse().map_err(|_| ReplayError::MalformedField {
                    line: line_number,
                    // 1-based CSV column, counting the label
                    column: index + 2,
                    value: field.to_string(),
                })?;
                coords.push(value);
            }

            match expected_width {
                None => {
                    if coords.is_empty() || coords.len() % 3 != 0 {
                        return Err(ReplayError::ColumnCount {
                            line: line_number,
                            found: coords.len(),
                        });
                    }
                    expected_width = Some(coords.len());
                }
                Some(expected) => {
                    if coords.len() != expected {
                        return Err(ReplayError::RaggedRow {
                            line: line_number,
                            expected,
                            found: coords.len(),
                        });
                    }
                }
            }

            let frame = coords
                .chunks_exact(3)
                .map(|c| Vector3::new(c[0], c[1], c[2]))
                .collect();
            frames.push(frame);
        }

        let num_particles = match expected_width {
            Some(width) => width / 3,
            None => return Err(ReplayError::EmptyDataset),
        };

        Ok(Self {
            frames,
            num_particles,
        })
    }

    /// Number of time steps in the dataset.
    pub fn num_steps(&self) -> usize {
        self.frames.len()
    }

    /// Particles per time step.
    pub fn num_particles(&self) -> usize {
        self.num_particles
    }

    /// Dataset shape as `(time_steps, particles, 3)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.frames.len(), self.num_particles, 3)
    }

    /// Particle positions at one time step.
    ///
    /// # Panics
    ///
    /// Panics if `step >= num_steps()`.
    pub fn frame(&self, step: usize) -> &[Vector3<f64>] {
        &self.frames[step]
    }

    /// Iterates over all frames in time order.
    pub fn frames(&self) -> impl Iterator<Item = &[Vector3<f64>]> {
        self.frames.iter().map(Vec::as_slice)
    }

    /// Computes the shape and coordinate bounds summary.
    pub fn summary(&self) -> DatasetSummary {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for frame in &self.frames {
            for position in frame {
                for axis in 0..3 {
                    min[axis] = min[axis].min(position[axis]);
                    max[axis] = max[axis].max(position[axis]);
                }
            }
        }
        DatasetSummary {
            time_steps: self.frames.len(),
            particles: self.num_particles,
            min,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    fn parse(input: &str) -> Result<TrajectoryDataset, ReplayError> {
        TrajectoryDataset::from_reader(&mut Cursor::new(input))
    }

    #[test]
    fn test_two_steps_two_particles() {
        let dataset = parse(
            "p1,0.1,0.2,0.3,0.4,0.5,0.6\n\
             p2,0.2,0.3,0.4,0.5,0.6,0.7\n",
        )
        .unwrap();

        assert_eq!(dataset.shape(), (2, 2, 3));
        assert_eq!(dataset.frame(0)[0], Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(dataset.frame(0)[1], Vector3::new(0.4, 0.5, 0.6));
        assert_eq!(dataset.frame(1)[0], Vector3::new(0.2, 0.3, 0.4));
        assert_eq!(dataset.frame(1)[1], Vector3::new(0.5, 0.6, 0.7));
    }

    #[test]
    fn test_blank_rows_are_skipped() {
        let dataset = parse(
            "\n\
             t0,0.1,0.2,0.3\n\
             \n\
             t1,0.4,0.5,0.6\n\
             \n",
        )
        .unwrap();

        assert_eq!(dataset.shape(), (2, 1, 3));
    }

    #[test]
    fn test_label_column_ignored_regardless_of_content() {
        // Numeric, text, and empty labels all drop the same way
        let dataset = parse(
            "0.005,0.1,0.2,0.3\n\
             banana,0.4,0.5,0.6\n\
             ,0.7,0.8,0.9\n",
        )
        .unwrap();

        assert_eq!(dataset.shape(), (3, 1, 3));
        assert_eq!(dataset.frame(2)[0], Vector3::new(0.7, 0.8, 0.9));
    }

    #[test]
    fn test_malformed_field_reports_position() {
        let err = parse("t0,0.1,oops,0.3\n").unwrap_err();
        match err {
            ReplayError::MalformedField {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 1);
                assert_eq!(column, 3);
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_ragged_row_rejected() {
        let err = parse(
            "t0,0.1,0.2,0.3,0.4,0.5,0.6\n\
             t1,0.1,0.2,0.3\n",
        )
        .unwrap_err();
        match err {
            ReplayError::RaggedRow {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 6);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_triple_width_rejected() {
        let err = parse("t0,0.1,0.2,0.3,0.4\n").unwrap_err();
        assert!(matches!(
            err,
            ReplayError::ColumnCount { line: 1, found: 4 }
        ));
    }

    #[test]
    fn test_row_with_only_label_rejected() {
        let err = parse("t0\n").unwrap_err();
        assert!(matches!(
            err,
            ReplayError::ColumnCount { line: 1, found: 0 }
        ));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(parse(""), Err(ReplayError::EmptyDataset)));
        assert!(matches!(parse("\n\n"), Err(ReplayError::EmptyDataset)));
    }

    #[test]
    fn test_whitespace_around_fields_tolerated() {
        let dataset = parse("t0, 0.1 ,0.2, 0.3\r\n").unwrap();
        assert_eq!(dataset.frame(0)[0], Vector3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_summary_bounds() {
        let dataset = parse(
            "t0,0.1,0.2,0.3\n\
             t1,0.9,0.0,0.5\n",
        )
        .unwrap();
        let summary = dataset.summary();
        assert_eq!(summary.time_steps, 2);
        assert_eq!(summary.particles, 1);
        assert_eq!(summary.min, [0.1, 0.0, 0.3]);
        assert_eq!(summary.max, [0.9, 0.2, 0.5]);
    }

    proptest! {
        /// R rows of N coordinate triples always load as shape (R, N, 3).
        #[test]
        fn prop_shape_matches_input(
            rows in 1usize..20,
            particles in 1usize..10,
        ) {
            let mut input = String::new();
            for r in 0..rows {
                input.push_str(&format!("step{r}"));
                for p in 0..particles {
                    input.push_str(&format!(
                        ",{},{},{}",
                        r as f64,
                        p as f64,
                        (r + p) as f64,
                    ));
                }
                input.push('\n');
            }

            let dataset = parse(&input).unwrap();
            prop_assert_eq!(dataset.shape(), (rows, particles, 3));
        }
    }
}
