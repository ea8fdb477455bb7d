//! Error types for trajectory loading and replay.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or replaying a trajectory.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Reading the input file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A coordinate field did not parse as a floating-point number
    #[error("line {line}, column {column}: cannot parse {value:?} as a coordinate")]
    MalformedField {
        line: usize,
        column: usize,
        value: String,
    },

    /// A row's width disagrees with the first data row
    #[error("line {line}: expected {expected} coordinate columns, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Coordinate columns are not a positive multiple of 3
    #[error("line {line}: {found} coordinate columns is not a positive multiple of 3")]
    ColumnCount { line: usize, found: usize },

    /// The input contained no data rows
    #[error("input contains no data rows")]
    EmptyDataset,

    /// The recording stream rejected a log call
    #[error("recording error: {0}")]
    Recording(String),
}

impl ReplayError {
    /// Creates an I/O error tagged with the offending path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
