//! Error types of dataset loading.

use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T, E = DatasetError> = std::result::Result<T, E>;

/// The errors raised while resolving or parsing a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A required directory or file does not exist.
    #[error("{what} '{}' is not available", .path.display())]
    MissingPath { what: &'static str, path: PathBuf },

    /// The dataset name is not registered.
    #[error("unknown dataset '{name}', available datasets: {}", .available.join(", "))]
    UnknownDataset {
        name: String,
        available: Vec<String>,
    },

    /// A label file line has the wrong number of fields.
    #[error(
        "malformed line {line} in '{}': expect {expected} fields, but found {found} in {content:?}",
        .path.display()
    )]
    MalformedLabelLine {
        path: PathBuf,
        line: usize,
        content: String,
        expected: usize,
        found: usize,
    },

    /// A label file field cannot be parsed.
    #[error("invalid {field} {value:?} at line {line} in '{}'", .path.display())]
    InvalidField {
        path: PathBuf,
        line: usize,
        field: &'static str,
        value: String,
    },

    /// The identity and camera cannot be extracted from an image file name.
    #[error("unable to parse identity and camera from file name '{}'", .path.display())]
    InvalidFileName { path: PathBuf },

    /// A parsed label is out of the valid range of the dataset.
    #[error("invalid label for '{}': {reason}", .path.display())]
    InvalidLabel { path: PathBuf, reason: String },

    /// The dataset received options it does not accept.
    #[error("invalid options for dataset '{dataset}': {reason}")]
    InvalidOptions {
        dataset: &'static str,
        reason: String,
    },

    #[error("failed to access '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
