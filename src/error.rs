//! Errors raised while loading a dataset.

use std::path::PathBuf;

/// Dataset loading error types
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No companies found in {0}")]
    Empty(PathBuf),

    #[error("Dataset has {count} invalid record(s), first: {first}")]
    Invalid { count: usize, first: String },
}
