//! Error taxonomy for a checksum run.
//!
//! Every run produces exactly one outcome. The first failure observed by any
//! participant becomes the run's error; the rest are discarded.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result alias used by the library API.
pub type Result<T> = std::result::Result<T, ChecksumError>;

#[derive(Error, Debug)]
pub enum ChecksumError {
    /// The walker could not read a directory or one of its entries.
    #[error("cannot traverse {}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A worker could not open or read a file's bytes.
    #[error("cannot read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The caller cancelled the run before it completed.
    #[error("run cancelled before completion")]
    Cancelled,

    /// The run's deadline passed before it completed.
    #[error("run exceeded its deadline of {0:?}")]
    TimedOut(Duration),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A participant thread could not be started.
    #[error("cannot start {name} thread")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("{name} thread panicked")]
    Panicked { name: String },
}

impl ChecksumError {
    /// True for outcomes caused by cancellation (external signal or deadline) rather than a fault.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ChecksumError::Cancelled | ChecksumError::TimedOut(_))
    }

    /// Build a traversal error from a walkdir failure, falling back to `root` when the error has no path.
    pub(crate) fn traversal(err: walkdir::Error, root: &std::path::Path) -> Self {
        let path = err
            .path()
            .map(PathBuf::from)
            .unwrap_or_else(|| root.to_path_buf());
        // Loop errors only occur when following links; keep walkdir's message for them.
        let fallback = err.to_string();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::other(fallback));
        ChecksumError::Traversal { path, source }
    }
}
