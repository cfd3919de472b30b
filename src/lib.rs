//! treesum: deterministic, parallel content checksums for a directory tree.
//!
//! A walker thread hands every regular file to a fixed pool of digest workers over a rendezvous
//! channel; a collector gathers the records; the first failure cancels everything. The result is
//! either every `(path, digest)` pair sorted by path, or exactly one error.

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::hashing::{FileDigest, HashAlgorithm};
pub use error::{ChecksumError, Result};
pub use pipeline::{CancelToken, Checksummer};

use std::path::Path;

/// Checksum every regular file under `root` with `opts`, without external cancellation.
///
/// ```no_run
/// let set = treesum::checksum_tree(std::path::Path::new("."), &treesum::ChecksumOpts::default())?;
/// for record in &set {
///     println!("{} {}", record.digest, record.path.display());
/// }
/// # Ok::<(), treesum::ChecksumError>(())
/// ```
pub fn checksum_tree(root: &Path, opts: &ChecksumOpts) -> Result<ResultSet> {
    Checksummer::new(opts.clone())?.run(root, &CancelToken::new())
}

/// Like [`checksum_tree`], but the run stops with [`ChecksumError::Cancelled`] once `cancel` fires.
pub fn checksum_tree_with_cancel(
    root: &Path,
    opts: &ChecksumOpts,
    cancel: &CancelToken,
) -> Result<ResultSet> {
    Checksummer::new(opts.clone())?.run(root, cancel)
}
