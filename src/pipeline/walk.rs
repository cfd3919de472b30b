//! Walker: enumerate every regular file under a root and hand each path to the worker pool.

use crossbeam_channel::{Sender, select};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::cancel::CancelToken;
use crate::error::{ChecksumError, Result};
use crate::utils::config::WalkConsts;

/// One result from a directory walk.
pub enum WalkOutcome {
    /// A regular file to digest.
    File(PathBuf),
    /// A directory, symlink, FIFO, socket or device: not digested.
    Skip,
    Err(ChecksumError),
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(
    r: std::result::Result<walkdir::DirEntry, walkdir::Error>,
    root: &Path,
) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_file() => WalkOutcome::File(entry.into_path()),
        Ok(_) => WalkOutcome::Skip,
        Err(err) => WalkOutcome::Err(ChecksumError::traversal(err, root)),
    }
}

/// Lazy traversal of `root`. Symlinks are reported as symlinks (never followed, not even at the
/// root), so they are skipped rather than resolved.
fn walkdir_iter(root: &Path) -> impl Iterator<Item = WalkOutcome> + '_ {
    WalkDir::new(root)
        .follow_links(false)
        .follow_root_links(false)
        .max_open(WalkConsts::MAX_OPEN_DIRS)
        .into_iter()
        .map(move |r| to_outcome_walkdir(r, root))
}

/// Walk `root`, sending each regular file to `path_tx`. Returns the number of paths handed off.
/// Dropping `path_tx` on return closes the job queue so idle workers exit.
pub fn run_walker(root: &Path, path_tx: Sender<PathBuf>, token: &CancelToken) -> Result<usize> {
    debug!("walker: starting at {}", root.display());
    run_walk_loop(path_tx, token, walkdir_iter(root))
}

/// Consume `iter`, handing every [`WalkOutcome::File`] to a worker. Stops on the first error
/// (no skip-and-continue) and on cancellation, both between entries and while waiting for a
/// worker to take a path. Open directory handles are released when `iter` is dropped.
pub fn run_walk_loop<I>(path_tx: Sender<PathBuf>, token: &CancelToken, iter: I) -> Result<usize>
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut count = 0_usize;
    for outcome in iter {
        if token.is_cancelled() {
            debug!("walker: cancelled after {} paths", count);
            return Err(ChecksumError::Cancelled);
        }
        match outcome {
            WalkOutcome::File(path) => {
                select! {
                    send(path_tx, path) -> sent => {
                        // Every worker has exited; the one that failed records the run's error.
                        if sent.is_err() {
                            debug!("walker: job queue closed by workers after {} paths", count);
                            return Ok(count);
                        }
                        count += 1;
                    }
                    recv(token.signal()) -> _ => {
                        debug!("walker: cancelled after {} paths", count);
                        return Err(ChecksumError::Cancelled);
                    }
                }
            }
            WalkOutcome::Skip => {}
            WalkOutcome::Err(err) => {
                debug!("walker: aborting: {}", err);
                return Err(err);
            }
        }
    }
    debug!("walker: done, {} paths sent", count);
    drop(path_tx);
    Ok(count)
}
