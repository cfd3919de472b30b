//! Worker pool: each worker takes one path at a time, digests it, and hands the record on.

use crossbeam_channel::{Receiver, Sender, select};
use log::debug;
use std::path::PathBuf;

use super::cancel::CancelToken;
use crate::FileRecord;
use crate::engine::hashing::FileDigest;
use crate::error::{ChecksumError, Result};

/// Single digest worker: read paths from `path_rx` until the walker closes it, digest each one,
/// and send the record on `record_tx`. Returns the number of files digested.
///
/// A digest failure ends the worker with [`ChecksumError::Read`]; nothing is retried. Waiting for
/// a path and waiting to hand off a record both race against `token`, and a record is never
/// half-sent: either the collector owns it or the worker drops it.
pub fn digest_worker_loop<D>(
    id: usize,
    path_rx: Receiver<PathBuf>,
    record_tx: Sender<FileRecord>,
    digester: &D,
    token: &CancelToken,
) -> Result<usize>
where
    D: FileDigest + ?Sized,
{
    let mut digested = 0_usize;
    loop {
        if token.is_cancelled() {
            return Err(cancelled(id, digested));
        }
        let path = select! {
            recv(path_rx) -> msg => match msg {
                Ok(path) => path,
                Err(_) => break,
            },
            recv(token.signal()) -> _ => return Err(cancelled(id, digested)),
        };

        let digest = match digester.digest_file(&path) {
            Ok(digest) => digest,
            Err(source) => return Err(ChecksumError::Read { path, source }),
        };

        select! {
            send(record_tx, FileRecord::new(path, digest)) -> sent => {
                // Collector gone: it only leaves early on cancellation, which is already recorded.
                if sent.is_err() {
                    debug!("worker {}: result queue closed after {} files", id, digested);
                    return Ok(digested);
                }
                digested += 1;
            }
            recv(token.signal()) -> _ => return Err(cancelled(id, digested)),
        }
    }
    debug!("worker {}: job queue closed after {} files", id, digested);
    Ok(digested)
}

fn cancelled(id: usize, digested: usize) -> ChecksumError {
    debug!("worker {}: cancelled after {} files", id, digested);
    ChecksumError::Cancelled
}
