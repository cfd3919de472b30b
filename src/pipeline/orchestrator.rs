//! Orchestrator: runs the walker, the digest workers and the collector for one root under a single
//! supervisor, then sorts the records of a clean run by path.

use crossbeam_channel::{Receiver, after, bounded, select};
use log::debug;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use super::cancel::CancelToken;
use super::collect::collect_records;
use super::context::{PipelineChannels, create_pipeline_channels};
use super::supervisor::Supervisor;
use super::walk::run_walker;
use super::workers::digest_worker_loop;
use crate::engine::hashing::FileDigest;
use crate::error::{ChecksumError, Result};
use crate::{ChecksumOpts, ResultSet};

/// Runs the walk → digest → collect pipeline for one root at a time.
///
/// Pool size, hash and deadline are fixed at construction; each [`run`](Self::run) is an
/// independent, stateless run.
#[derive(Clone, Debug)]
pub struct Checksummer {
    opts: ChecksumOpts,
}

impl Checksummer {
    pub fn new(opts: ChecksumOpts) -> Result<Self> {
        if opts.workers == 0 {
            return Err(ChecksumError::InvalidConfig(
                "worker count must be at least 1".to_string(),
            ));
        }
        Ok(Self { opts })
    }

    pub fn opts(&self) -> &ChecksumOpts {
        &self.opts
    }

    /// Checksum every regular file under `root` with the configured hash.
    /// Cancelling `cancel` stops the run with [`ChecksumError::Cancelled`].
    pub fn run(&self, root: &Path, cancel: &CancelToken) -> Result<ResultSet> {
        debug!(
            "checksumming {} with {} workers ({})",
            root.display(),
            self.opts.workers,
            self.opts.algorithm
        );
        self.run_with(root, &self.opts.algorithm, cancel)
    }

    /// Like [`run`](Self::run) but with a caller-supplied digest function.
    ///
    /// Walker, workers, collector (and the deadline watchdog, if any) run as scoped threads under
    /// one [`Supervisor`]. The first failure cancels the rest; every thread has been joined, and
    /// every file and directory handle closed, by the time this returns. Records are only sorted
    /// and returned when nothing failed and nothing was cancelled.
    pub fn run_with<D>(&self, root: &Path, digester: &D, cancel: &CancelToken) -> Result<ResultSet>
    where
        D: FileDigest + ?Sized,
    {
        let start = Instant::now();
        let supervisor = Supervisor::new(cancel);
        let PipelineChannels {
            path_tx,
            path_rx,
            record_tx,
            record_rx,
        } = create_pipeline_channels();

        let records = thread::scope(|scope| {
            let (done_tx, done_rx) = bounded::<()>(0);
            let watchdog = self.opts.deadline.map(|deadline| {
                supervisor.spawn(scope, "deadline", move |token| {
                    watch_deadline(deadline, done_rx, token)
                })
            });

            let collector = supervisor.spawn(scope, "collector", move |token| {
                collect_records(record_rx, token)
            });

            let workers: Vec<_> = (0..self.opts.workers)
                .map(|id| {
                    let path_rx = path_rx.clone();
                    let record_tx = record_tx.clone();
                    supervisor.spawn(scope, format!("digester-{id}"), move |token| {
                        digest_worker_loop(id, path_rx, record_tx, digester, token)
                    })
                })
                .collect();
            // Workers hold the only remaining clones: the result queue closes when the last one exits.
            drop(path_rx);
            drop(record_tx);

            let walker = supervisor.spawn(scope, "walker", move |token| {
                run_walker(root, path_tx, token)
            });

            supervisor.join(walker);
            for worker in workers {
                supervisor.join(worker);
            }
            let records = supervisor.join(collector);
            drop(done_tx);
            if let Some(watchdog) = watchdog {
                supervisor.join(watchdog);
            }
            records
        });

        let records = supervisor.finish(records)?;
        debug!(
            "checksummed {} files in {:?}",
            records.len(),
            start.elapsed()
        );
        Ok(ResultSet::sorted(records))
    }
}

/// Fail the run with [`ChecksumError::TimedOut`] unless it finishes (or is cancelled) first.
fn watch_deadline(deadline: Duration, done_rx: Receiver<()>, token: &CancelToken) -> Result<()> {
    select! {
        recv(after(deadline)) -> _ => Err(ChecksumError::TimedOut(deadline)),
        recv(done_rx) -> _ => Ok(()),
        recv(token.signal()) -> _ => Ok(()),
    }
}
