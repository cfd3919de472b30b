//! Pipeline channels: the job queue (walker → workers) and the result queue (workers → collector).

use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::PathBuf;

use crate::FileRecord;

/// Capacity of both queues. Zero makes every handoff a rendezvous: the walker cannot run ahead of
/// idle workers and workers cannot run ahead of the collector, so at most `K` paths and `K`
/// records are in flight however large the tree is.
pub const RENDEZVOUS: usize = 0;

/// Channels for one run. The walker gets `path_tx`; each worker gets clones of `path_rx` and
/// `record_tx`; the collector gets `record_rx`. Dropping the last sender closes a queue.
pub struct PipelineChannels {
    pub path_tx: Sender<PathBuf>,
    pub path_rx: Receiver<PathBuf>,
    pub record_tx: Sender<FileRecord>,
    pub record_rx: Receiver<FileRecord>,
}

pub fn create_pipeline_channels() -> PipelineChannels {
    let (path_tx, path_rx) = bounded::<PathBuf>(RENDEZVOUS);
    let (record_tx, record_rx) = bounded::<FileRecord>(RENDEZVOUS);
    PipelineChannels {
        path_tx,
        path_rx,
        record_tx,
        record_rx,
    }
}
