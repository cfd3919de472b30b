//! Collector: drain the result queue into a list it owns, then hand the list back by value.

use crossbeam_channel::{Receiver, select};
use log::debug;

use super::cancel::CancelToken;
use crate::FileRecord;
use crate::error::{ChecksumError, Result};

/// Receive records until every worker has dropped its sender. Records arrive in completion
/// order; sorting happens once, after the run succeeds (see [`crate::ResultSet::sorted`]).
pub fn collect_records(record_rx: Receiver<FileRecord>, token: &CancelToken) -> Result<Vec<FileRecord>> {
    let mut records = Vec::new();
    loop {
        select! {
            recv(record_rx) -> msg => match msg {
                Ok(record) => records.push(record),
                Err(_) => break,
            },
            recv(token.signal()) -> _ => {
                debug!("collector: cancelled after {} records", records.len());
                return Err(ChecksumError::Cancelled);
            }
        }
    }
    debug!("collector: result queue closed, {} records", records.len());
    Ok(records)
}
