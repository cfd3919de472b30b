//! Structured-concurrency supervisor: one cancellation scope, first failure wins.
//!
//! Participants are spawned as scoped threads, so `std::thread::scope` guarantees they are all
//! joined before the run returns. A participant that returns `Err` records it (only the first
//! error is kept) and cancels the scope's token, which unblocks everyone else.

use log::debug;
use std::sync::{Mutex, PoisonError};
use std::thread::{self, Scope, ScopedJoinHandle};

use super::cancel::CancelToken;
use crate::error::{ChecksumError, Result};

pub struct Supervisor {
    token: CancelToken,
    first_error: Mutex<Option<ChecksumError>>,
}

/// Handle to a participant spawned by [`Supervisor::spawn`]. Resolve it with [`Supervisor::join`].
pub struct Task<'scope, T> {
    name: String,
    handle: Option<ScopedJoinHandle<'scope, Option<T>>>,
}

impl Supervisor {
    /// New supervisor whose token is a child of `parent`: cancelling the parent cancels the run,
    /// a failure inside the run never cancels the parent.
    pub fn new(parent: &CancelToken) -> Self {
        Self {
            token: parent.child(),
            first_error: Mutex::new(None),
        }
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Record `err` if it is the first failure, then cancel every participant.
    pub fn fail(&self, err: ChecksumError) {
        {
            let mut slot = self
                .first_error
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                None => {
                    debug!("supervisor: first failure: {}", err);
                    *slot = Some(err);
                }
                Some(_) => debug!("supervisor: discarding later failure: {}", err),
            }
        }
        self.token.cancel();
    }

    /// Spawn a named participant inside `scope`. `f` receives the run's token and must observe it
    /// at every blocking point. If the thread cannot be started the run fails immediately.
    pub fn spawn<'scope, 'env, T, F>(
        &'env self,
        scope: &'scope Scope<'scope, 'env>,
        name: impl Into<String>,
        f: F,
    ) -> Task<'scope, T>
    where
        F: FnOnce(&CancelToken) -> Result<T> + Send + 'scope,
        T: Send + 'scope,
    {
        let name = name.into();
        let spawned = thread::Builder::new()
            .name(name.clone())
            .spawn_scoped(scope, move || match f(&self.token) {
                Ok(value) => Some(value),
                Err(err) => {
                    self.fail(err);
                    None
                }
            });
        let handle = match spawned {
            Ok(handle) => Some(handle),
            Err(source) => {
                self.fail(ChecksumError::Spawn {
                    name: name.clone(),
                    source,
                });
                None
            }
        };
        Task { name, handle }
    }

    /// Wait for a participant. Returns its value if it finished without error.
    /// A panic is recorded as the run's failure.
    pub fn join<T>(&self, task: Task<'_, T>) -> Option<T> {
        let handle = task.handle?;
        match handle.join() {
            Ok(value) => value,
            Err(_) => {
                self.fail(ChecksumError::Panicked { name: task.name });
                None
            }
        }
    }

    /// Resolve the run: the first recorded error, else `Cancelled` if the scope was cancelled
    /// from outside, else `value`.
    pub fn finish<T>(self, value: Option<T>) -> Result<T> {
        if let Some(err) = self
            .first_error
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
        {
            return Err(err);
        }
        if self.token.is_cancelled() {
            return Err(ChecksumError::Cancelled);
        }
        value.ok_or(ChecksumError::Cancelled)
    }
}
