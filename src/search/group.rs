//! Task-group plumbing: one cancellation signal shared by every task, and first-error capture.
//!
//! A task that fails records its error and cancels the group; the others notice at their next
//! suspension point and return `Ok(())`, so the first recorded error is the cause reported.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::error;

use crate::error::CoverageError;

/// Cooperative cancellation usable both as a flag and inside `select!`.
///
/// [`CancelToken::done`] never delivers a message; it disconnects once the token is cancelled,
/// which makes a `recv(token.done())` arm ready.
#[derive(Debug)]
pub struct CancelToken {
    cancelled: AtomicBool,
    signal: Mutex<Option<Sender<()>>>,
    done: Receiver<()>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = bounded(0);
        Self {
            cancelled: AtomicBool::new(false),
            signal: Mutex::new(Some(tx)),
            done: rx,
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        let mut signal = self.signal.lock().unwrap_or_else(|e| e.into_inner());
        signal.take();
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    #[inline]
    pub fn done(&self) -> &Receiver<()> {
        &self.done
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct TaskGroup {
    cancel: CancelToken,
    first_error: Mutex<Option<CoverageError>>,
}

impl TaskGroup {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Record the outcome of a task. On error the group is cancelled and `None` is returned.
    pub fn finish<T>(&self, task: &'static str, outcome: Result<T, CoverageError>) -> Option<T> {
        match outcome {
            Ok(value) => Some(value),
            Err(err) => {
                error!("{task} failed: {err}");
                let mut first = self.first_error.lock().unwrap_or_else(|e| e.into_inner());
                if first.is_none() {
                    *first = Some(err);
                }
                drop(first);
                self.cancel.cancel();
                None
            }
        }
    }

    /// The first recorded error, or `value` when every task finished.
    pub fn into_result<T>(self, value: Option<T>) -> Result<T, CoverageError> {
        let first = self
            .first_error
            .into_inner()
            .unwrap_or_else(|e| e.into_inner());
        match (first, value) {
            (Some(err), _) => Err(err),
            (None, Some(value)) => Ok(value),
            (None, None) => Err(CoverageError::Cancelled { task: "search" }),
        }
    }
}
