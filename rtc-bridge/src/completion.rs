//! One-shot completion channel for host requests
//!
//! Every asynchronous host request returns a [`Pending`]. The bridge keeps the
//! matching [`Completion`] until the request finishes. `Completion::complete`
//! consumes the handle, so a request can be resolved at most once. Dropping a
//! `Completion` unresolved shows up as [`BridgeError::Discarded`] on the
//! waiting side.

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// Create a connected completion/pending pair
pub fn completion<T>() -> (Completion<T>, Pending<T>) {
    let (tx, rx) = mpsc::sync_channel(1);
    (Completion { tx }, Pending { rx })
}

/// Resolving side of a host request
pub struct Completion<T> {
    tx: mpsc::SyncSender<Result<T>>,
}

impl<T> Completion<T> {
    /// Resolve the request
    ///
    /// Returns `false` if the host already dropped its [`Pending`].
    pub fn complete(self, result: Result<T>) -> bool {
        self.tx.try_send(result).is_ok()
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").finish_non_exhaustive()
    }
}

/// Waiting side of a host request
///
/// The result is yielded once. Later calls report `Discarded`.
pub struct Pending<T> {
    rx: mpsc::Receiver<Result<T>>,
}

impl<T> Pending<T> {
    /// A request that finished synchronously
    pub fn ready(result: Result<T>) -> Self {
        let (completion, pending) = completion();
        completion.complete(result);
        pending
    }

    /// Block until the request resolves
    pub fn wait(self) -> Result<T> {
        self.rx.recv().unwrap_or(Err(BridgeError::Discarded))
    }

    /// Block for up to `timeout`; `None` if still unresolved
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<T>> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Err(BridgeError::Discarded)),
        }
    }

    /// Check without blocking; `None` if still unresolved
    pub fn try_result(&self) -> Option<Result<T>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(BridgeError::Discarded)),
        }
    }
}

impl<T> fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EntityKind;
    use std::thread;

    #[test]
    fn test_complete_then_wait() {
        let (completion, pending) = completion::<u32>();
        assert!(completion.complete(Ok(7)));
        assert_eq!(pending.wait(), Ok(7));
    }

    #[test]
    fn test_unresolved_is_none() {
        let (_completion, pending) = completion::<()>();
        assert!(pending.try_result().is_none());
        assert!(pending.wait_timeout(Duration::from_millis(10)).is_none());
    }

    #[test]
    fn test_dropped_completion_is_discarded() {
        let (completion, pending) = completion::<()>();
        drop(completion);
        assert_eq!(pending.wait(), Err(BridgeError::Discarded));
    }

    #[test]
    fn test_complete_after_host_dropped() {
        let (completion, pending) = completion::<()>();
        drop(pending);
        assert!(!completion.complete(Ok(())));
    }

    #[test]
    fn test_ready() {
        let pending: Pending<()> = Pending::ready(Err(BridgeError::not_found(EntityKind::Session, "s1")));
        assert!(matches!(
            pending.try_result(),
            Some(Err(BridgeError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_resolve_from_other_thread() {
        let (completion, pending) = completion::<String>();
        let handle = thread::spawn(move || {
            completion.complete(Ok("stream-1".to_string()));
        });

        assert_eq!(pending.wait(), Ok("stream-1".to_string()));
        handle.join().unwrap();
    }
}
