//! Blocking iterator the host consumes events through

use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use super::envelope::Envelope;

/// Blocking iterator over delivered envelopes
///
/// Clones share the same receiver, so each envelope is seen by exactly one
/// consumer. `next()` returns `None` once the bridge has been dropped.
pub struct EventIterator {
    rx: Arc<Mutex<mpsc::Receiver<Envelope>>>,
}

impl EventIterator {
    pub(crate) fn new(rx: Arc<Mutex<mpsc::Receiver<Envelope>>>) -> Self {
        Self { rx }
    }

    /// Block until an envelope is available
    pub fn recv(&self) -> Option<Envelope> {
        self.rx.lock().ok()?.recv().ok()
    }

    /// Take an envelope if one is ready
    pub fn try_recv(&self) -> Option<Envelope> {
        self.rx.lock().ok()?.try_recv().ok()
    }

    /// Block for up to `timeout`
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Envelope> {
        self.rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    /// Drain whatever is currently queued without blocking
    pub fn try_iter(&self) -> TryIter<'_> {
        TryIter { inner: self }
    }

    /// Iterate, waiting up to `timeout` for each envelope
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIter<'_> {
        TimeoutIter {
            inner: self,
            timeout,
        }
    }
}

impl Iterator for EventIterator {
    type Item = Envelope;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

impl Clone for EventIterator {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

/// Non-blocking iterator over queued envelopes
pub struct TryIter<'a> {
    inner: &'a EventIterator,
}

impl<'a> Iterator for TryIter<'a> {
    type Item = Envelope;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Blocking iterator with a per-item timeout
pub struct TimeoutIter<'a> {
    inner: &'a EventIterator,
    timeout: Duration,
}

impl<'a> Iterator for TimeoutIter<'a> {
    type Item = Envelope;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}
