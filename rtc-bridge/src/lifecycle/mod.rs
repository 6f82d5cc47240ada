//! Serialized teardown
//!
//! Every destroy-class operation (publisher destroy, subscriber removal and
//! session disconnect) runs on one worker thread, in submission order. A host destroy and an SDK
//! "stream destroyed" for the same publisher can therefore never interleave:
//! whichever is queued first performs the teardown and the other finds the
//! publisher already gone.

mod teardown;
mod worker;

use std::sync::mpsc;

use parking_lot::RwLock;

use crate::completion::Completion;

pub(crate) use teardown::{destroy_publisher, disconnect_session, finish_session_disconnect, remove_subscriber};
pub(crate) use worker::spawn_lifecycle_worker;

/// Who asked for a teardown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Origin {
    Host,
    Sdk,
}

/// Commands consumed by the lifecycle worker
#[derive(Debug)]
pub(crate) enum Command {
    /// Tear down a publisher; a host request's callback is already registered
    DestroyPublisher { publisher_id: String, origin: Origin },
    /// Tear down the subscriber for a stream
    RemoveSubscriber {
        stream_id: String,
        completion: Option<Completion<()>>,
    },
    /// Ask the SDK to disconnect a session
    DisconnectSession {
        session_id: String,
        completion: Completion<()>,
    },
    /// Resolve once every earlier command has run
    Barrier(Completion<()>),
    /// Stop the worker
    Shutdown,
}

impl Command {
    pub(crate) fn label(&self) -> &'static str {
        match self {
            Command::DestroyPublisher { .. } => "destroy_publisher",
            Command::RemoveSubscriber { .. } => "remove_subscriber",
            Command::DisconnectSession { .. } => "disconnect_session",
            Command::Barrier(_) => "barrier",
            Command::Shutdown => "shutdown",
        }
    }
}

/// Sending side of the worker's command queue
///
/// Closed by `shutdown`; later submissions hand the command back.
#[derive(Debug)]
pub(crate) struct LifecycleQueue {
    tx: RwLock<Option<mpsc::Sender<Command>>>,
}

impl LifecycleQueue {
    pub(crate) fn new(tx: mpsc::Sender<Command>) -> Self {
        Self {
            tx: RwLock::new(Some(tx)),
        }
    }

    pub(crate) fn submit(&self, command: Command) -> Result<(), Command> {
        match self.tx.read().as_ref() {
            Some(tx) => tx.send(command).map_err(|mpsc::SendError(command)| command),
            None => Err(command),
        }
    }

    /// Stop accepting commands and ask the worker to exit after draining
    pub(crate) fn close(&self) {
        if let Some(tx) = self.tx.write().take() {
            if tx.send(Command::Shutdown).is_err() {
                tracing::debug!("Lifecycle worker already stopped");
            }
        }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.tx.read().is_some()
    }
}
