//! The lifecycle worker thread

use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use super::{destroy_publisher, disconnect_session, remove_subscriber};
use super::{Command, Origin};
use crate::context::BridgeContext;
use crate::error::{BridgeError, EntityKind};

/// Spawn the named worker that owns every teardown
///
/// The worker runs until it receives [`Command::Shutdown`]; commands queued
/// before the shutdown are processed first.
pub(crate) fn spawn_lifecycle_worker(
    ctx: Arc<BridgeContext>,
    command_rx: mpsc::Receiver<Command>,
) -> std::io::Result<JoinHandle<()>> {
    let name = ctx.config().worker_thread_name.clone();

    thread::Builder::new().name(name).spawn(move || {
        tracing::debug!("Lifecycle worker started");

        for command in command_rx.iter() {
            tracing::trace!(command = command.label(), "Lifecycle command");

            match command {
                Command::DestroyPublisher { publisher_id, origin } => {
                    let torn_down = destroy_publisher(&ctx, &publisher_id);
                    if origin == Origin::Host {
                        // Ok when the SDK path tore the publisher down first
                        let result = if torn_down || ctx.retired_publishers().contains(&publisher_id) {
                            Ok(())
                        } else {
                            Err(BridgeError::not_found(EntityKind::Publisher, publisher_id.as_str()))
                        };
                        ctx.destroy_callbacks().resolve(&publisher_id, result);
                    }
                    tracing::debug!(publisher_id = %publisher_id, ?origin, torn_down, "Publisher destroy processed");
                }
                Command::RemoveSubscriber { stream_id, completion } => {
                    remove_subscriber(&ctx, &stream_id);
                    if let Some(completion) = completion {
                        completion.complete(Ok(()));
                    }
                }
                Command::DisconnectSession { session_id, completion } => {
                    disconnect_session(&ctx, &session_id, completion);
                }
                Command::Barrier(completion) => {
                    completion.complete(Ok(()));
                }
                Command::Shutdown => break,
            }
        }

        tracing::debug!("Lifecycle worker stopped");
    })
}
