//! Command worker
//!
//! Engine event handlers never call back into the engine. They enqueue a
//! [`WorkerCommand`] and this worker executes it on a separate execution
//! unit, one command at a time, in submission order.

use crate::engine::MediaDescriptor;
use crate::playback::PlaybackOrchestrator;
use std::sync::Weak;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Work deferred out of engine event callbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WorkerCommand {
    /// Start the song queued behind a finished transition
    PlayMedia { media: MediaDescriptor, generation: u64 },

    /// Loop the idle screen after it ended
    PlayIdle { generation: u64 },
}

/// Spawn the worker on `handle`
///
/// The worker only holds a weak reference: it exits once the orchestrator is
/// dropped, which also closes the channel.
pub(crate) fn spawn_worker(
    handle: &Handle,
    orchestrator: Weak<PlaybackOrchestrator>,
    mut command_rx: mpsc::UnboundedReceiver<WorkerCommand>,
) -> JoinHandle<()> {
    handle.spawn(async move {
        debug!("Command worker started");

        while let Some(command) = command_rx.recv().await {
            let Some(orchestrator) = orchestrator.upgrade() else {
                break;
            };

            // Engine commands are synchronous and may block
            let result =
                tokio::task::spawn_blocking(move || orchestrator.run_command(command)).await;
            if let Err(e) = result {
                error!("Command worker task failed: {}", e);
            }
        }

        debug!("Command worker stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_worker_exits_without_orchestrator() {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = spawn_worker(&Handle::current(), Weak::new(), rx);

        tx.send(WorkerCommand::PlayIdle { generation: 1 }).unwrap();
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_exits_when_channel_closes() {
        let (tx, rx) = mpsc::unbounded_channel::<WorkerCommand>();
        let worker = spawn_worker(&Handle::current(), Weak::new(), rx);

        drop(tx);
        worker.await.unwrap();
    }
}
