use std::sync::Arc;

use dash_logging::dash_debug;
use queuedash_core::{BucketSecs, JobsQuery, RequestSeq};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{DashboardApi, EngineEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    FetchJobs { seq: RequestSeq, query: JobsQuery },
    FetchQueueStats { seq: RequestSeq, buckets: Vec<BucketSecs> },
    FetchJob { seq: RequestSeq, id: String },
}

/// Runs backend requests concurrently and reports each outcome as an [`EngineEvent`].
///
/// Requests are neither deduplicated nor serialized: every command starts its
/// own task and results are delivered in completion order. Once the
/// cancellation token fires, in-flight requests are abandoned and no further
/// events are delivered.
#[derive(Clone)]
pub struct EngineHandle {
    api: Arc<dyn DashboardApi>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
    cancel: CancellationToken,
}

impl EngineHandle {
    /// Must be called from within a tokio runtime.
    pub fn new(
        api: Arc<dyn DashboardApi>,
        cancel: CancellationToken,
    ) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (
            Self {
                api,
                event_tx,
                cancel,
            },
            event_rx,
        )
    }

    pub fn enqueue(&self, command: EngineCommand) {
        if self.cancel.is_cancelled() {
            dash_debug!("engine shut down, dropping {:?}", command);
            return;
        }

        let api = self.api.clone();
        let event_tx = self.event_tx.clone();
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {}
                event = handle_command(api.as_ref(), command) => {
                    if !cancel.is_cancelled() {
                        let _ = event_tx.send(event);
                    }
                }
            }
        });
    }

    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

async fn handle_command(api: &dyn DashboardApi, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::FetchJobs { seq, query } => EngineEvent::JobsFetched {
            seq,
            result: api.jobs(&query).await,
        },
        EngineCommand::FetchQueueStats { seq, buckets } => EngineEvent::QueueStatsFetched {
            seq,
            result: api.queue_stats(&buckets).await,
        },
        EngineCommand::FetchJob { seq, id } => EngineEvent::JobFetched {
            seq,
            result: api.job(&id).await,
        },
    }
}
