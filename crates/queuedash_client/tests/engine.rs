use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use queuedash_client::{
    DashboardApi, EngineCommand, EngineEvent, EngineHandle, FailureKind, FetchError,
};
use queuedash_core::{BucketSecs, JobsQuery, QueueStat, SortOrder, WireJob};
use tokio_util::sync::CancellationToken;

/// Answers each request after a delay derived from the request itself.
struct ScriptedApi;

fn wire_job(id: &str) -> WireJob {
    serde_json::from_value(serde_json::json!({"id": id, "state": "queued"})).expect("wire job")
}

#[async_trait::async_trait]
impl DashboardApi for ScriptedApi {
    async fn jobs(&self, query: &JobsQuery) -> Result<Option<Vec<WireJob>>, FetchError> {
        // Larger limits answer more slowly.
        tokio::time::sleep(Duration::from_millis(u64::from(query.limit) * 10)).await;
        Ok(Some(vec![wire_job(&query.limit.to_string())]))
    }

    async fn job(&self, id: &str) -> Result<WireJob, FetchError> {
        Ok(wire_job(id))
    }

    async fn queue_stats(
        &self,
        _buckets: &[BucketSecs],
    ) -> Result<Option<Vec<QueueStat>>, FetchError> {
        Err(FetchError {
            kind: FailureKind::HttpStatus(503),
            message: "unavailable".to_string(),
        })
    }
}

fn query(limit: u32) -> JobsQuery {
    JobsQuery {
        limit,
        state: None,
        sort_by: "modification_time",
        sort_order: SortOrder::Desc,
    }
}

fn event_seq(event: &EngineEvent) -> u64 {
    match event {
        EngineEvent::JobsFetched { seq, .. }
        | EngineEvent::QueueStatsFetched { seq, .. }
        | EngineEvent::JobFetched { seq, .. } => *seq,
    }
}

#[tokio::test(start_paused = true)]
async fn results_arrive_in_completion_order() {
    let (engine, mut events) = EngineHandle::new(Arc::new(ScriptedApi), CancellationToken::new());

    engine.enqueue(EngineCommand::FetchJobs {
        seq: 1,
        query: query(50),
    });
    engine.enqueue(EngineCommand::FetchJobs {
        seq: 2,
        query: query(5),
    });

    let first = events.recv().await.expect("first event");
    let second = events.recv().await.expect("second event");
    assert_eq!(event_seq(&first), 2);
    assert_eq!(event_seq(&second), 1);
}

#[tokio::test(start_paused = true)]
async fn failures_are_reported_as_events() {
    let (engine, mut events) = EngineHandle::new(Arc::new(ScriptedApi), CancellationToken::new());
    engine.enqueue(EngineCommand::FetchQueueStats {
        seq: 9,
        buckets: vec![300],
    });

    match events.recv().await.expect("event") {
        EngineEvent::QueueStatsFetched { seq, result } => {
            assert_eq!(seq, 9);
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(503));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn nothing_is_delivered_after_shutdown() {
    let cancel = CancellationToken::new();
    let (engine, mut events) = EngineHandle::new(Arc::new(ScriptedApi), cancel.clone());

    engine.enqueue(EngineCommand::FetchJobs {
        seq: 1,
        query: query(20),
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    engine.shutdown();
    assert!(engine.is_shut_down());

    engine.enqueue(EngineCommand::FetchJob {
        seq: 2,
        id: "late".to_string(),
    });
    drop(engine);

    assert_eq!(events.recv().await, None);
}
