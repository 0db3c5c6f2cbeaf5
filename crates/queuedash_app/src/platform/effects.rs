use dash_logging::{dash_info, dash_warn};
use queuedash_client::{EngineCommand, EngineEvent, EngineHandle, FetchError};
use queuedash_core::{Action, Effect, QueryKind, RequestSeq};

/// Hands core effects to the request engine.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.engine.enqueue(to_command(effect));
        }
    }

    pub fn shutdown(&self) {
        dash_info!("shutting down request engine");
        self.engine.shutdown();
    }
}

fn to_command(effect: Effect) -> EngineCommand {
    match effect {
        Effect::FetchJobs { seq, query } => EngineCommand::FetchJobs { seq, query },
        Effect::FetchQueueStats { seq, buckets } => {
            EngineCommand::FetchQueueStats { seq, buckets }
        }
        Effect::FetchJob { seq, id } => EngineCommand::FetchJob { seq, id },
    }
}

/// Every engine event resolves into exactly one action; failures become `FetchFailed`.
pub fn event_to_action(event: EngineEvent) -> Action {
    match event {
        EngineEvent::JobsFetched { seq, result } => match result {
            Ok(jobs) => Action::ReceivedJobs { seq, jobs },
            Err(err) => failed(QueryKind::Jobs, seq, err),
        },
        EngineEvent::QueueStatsFetched { seq, result } => match result {
            Ok(stats) => Action::ReceivedQueueStats { seq, stats },
            Err(err) => failed(QueryKind::QueueStats, seq, err),
        },
        EngineEvent::JobFetched { seq, result } => match result {
            Ok(job) => Action::ReceivedJob { seq, job },
            Err(err) => failed(QueryKind::JobDetail, seq, err),
        },
    }
}

fn failed(query: QueryKind, seq: RequestSeq, err: FetchError) -> Action {
    dash_warn!("{} request #{} failed: {}", query.label(), seq, err);
    Action::FetchFailed {
        query,
        seq,
        reason: err.kind.to_string(),
    }
}
