use crate::{Job, JobState, QueryKind, QueueStat, RequestSeq, WireJob};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// User picked a state filter; picking the active one again clears it.
    SelectedFilter(Option<JobState>),
    /// Backend answered a job list request.
    ReceivedJobs {
        seq: RequestSeq,
        jobs: Option<Vec<WireJob>>,
    },
    /// Backend answered a queue stats request.
    ReceivedQueueStats {
        seq: RequestSeq,
        stats: Option<Vec<QueueStat>>,
    },
    /// Backend answered a single job request.
    ReceivedJob { seq: RequestSeq, job: WireJob },
    /// User opened the detail modal for a job.
    DisplayJob(Job),
    /// User closed the detail modal.
    ModalDismissed,
    /// A request failed at the transport, status or decoding level.
    FetchFailed {
        query: QueryKind,
        seq: RequestSeq,
        reason: String,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
