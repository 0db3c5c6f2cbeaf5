use crate::{BucketSecs, JobState};

/// Request sequence number, monotonic per [`QueryKind`].
pub type RequestSeq = u64;

/// The logical queries the dashboard keeps in sync with the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueryKind {
    Jobs,
    QueueStats,
    JobDetail,
}

impl QueryKind {
    pub fn label(self) -> &'static str {
        match self {
            QueryKind::Jobs => "jobs",
            QueryKind::QueueStats => "queue stats",
            QueryKind::JobDetail => "job detail",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Parameters of a job list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobsQuery {
    pub limit: u32,
    pub state: Option<JobState>,
    pub sort_by: &'static str,
    pub sort_order: SortOrder,
}

/// Network work the runtime must perform; each one resolves into exactly one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchJobs { seq: RequestSeq, query: JobsQuery },
    FetchQueueStats { seq: RequestSeq, buckets: Vec<BucketSecs> },
    FetchJob { seq: RequestSeq, id: String },
}

impl Effect {
    pub fn query(&self) -> QueryKind {
        match self {
            Effect::FetchJobs { .. } => QueryKind::Jobs,
            Effect::FetchQueueStats { .. } => QueryKind::QueueStats,
            Effect::FetchJob { .. } => QueryKind::JobDetail,
        }
    }

    pub fn seq(&self) -> RequestSeq {
        match self {
            Effect::FetchJobs { seq, .. }
            | Effect::FetchQueueStats { seq, .. }
            | Effect::FetchJob { seq, .. } => *seq,
        }
    }
}
