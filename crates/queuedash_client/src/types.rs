use std::fmt;

use queuedash_core::{QueueStat, RequestSeq, WireJob};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedBody,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedBody => write!(f, "malformed json body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Outcome of one request executed by the engine, tagged with its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    JobsFetched {
        seq: RequestSeq,
        result: Result<Option<Vec<WireJob>>, FetchError>,
    },
    QueueStatsFetched {
        seq: RequestSeq,
        result: Result<Option<Vec<QueueStat>>, FetchError>,
    },
    JobFetched {
        seq: RequestSeq,
        result: Result<WireJob, FetchError>,
    },
}
