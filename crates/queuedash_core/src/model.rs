use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Elapsed-time window of a queue stat bucket, in seconds.
pub type BucketSecs = u64;

/// Lifecycle state of a job as reported by the backend.
///
/// States the dashboard does not know about are kept verbatim in
/// [`JobState::Unknown`] so newer backends do not break parsing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobState {
    Queued,
    Working,
    Finished,
    Dead,
    Unknown(String),
}

impl JobState {
    /// States offered as filters, in display order.
    pub const FILTERS: [JobState; 4] = [
        JobState::Queued,
        JobState::Working,
        JobState::Finished,
        JobState::Dead,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => JobState::Queued,
            "working" => JobState::Working,
            "finished" => JobState::Finished,
            "dead" => JobState::Dead,
            other => JobState::Unknown(other.to_string()),
        }
    }

    /// Wire name, as used in the `state` query parameter.
    pub fn as_str(&self) -> &str {
        match self {
            JobState::Queued => "queued",
            JobState::Working => "working",
            JobState::Finished => "finished",
            JobState::Dead => "dead",
            JobState::Unknown(raw) => raw,
        }
    }

    /// Human-readable title, e.g. `Working` or `Unknown: initial`.
    pub fn title(&self) -> String {
        match self {
            JobState::Queued => "Queued".to_string(),
            JobState::Working => "Working".to_string(),
            JobState::Finished => "Finished".to_string(),
            JobState::Dead => "Dead".to_string(),
            JobState::Unknown(raw) => format!("Unknown: {raw}"),
        }
    }
}

impl From<String> for JobState {
    fn from(raw: String) -> Self {
        JobState::parse(&raw)
    }
}

impl From<JobState> for String {
    fn from(state: JobState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job log line exactly as the backend encodes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireLogEntry {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub line: String,
}

/// A job exactly as the backend encodes it; timestamps are still strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireJob {
    pub id: String,
    #[serde(default)]
    pub queue: String,
    #[serde(default)]
    pub priority: i64,
    pub state: JobState,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub creation_time: Option<String>,
    #[serde(default)]
    pub modification_time: Option<String>,
    #[serde(default)]
    pub completion_time: Option<String>,
    #[serde(default)]
    pub log: Option<Vec<WireLogEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub time: Option<DateTime<Utc>>,
    pub line: String,
}

/// A job with normalized timestamps, as held in the dashboard state.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: String,
    pub queue: String,
    pub priority: i64,
    pub state: JobState,
    pub payload: Value,
    pub creation_time: Option<DateTime<Utc>>,
    pub modification_time: Option<DateTime<Utc>>,
    pub completion_time: Option<DateTime<Utc>>,
    pub log: Vec<LogEntry>,
}

impl Job {
    pub fn from_wire(wire: WireJob) -> Self {
        let log = wire
            .log
            .unwrap_or_default()
            .into_iter()
            .map(|entry| LogEntry {
                time: entry.time.as_deref().and_then(parse_timestamp),
                line: entry.line,
            })
            .collect();

        Self {
            id: wire.id,
            queue: wire.queue,
            priority: wire.priority,
            state: wire.state,
            payload: wire.payload,
            creation_time: wire.creation_time.as_deref().and_then(parse_timestamp),
            modification_time: wire.modification_time.as_deref().and_then(parse_timestamp),
            completion_time: wire.completion_time.as_deref().and_then(parse_timestamp),
            log,
        }
    }
}

/// Parses an RFC 3339 wire timestamp into UTC. Returns `None` when malformed.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|time| time.with_timezone(&Utc))
}

/// Per-queue job counts, grouped by bucket and then by state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStat {
    pub name: String,
    #[serde(default)]
    pub jobs: BTreeMap<BucketSecs, BTreeMap<JobState, u64>>,
}

impl QueueStat {
    pub fn count(&self, bucket: BucketSecs, state: &JobState) -> u64 {
        self.jobs
            .get(&bucket)
            .and_then(|counts| counts.get(state))
            .copied()
            .unwrap_or(0)
    }

    pub fn buckets(&self) -> impl Iterator<Item = BucketSecs> + '_ {
        self.jobs.keys().copied()
    }
}
