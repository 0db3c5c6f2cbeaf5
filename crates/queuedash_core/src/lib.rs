//! Queuedash core: pure state machine, action creators and view-model helpers.
mod action;
pub mod creators;
mod duration;
mod effect;
mod model;
mod reduce;
mod state;
mod store;
mod view_model;

pub use action::Action;
pub use duration::short_duration;
pub use effect::{Effect, JobsQuery, QueryKind, RequestSeq, SortOrder};
pub use model::{
    parse_timestamp, BucketSecs, Job, JobState, LogEntry, QueueStat, WireJob, WireLogEntry,
};
pub use reduce::reduce;
pub use state::{AppState, FetchFailure};
pub use store::Store;
pub use view_model::{
    AppViewModel, ChartSeriesView, FilterButtonView, JobModalView, JobRowView, QueueChartView,
    StaleNotice,
};
