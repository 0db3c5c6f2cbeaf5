//! Action creators: turn a UI intent into an [`Action`] or, when the backend
//! must be asked, into an [`Effect`] the runtime executes.

use crate::{Action, AppState, BucketSecs, Effect, Job, JobState, JobsQuery, RequestSeq, SortOrder};

pub const DEFAULT_JOBS_LIMIT: u32 = 20;
/// Last 5, 10, 30 and 60 minutes.
pub const DEFAULT_STAT_BUCKETS: [BucketSecs; 4] = [5 * 60, 10 * 60, 30 * 60, 60 * 60];
pub const SORT_BY_MODIFICATION_TIME: &str = "modification_time";

/// Newest jobs first, restricted to the currently selected state filter.
pub fn request_jobs(state: &AppState, seq: RequestSeq, limit: u32) -> Effect {
    Effect::FetchJobs {
        seq,
        query: JobsQuery {
            limit,
            state: state.selected_state_filter().cloned(),
            sort_by: SORT_BY_MODIFICATION_TIME,
            sort_order: SortOrder::Desc,
        },
    }
}

pub fn fetch_queue_stats(seq: RequestSeq, buckets: &[BucketSecs]) -> Effect {
    Effect::FetchQueueStats {
        seq,
        buckets: buckets.to_vec(),
    }
}

pub fn fetch_job(seq: RequestSeq, id: impl Into<String>) -> Effect {
    Effect::FetchJob { seq, id: id.into() }
}

/// The caller is expected to follow up with [`request_jobs`].
pub fn select_filter(filter: Option<JobState>) -> Action {
    Action::SelectedFilter(filter)
}

pub fn display_job(job: Job) -> Action {
    Action::DisplayJob(job)
}

/// Opens the modal for a job from the current list; `None` if the id is not listed.
pub fn display_job_by_id(state: &AppState, id: &str) -> Option<Action> {
    state.job(id).cloned().map(Action::DisplayJob)
}

pub fn dismiss_modal() -> Action {
    Action::ModalDismissed
}
