use crate::{Action, AppState, Job, QueryKind};

/// Pure reducer: applies one action to the previous state and returns the next one.
///
/// Responses carry the sequence number of the request that produced them; a
/// response older than the newest one already applied for the same query is
/// dropped, so a slow request can never overwrite fresher data.
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::SelectedFilter(filter) => state.toggle_filter(filter),
        Action::ReceivedJobs { seq, jobs } => {
            if state.accept_response(QueryKind::Jobs, seq) {
                let jobs = jobs
                    .unwrap_or_default()
                    .into_iter()
                    .map(Job::from_wire)
                    .collect();
                state.set_jobs(jobs);
            }
        }
        Action::ReceivedQueueStats { seq, stats } => {
            if state.accept_response(QueryKind::QueueStats, seq) {
                state.set_queue_stats(stats.unwrap_or_default());
            }
        }
        Action::ReceivedJob { seq, job } => {
            // Only refreshes the modal; a detail for a job no longer shown is dropped.
            let shown = state
                .displayed_job()
                .is_some_and(|displayed| displayed.id == job.id);
            if shown && state.accept_response(QueryKind::JobDetail, seq) {
                state.set_displayed_job(Some(Job::from_wire(job)));
            }
        }
        Action::DisplayJob(job) => state.set_displayed_job(Some(job)),
        Action::ModalDismissed => state.dismiss_job(),
        Action::FetchFailed { query, seq, reason } => state.record_failure(query, seq, reason),
        Action::NoOp => {}
    }

    state
}
