use std::collections::BTreeMap;

use crate::creators::{self, DEFAULT_JOBS_LIMIT};
use crate::{reduce, Action, AppState, AppViewModel, BucketSecs, Effect, JobState, QueryKind, RequestSeq};

/// Owned state container: the only place actions are applied and request
/// sequence numbers are handed out.
#[derive(Debug)]
pub struct Store {
    state: AppState,
    issued: BTreeMap<QueryKind, RequestSeq>,
    jobs_limit: u32,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self::with_jobs_limit(DEFAULT_JOBS_LIMIT)
    }

    pub fn with_jobs_limit(jobs_limit: u32) -> Self {
        Self {
            state: AppState::new(),
            issued: BTreeMap::new(),
            jobs_limit,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    pub fn request_jobs(&mut self) -> Effect {
        let seq = self.next_seq(QueryKind::Jobs);
        creators::request_jobs(&self.state, seq, self.jobs_limit)
    }

    pub fn fetch_queue_stats(&mut self, buckets: &[BucketSecs]) -> Effect {
        let seq = self.next_seq(QueryKind::QueueStats);
        creators::fetch_queue_stats(seq, buckets)
    }

    pub fn fetch_job(&mut self, id: impl Into<String>) -> Effect {
        let seq = self.next_seq(QueryKind::JobDetail);
        creators::fetch_job(seq, id)
    }

    /// Applies the filter toggle and returns the out-of-cycle job list refresh.
    pub fn select_filter(&mut self, filter: Option<JobState>) -> Effect {
        self.dispatch(creators::select_filter(filter));
        self.request_jobs()
    }

    /// Opens the modal for a listed job and returns a refresh of its details.
    /// Returns `None` and leaves the state untouched when the id is not listed.
    pub fn display_job(&mut self, id: &str) -> Option<Effect> {
        let action = creators::display_job_by_id(&self.state, id)?;
        self.dispatch(action);
        Some(self.fetch_job(id))
    }

    pub fn dismiss_modal(&mut self) {
        self.dispatch(creators::dismiss_modal());
    }

    fn next_seq(&mut self, query: QueryKind) -> RequestSeq {
        let seq = self.issued.entry(query).or_insert(0);
        *seq += 1;
        *seq
    }
}
