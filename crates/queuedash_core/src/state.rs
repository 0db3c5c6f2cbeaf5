use std::collections::BTreeMap;

use crate::view_model::AppViewModel;
use crate::{Job, JobState, QueryKind, QueueStat, RequestSeq};

/// Last failure recorded for a query; cleared by the next successful response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub seq: RequestSeq,
    pub reason: String,
}

/// The dashboard's single snapshot of client-visible data.
///
/// Only [`crate::reduce`] produces new values of this type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    selected_state_filter: Option<JobState>,
    jobs: Vec<Job>,
    queue_stats: Vec<QueueStat>,
    displayed_job: Option<Job>,
    applied: BTreeMap<QueryKind, RequestSeq>,
    failures: BTreeMap<QueryKind, FetchFailure>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_state_filter(&self) -> Option<&JobState> {
        self.selected_state_filter.as_ref()
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn queue_stats(&self) -> &[QueueStat] {
        &self.queue_stats
    }

    pub fn displayed_job(&self) -> Option<&Job> {
        self.displayed_job.as_ref()
    }

    /// Sequence number of the newest response applied for `query`.
    pub fn last_applied(&self, query: QueryKind) -> Option<RequestSeq> {
        self.applied.get(&query).copied()
    }

    pub fn failure(&self, query: QueryKind) -> Option<&FetchFailure> {
        self.failures.get(&query)
    }

    pub fn failures(&self) -> impl Iterator<Item = (QueryKind, &FetchFailure)> + '_ {
        self.failures.iter().map(|(query, failure)| (*query, failure))
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self)
    }

    /// Returns whether the state changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn toggle_filter(&mut self, filter: Option<JobState>) {
        if self.selected_state_filter == filter {
            self.selected_state_filter = None;
        } else {
            self.selected_state_filter = filter;
        }
        self.mark_dirty();
    }

    pub(crate) fn set_jobs(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
        self.mark_dirty();
    }

    pub(crate) fn set_queue_stats(&mut self, stats: Vec<QueueStat>) {
        self.queue_stats = stats;
        self.mark_dirty();
    }

    pub(crate) fn set_displayed_job(&mut self, job: Option<Job>) {
        self.displayed_job = job;
        self.mark_dirty();
    }

    /// Closes the modal along with any detail failure it was showing.
    pub(crate) fn dismiss_job(&mut self) {
        self.failures.remove(&QueryKind::JobDetail);
        self.set_displayed_job(None);
    }

    pub(crate) fn is_stale(&self, query: QueryKind, seq: RequestSeq) -> bool {
        self.applied.get(&query).is_some_and(|last| seq < *last)
    }

    /// Records `seq` as applied for `query`. Returns false when the response
    /// is older than one already applied and must be dropped.
    pub(crate) fn accept_response(&mut self, query: QueryKind, seq: RequestSeq) -> bool {
        if self.is_stale(query, seq) {
            return false;
        }
        self.applied.insert(query, seq);
        if self
            .failures
            .get(&query)
            .is_some_and(|failure| failure.seq <= seq)
        {
            self.failures.remove(&query);
        }
        true
    }

    pub(crate) fn record_failure(&mut self, query: QueryKind, seq: RequestSeq, reason: String) {
        if self.is_stale(query, seq) {
            return;
        }
        // A detail failure only matters while its modal is open.
        if query == QueryKind::JobDetail && self.displayed_job.is_none() {
            return;
        }
        if self
            .failures
            .get(&query)
            .is_some_and(|existing| existing.seq > seq)
        {
            return;
        }
        self.failures.insert(query, FetchFailure { seq, reason });
        self.mark_dirty();
    }
}
