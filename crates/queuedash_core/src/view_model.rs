use chrono::{DateTime, SecondsFormat, Utc};

use crate::{short_duration, AppState, Job, JobState, QueryKind, QueueStat};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub filters: Vec<FilterButtonView>,
    pub jobs: Vec<JobRowView>,
    pub queues: Vec<QueueChartView>,
    pub modal: Option<JobModalView>,
    pub stale: Vec<StaleNotice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButtonView {
    pub state: JobState,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRowView {
    pub id: String,
    pub queue: String,
    pub state: JobState,
    pub state_title: String,
    pub payload: String,
    pub modification_time: Option<String>,
}

/// One bar chart per queue: a label per bucket, a series per job state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueChartView {
    pub name: String,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeriesView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeriesView {
    pub state: JobState,
    pub label: String,
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobModalView {
    pub header: String,
    pub payload: String,
    pub log: String,
}

/// Shown while the last request for `query` failed; the data on screen is outdated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleNotice {
    pub query: QueryKind,
    pub reason: String,
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState) -> Self {
        let selected = state.selected_state_filter();
        let filters = JobState::FILTERS
            .iter()
            .map(|filter| FilterButtonView {
                state: filter.clone(),
                label: filter.title(),
                selected: selected == Some(filter),
            })
            .collect();

        let jobs = state.jobs().iter().map(job_row).collect();

        let mut stats: Vec<&QueueStat> = state.queue_stats().iter().collect();
        stats.sort_by(|a, b| a.name.cmp(&b.name));
        let queues = stats.into_iter().map(queue_chart).collect();

        let stale = state
            .failures()
            .map(|(query, failure)| StaleNotice {
                query,
                reason: failure.reason.clone(),
            })
            .collect();

        Self {
            filters,
            jobs,
            queues,
            modal: state.displayed_job().map(job_modal),
            stale,
        }
    }
}

fn job_row(job: &Job) -> JobRowView {
    JobRowView {
        id: job.id.clone(),
        queue: job.queue.clone(),
        state: job.state.clone(),
        state_title: job.state.title(),
        payload: job.payload.to_string(),
        modification_time: job.modification_time.map(iso_time),
    }
}

fn queue_chart(stat: &QueueStat) -> QueueChartView {
    let buckets: Vec<_> = stat.buckets().collect();
    let series = JobState::FILTERS
        .iter()
        .map(|state| ChartSeriesView {
            state: state.clone(),
            label: state.title(),
            counts: buckets
                .iter()
                .map(|bucket| stat.count(*bucket, state))
                .collect(),
        })
        .collect();

    QueueChartView {
        name: stat.name.clone(),
        labels: buckets.into_iter().map(short_duration).collect(),
        series,
    }
}

fn job_modal(job: &Job) -> JobModalView {
    let payload =
        serde_json::to_string_pretty(&job.payload).unwrap_or_else(|_| job.payload.to_string());
    let log = job
        .log
        .iter()
        .map(|entry| {
            let time = entry.time.map(iso_time).unwrap_or_else(|| "-".to_string());
            format!("{time} {}", entry.line)
        })
        .collect::<Vec<_>>()
        .join("\n");

    JobModalView {
        header: format!("Job {}", job.id),
        payload,
        log,
    }
}

fn iso_time(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
