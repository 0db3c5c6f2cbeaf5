use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::Parser;
use crossterm::event::{Event, EventStream, KeyEventKind};
use dash_logging::{dash_info, dash_warn};
use futures_util::StreamExt;
use queuedash_client::{
    EngineEvent, EngineHandle, Endpoints, PollTick, PollingDriver, ReqwestApi,
};
use queuedash_core::{AppViewModel, BucketSecs, Effect, Store};
use tokio_util::sync::CancellationToken;

use super::config::{Args, DashboardConfig};
use super::effects::{event_to_action, EffectRunner};
use super::logging;
use super::ui::input::{handle_key, UiCommand};
use super::ui::render::render;
use super::ui::state::UiState;
use super::ui::terminal::TerminalSession;

pub async fn run_app() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = DashboardConfig::resolve(&args).context("loading configuration")?;
    logging::initialize(config.log_destination, &config.log_file);

    let endpoints = Endpoints::new(&config.base_url).context("parsing base url")?;
    dash_info!("queuedash starting against {}", endpoints.base());
    let api = ReqwestApi::new(endpoints, config.fetch_settings()).context("building http client")?;

    let cancel = CancellationToken::new();
    let (engine, mut events) = EngineHandle::new(Arc::new(api), cancel.child_token());
    let runner = EffectRunner::new(engine);
    let mut poller = PollingDriver::new(config.poll_interval(), cancel.child_token());
    dash_info!("polling every {:?}", poller.interval());
    let mut ticks = poller
        .start()
        .context("polling driver was already started")?;

    let mut dashboard = Dashboard::new(
        Store::with_jobs_limit(config.jobs_limit),
        config.stat_buckets.clone(),
    );
    let mut view = dashboard.store.view();
    let mut ui = UiState::default();
    let mut keys = EventStream::new();
    let mut terminal = TerminalSession::enter().context("entering terminal ui")?;
    terminal.draw(|frame| render(frame, &view, &mut ui, &status_line()))?;

    loop {
        let mut redraw = false;
        tokio::select! {
            Some(tick) = ticks.recv() => runner.run(dashboard.on_tick(tick)),
            Some(event) = events.recv() => dashboard.on_event(event),
            key_event = keys.next() => match key_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    redraw = true;
                    match handle_key(key, &mut ui, &view) {
                        Some(UiCommand::Quit) => break,
                        Some(command) => runner.run(dashboard.on_command(command)),
                        None => {}
                    }
                }
                Some(Ok(Event::Resize(..))) => redraw = true,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    dash_warn!("terminal input failed: {}", err);
                    break;
                }
                None => break,
            },
        }

        if let Some(next) = dashboard.take_view() {
            ui.sync_rows(next.jobs.len());
            view = next;
            redraw = true;
        }
        if redraw {
            terminal.draw(|frame| render(frame, &view, &mut ui, &status_line()))?;
        }
    }

    // Stop the timer and drop in-flight responses before leaving.
    poller.stop();
    runner.shutdown();
    cancel.cancel();
    drop(terminal);
    dash_info!("queuedash stopped");
    Ok(())
}

/// Glue between loop inputs and the store: each input may yield effects for the engine.
struct Dashboard {
    store: Store,
    stat_buckets: Vec<BucketSecs>,
}

impl Dashboard {
    fn new(store: Store, stat_buckets: Vec<BucketSecs>) -> Self {
        Self {
            store,
            stat_buckets,
        }
    }

    fn on_tick(&mut self, tick: PollTick) -> Vec<Effect> {
        dash_logging::set_poll_tick(tick.0);
        self.refresh()
    }

    fn on_event(&mut self, event: EngineEvent) {
        self.store.dispatch(event_to_action(event));
    }

    fn on_command(&mut self, command: UiCommand) -> Vec<Effect> {
        match command {
            // Out-of-cycle refresh; the poll timer keeps its schedule.
            UiCommand::Filter(filter) => vec![self.store.select_filter(filter)],
            UiCommand::Show(id) => match self.store.display_job(&id) {
                Some(effect) => vec![effect],
                None => {
                    dash_warn!("job {} is not in the current list", id);
                    Vec::new()
                }
            },
            UiCommand::Close => {
                self.store.dismiss_modal();
                Vec::new()
            }
            UiCommand::Refresh => self.refresh(),
            UiCommand::Quit => Vec::new(),
        }
    }

    fn refresh(&mut self) -> Vec<Effect> {
        vec![
            self.store.request_jobs(),
            self.store.fetch_queue_stats(&self.stat_buckets),
        ]
    }

    /// Returns a fresh view model only when the state changed since the last draw.
    fn take_view(&mut self) -> Option<AppViewModel> {
        if self.store.consume_dirty() {
            Some(self.store.view())
        } else {
            None
        }
    }
}

fn status_line() -> String {
    format!(
        "queuedash | tick {} | {}",
        dash_logging::poll_tick(),
        Local::now().format("%H:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use queuedash_client::{EngineEvent, FailureKind, FetchError, PollTick};
    use queuedash_core::{Effect, JobState, QueryKind, Store, WireJob};
    use serde_json::json;

    use super::Dashboard;
    use crate::platform::ui::input::UiCommand;

    fn dashboard() -> Dashboard {
        Dashboard::new(Store::new(), vec![300, 600, 1800, 3600])
    }

    fn jobs_event(seq: u64, ids: &[&str]) -> EngineEvent {
        let jobs: Vec<WireJob> = ids
            .iter()
            .map(|id| serde_json::from_value(json!({"id": id, "state": "working"})).unwrap())
            .collect();
        EngineEvent::JobsFetched {
            seq,
            result: Ok(Some(jobs)),
        }
    }

    #[test]
    fn tick_requests_jobs_and_stats() {
        let mut dashboard = dashboard();
        let effects = dashboard.on_tick(PollTick(1));

        assert_eq!(effects.len(), 2);
        assert!(matches!(effects[0], Effect::FetchJobs { seq: 1, .. }));
        assert!(matches!(
            &effects[1],
            Effect::FetchQueueStats { seq: 1, buckets } if buckets == &vec![300, 600, 1800, 3600]
        ));
    }

    #[test]
    fn filter_change_issues_out_of_cycle_request() {
        let mut dashboard = dashboard();
        dashboard.on_tick(PollTick(1));

        let effects = dashboard.on_command(UiCommand::Filter(Some(JobState::Dead)));
        match effects.as_slice() {
            [Effect::FetchJobs { seq, query }] => {
                assert_eq!(*seq, 2);
                assert_eq!(query.state, Some(JobState::Dead));
            }
            other => panic!("unexpected effects {other:?}"),
        }
    }

    #[test]
    fn failed_fetch_keeps_data_and_marks_stale() {
        let mut dashboard = dashboard();
        dashboard.on_event(jobs_event(1, &["a"]));
        assert!(dashboard.take_view().is_some());

        dashboard.on_event(EngineEvent::JobsFetched {
            seq: 2,
            result: Err(FetchError {
                kind: FailureKind::HttpStatus(502),
                message: "bad gateway".to_string(),
            }),
        });
        let view = dashboard.take_view().expect("dirty after failure");
        assert_eq!(view.jobs.len(), 1);
        assert_eq!(view.stale[0].query, QueryKind::Jobs);
        assert_eq!(view.stale[0].reason, "http status 502");

        // The next tick still fires requests.
        assert_eq!(dashboard.on_tick(PollTick(2)).len(), 2);
    }

    #[test]
    fn show_and_close_modal() {
        let mut dashboard = dashboard();
        assert!(dashboard.on_command(UiCommand::Show("a".into())).is_empty());

        dashboard.on_event(jobs_event(1, &["a", "b"]));
        let effects = dashboard.on_command(UiCommand::Show("b".into()));
        assert_eq!(
            effects,
            vec![Effect::FetchJob {
                seq: 1,
                id: "b".to_string()
            }]
        );
        assert!(dashboard.take_view().and_then(|v| v.modal).is_some());

        dashboard.on_command(UiCommand::Close);
        let view = dashboard.take_view().expect("dirty after close");
        assert!(view.modal.is_none());
    }

    #[test]
    fn unchanged_state_does_not_redraw() {
        let mut dashboard = dashboard();
        dashboard.on_event(jobs_event(2, &["a"]));
        assert!(dashboard.take_view().is_some());

        dashboard.on_event(jobs_event(1, &["old"]));
        assert!(dashboard.take_view().is_none());
    }
}
