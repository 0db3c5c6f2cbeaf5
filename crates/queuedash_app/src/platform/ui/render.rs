use queuedash_core::{AppViewModel, JobModalView, JobState, QueueChartView};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap,
};
use ratatui::Frame;

use super::input::{HELP_LINES, STATUS_HINT};
use super::state::UiState;

const QUEUE_PANEL_HEIGHT: u16 = 12;

/// Draws one frame of the dashboard. `status` is shown on the first line.
pub fn render(frame: &mut Frame, view: &AppViewModel, ui: &mut UiState, status: &str) {
    let queues_height = if view.queues.is_empty() {
        3
    } else {
        QUEUE_PANEL_HEIGHT
    };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(view.stale.len() as u16),
            Constraint::Length(queues_height),
            Constraint::Length(1),
            Constraint::Min(4),
        ])
        .split(frame.size());

    render_status(frame, chunks[0], status);
    render_stale(frame, chunks[1], view);
    render_queues(frame, chunks[2], &view.queues);
    render_filters(frame, chunks[3], view);
    render_jobs(frame, chunks[4], view, ui);

    if let Some(modal) = &view.modal {
        render_modal(frame, modal);
    }
    if ui.help_open {
        render_help(frame);
    }
}

fn state_color(state: &JobState) -> Color {
    match state {
        JobState::Queued => Color::Blue,
        JobState::Working => Color::Yellow,
        JobState::Finished => Color::Green,
        JobState::Dead => Color::Red,
        JobState::Unknown(_) => Color::Gray,
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn render_status(frame: &mut Frame, area: Rect, status: &str) {
    let line = Line::from(vec![
        Span::styled(status.to_string(), bold()),
        Span::raw("  "),
        Span::styled(STATUS_HINT, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_stale(frame: &mut Frame, area: Rect, view: &AppViewModel) {
    let lines: Vec<Line> = view
        .stale
        .iter()
        .map(|notice| {
            Line::styled(
                format!(
                    "! {} data may be stale: {}",
                    notice.query.label(),
                    notice.reason
                ),
                Style::default().fg(Color::Red),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_queues(frame: &mut Frame, area: Rect, queues: &[QueueChartView]) {
    if queues.is_empty() {
        let empty = Paragraph::new("(no queue stats)")
            .block(Block::default().borders(Borders::ALL).title("Queues"));
        frame.render_widget(empty, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            queues
                .iter()
                .map(|_| Constraint::Ratio(1, queues.len() as u32))
                .collect::<Vec<_>>(),
        )
        .split(area);
    for (queue, column) in queues.iter().zip(columns.iter()) {
        frame.render_widget(queue_chart(queue), *column);
    }
}

/// One group per time bucket, one bar per job state inside the group.
fn queue_chart(queue: &QueueChartView) -> BarChart<'_> {
    let mut title = vec![Span::styled(format!(" {} ", queue.name), bold())];
    for series in &queue.series {
        title.push(Span::styled(
            format!("■ {} ", series.label),
            Style::default().fg(state_color(&series.state)),
        ));
    }

    let mut chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(Line::from(title)))
        .bar_width(2)
        .bar_gap(0)
        .group_gap(2);
    for (index, label) in queue.labels.iter().enumerate() {
        let bars: Vec<Bar> = queue
            .series
            .iter()
            .map(|series| {
                Bar::default()
                    .value(series.counts.get(index).copied().unwrap_or(0))
                    .style(Style::default().fg(state_color(&series.state)))
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(label.clone()))
                .bars(&bars),
        );
    }
    chart
}

fn render_filters(frame: &mut Frame, area: Rect, view: &AppViewModel) {
    let selected = Style::default()
        .add_modifier(Modifier::REVERSED)
        .add_modifier(Modifier::BOLD);
    let mut spans = vec![Span::raw("Filter: ")];
    for (index, button) in view.filters.iter().enumerate() {
        let text = format!(" {} {} ", index + 1, button.label);
        spans.push(if button.selected {
            Span::styled(text, selected)
        } else {
            Span::styled(text, Style::default().fg(state_color(&button.state)))
        });
    }
    let any_selected = view.filters.iter().any(|button| button.selected);
    spans.push(if any_selected {
        Span::raw(" 0 All ")
    } else {
        Span::styled(" 0 All ", selected)
    });
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_jobs(frame: &mut Frame, area: Rect, view: &AppViewModel, ui: &mut UiState) {
    let header = Row::new(["State", "Job ID", "Queue", "Modified", "Payload"]).style(bold());
    let rows = view.jobs.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.state_title.clone())
                .style(Style::default().fg(state_color(&row.state))),
            Cell::from(row.id.clone()),
            Cell::from(row.queue.clone()),
            Cell::from(row.modification_time.clone().unwrap_or_else(|| "-".to_string())),
            Cell::from(row.payload.clone()),
        ])
    });
    let widths = [
        Constraint::Length(12),
        Constraint::Length(26),
        Constraint::Length(16),
        Constraint::Length(25),
        Constraint::Min(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Jobs ({})", view.jobs.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(">> ");
    frame.render_stateful_widget(table, area, &mut ui.table);
}

fn render_modal(frame: &mut Frame, modal: &JobModalView) {
    let mut lines = vec![Line::styled("Payload", bold())];
    lines.extend(modal.payload.lines().map(|line| Line::from(line.to_string())));
    lines.push(Line::default());
    lines.push(Line::styled("Log", bold()));
    if modal.log.is_empty() {
        lines.push(Line::from("(empty)"));
    } else {
        lines.extend(modal.log.lines().map(|line| Line::from(line.to_string())));
    }
    lines.push(Line::default());
    lines.push(Line::styled("esc to close", Style::default().fg(Color::DarkGray)));

    let area = centered_rect(80, 70, frame.size());
    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(modal.header.clone()),
        );
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn render_help(frame: &mut Frame) {
    let lines: Vec<Line> = HELP_LINES
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:<14}"), bold()),
                Span::raw(*action),
            ])
        })
        .collect();
    let area = centered_rect(60, 50, frame.size());
    let popup = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Keys"));
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(rows[1])[1]
}

#[cfg(test)]
mod tests {
    use queuedash_core::{reduce, Action, AppState, JobState, QueryKind, WireJob};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use serde_json::json;

    use super::*;

    fn populated_state() -> AppState {
        let job: WireJob = serde_json::from_value(json!({
            "id": "j1",
            "queue": "scrape",
            "state": "working",
            "payload": {"url": "http://example.com"},
            "modification_time": "2020-01-01T00:00:00Z",
            "log": [{"time": "2020-01-01T00:00:00Z", "line": "go"}],
        }))
        .unwrap();
        let stats = serde_json::from_value(json!([
            {"name": "scrape", "jobs": {"300": {"working": 1}, "600": {"dead": 2}}}
        ]))
        .unwrap();

        let state = reduce(AppState::new(), Action::SelectedFilter(Some(JobState::Working)));
        let state = reduce(
            state,
            Action::ReceivedJobs {
                seq: 1,
                jobs: Some(vec![job]),
            },
        );
        reduce(
            state,
            Action::ReceivedQueueStats {
                seq: 1,
                stats: Some(stats),
            },
        )
    }

    /// Renders into an in-memory terminal and returns the screen as text rows.
    fn screen(view: &AppViewModel, ui: &mut UiState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|frame| render(frame, view, ui, "queuedash"))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn renders_queues_filters_and_rows() {
        let view = populated_state().view();
        let mut ui = UiState::default();
        ui.sync_rows(view.jobs.len());
        let text = screen(&view, &mut ui);

        assert!(text.starts_with("queuedash"));
        assert!(text.contains("scrape"));
        assert!(text.contains("5m"));
        assert!(text.contains("10m"));
        assert!(text.contains(" 2 Working "));
        assert!(text.contains(" 0 All "));
        assert!(text.contains("Jobs (1)"));
        assert!(text.contains(">> "));
        assert!(text.contains("2020-01-01T00:00:00.000Z"));
        assert!(!text.contains("Job j1"));
    }

    #[test]
    fn renders_modal_and_stale_notice() {
        let state = populated_state();
        let job = state.jobs()[0].clone();
        let state = reduce(state, Action::DisplayJob(job));
        let state = reduce(
            state,
            Action::FetchFailed {
                query: QueryKind::Jobs,
                seq: 2,
                reason: "timeout".to_string(),
            },
        );
        let text = screen(&state.view(), &mut UiState::default());

        assert!(text.contains("! jobs data may be stale: timeout"));
        assert!(text.contains("Job j1"));
        assert!(text.contains("\"url\": \"http://example.com\""));
        assert!(text.contains("2020-01-01T00:00:00.000Z go"));
    }

    #[test]
    fn empty_dashboard_and_help_overlay() {
        let mut ui = UiState {
            help_open: true,
            ..UiState::default()
        };
        let text = screen(&AppViewModel::default(), &mut ui);

        assert!(text.contains("(no queue stats)"));
        assert!(text.contains("Jobs (0)"));
        assert!(text.contains("show job details"));
    }
}
