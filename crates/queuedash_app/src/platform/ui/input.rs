use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use queuedash_core::{AppViewModel, JobState};

use super::state::UiState;

pub const HELP_LINES: &[(&str, &str)] = &[
    ("1-4", "toggle filter: queued, working, finished, dead"),
    ("0", "clear filter"),
    ("up/down, j/k", "move the row cursor"),
    ("enter", "show job details"),
    ("esc", "close job details"),
    ("r", "refresh now"),
    ("?", "toggle this help"),
    ("q, ctrl-c", "quit"),
];

pub const STATUS_HINT: &str = "1-4 filter  0 clear  enter details  r refresh  ? help  q quit";

/// Requests that reach the store. Cursor and help keys stay in [`UiState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    Filter(Option<JobState>),
    Show(String),
    Close,
    Refresh,
    Quit,
}

/// Maps one key press to a command. `view` is the model currently on screen.
pub fn handle_key(key: KeyEvent, ui: &mut UiState, view: &AppViewModel) -> Option<UiCommand> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UiCommand::Quit);
    }
    if key.code == KeyCode::Char('q') {
        return Some(UiCommand::Quit);
    }

    if ui.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            ui.help_open = false;
        }
        return None;
    }

    if view.modal.is_some() {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => Some(UiCommand::Close),
            KeyCode::Char('r') => Some(UiCommand::Refresh),
            KeyCode::Char('?') => {
                ui.help_open = true;
                None
            }
            _ => None,
        };
    }

    let rows = view.jobs.len();
    match key.code {
        KeyCode::Char('?') => {
            ui.help_open = true;
            None
        }
        KeyCode::Char('0') => Some(UiCommand::Filter(None)),
        KeyCode::Char(digit @ '1'..='4') => {
            let index = digit as usize - '1' as usize;
            JobState::FILTERS
                .get(index)
                .map(|state| UiCommand::Filter(Some(state.clone())))
        }
        KeyCode::Char('r') => Some(UiCommand::Refresh),
        KeyCode::Down | KeyCode::Char('j') => {
            ui.select_next(rows);
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            ui.select_previous(rows);
            None
        }
        KeyCode::Enter => ui
            .selected()
            .and_then(|index| view.jobs.get(index))
            .map(|row| UiCommand::Show(row.id.clone())),
        _ => None,
    }
}
