use ratatui::widgets::TableState;

/// Screen-only state: row cursor and help overlay. Never reaches the store.
#[derive(Debug, Default)]
pub struct UiState {
    pub table: TableState,
    pub help_open: bool,
}

impl UiState {
    pub fn selected(&self) -> Option<usize> {
        self.table.selected()
    }

    /// Keeps the cursor on a valid row after the job list was replaced.
    pub fn sync_rows(&mut self, rows: usize) {
        let selected = match (rows, self.table.selected()) {
            (0, _) => None,
            (_, None) => Some(0),
            (rows, Some(index)) => Some(index.min(rows - 1)),
        };
        self.table.select(selected);
    }

    pub fn select_next(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        let next = self.table.selected().map_or(0, |index| (index + 1).min(rows - 1));
        self.table.select(Some(next));
    }

    pub fn select_previous(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        let previous = self.table.selected().map_or(0, |index| index.saturating_sub(1));
        self.table.select(Some(previous));
    }
}

#[cfg(test)]
mod tests {
    use super::UiState;

    #[test]
    fn cursor_follows_row_count() {
        let mut ui = UiState::default();
        ui.sync_rows(0);
        assert_eq!(ui.selected(), None);

        ui.sync_rows(3);
        assert_eq!(ui.selected(), Some(0));

        ui.select_next(3);
        ui.select_next(3);
        ui.select_next(3);
        assert_eq!(ui.selected(), Some(2));

        ui.sync_rows(2);
        assert_eq!(ui.selected(), Some(1));

        ui.select_previous(2);
        ui.select_previous(2);
        assert_eq!(ui.selected(), Some(0));

        ui.sync_rows(0);
        assert_eq!(ui.selected(), None);
    }
}
