/*
 * This module defines `ViewState`, the presentation-only state of the session:
 * the active selection tab, the theme, the table page, and the display order of
 * the filtered rows. The filtered result itself stays in filter order; sorting
 * by reading is a display concern and lives here as an index permutation.
 */
use super::ui_constants::PAGE_SIZE;
use crate::console_layer::types::{
    PageRequest, SelectionPanelView, SelectionRowView, TablePageView,
};
use crate::core::{DictionaryEntry, RowGroup, SelectionMap, ThemeSetting};

#[derive(Debug, Default)]
pub struct ViewState {
    pub active_tab: RowGroup,
    pub theme: ThemeSetting,
    page: usize,
    display_order: Vec<usize>,
}

impl ViewState {
    pub fn new() -> Self {
        log::debug!("ViewState::new called");
        ViewState::default()
    }

    /*
     * Recomputes the display order for a new filtered result and returns to
     * the first page. Rows are sorted by reading ascending; equal readings keep
     * their filter order.
     */
    pub fn reset_rows(&mut self, entries: &[DictionaryEntry]) {
        let mut order: Vec<usize> = (0..entries.len()).collect();
        order.sort_by(|&a, &b| entries[a].reading.cmp(&entries[b].reading));
        self.display_order = order;
        self.page = 0;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    // Always at least one page, even for an empty table.
    pub fn page_count(&self) -> usize {
        self.display_order.len().div_ceil(PAGE_SIZE).max(1)
    }

    /*
     * Moves to the requested page, clamped to the valid range. Returns whether
     * the page changed.
     */
    pub fn request_page(&mut self, request: PageRequest) -> bool {
        let last = self.page_count() - 1;
        let target = match request {
            PageRequest::Next => (self.page + 1).min(last),
            PageRequest::Previous => self.page.saturating_sub(1),
            PageRequest::Number(n) => n.saturating_sub(1).min(last),
        };
        let changed = target != self.page;
        self.page = target;
        changed
    }

    pub fn table_page(&self, entries: &[DictionaryEntry], dictionary_size: usize) -> TablePageView {
        let rows = self
            .display_order
            .iter()
            .skip(self.page * PAGE_SIZE)
            .take(PAGE_SIZE)
            .filter_map(|&i| entries.get(i).cloned())
            .collect();
        TablePageView {
            page: self.page,
            page_count: self.page_count(),
            total_rows: self.display_order.len(),
            dictionary_size,
            rows,
        }
    }

    pub fn selection_panel(&self, selection: &SelectionMap) -> SelectionPanelView {
        let group = self.active_tab;
        let rows = group
            .rows()
            .iter()
            .map(|row| SelectionRowView {
                slots: (*row).map(|slot| slot.map(|c| (c, selection.is_known(c)))),
                state: selection.row_state(row),
            })
            .collect();
        SelectionPanelView {
            group,
            rows,
            group_state: selection.group_state(group),
            global_state: selection.global_state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CheckState, PersistedSelection, alphabet};

    fn entries(readings: &[&str]) -> Vec<DictionaryEntry> {
        readings.iter().map(|r| DictionaryEntry::new(r)).collect()
    }

    #[test]
    fn test_reset_rows_sorts_by_reading_and_returns_to_first_page() {
        let mut view = ViewState::new();
        let rows = entries(&["さか", "あか", "かさ"]);
        view.reset_rows(&entries(&["x"; 60]));
        view.request_page(PageRequest::Number(3));
        assert_eq!(view.page(), 2);

        view.reset_rows(&rows);

        assert_eq!(view.page(), 0);
        let page = view.table_page(&rows, 10);
        let readings: Vec<&str> = page.rows.iter().map(|e| e.reading.as_str()).collect();
        assert_eq!(readings, vec!["あか", "かさ", "さか"]);
        assert_eq!(page.total_rows, 3);
        assert_eq!(page.dictionary_size, 10);
    }

    #[test]
    fn test_pagination_clamps_requests() {
        let mut view = ViewState::new();
        let rows = entries(&["あ"; 60]);
        view.reset_rows(&rows);
        assert_eq!(view.page_count(), 3);

        assert!(!view.request_page(PageRequest::Previous));
        assert!(view.request_page(PageRequest::Next));
        assert_eq!(view.page(), 1);
        assert!(view.request_page(PageRequest::Number(99)));
        assert_eq!(view.page(), 2);
        assert!(!view.request_page(PageRequest::Next));
        assert_eq!(view.table_page(&rows, 60).rows.len(), 10);
        view.request_page(PageRequest::Number(0));
        assert_eq!(view.page(), 0);
        assert_eq!(view.table_page(&rows, 60).rows.len(), PAGE_SIZE);
    }

    #[test]
    fn test_empty_table_has_one_page() {
        let mut view = ViewState::new();
        view.reset_rows(&[]);
        assert_eq!(view.page_count(), 1);
        assert!(view.table_page(&[], 5).rows.is_empty());
    }

    #[test]
    fn test_selection_panel_reflects_active_tab() {
        let mut view = ViewState::new();
        view.active_tab = RowGroup::Small;
        let selection = SelectionMap::initialize(&PersistedSelection::new(), &alphabet::alphabet())
            .set_character('ゃ', false);

        let panel = view.selection_panel(&selection);

        assert_eq!(panel.group, RowGroup::Small);
        assert_eq!(panel.rows.len(), 4);
        assert_eq!(
            panel.rows[1].slots,
            [Some(('ゃ', false)), None, Some(('ゅ', true)), None, Some(('ょ', true))]
        );
        assert_eq!(panel.rows[1].state, CheckState::Mixed);
        assert_eq!(panel.rows[0].state, CheckState::AllOn);
        assert_eq!(panel.group_state, CheckState::Mixed);
        assert_eq!(panel.global_state, CheckState::Mixed);
    }
}
