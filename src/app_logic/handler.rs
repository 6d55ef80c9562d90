use super::view_state::ViewState;
use crate::console_layer::types::{AppEvent, PageRequest, UiCommand};
use crate::core::{
    Dictionary, DictionaryEntry, LoadError, LoadOutcome, PreferenceStoreOperations, RowGroup,
    SelectionMap, ThemeSetting, alphabet, config, entry_filter,
};
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionPhase {
    Loading,
    Loaded,
}

/*
 * Owns the mutable state of one session and reacts to host events. The two
 * selection maps are immutable values; each event replaces the reference:
 *
 * - `selection` holds pending edits from the checkboxes.
 * - `applied_selection` is what the table was last filtered with. It only
 *   changes on apply, which is also the only time the selection is persisted.
 *
 * Commands for the host are queued and dequeued one by one via
 * `try_dequeue_command`.
 */
pub struct VocabAppLogic {
    pub(crate) preference_store: Arc<dyn PreferenceStoreOperations>,
    pub(crate) alphabet: Vec<char>,
    pub(crate) phase: SessionPhase,
    pub(crate) dictionary: Option<Dictionary>,
    pub(crate) selection: SelectionMap,
    pub(crate) applied_selection: SelectionMap,
    pub(crate) filtered_entries: Vec<DictionaryEntry>,
    pub(crate) view_state: ViewState,
    pending_commands: VecDeque<UiCommand>,
}

impl VocabAppLogic {
    pub fn new(preference_store: Arc<dyn PreferenceStoreOperations>) -> Self {
        VocabAppLogic {
            preference_store,
            alphabet: alphabet::alphabet(),
            phase: SessionPhase::Loading,
            dictionary: None,
            selection: SelectionMap::default(),
            applied_selection: SelectionMap::default(),
            filtered_entries: Vec::new(),
            view_state: ViewState::new(),
            pending_commands: VecDeque::new(),
        }
    }

    pub fn try_dequeue_command(&mut self) -> Option<UiCommand> {
        self.pending_commands.pop_front()
    }

    fn enqueue_command(&mut self, command: UiCommand) {
        self.pending_commands.push_back(command);
    }

    pub fn is_loaded(&self) -> bool {
        self.phase == SessionPhase::Loaded
    }

    pub fn selection(&self) -> &SelectionMap {
        &self.selection
    }

    pub fn filtered_entries(&self) -> &[DictionaryEntry] {
        &self.filtered_entries
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        log::trace!("AppLogic: Handling event {event:?}");
        match event {
            AppEvent::Started => self.on_started(),
            AppEvent::DictionaryLoaded(result) => self.on_dictionary_loaded(result),
            AppEvent::RefreshRequested => self.on_refresh_requested(),
            _ if self.phase == SessionPhase::Loading => {
                log::debug!("AppLogic: Ignoring {event:?} while the dictionary is loading.");
                self.enqueue_command(UiCommand::ShowStatus(
                    "Still loading the dictionary, input ignored.".to_string(),
                ));
            }
            AppEvent::CharacterToggled { character, known } => {
                self.on_character_toggled(character, known)
            }
            AppEvent::RowToggled { row_index, known } => self.on_row_toggled(row_index, known),
            AppEvent::TabToggled { known } => {
                self.selection = self.selection.set_group(self.view_state.active_tab, known);
                self.enqueue_selection_panel();
            }
            AppEvent::AllToggled { known } => {
                self.selection = self.selection.set_all(known);
                self.enqueue_selection_panel();
            }
            AppEvent::TabChanged(group) => self.on_tab_changed(group),
            AppEvent::ApplyFilterRequested => self.on_apply_filter(),
            AppEvent::ThemeChanged(theme) => self.on_theme_changed(theme),
            AppEvent::PageRequested(request) => self.on_page_requested(request),
            AppEvent::ReloadRequested => self.on_reload_requested(),
        }
    }

    /*
     * Seeds the session from the preference store and asks the host to start
     * loading the dictionary. The selection is seeded here, before the
     * dictionary arrives, so it is ready once the first filter runs.
     */
    fn on_started(&mut self) {
        if let Err(e) = alphabet::validate_row_table() {
            log::error!("AppLogic: Row table is inconsistent: {e}");
        }
        let theme = config::load_theme(self.preference_store.as_ref());
        self.view_state.theme = theme;
        self.enqueue_command(UiCommand::ApplyTheme(theme));

        self.selection = config::load_selection(self.preference_store.as_ref(), &self.alphabet);
        self.applied_selection = self.selection.clone();
        log::debug!(
            "AppLogic: Seeded selection with {} of {} characters known.",
            self.selection.known_characters().len(),
            self.selection.len()
        );

        self.phase = SessionPhase::Loading;
        self.enqueue_command(UiCommand::ShowLoading);
        self.enqueue_command(UiCommand::LoadDictionary {
            known_checksum: None,
        });
    }

    /*
     * A failed first load is logged and otherwise leaves the session in the
     * loading state: no retry and no message on the display surface. A failed
     * reload keeps serving the dictionary already held.
     */
    fn on_dictionary_loaded(&mut self, result: Result<LoadOutcome, LoadError>) {
        match result {
            Ok(LoadOutcome::Loaded(dictionary)) => {
                log::info!(
                    "AppLogic: Dictionary ready with {} entries.",
                    dictionary.len()
                );
                self.dictionary = Some(dictionary);
                self.run_filter();
            }
            Ok(LoadOutcome::Unchanged) if self.dictionary.is_some() => {
                log::debug!("AppLogic: Dictionary unchanged, reusing character sets.");
                self.run_filter();
            }
            Ok(LoadOutcome::Unchanged) => {
                log::warn!("AppLogic: Loader reported an unchanged dictionary, but none is held.");
            }
            Err(e) if self.dictionary.is_some() => {
                log::error!("AppLogic: Reload failed: {e}. Keeping the current dictionary.");
                self.enqueue_command(UiCommand::ShowStatus(format!(
                    "Reload failed, keeping the current dictionary: {e}"
                )));
                self.run_filter();
            }
            Err(e) => {
                log::error!("AppLogic: {e}. Staying in the loading state.");
            }
        }
    }

    // Re-runs the filter with the applied selection and shows the first page.
    fn run_filter(&mut self) {
        let Some(dictionary) = self.dictionary.as_ref() else {
            return;
        };
        self.filtered_entries = entry_filter::filter(
            dictionary.entries(),
            dictionary.char_sets_by_reading(),
            &self.applied_selection,
        );
        self.view_state.reset_rows(&self.filtered_entries);
        self.phase = SessionPhase::Loaded;
        self.enqueue_selection_panel();
        self.enqueue_table();
    }

    fn enqueue_selection_panel(&mut self) {
        let panel = self.view_state.selection_panel(&self.selection);
        self.enqueue_command(UiCommand::ShowSelectionPanel(panel));
    }

    fn enqueue_table(&mut self) {
        let dictionary_size = self.dictionary.as_ref().map_or(0, Dictionary::len);
        let page = self
            .view_state
            .table_page(&self.filtered_entries, dictionary_size);
        self.enqueue_command(UiCommand::ShowTable(page));
    }

    fn on_refresh_requested(&mut self) {
        match self.phase {
            SessionPhase::Loading => self.enqueue_command(UiCommand::ShowLoading),
            SessionPhase::Loaded => {
                self.enqueue_selection_panel();
                self.enqueue_table();
            }
        }
    }

    fn on_character_toggled(&mut self, character: char, known: bool) {
        if !alphabet::is_in_alphabet(character) {
            log::debug!("AppLogic: '{character}' is not a selectable character.");
            self.enqueue_command(UiCommand::ShowStatus(format!(
                "'{character}' is not a selectable character."
            )));
            return;
        }
        self.selection = self.selection.set_character(character, known);
        self.enqueue_selection_panel();
    }

    fn on_row_toggled(&mut self, row_index: usize, known: bool) {
        let group = self.view_state.active_tab;
        let Some(row) = group.row(row_index) else {
            self.enqueue_command(UiCommand::ShowStatus(format!(
                "{} has no row {}.",
                group.label(),
                row_index + 1
            )));
            return;
        };
        self.selection = self.selection.set_row(row, known);
        self.enqueue_selection_panel();
    }

    fn on_tab_changed(&mut self, group: RowGroup) {
        self.view_state.active_tab = group;
        self.enqueue_selection_panel();
    }

    /*
     * Commits the pending selection: persists it, then re-filters. A failed
     * write is reported but does not block filtering.
     */
    fn on_apply_filter(&mut self) {
        if let Err(e) = config::save_selection(self.preference_store.as_ref(), &self.selection) {
            log::warn!("AppLogic: Could not persist selection: {e}");
            self.enqueue_command(UiCommand::ShowStatus(format!(
                "Selection could not be saved: {e}"
            )));
        }
        self.applied_selection = self.selection.clone();
        self.phase = SessionPhase::Loading;
        self.enqueue_command(UiCommand::ShowLoading);
        self.run_filter();
    }

    // Theme changes are persisted immediately, unlike the selection.
    fn on_theme_changed(&mut self, theme: ThemeSetting) {
        if let Err(e) = config::save_theme(self.preference_store.as_ref(), theme) {
            log::warn!("AppLogic: Could not persist theme setting: {e}");
        }
        self.view_state.theme = theme;
        self.enqueue_command(UiCommand::ApplyTheme(theme));
    }

    fn on_page_requested(&mut self, request: PageRequest) {
        if self.view_state.request_page(request) {
            self.enqueue_table();
        } else {
            log::trace!("AppLogic: Page request {request:?} did not change the page.");
        }
    }

    /*
     * Re-reads the dictionary source. The held dictionary's checksum lets the
     * loader answer `Unchanged` without rebuilding the character sets.
     */
    fn on_reload_requested(&mut self) {
        let known_checksum = self
            .dictionary
            .as_ref()
            .map(|dictionary| dictionary.checksum().to_string());
        self.phase = SessionPhase::Loading;
        self.enqueue_command(UiCommand::ShowLoading);
        self.enqueue_command(UiCommand::LoadDictionary { known_checksum });
    }
}
