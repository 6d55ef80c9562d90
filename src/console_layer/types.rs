/*
 * Types exchanged between the application logic and the console host.
 * `AppEvent`s flow from the host into `VocabAppLogic::handle_event`; the logic
 * answers with `UiCommand`s that the host dequeues and renders. The view
 * structs are plain snapshots: the host never sees the live selection map.
 */
use crate::core::{
    CheckState, DictionaryEntry, LoadError, LoadOutcome, ROW_WIDTH, RowGroup, ThemeSetting,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Next,
    Previous,
    // 1-based, as typed by the user.
    Number(usize),
}

#[derive(Debug)]
pub enum AppEvent {
    Started,
    DictionaryLoaded(Result<LoadOutcome, LoadError>),
    CharacterToggled { character: char, known: bool },
    // Row of the active tab.
    RowToggled { row_index: usize, known: bool },
    // Every row of the active tab.
    TabToggled { known: bool },
    AllToggled { known: bool },
    TabChanged(RowGroup),
    ApplyFilterRequested,
    ThemeChanged(ThemeSetting),
    PageRequested(PageRequest),
    ReloadRequested,
    RefreshRequested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRowView {
    pub slots: [Option<(char, bool)>; ROW_WIDTH],
    pub state: CheckState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionPanelView {
    pub group: RowGroup,
    pub rows: Vec<SelectionRowView>,
    pub group_state: CheckState,
    pub global_state: CheckState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePageView {
    // 0-based.
    pub page: usize,
    pub page_count: usize,
    pub total_rows: usize,
    pub dictionary_size: usize,
    pub rows: Vec<DictionaryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    ShowLoading,
    ApplyTheme(ThemeSetting),
    ShowSelectionPanel(SelectionPanelView),
    ShowTable(TablePageView),
    ShowStatus(String),
    LoadDictionary { known_checksum: Option<String> },
}
