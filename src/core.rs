/*
 * This module consolidates the core, platform-agnostic logic of the application:
 * the static hiragana row table, the immutable character selection state, the
 * dictionary model with its per-reading character sets, the entry filter, and
 * the preference store (behind `PreferenceStoreOperations`) together with the
 * dictionary loader (behind `DictionaryLoaderOperations`). Nothing here touches
 * the terminal; the application logic and the console layer sit on top.
 */
pub mod alphabet;
pub mod checksum_utils;
pub mod config;
pub mod dictionary;
pub mod entry_filter;
pub mod path_utils;
pub mod selection;

// Re-export key structures and enums
pub use alphabet::{CharacterRow, ROW_WIDTH, RowGroup};
pub use selection::{CheckState, PersistedSelection, SelectionMap};

// Re-export dictionary related items
pub use dictionary::{
    CoreDictionaryLoader, Dictionary, DictionaryEntry, DictionaryLoaderOperations, LoadError,
    LoadOutcome,
};

// Re-export config related items
pub use config::{ConfigError, CorePreferenceStore, PreferenceStoreOperations, ThemeSetting};
