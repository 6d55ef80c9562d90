/*
 * Shared constants for the presentation: application identity, table layout,
 * and fixed texts shown by the console host.
 */

// Used for the per-user configuration directory.
pub const APP_NAME: &str = "KanaFilter";

pub const DEFAULT_DICTIONARY_FILENAME: &str = "FilteredJMdict.json";

pub const LOG_FILENAME: &str = "kana_filter.log";

// Rows per table page.
pub const PAGE_SIZE: usize = 25;

pub const COLUMN_HEADERS: [&str; 3] = ["Reading", "Kanji", "Meaning"];

pub const LOADING_TEXT: &str = "Loading dictionary...";

pub const ATTRIBUTION_TEXT: &str = "This tool uses the JMdict/EDICT and KANJIDIC dictionary files. \
These files are the property of the Electronic Dictionary Research and Development Group, \
and are used in conformance with the Group's licence.";
