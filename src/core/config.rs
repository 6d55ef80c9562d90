/*
 * Persisted user preferences. The store is an opaque key/value string map with
 * two logical keys: the JSON-serialized partial selection map and the theme
 * setting. Only the caller decides when to write; the selection is written on
 * "apply", the theme whenever it changes.
 *
 * It uses a trait-based approach (`PreferenceStoreOperations`) so the
 * application logic can be tested against an in-memory mock. The concrete
 * implementation (`CorePreferenceStore`) keeps every key in a single JSON
 * object file inside the application's configuration directory.
 */
use crate::core::path_utils;
use crate::core::selection::SelectionMap;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const SELECTED_HIRAGANA_KEY: &str = "selectedHiragana";
pub const DARK_MODE_SETTING_KEY: &str = "darkModeSetting";
const PREFERENCES_FILENAME: &str = "preferences.json";

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    NoConfigDirectory,
    Serde(serde_json::Error),
    MalformedSelection(serde_json::Error),
    UnknownTheme(String),
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Preference I/O error: {e}"),
            ConfigError::NoConfigDirectory => {
                write!(f, "Could not determine configuration directory for preferences")
            }
            ConfigError::Serde(e) => write!(f, "Preference file is not valid JSON: {e}"),
            ConfigError::MalformedSelection(e) => {
                write!(f, "Persisted selection is not a flat string-to-boolean map: {e}")
            }
            ConfigError::UnknownTheme(value) => write!(f, "Unknown theme setting: '{value}'"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Serde(e) => Some(e),
            ConfigError::MalformedSelection(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeSetting {
    #[default]
    Light,
    Dark,
    Auto,
}

impl ThemeSetting {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeSetting::Light => "light",
            ThemeSetting::Dark => "dark",
            ThemeSetting::Auto => "auto",
        }
    }

    // `Auto` follows the system preference; hosts without one render light.
    pub fn is_dark(self) -> bool {
        self == ThemeSetting::Dark
    }
}

impl FromStr for ThemeSetting {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(ThemeSetting::Light),
            "dark" => Ok(ThemeSetting::Dark),
            "auto" => Ok(ThemeSetting::Auto),
            other => Err(ConfigError::UnknownTheme(other.to_string())),
        }
    }
}

pub trait PreferenceStoreOperations: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub struct CorePreferenceStore {
    config_dir: PathBuf,
}

impl CorePreferenceStore {
    /*
     * Creates a store rooted in `override_dir` when given, otherwise in the
     * platform configuration directory for `app_name`.
     */
    pub fn new(override_dir: Option<&Path>, app_name: &str) -> Result<Self> {
        let config_dir = path_utils::resolve_config_dir(override_dir, app_name)
            .ok_or(ConfigError::NoConfigDirectory)?;
        log::debug!("CorePreferenceStore: Using config directory {config_dir:?}");
        Ok(CorePreferenceStore { config_dir })
    }

    pub fn file_path(&self) -> PathBuf {
        self.config_dir.join(PREFERENCES_FILENAME)
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let file_path = self.file_path();
        if !file_path.exists() {
            log::trace!("CorePreferenceStore: {file_path:?} does not exist yet.");
            return Ok(BTreeMap::new());
        }
        let reader = BufReader::new(File::open(&file_path)?);
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_reader(reader)?;
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(text) => Some((key, text)),
                other => {
                    log::warn!(
                        "CorePreferenceStore: Skipping non-string value for '{key}': {other}"
                    );
                    None
                }
            })
            .collect();
        Ok(values)
    }

    /*
     * Writes the whole map to a sibling temporary file and renames it over the
     * preference file, so an interrupted write leaves the previous file intact.
     */
    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let file_path = self.file_path();
        let temp_path = file_path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            serde_json::to_writer_pretty(&mut writer, values)?;
            writer.flush()?;
        }
        fs::rename(&temp_path, &file_path)?;
        log::debug!(
            "CorePreferenceStore: Wrote {} key(s) to {file_path:?}.",
            values.len()
        );
        Ok(())
    }
}

impl PreferenceStoreOperations for CorePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut values = self.read_all()?;
        Ok(values.remove(key))
    }

    /*
     * Replaces one key. A preference file that cannot be parsed is dropped
     * rather than blocking the write; the other keys it held are lost.
     */
    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = match self.read_all() {
            Ok(values) => values,
            Err(ConfigError::Serde(e)) => {
                log::warn!("CorePreferenceStore: Discarding unreadable preference file: {e}");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }
}

/*
 * Builds the startup selection map from the store. Any problem reading or
 * parsing the stored value is logged and treated as "nothing persisted", so
 * every character starts out known.
 */
pub fn load_selection(store: &dyn PreferenceStoreOperations, alphabet: &[char]) -> SelectionMap {
    let persisted = match store.get(SELECTED_HIRAGANA_KEY) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Preferences: Could not read persisted selection: {e}");
            None
        }
    };
    let (selection, error) = SelectionMap::initialize_from_json(persisted.as_deref(), alphabet);
    if let Some(e) = error {
        log::warn!("Preferences: {e}. Falling back to all characters known.");
    }
    selection
}

pub fn save_selection(store: &dyn PreferenceStoreOperations, selection: &SelectionMap) -> Result<()> {
    let text = serde_json::to_string(&selection.to_persisted())?;
    store.set(SELECTED_HIRAGANA_KEY, &text)?;
    log::debug!("Preferences: Persisted selection of {} characters.", selection.len());
    Ok(())
}

pub fn load_theme(store: &dyn PreferenceStoreOperations) -> ThemeSetting {
    match store.get(DARK_MODE_SETTING_KEY) {
        Ok(Some(value)) => value.parse().unwrap_or_else(|e| {
            log::warn!("Preferences: {e}. Using the default theme.");
            ThemeSetting::default()
        }),
        Ok(None) => ThemeSetting::default(),
        Err(e) => {
            log::warn!("Preferences: Could not read theme setting: {e}");
            ThemeSetting::default()
        }
    }
}

pub fn save_theme(store: &dyn PreferenceStoreOperations, theme: ThemeSetting) -> Result<()> {
    store.set(DARK_MODE_SETTING_KEY, theme.as_str())
}
