/*
 * The vocabulary dictionary: entries with a reading plus pass-through display
 * fields, and the per-reading character sets that the entry filter consumes.
 * The character sets are computed once when a document is loaded and are only
 * replaced by loading a different document.
 *
 * Loading is abstracted behind `DictionaryLoaderOperations` so the session
 * logic can be driven by canned results in tests. `convert_jmdict` reduces a
 * raw JMdict JSON export to the flat entry format this module reads.
 */
use crate::core::checksum_utils;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;

pub type CharacterSet = HashSet<char>;
pub type CharacterSetsByReading = HashMap<String, CharacterSet>;

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Parse(serde_json::Error),
    NotAnArray,
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        LoadError::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::Parse(err)
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "Could not read dictionary: {e}"),
            LoadError::Parse(e) => write!(f, "Could not parse dictionary: {e}"),
            LoadError::NotAnArray => write!(f, "Dictionary document is not a JSON array"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Parse(e) => Some(e),
            LoadError::NotAnArray => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DictionaryEntry {
    #[serde(
        default,
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    pub reading: String,
    #[serde(default)]
    pub kanji: String,
    #[serde(default)]
    pub meaning: String,
}

impl DictionaryEntry {
    pub fn new(reading: &str) -> Self {
        DictionaryEntry {
            reading: reading.to_string(),
            ..Default::default()
        }
    }
}

// Sequence numbers show up both as strings and as bare numbers in exports.
fn deserialize_optional_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

pub fn character_set(reading: &str) -> CharacterSet {
    reading.chars().collect()
}

#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
    char_sets: CharacterSetsByReading,
    checksum: String,
}

impl Dictionary {
    /*
     * Builds a dictionary from already-parsed entries. The checksum is taken
     * over the compact JSON form so equal entry lists compare equal.
     */
    pub fn from_entries(entries: Vec<DictionaryEntry>) -> Self {
        let checksum = serde_json::to_vec(&entries)
            .map(|bytes| checksum_utils::calculate_sha256_checksum(&bytes))
            .unwrap_or_default();
        Self::build(entries, checksum)
    }

    /*
     * Parses a dictionary document: a JSON array of entry objects. Anything
     * other than an array is rejected with `LoadError::NotAnArray`.
     */
    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_str(text)?;
        if !document.is_array() {
            return Err(LoadError::NotAnArray);
        }
        let entries: Vec<DictionaryEntry> = serde_json::from_value(document)?;
        let checksum = checksum_utils::calculate_sha256_checksum(text.as_bytes());
        Ok(Self::build(entries, checksum))
    }

    fn build(entries: Vec<DictionaryEntry>, checksum: String) -> Self {
        let mut char_sets = CharacterSetsByReading::new();
        for entry in &entries {
            if !char_sets.contains_key(&entry.reading) {
                char_sets.insert(entry.reading.clone(), character_set(&entry.reading));
            }
        }
        log::debug!(
            "Dictionary: Built {} entries with {} distinct readings.",
            entries.len(),
            char_sets.len()
        );
        Dictionary {
            entries,
            char_sets,
            checksum,
        }
    }

    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    pub fn char_sets_by_reading(&self) -> &CharacterSetsByReading {
        &self.char_sets
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of a load request. `Unchanged` is returned when the source still has
/// the checksum the caller already holds.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Dictionary),
    Unchanged,
}

pub trait DictionaryLoaderOperations: Send + Sync {
    fn load(&self, source: &Path, known_checksum: Option<&str>) -> Result<LoadOutcome>;
}

pub struct CoreDictionaryLoader {}

impl CoreDictionaryLoader {
    pub fn new() -> Self {
        CoreDictionaryLoader {}
    }
}

impl Default for CoreDictionaryLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DictionaryLoaderOperations for CoreDictionaryLoader {
    fn load(&self, source: &Path, known_checksum: Option<&str>) -> Result<LoadOutcome> {
        log::trace!("CoreDictionaryLoader: Loading dictionary from {source:?}");
        let text = fs::read_to_string(source)?;
        if let Some(known) = known_checksum {
            if checksum_utils::calculate_sha256_checksum(text.as_bytes()) == known {
                log::debug!("CoreDictionaryLoader: {source:?} is unchanged, keeping cache.");
                return Ok(LoadOutcome::Unchanged);
            }
        }
        let dictionary = Dictionary::from_json_str(&text)?;
        log::info!(
            "CoreDictionaryLoader: Loaded {} entries from {source:?}.",
            dictionary.len()
        );
        Ok(LoadOutcome::Loaded(dictionary))
    }
}

fn first_string(value: &serde_json::Value, field: &str) -> Option<String> {
    match value.get(field)?.get(0)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/*
 * Reduces raw JMdict records to flat entries, keeping only the first reading,
 * the first gloss of the first sense, and the first kanji form:
 *
 *   id      <- ent_seq[0]
 *   reading <- r_ele[0].reb[0]
 *   meaning <- sense[0].gloss[0]   (empty when the first sense has no gloss)
 *   kanji   <- k_ele[0].keb[0]     (empty when there is no k_ele)
 *
 * Records without a sequence number or reading are skipped.
 */
pub fn convert_jmdict(raw: &serde_json::Value) -> Result<Vec<DictionaryEntry>> {
    let records = raw.as_array().ok_or(LoadError::NotAnArray)?;
    let mut entries = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let id = first_string(record, "ent_seq");
        let reading = record
            .get("r_ele")
            .and_then(|r| r.get(0))
            .and_then(|r| first_string(r, "reb"));
        let (Some(id), Some(reading)) = (id, reading) else {
            log::warn!("JmdictConverter: Skipping record {index} without ent_seq or reading.");
            continue;
        };
        let meaning = record
            .get("sense")
            .and_then(|s| s.get(0))
            .and_then(|s| first_string(s, "gloss"))
            .unwrap_or_default();
        let kanji = record
            .get("k_ele")
            .and_then(|k| k.get(0))
            .and_then(|k| first_string(k, "keb"))
            .unwrap_or_default();
        entries.push(DictionaryEntry {
            id: Some(id),
            reading,
            kanji,
            meaning,
        });
    }
    log::info!(
        "JmdictConverter: Converted {} of {} records.",
        entries.len(),
        records.len()
    );
    Ok(entries)
}

/*
 * Reads a raw JMdict JSON export from `input` and writes the reduced
 * dictionary document to `output` in compact form.
 */
pub fn convert_jmdict_file(input: &Path, output: &Path) -> Result<usize> {
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(input)?)?;
    let entries = convert_jmdict(&raw)?;
    let writer = BufWriter::new(File::create(output)?);
    serde_json::to_writer(writer, &entries)?;
    Ok(entries.len())
}
