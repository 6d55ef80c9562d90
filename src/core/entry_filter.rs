/*
 * Computes the visible subset of the dictionary: an entry passes when every
 * distinct character of its reading is known in the selection map. Characters
 * the map does not contain (katakana, the long-vowel mark, kanji in readings)
 * are never known, so entries using them are always excluded.
 */
use crate::core::dictionary::{self, CharacterSet, CharacterSetsByReading, DictionaryEntry};
use crate::core::selection::SelectionMap;

pub fn reading_passes(characters: &CharacterSet, selection: &SelectionMap) -> bool {
    characters.iter().all(|&c| selection.is_known(c))
}

/*
 * Returns the entries whose reading passes, in input order. Character sets
 * come from `char_sets_by_reading`, built once per dictionary load; a missing
 * set is computed on the spot.
 */
pub fn filter(
    entries: &[DictionaryEntry],
    char_sets_by_reading: &CharacterSetsByReading,
    selection: &SelectionMap,
) -> Vec<DictionaryEntry> {
    let mut missing_sets = 0usize;
    let passed: Vec<DictionaryEntry> = entries
        .iter()
        .filter(|entry| match char_sets_by_reading.get(&entry.reading) {
            Some(characters) => reading_passes(characters, selection),
            None => {
                missing_sets += 1;
                reading_passes(&dictionary::character_set(&entry.reading), selection)
            }
        })
        .cloned()
        .collect();
    if missing_sets > 0 {
        log::warn!("EntryFilter: {missing_sets} reading(s) had no precomputed character set.");
    }
    log::debug!(
        "EntryFilter: {} of {} entries pass.",
        passed.len(),
        entries.len()
    );
    passed
}
