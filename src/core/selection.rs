/*
 * Character selection state: which alphabet characters the user currently
 * treats as "known". `SelectionMap` is an immutable value. Every update
 * returns a new map, and the application logic owns the reference to the
 * current one. The map is total over the alphabet it was initialized with;
 * updates never add or remove keys.
 */
use crate::core::alphabet::{CharacterRow, RowGroup};
use crate::core::config::ConfigError;
use std::collections::{BTreeMap, HashSet};

/// Flat character -> known mapping as stored in preferences. Keys may be
/// missing or fall outside the alphabet.
pub type PersistedSelection = BTreeMap<String, bool>;

/// Tri-state value shown by the row and "all" checkboxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    AllOn,
    AllOff,
    Mixed,
}

impl CheckState {
    /*
     * Folds a sequence of booleans into a tri-state. An empty sequence counts
     * as `AllOn`, the same as "every slot is checked".
     */
    pub fn from_values<I: IntoIterator<Item = bool>>(values: I) -> Self {
        let mut any_on = false;
        let mut any_off = false;
        for value in values {
            if value {
                any_on = true;
            } else {
                any_off = true;
            }
            if any_on && any_off {
                return CheckState::Mixed;
            }
        }
        if any_off {
            CheckState::AllOff
        } else {
            CheckState::AllOn
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionMap {
    states: BTreeMap<char, bool>,
}

impl SelectionMap {
    /*
     * Seeds a map over `alphabet`: each character takes its persisted value
     * when present and defaults to known otherwise. Persisted keys that are
     * not alphabet characters are ignored.
     */
    pub fn initialize(persisted: &PersistedSelection, alphabet: &[char]) -> Self {
        let states = alphabet
            .iter()
            .map(|&c| {
                let known = persisted.get(&c.to_string()).copied().unwrap_or(true);
                (c, known)
            })
            .collect();
        SelectionMap { states }
    }

    /*
     * Parses the persisted JSON text and seeds the map from it. Malformed text
     * is reported as `ConfigError::MalformedSelection` alongside a map built
     * as if nothing had been persisted. `None` means no stored value.
     */
    pub fn initialize_from_json(
        persisted: Option<&str>,
        alphabet: &[char],
    ) -> (Self, Option<ConfigError>) {
        let Some(text) = persisted else {
            return (Self::initialize(&PersistedSelection::new(), alphabet), None);
        };
        match serde_json::from_str::<PersistedSelection>(text) {
            Ok(values) => (Self::initialize(&values, alphabet), None),
            Err(e) => (
                Self::initialize(&PersistedSelection::new(), alphabet),
                Some(ConfigError::MalformedSelection(e)),
            ),
        }
    }

    pub fn get(&self, character: char) -> Option<bool> {
        self.states.get(&character).copied()
    }

    // Characters outside the map are never known.
    pub fn is_known(&self, character: char) -> bool {
        self.get(character).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, bool)> + '_ {
        self.states.iter().map(|(&c, &v)| (c, v))
    }

    /*
     * Returns a copy with `character` set to `value`. Callers pass alphabet
     * members only; any other character leaves the map unchanged.
     */
    pub fn set_character(&self, character: char, value: bool) -> Self {
        let mut next = self.clone();
        match next.states.get_mut(&character) {
            Some(state) => *state = value,
            None => log::debug!(
                "SelectionState: Ignoring update for '{character}', not in the alphabet."
            ),
        }
        next
    }

    pub fn set_row(&self, row: &CharacterRow, value: bool) -> Self {
        self.set_characters(row.iter().flatten().copied(), value)
    }

    pub fn set_group(&self, group: RowGroup, value: bool) -> Self {
        self.set_characters(group.characters(), value)
    }

    pub fn set_all(&self, value: bool) -> Self {
        SelectionMap {
            states: self.states.keys().map(|&c| (c, value)).collect(),
        }
    }

    fn set_characters<I: IntoIterator<Item = char>>(&self, characters: I, value: bool) -> Self {
        let mut next = self.clone();
        for character in characters {
            if let Some(state) = next.states.get_mut(&character) {
                *state = value;
            }
        }
        next
    }

    pub fn row_state(&self, row: &CharacterRow) -> CheckState {
        CheckState::from_values(row.iter().flatten().map(|&c| self.is_known(c)))
    }

    pub fn group_state(&self, group: RowGroup) -> CheckState {
        CheckState::from_values(group.characters().map(|c| self.is_known(c)))
    }

    pub fn global_state(&self) -> CheckState {
        CheckState::from_values(self.states.values().copied())
    }

    pub fn known_characters(&self) -> HashSet<char> {
        self.iter().filter(|(_, known)| *known).map(|(c, _)| c).collect()
    }

    pub fn to_persisted(&self) -> PersistedSelection {
        self.iter().map(|(c, known)| (c.to_string(), known)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alphabet::alphabet;

    fn full_map() -> SelectionMap {
        SelectionMap::initialize(&PersistedSelection::new(), &alphabet())
    }

    #[test]
    fn test_initialize_uses_persisted_value_or_defaults_to_known() {
        let mut persisted = PersistedSelection::new();
        persisted.insert("あ".to_string(), false);
        persisted.insert("い".to_string(), true);
        persisted.insert("ア".to_string(), false); // not an alphabet character
        let letters = alphabet();

        let map = SelectionMap::initialize(&persisted, &letters);

        assert_eq!(map.len(), letters.len());
        assert_eq!(map.get('あ'), Some(false));
        assert_eq!(map.get('い'), Some(true));
        for c in letters.iter().filter(|c| **c != 'あ') {
            assert_eq!(map.get(*c), Some(true), "'{c}' should default to known");
        }
        assert_eq!(map.get('ア'), None);
    }

    #[test]
    fn test_initialize_from_json_recovers_from_malformed_input() {
        let letters = alphabet();
        for text in ["[1, 2]", "{\"あ\": 1}", "{\"あ\": {\"x\": true}}", "oops"] {
            let (map, error) = SelectionMap::initialize_from_json(Some(text), &letters);
            assert!(
                matches!(error, Some(ConfigError::MalformedSelection(_))),
                "expected malformed error for {text}"
            );
            assert_eq!(map, full_map());
        }
    }

    #[test]
    fn test_initialize_from_json_reads_flat_map() {
        let (map, error) =
            SelectionMap::initialize_from_json(Some("{\"う\": false}"), &alphabet());
        assert!(error.is_none());
        assert!(!map.is_known('う'));
        assert!(map.is_known('え'));

        let (empty, error) = SelectionMap::initialize_from_json(None, &alphabet());
        assert!(error.is_none());
        assert_eq!(empty, full_map());
    }

    #[test]
    fn test_set_character_changes_only_that_character() {
        let map = full_map();
        let next = map.set_character('か', false);

        assert_eq!(next.get('か'), Some(false));
        for (c, known) in map.iter().filter(|(c, _)| *c != 'か') {
            assert_eq!(next.get(c), Some(known));
        }
        // the source map is untouched
        assert_eq!(map.get('か'), Some(true));
    }

    #[test]
    fn test_set_character_outside_alphabet_is_noop() {
        let map = full_map();
        let next = map.set_character('ー', false);
        assert_eq!(next, map);
        assert_eq!(next.get('ー'), None);
    }

    #[test]
    fn test_set_row_skips_empty_slots_and_reports_row_state() {
        let ya_row = RowGroup::Main.row(7).unwrap();
        let map = full_map().set_row(ya_row, false);

        assert!(!map.is_known('や'));
        assert!(!map.is_known('ゆ'));
        assert!(!map.is_known('よ'));
        assert_eq!(map.row_state(ya_row), CheckState::AllOff);
        assert_eq!(map.global_state(), CheckState::Mixed);
        assert_eq!(map.len(), alphabet().len());
    }

    #[test]
    fn test_partial_row_off_leaves_rest_known() {
        let row: CharacterRow = [Some('あ'), Some('い'), None, None, None];
        let map = SelectionMap::initialize(&PersistedSelection::new(), &['あ', 'い', 'う', 'え'])
            .set_row(&row, false);

        assert_eq!(map.row_state(&row), CheckState::AllOff);
        assert_eq!(map.global_state(), CheckState::Mixed);
        assert!(map.is_known('う'));
    }

    #[test]
    fn test_row_state_mixed_and_all_on() {
        let a_row = RowGroup::Main.row(0).unwrap();
        let map = full_map();
        assert_eq!(map.row_state(a_row), CheckState::AllOn);

        let map = map.set_character('う', false);
        assert_eq!(map.row_state(a_row), CheckState::Mixed);
    }

    #[test]
    fn test_set_all_then_global_state() {
        let map = full_map().set_character('あ', false);
        assert_eq!(map.global_state(), CheckState::Mixed);
        assert_eq!(map.set_all(true).global_state(), CheckState::AllOn);
        assert_eq!(map.set_all(false).global_state(), CheckState::AllOff);
        assert_eq!(map.set_all(false).len(), map.len());
    }

    #[test]
    fn test_set_group_only_touches_that_group() {
        let map = full_map().set_group(RowGroup::Small, false);

        assert_eq!(map.group_state(RowGroup::Small), CheckState::AllOff);
        assert_eq!(map.group_state(RowGroup::Main), CheckState::AllOn);
        assert_eq!(map.group_state(RowGroup::Diacritical), CheckState::AllOn);
        assert_eq!(map.global_state(), CheckState::Mixed);
    }

    #[test]
    fn test_check_state_from_values() {
        assert_eq!(CheckState::from_values(std::iter::empty()), CheckState::AllOn);
        assert_eq!(CheckState::from_values([true, true]), CheckState::AllOn);
        assert_eq!(CheckState::from_values([false]), CheckState::AllOff);
        assert_eq!(CheckState::from_values([false, true]), CheckState::Mixed);
    }

    #[test]
    fn test_known_characters_and_persisted_form() {
        let map = SelectionMap::initialize(&PersistedSelection::new(), &['あ', 'い'])
            .set_character('い', false);

        assert_eq!(map.known_characters(), HashSet::from(['あ']));
        let persisted = map.to_persisted();
        assert_eq!(persisted.get("あ"), Some(&true));
        assert_eq!(persisted.get("い"), Some(&false));
        assert_eq!(persisted.len(), 2);
    }
}
