/*
 * Static hiragana inventory used by the selection panel. The alphabet is not
 * stored separately: it is the row-major flattening of the three row groups
 * (main, diacritical, small), so the table is the single source of truth for
 * both the set of selectable characters and the "whole row" bulk actions.
 *
 * Every row has `ROW_WIDTH` slots in vowel order a-i-u-e-o. `None` marks a
 * structurally empty grid cell (e.g. the missing "yi" and "ye" in the ya-row).
 */
use std::collections::HashSet;

pub const ROW_WIDTH: usize = 5;

pub type CharacterRow = [Option<char>; ROW_WIDTH];

const MAIN_ROWS: &[CharacterRow] = &[
    [Some('あ'), Some('い'), Some('う'), Some('え'), Some('お')],
    [Some('か'), Some('き'), Some('く'), Some('け'), Some('こ')],
    [Some('さ'), Some('し'), Some('す'), Some('せ'), Some('そ')],
    [Some('た'), Some('ち'), Some('つ'), Some('て'), Some('と')],
    [Some('な'), Some('に'), Some('ぬ'), Some('ね'), Some('の')],
    [Some('は'), Some('ひ'), Some('ふ'), Some('へ'), Some('ほ')],
    [Some('ま'), Some('み'), Some('む'), Some('め'), Some('も')],
    [Some('や'), None, Some('ゆ'), None, Some('よ')],
    [Some('ら'), Some('り'), Some('る'), Some('れ'), Some('ろ')],
    [Some('わ'), None, None, None, Some('を')],
    [Some('ん'), None, None, None, None],
];

const DIACRITICAL_ROWS: &[CharacterRow] = &[
    [Some('が'), Some('ぎ'), Some('ぐ'), Some('げ'), Some('ご')],
    [Some('ざ'), Some('じ'), Some('ず'), Some('ぜ'), Some('ぞ')],
    [Some('だ'), Some('ぢ'), Some('づ'), Some('で'), Some('ど')],
    [Some('ば'), Some('び'), Some('ぶ'), Some('べ'), Some('ぼ')],
    [Some('ぱ'), Some('ぴ'), Some('ぷ'), Some('ぺ'), Some('ぽ')],
];

const SMALL_ROWS: &[CharacterRow] = &[
    [Some('ぁ'), Some('ぃ'), Some('ぅ'), Some('ぇ'), Some('ぉ')],
    [Some('ゃ'), None, Some('ゅ'), None, Some('ょ')],
    [Some('っ'), None, None, None, None],
    [Some('ゎ'), None, None, None, None],
];

/*
 * One tab of the selection panel. The order of `RowGroup::ALL` is the display
 * order of the tabs and the order in which the alphabet is flattened.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RowGroup {
    #[default]
    Main,
    Diacritical,
    Small,
}

impl RowGroup {
    pub const ALL: [RowGroup; 3] = [RowGroup::Main, RowGroup::Diacritical, RowGroup::Small];

    pub fn rows(self) -> &'static [CharacterRow] {
        match self {
            RowGroup::Main => MAIN_ROWS,
            RowGroup::Diacritical => DIACRITICAL_ROWS,
            RowGroup::Small => SMALL_ROWS,
        }
    }

    pub fn row(self, index: usize) -> Option<&'static CharacterRow> {
        self.rows().get(index)
    }

    pub fn label(self) -> &'static str {
        match self {
            RowGroup::Main => "Main Hiragana",
            RowGroup::Diacritical => "Diacritical Mark Hiragana",
            RowGroup::Small => "Small Hiragana",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    // Characters of every row in this group, skipping empty slots.
    pub fn characters(self) -> impl Iterator<Item = char> {
        self.rows().iter().flat_map(|row| row.iter().flatten().copied())
    }
}

/*
 * Returns the full alphabet in table order: main rows, then diacritical rows,
 * then small rows, each flattened row by row with empty slots dropped.
 */
pub fn alphabet() -> Vec<char> {
    RowGroup::ALL
        .iter()
        .flat_map(|group| group.characters())
        .collect()
}

pub fn is_in_alphabet(character: char) -> bool {
    RowGroup::ALL
        .iter()
        .any(|group| group.characters().any(|c| c == character))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowTableError {
    DuplicateCharacter(char),
    EmptyRow { group: RowGroup, row_index: usize },
}

impl std::fmt::Display for RowTableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowTableError::DuplicateCharacter(c) => {
                write!(f, "Character '{c}' appears more than once in the row table")
            }
            RowTableError::EmptyRow { group, row_index } => write!(
                f,
                "Row {row_index} of '{}' has no characters",
                group.label()
            ),
        }
    }
}

impl std::error::Error for RowTableError {}

/*
 * Checks the structural invariants of the static table: no character occurs
 * twice across all groups and no row consists only of empty slots. Checked
 * when a session starts and by the unit tests.
 */
pub fn validate_row_table() -> Result<(), RowTableError> {
    let mut seen = HashSet::new();
    for group in RowGroup::ALL {
        for (row_index, row) in group.rows().iter().enumerate() {
            if row.iter().all(Option::is_none) {
                return Err(RowTableError::EmptyRow { group, row_index });
            }
            for character in row.iter().flatten() {
                if !seen.insert(*character) {
                    return Err(RowTableError::DuplicateCharacter(*character));
                }
            }
        }
    }
    log::trace!("Alphabet: Row table validated, {} characters.", seen.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_table_is_valid() {
        assert_eq!(validate_row_table(), Ok(()));
    }

    #[test]
    fn test_group_character_counts() {
        assert_eq!(RowGroup::Main.characters().count(), 46);
        assert_eq!(RowGroup::Diacritical.characters().count(), 25);
        assert_eq!(RowGroup::Small.characters().count(), 10);
    }

    #[test]
    fn test_alphabet_is_union_of_rows_without_duplicates() {
        let letters = alphabet();
        let unique: HashSet<char> = letters.iter().copied().collect();
        assert_eq!(letters.len(), unique.len());
        assert_eq!(letters.len(), 81);

        let from_rows: HashSet<char> = RowGroup::ALL
            .iter()
            .flat_map(|g| g.rows().iter())
            .flat_map(|row| row.iter().flatten().copied())
            .collect();
        assert_eq!(unique, from_rows);
    }

    #[test]
    fn test_alphabet_order_follows_table() {
        let letters = alphabet();
        assert_eq!(&letters[..5], &['あ', 'い', 'う', 'え', 'お']);
        assert_eq!(letters[45], 'ん');
        assert_eq!(letters[46], 'が');
        assert_eq!(*letters.last().unwrap(), 'ゎ');
    }

    #[test]
    fn test_empty_slots_are_preserved() {
        let ya_row = RowGroup::Main.row(7).unwrap();
        assert_eq!(ya_row, &[Some('や'), None, Some('ゆ'), None, Some('よ')]);
        assert!(RowGroup::Main.row(11).is_none());
    }

    #[test]
    fn test_is_in_alphabet() {
        assert!(is_in_alphabet('あ'));
        assert!(is_in_alphabet('ぽ'));
        assert!(is_in_alphabet('っ'));
        assert!(!is_in_alphabet('ア'));
        assert!(!is_in_alphabet('ー'));
        assert!(!is_in_alphabet('漢'));
    }

    #[test]
    fn test_group_index_round_trip_and_labels() {
        for (index, group) in RowGroup::ALL.into_iter().enumerate() {
            assert_eq!(RowGroup::from_index(index), Some(group));
        }
        assert_eq!(RowGroup::from_index(3), None);
        assert_eq!(RowGroup::Small.label(), "Small Hiragana");
        assert_eq!(RowGroup::default(), RowGroup::Main);
    }
}
