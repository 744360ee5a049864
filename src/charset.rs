//! Candidate character set selection for glyph metric building.
//!
//! A charset is a named, deduplicated set of single-cell-width characters,
//! sorted by code point so metric builds are reproducible. Selection is
//! purely combinatorial: rendering and density measurement happen later in
//! [`crate::glyph`].

use std::collections::BTreeSet;
use unicode_width::UnicodeWidthChar;

/// ASCII punctuation characters (the printable non-alphanumeric range).
const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Category of candidate characters for a brightness ramp.
///
/// Each category maps to a stable label used in persisted metric table
/// file names, so artifacts built from the same category are discoverable
/// across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharsetCategory {
    /// All printable ASCII characters, including space
    All,
    /// Letters a-z and A-Z
    Letters,
    /// Digits 0-9
    Digits,
    /// Punctuation only (good texture, low "text noise")
    #[default]
    Punctuation,
    /// Letters, digits, and punctuation combined
    LettersDigitsPunct,
}

impl CharsetCategory {
    /// Stable label used in artifact file names and metadata.
    pub fn label(&self) -> &'static str {
        match self {
            CharsetCategory::All => "ascii_all",
            CharsetCategory::Letters => "ascii_letters_only",
            CharsetCategory::Digits => "ascii_digits_only",
            CharsetCategory::Punctuation => "ascii_punctuation_only",
            CharsetCategory::LettersDigitsPunct => "ascii_letters_digits_punct",
        }
    }

    /// Raw (unsanitized) candidate characters for this category.
    fn raw_chars(&self) -> Vec<char> {
        match self {
            // Space through tilde: every printable ASCII character.
            CharsetCategory::All => (' '..='~').collect(),
            CharsetCategory::Letters => ('a'..='z').chain('A'..='Z').collect(),
            CharsetCategory::Digits => ('0'..='9').collect(),
            CharsetCategory::Punctuation => PUNCTUATION.chars().collect(),
            CharsetCategory::LettersDigitsPunct => ('a'..='z')
                .chain('A'..='Z')
                .chain('0'..='9')
                .chain(PUNCTUATION.chars())
                .collect(),
        }
    }
}

/// A named, ordered set of ramp candidate characters.
///
/// Invariants: no duplicates, ascending code point order, every character
/// renders as exactly one terminal cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateCharset {
    pub label: String,
    pub chars: Vec<char>,
}

impl CandidateCharset {
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

/// Select and sanitize the candidate charset for a category.
///
/// Characters are rejected if they are control characters or if their
/// terminal display width is not exactly one cell (this also excludes
/// combining marks, which report width zero). The survivors are
/// deduplicated and sorted by code point.
///
/// An empty result is not an error here; the ramp builder rejects
/// charsets that are too small to form a gradient.
pub fn select(category: CharsetCategory) -> CandidateCharset {
    let sanitized: BTreeSet<char> = category
        .raw_chars()
        .into_iter()
        .filter(|ch| !ch.is_control())
        .filter(|ch| ch.width() == Some(1))
        .collect();

    CandidateCharset {
        label: category.label().to_string(),
        chars: sanitized.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(CharsetCategory::All.label(), "ascii_all");
        assert_eq!(CharsetCategory::Punctuation.label(), "ascii_punctuation_only");
        assert_eq!(
            CharsetCategory::LettersDigitsPunct.label(),
            "ascii_letters_digits_punct"
        );
    }

    #[test]
    fn test_all_includes_space_and_tilde() {
        let set = select(CharsetCategory::All);
        assert!(set.chars.contains(&' '));
        assert!(set.chars.contains(&'~'));
        assert_eq!(set.len(), 95); // 0x20..=0x7E
    }

    #[test]
    fn test_sorted_and_deduplicated() {
        for category in [
            CharsetCategory::All,
            CharsetCategory::Letters,
            CharsetCategory::Digits,
            CharsetCategory::Punctuation,
            CharsetCategory::LettersDigitsPunct,
        ] {
            let set = select(category);
            let mut sorted = set.chars.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(set.chars, sorted, "{:?} not sorted/deduplicated", category);
        }
    }

    #[test]
    fn test_no_control_characters() {
        let set = select(CharsetCategory::All);
        assert!(set.chars.iter().all(|ch| !ch.is_control()));
    }

    #[test]
    fn test_digits_count() {
        assert_eq!(select(CharsetCategory::Digits).len(), 10);
    }
}
