//! Canonical forms for comparing cell values.
use std::fmt;

use deunicode::deunicode_char;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonical form of a cell value used for case, whitespace and accent
/// insensitive comparisons.
///
/// Two raw values refer to the same entry iff their normalized keys are
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a raw cell value.
///
/// Trims surrounding whitespace, lower-cases, and folds accented letters to
/// their base letter ("Éléa" -> "elea"). Compatibility forms are decomposed
/// as well, so ligatures and full-width letters fold to plain ASCII. Letters
/// with no decomposition are transliterated ("Søren" -> "soren", "Straße" ->
/// "strasse"). Symbols are kept as is.
///
/// Decomposition runs a second time after lower-casing since a handful of
/// lower-case mappings produce combining marks of their own. This keeps the
/// function idempotent.
pub fn normalize(raw: &str) -> NormalizedKey {
    let mut ascii = String::with_capacity(raw.len());
    for c in raw.nfkd().filter(|c| !is_combining_mark(*c)) {
        match deunicode_char(c) {
            Some(folded) if c.is_alphabetic() && !c.is_ascii() => ascii.push_str(folded),
            _ => ascii.push(c),
        }
    }

    let folded: String = ascii
        .chars()
        .flat_map(char::to_lowercase)
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    NormalizedKey(folded.trim().to_string())
}

/// Trim and lower-case a value without folding accents.
///
/// This is the form values are written back to the sheet with when adding or
/// renaming first-column entries.
pub fn canonical_cell(raw: &str) -> String {
    raw.trim().to_lowercase()
}
