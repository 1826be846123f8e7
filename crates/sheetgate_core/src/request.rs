//! Request payloads.
//!
//! Only presence and string types are checked when decoding. `feuille` names
//! the table and falls back to the service default when absent.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetQuery {
    pub feuille: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinesQuery {
    pub feuille: Option<String>,
    /// First data record, 1-based.
    pub start: Option<usize>,
    /// Last data record, inclusive.
    pub end: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddEntry {
    pub valeur: String,
    pub feuille: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEntry {
    pub ancienne_valeur: String,
    pub nouvelle_valeur: String,
    pub feuille: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCell {
    /// Lookup value searched in the reference column.
    pub nom: String,
    /// Header of the column to write.
    pub colonne: String,
    pub valeur: String,
    pub feuille: Option<String>,
    /// Header of the column searched for `nom`. Defaults to the first column.
    pub colonne_reference: Option<String>,
}
