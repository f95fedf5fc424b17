//! Schema registry
//!
//! The fixed set of equipment fields a caller may name in a search. Field
//! names coming from a request are only ever resolved through this table;
//! they are never spliced into SQL.
//!
//! Text fields are matched through case-folded shadow columns
//! (`name_folded`, `serial_folded`, `search_vector_folded`). SQLite `LIKE`
//! only folds ASCII, so the store keeps a `fold_case` copy of each text field
//! and patterns are folded the same way before binding.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unicode case fold shared by the stored shadow columns and search patterns
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Fields eligible for case-insensitive containment matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Name,
    SerialNumber,
    SearchVector,
}

impl SearchField {
    /// Every searchable field, in declaration order
    pub const ALL: [SearchField; 3] = [Self::Name, Self::SerialNumber, Self::SearchVector];

    /// Fields an advanced search falls back to when none of the requested ones are known
    pub const ADVANCED_DEFAULT: [SearchField; 2] = [Self::Name, Self::SerialNumber];

    /// Public field name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::SerialNumber => "serial_number",
            Self::SearchVector => "search_vector",
        }
    }

    /// Resolve a caller-supplied field name
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "name" => Some(Self::Name),
            "serial_number" => Some(Self::SerialNumber),
            "search_vector" => Some(Self::SearchVector),
            _ => None,
        }
    }

    /// Case-folded shadow column in the `equipments e` query alias
    pub fn folded_column(&self) -> &'static str {
        match self {
            Self::Name => "e.name_folded",
            Self::SerialNumber => "e.serial_folded",
            Self::SearchVector => "e.search_vector_folded",
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fields eligible for structured filtering: status by equality, condition
/// by inclusive range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Status,
    Condition,
}

impl FilterField {
    /// Qualified column in the `equipments e` query alias
    pub fn column(&self) -> &'static str {
        match self {
            Self::Status => "e.status",
            Self::Condition => "e.condition",
        }
    }
}

/// Check whether a caller-supplied name is a known text-search field
pub fn is_searchable_field(name: &str) -> bool {
    SearchField::parse(name).is_some()
}

/// Filter a caller-supplied field list down to known fields
///
/// Unknown names are dropped and duplicates collapse to their first
/// occurrence. An empty result falls back to `SearchField::ADVANCED_DEFAULT`.
pub fn resolve_search_fields(names: &[String]) -> Vec<SearchField> {
    let mut fields = Vec::new();
    for field in names.iter().filter_map(|n| SearchField::parse(n)) {
        if !fields.contains(&field) {
            fields.push(field);
        }
    }

    if fields.is_empty() {
        SearchField::ADVANCED_DEFAULT.to_vec()
    } else {
        fields
    }
}
