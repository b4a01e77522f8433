//! Completeness gate run before submission.
use super::MappingEntry;
use serde::Serialize;

/// Outcome of the completeness check.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Validation {
    Complete,
    Incomplete { unresolved_row_indexes: Vec<u32> },
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        matches!(self, Validation::Complete)
    }

    pub fn unresolved_row_indexes(&self) -> &[u32] {
        match self {
            Validation::Complete => &[],
            Validation::Incomplete {
                unresolved_row_indexes,
            } => unresolved_row_indexes,
        }
    }
}

/// Check that every entry with a declared reference has a resolved asset.
pub fn validate(entries: &[MappingEntry]) -> Validation {
    let unresolved_row_indexes: Vec<u32> = entries
        .iter()
        .filter(|entry| entry.is_required() && entry.asset_index.is_none())
        .map(|entry| entry.row_index)
        .collect();
    if unresolved_row_indexes.is_empty() {
        Validation::Complete
    } else {
        Validation::Incomplete {
            unresolved_row_indexes,
        }
    }
}
