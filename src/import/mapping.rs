//! Row-to-asset mapping store.
//!
//! `reconcile` is the only automatic writer of an entry's `asset_index`. A
//! manual choice survives every later pass as long as the row keeps the same
//! reference and the chosen asset still exists in the current list.
use super::{propose_match, Asset, MappingEntry, MatchSource, Row};
use std::collections::HashMap;

/// Recompute the mapping entries for the current rows and assets.
///
/// Output has one entry per row, in row order; entries for rows that no
/// longer exist are dropped.
pub fn reconcile(rows: &[Row], assets: &[Asset], previous: &[MappingEntry]) -> Vec<MappingEntry> {
    let previous_by_row: HashMap<u32, &MappingEntry> = previous
        .iter()
        .map(|entry| (entry.row_index, entry))
        .collect();

    rows.iter()
        .map(|row| {
            let carried = previous_by_row
                .get(&row.row_index)
                .filter(|entry| entry.asset_reference == row.asset_reference)
                .filter(|entry| addresses_current_asset(entry.asset_index, assets));
            match carried {
                Some(entry) => MappingEntry {
                    row_index: row.row_index,
                    asset_reference: row.asset_reference.clone(),
                    asset_index: entry.asset_index,
                    source: entry.source,
                },
                None => {
                    let asset_index = propose_match(row, assets);
                    tracing::debug!(
                        row_index = row.row_index,
                        reference = %row.asset_reference,
                        ?asset_index,
                        "auto match"
                    );
                    MappingEntry {
                        row_index: row.row_index,
                        asset_reference: row.asset_reference.clone(),
                        asset_index,
                        source: MatchSource::Auto,
                    }
                }
            }
        })
        .collect()
}

fn addresses_current_asset(asset_index: Option<usize>, assets: &[Asset]) -> bool {
    match asset_index {
        Some(index) => index < assets.len(),
        None => true,
    }
}

/// Exclusive owner of the current mapping entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingStore {
    entries: Vec<MappingEntry>,
}

impl MappingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore a store from persisted entries, keeping the first entry per row.
    pub fn from_entries(entries: Vec<MappingEntry>) -> Self {
        let mut seen = std::collections::HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.row_index))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn entry(&self, row_index: u32) -> Option<&MappingEntry> {
        self.entries
            .iter()
            .find(|entry| entry.row_index == row_index)
    }

    /// Run one reconcile pass against fully updated rows and assets.
    pub fn reconcile(&mut self, rows: &[Row], assets: &[Asset]) {
        self.entries = reconcile(rows, assets, &self.entries);
    }

    /// Record an explicit user choice for one row.
    ///
    /// The entry's stored reference is left untouched so the next reconcile
    /// pass does not treat it as stale. Returns false when no entry exists for
    /// `row_index`.
    pub fn set_match(&mut self, row_index: u32, asset_index: Option<usize>) -> bool {
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|entry| entry.row_index == row_index)
        else {
            return false;
        };
        entry.asset_index = asset_index;
        entry.source = MatchSource::Manual;
        true
    }
}

#[cfg(test)]
#[path = "mapping_tests.rs"]
mod tests;
