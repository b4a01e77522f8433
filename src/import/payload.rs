//! Final upload set assembly.
//!
//! In declared mode each resolved entry contributes its asset under the
//! row's declared name; the first entry per name wins. When no entry declares
//! a name, every asset is submitted under its own name.
use super::{Asset, MappingEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the payload names its files.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayloadMode {
    /// Rows declare file names; only matched assets are sent.
    Declared,
    /// No row declares a name; every asset is sent as uploaded.
    AllAssets,
}

/// One file of the assembled upload set, borrowing its bytes from the asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadFile<'a> {
    /// Target name the backend will see.
    pub name: String,
    pub asset: &'a Asset,
    /// Row that claimed this name, if any.
    pub row_index: Option<u32>,
}

impl<'a> PayloadFile<'a> {
    /// True when the file is sent under a name other than its original one.
    pub fn renamed(&self) -> bool {
        self.name != self.asset.name
    }

    pub fn content(&self) -> &'a [u8] {
        &self.asset.content
    }
}

/// A dropped duplicate target name that pointed at a different asset.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Collision {
    pub name: String,
    pub kept_asset: usize,
    pub dropped_asset: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kept_row: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dropped_row: Option<u32>,
}

/// Named upload set in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload<'a> {
    pub mode: PayloadMode,
    files: Vec<PayloadFile<'a>>,
    collisions: Vec<Collision>,
}

impl<'a> Payload<'a> {
    pub fn files(&self) -> &[PayloadFile<'a>] {
        &self.files
    }

    pub fn get(&self, name: &str) -> Option<&PayloadFile<'a>> {
        self.files.iter().find(|file| file.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.files.iter().map(|file| file.name.as_str())
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn renamed_count(&self) -> usize {
        self.files.iter().filter(|file| file.renamed()).count()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Build the upload set from the current entries and assets.
pub fn assemble<'a>(entries: &[MappingEntry], assets: &'a [Asset]) -> Payload<'a> {
    let declared = entries.iter().any(MappingEntry::is_required);
    let payload = if declared {
        assemble_declared(entries, assets)
    } else {
        assemble_all_assets(assets)
    };
    for collision in &payload.collisions {
        tracing::warn!(
            name = %collision.name,
            kept_asset = collision.kept_asset,
            dropped_asset = collision.dropped_asset,
            "duplicate target name; keeping first"
        );
    }
    tracing::info!(
        mode = ?payload.mode,
        files = payload.files.len(),
        renamed = payload.renamed_count(),
        "payload assembled"
    );
    payload
}

fn assemble_declared<'a>(entries: &[MappingEntry], assets: &'a [Asset]) -> Payload<'a> {
    let mut files: Vec<PayloadFile<'a>> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();
    let mut collisions = Vec::new();

    for entry in entries {
        let Some(asset) = entry.asset_index.and_then(|index| assets.get(index)) else {
            continue;
        };
        let declared = entry.asset_reference.trim();
        let target = if declared.is_empty() {
            asset.name.trim()
        } else {
            declared
        };
        if target.is_empty() {
            continue;
        }
        if let Some(&position) = by_name.get(target) {
            let kept = &files[position];
            if kept.asset.index != asset.index {
                collisions.push(Collision {
                    name: target.to_string(),
                    kept_asset: kept.asset.index,
                    dropped_asset: asset.index,
                    kept_row: kept.row_index,
                    dropped_row: Some(entry.row_index),
                });
            }
            continue;
        }
        by_name.insert(target.to_string(), files.len());
        files.push(PayloadFile {
            name: target.to_string(),
            asset,
            row_index: Some(entry.row_index),
        });
    }

    Payload {
        mode: PayloadMode::Declared,
        files,
        collisions,
    }
}

fn assemble_all_assets(assets: &[Asset]) -> Payload<'_> {
    let mut files: Vec<PayloadFile<'_>> = Vec::new();
    let mut by_name: HashMap<&str, usize> = HashMap::new();
    let mut collisions = Vec::new();

    for asset in assets {
        match by_name.get(asset.name.as_str()) {
            Some(&position) => {
                // Same name uploaded twice: the later upload replaces the bytes in place.
                collisions.push(Collision {
                    name: asset.name.clone(),
                    kept_asset: asset.index,
                    dropped_asset: files[position].asset.index,
                    kept_row: None,
                    dropped_row: None,
                });
                files[position].asset = asset;
            }
            None => {
                by_name.insert(asset.name.as_str(), files.len());
                files.push(PayloadFile {
                    name: asset.name.clone(),
                    asset,
                    row_index: None,
                });
            }
        }
    }

    Payload {
        mode: PayloadMode::AllAssets,
        files,
        collisions,
    }
}

#[cfg(test)]
#[path = "payload_tests.rs"]
mod tests;
