//! Shared types for the reconciliation engine and its JSON artifacts.
//!
//! Rows and mapping entries serialize into `import/session.json`; assets keep
//! their bytes in memory only and persist as `AssetRecord` fingerprints.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One spreadsheet record that names an image.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Row {
    /// Spreadsheet row number as the operator sees it (headers are row 1).
    pub row_index: u32,
    /// Trimmed, non-empty image file name declared by the row.
    pub asset_reference: String,
}

impl Row {
    pub fn new(row_index: u32, asset_reference: impl Into<String>) -> Self {
        Self {
            row_index,
            asset_reference: asset_reference.into(),
        }
    }
}

/// One uploaded image available for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Position in the current upload list.
    pub index: usize,
    /// Original file name.
    pub name: String,
    pub content: Vec<u8>,
}

impl Asset {
    pub fn new(index: usize, name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            index,
            name: name.into(),
            content,
        }
    }
}

/// How an entry's `asset_index` was last decided.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    #[default]
    Auto,
    Manual,
}

impl MatchSource {
    /// Return the stable string identifier used in JSON artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchSource::Auto => "auto",
            MatchSource::Manual => "manual",
        }
    }
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current association for one row.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub row_index: u32,
    /// Row reference at the time the entry was computed; a mismatch marks it stale.
    pub asset_reference: String,
    /// `None` means unresolved.
    pub asset_index: Option<usize>,
    #[serde(default)]
    pub source: MatchSource,
}

impl MappingEntry {
    /// Entries with a non-empty reference must resolve before submission.
    pub fn is_required(&self) -> bool {
        !self.asset_reference.trim().is_empty()
    }
}

/// Persisted fingerprint of one selected image file.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub index: usize,
    pub name: String,
    pub path: PathBuf,
    pub sha256: String,
    pub size: u64,
}

/// Workspace-owned settings stored in `import/config.json`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    pub schema_version: u32,
    /// Backend base URL, e.g. `http://localhost:8000`.
    pub api_base: String,
    pub import_endpoint: String,
    pub template_endpoint: String,
    /// Accepted spellings of the image reference column, in lookup order.
    #[serde(default = "super::config::default_reference_columns")]
    pub reference_columns: Vec<String>,
    #[serde(default = "super::config::default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Engine state persisted between console invocations.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SessionFile {
    pub schema_version: u32,
    pub updated_at_epoch_ms: u128,
    /// Decoded records file the rows were extracted from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_path: Option<PathBuf>,
    /// Original spreadsheet uploaded alongside the images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_path: Option<PathBuf>,
    /// Total decoded records, including rows without an image reference.
    #[serde(default)]
    pub record_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decode_error: Option<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default)]
    pub assets: Vec<AssetRecord>,
    #[serde(default)]
    pub entries: Vec<MappingEntry>,
}

/// Backend response to a bulk import submission.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportResponse {
    #[serde(default)]
    pub success_count: u64,
    #[serde(default)]
    pub failure_count: u64,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Latest submission snapshot written to `import/report.json`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ImportReport {
    pub schema_version: u32,
    pub generated_at_epoch_ms: u128,
    pub endpoint: String,
    pub sheet_path: String,
    pub row_count: usize,
    pub file_count: usize,
    pub renamed_count: usize,
    #[serde(default)]
    pub collisions: Vec<crate::import::Collision>,
    pub response: BulkImportResponse,
}

/// One line of `import/history.jsonl`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ImportHistoryEntry {
    pub schema_version: u32,
    pub ts_epoch_ms: u128,
    pub endpoint: String,
    pub file_count: usize,
    pub success_count: u64,
    pub failure_count: u64,
    pub success: bool,
}
