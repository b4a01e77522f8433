//! Decoded spreadsheet records.
//!
//! The spreadsheet itself is decoded upstream; this module reads the decoder's
//! output, a JSON array with one string-keyed object per data line.
use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// One decoded spreadsheet line.
pub type Record = Map<String, Value>;

/// Parse decoder output into records, keeping file order.
///
/// Non-object elements still occupy their line and decode as empty records.
pub fn decode_records(bytes: &[u8]) -> Result<Vec<Record>> {
    let value: Value = serde_json::from_slice(bytes).context("parse records JSON")?;
    let Value::Array(items) = value else {
        return Err(anyhow!("records must be a JSON array of row objects"));
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => record,
            _ => Record::new(),
        })
        .collect())
}

/// Read and decode a records file.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let bytes = fs::read(path).with_context(|| format!("read records {}", path.display()))?;
    decode_records(&bytes).with_context(|| format!("decode records {}", path.display()))
}
