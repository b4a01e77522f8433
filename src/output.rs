//! Payload manifest staging.
//!
//! The manifest records which image each published file came from so the
//! upload set can be audited before it is submitted.
use crate::import::{
    Collision, Payload, PayloadMode, MANIFEST_SCHEMA_VERSION, PAYLOAD_MANIFEST_NAME,
};
use crate::staging::write_staged_json;
use crate::util::{now_epoch_ms, sha256_hex};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct Manifest {
    schema_version: u32,
    generated_at_epoch_ms: u128,
    mode: PayloadMode,
    file_count: usize,
    renamed_count: usize,
    files: Vec<ManifestFile>,
    collisions: Vec<Collision>,
}

#[derive(Serialize)]
struct ManifestFile {
    name: String,
    source_name: String,
    asset_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    row_index: Option<u32>,
    renamed: bool,
    sha256: String,
    size: u64,
}

/// Stage `manifest.json` next to the staged payload files.
pub fn write_manifest_staged(staging_root: &Path, payload: &Payload<'_>) -> Result<()> {
    let files = payload
        .files()
        .iter()
        .map(|file| ManifestFile {
            name: file.name.clone(),
            source_name: file.asset.name.clone(),
            asset_index: file.asset.index,
            row_index: file.row_index,
            renamed: file.renamed(),
            sha256: sha256_hex(file.content()),
            size: file.content().len() as u64,
        })
        .collect();
    let manifest = Manifest {
        schema_version: MANIFEST_SCHEMA_VERSION,
        generated_at_epoch_ms: now_epoch_ms()?,
        mode: payload.mode,
        file_count: payload.len(),
        renamed_count: payload.renamed_count(),
        files,
        collisions: payload.collisions().to_vec(),
    };
    write_staged_json(staging_root, PAYLOAD_MANIFEST_NAME, &manifest)
}
