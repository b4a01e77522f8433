//! Image upload selection.
//!
//! A selection is the ordered list of `--images` arguments. Directories expand
//! to their regular files sorted by name; explicit files keep argument order.
//! Each new selection replaces the previous one wholesale.
use super::{Asset, AssetRecord};
use crate::util::sha256_hex;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Expand a selection into the ordered list of image files.
pub fn expand_selection(selection: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in selection {
        if path.is_dir() {
            files.extend(directory_files(path)?);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(anyhow!("image selection {} does not exist", path.display()));
        }
    }
    Ok(files)
}

fn directory_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if path.is_file() && !hidden {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read every selected file, returning fingerprints and in-memory assets.
pub fn load_asset_records(files: &[PathBuf]) -> Result<(Vec<AssetRecord>, Vec<Asset>)> {
    let mut records = Vec::with_capacity(files.len());
    let mut assets = Vec::with_capacity(files.len());
    for (index, path) in files.iter().enumerate() {
        let content = fs::read(path).with_context(|| format!("read image {}", path.display()))?;
        let name = file_name(path)?;
        let path = path
            .canonicalize()
            .with_context(|| format!("resolve image {}", path.display()))?;
        records.push(AssetRecord {
            index,
            name: name.clone(),
            path,
            sha256: sha256_hex(&content),
            size: content.len() as u64,
        });
        assets.push(Asset::new(index, name, content));
    }
    Ok((records, assets))
}

/// Reload assets recorded in the session, failing when any file changed.
pub fn verify_assets(records: &[AssetRecord]) -> Result<Vec<Asset>> {
    records
        .iter()
        .map(|record| {
            let content = fs::read(&record.path).with_context(|| {
                format!(
                    "read image {} (selected as {})",
                    record.path.display(),
                    record.name
                )
            })?;
            if sha256_hex(&content) != record.sha256 {
                return Err(anyhow!(
                    "image {} changed since it was selected; rerun `cimport plan`",
                    record.path.display()
                ));
            }
            Ok(Asset::new(record.index, record.name.clone(), content))
        })
        .collect()
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("image path {} has no file name", path.display()))
}
