//! Transactional publishing of the assembled payload directory.
//!
//! Files are written into a staging directory first; publishing swaps the
//! whole directory into place and restores the previous one on failure.
use crate::import::{Payload, PAYLOAD_MANIFEST_NAME};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Component, Path};

pub fn write_staged_bytes(staging_root: &Path, rel_path: &str, bytes: &[u8]) -> Result<()> {
    let staging_path = staging_root.join(rel_path);
    if let Some(parent) = staging_path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(&staging_path, bytes).with_context(|| format!("write {}", staging_path.display()))?;
    Ok(())
}

pub fn write_staged_json<T: serde::Serialize>(
    staging_root: &Path,
    rel_path: &str,
    value: &T,
) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serialize staged JSON")?;
    write_staged_bytes(staging_root, rel_path, &bytes)?;
    Ok(())
}

/// Stage every payload file under its target name.
pub fn stage_payload(staging_root: &Path, payload: &Payload<'_>) -> Result<()> {
    fs::create_dir_all(staging_root)
        .with_context(|| format!("create {}", staging_root.display()))?;
    for file in payload.files() {
        ensure_plain_file_name(&file.name)?;
        write_staged_bytes(staging_root, &file.name, file.content())?;
    }
    Ok(())
}

/// Reject target names that would escape the payload directory or shadow the manifest.
pub fn ensure_plain_file_name(name: &str) -> Result<()> {
    let path = Path::new(name);
    let mut components = path.components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(|ch: char| matches!(ch, '/' | '\\' | '\0'));
    if !plain {
        return Err(anyhow!(
            "image name {name:?} is not a plain file name; fix the imageFileName cell"
        ));
    }
    if name == PAYLOAD_MANIFEST_NAME {
        return Err(anyhow!(
            "image name {name:?} is reserved for the payload manifest"
        ));
    }
    Ok(())
}

/// Swap `staging_root` into `dest`, keeping the previous `dest` under `backup_root` until done.
pub fn publish_dir(staging_root: &Path, dest: &Path, backup_root: &Path) -> Result<()> {
    let had_previous = dest.exists();
    if had_previous {
        fs::rename(dest, backup_root).with_context(|| format!("backup {}", dest.display()))?;
    }
    if let Err(err) = fs::rename(staging_root, dest) {
        if had_previous {
            let _ = fs::rename(backup_root, dest);
        }
        return Err(err).with_context(|| format!("publish {}", dest.display()));
    }
    if had_previous {
        fs::remove_dir_all(backup_root)
            .with_context(|| format!("remove backup {}", backup_root.display()))?;
    }
    Ok(())
}
