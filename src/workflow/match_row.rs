//! Workflow match step.
//!
//! A manual choice replaces one row's image and survives later plans while
//! the row keeps the same imageFileName.
use super::{resolve_workspace, ImportContext};
use crate::cli::MatchArgs;
use crate::import::{self, ImportSession};
use anyhow::{anyhow, Result};

/// Run the match step and write the updated session.
pub fn run_match(args: &MatchArgs) -> Result<()> {
    let ctx = ImportContext::load(resolve_workspace(args.workspace.as_deref())?)?;
    let (file, mut session) = ctx.restore_by_name()?;

    let reference = session
        .entry(args.row)
        .map(|entry| entry.asset_reference.clone())
        .ok_or_else(|| unknown_row(args.row, &session))?;
    let asset_index = chosen_asset(args, &session)?;

    session.set_match(args.row, asset_index);
    tracing::info!(row_index = args.row, asset_index = ?asset_index, "manual match");

    let updated = session.to_session_file(file, file.assets.clone())?;
    import::write_session(ctx.paths.root(), &updated)?;

    let selected = asset_index
        .and_then(|index| session.assets().get(index))
        .map(|asset| format!("#{} {}", asset.index, asset.name))
        .unwrap_or_else(|| "(none)".to_string());
    println!("row {}: {reference} -> {selected}", args.row);
    Ok(())
}

fn chosen_asset(args: &MatchArgs, session: &ImportSession) -> Result<Option<usize>> {
    if args.clear {
        return Ok(None);
    }
    let assets = session.assets();
    if let Some(index) = args.index {
        if index >= assets.len() {
            return Err(anyhow!(
                "image index {index} is out of range ({} images selected)",
                assets.len()
            ));
        }
        return Ok(Some(index));
    }
    let name = args
        .asset
        .as_deref()
        .ok_or_else(|| anyhow!("choose --asset, --index, or --clear"))?;
    import::position_by_name(name, assets)
        .map(Some)
        .ok_or_else(|| {
            let known = assets
                .iter()
                .map(|asset| asset.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            anyhow!("no selected image is named {name:?} (selected: {known})")
        })
}

fn unknown_row(row_index: u32, session: &ImportSession) -> anyhow::Error {
    let rows = session
        .entries()
        .iter()
        .map(|entry| entry.row_index.to_string())
        .collect::<Vec<_>>();
    if rows.is_empty() {
        return anyhow!("row {row_index} does not name an image (no rows name an image)");
    }
    anyhow!(
        "row {row_index} does not name an image (rows naming an image: {})",
        rows.join(", ")
    )
}
