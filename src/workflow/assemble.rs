//! Workflow assemble step.
//!
//! Assembly stages the upload set under its declared names inside
//! `import/txn/` and publishes it to `payload/` in one swap.
use super::status::collision_message;
use super::{ensure_complete, resolve_workspace, ImportContext};
use crate::cli::AssembleArgs;
use crate::import::{Payload, WorkspacePaths};
use crate::output::write_manifest_staged;
use crate::staging::{publish_dir, stage_payload};
use anyhow::{Context, Result};
use std::fs;
use std::time::Instant;

/// Run the assemble step, publishing `payload/` and its manifest.
pub fn run_assemble(args: &AssembleArgs) -> Result<()> {
    let ctx = ImportContext::load(resolve_workspace(args.workspace.as_deref())?)?;
    let (_, session) = ctx.restore_verified()?;
    ensure_complete(&session.validate(), ctx.paths.root())?;

    let payload = session.assemble();
    for collision in payload.collisions() {
        eprintln!("warning: {}", collision_message(collision));
    }
    publish_payload(&ctx.paths, &payload)?;
    println!(
        "wrote {} ({} files, {} renamed)",
        ctx.paths.payload_manifest_path().display(),
        payload.len(),
        payload.renamed_count()
    );
    Ok(())
}

pub(crate) fn publish_payload(paths: &WorkspacePaths, payload: &Payload<'_>) -> Result<()> {
    let start = Instant::now();
    let txn_root = paths.txn_dir();
    fs::create_dir_all(&txn_root).with_context(|| format!("create {}", txn_root.display()))?;
    let txn = tempfile::Builder::new()
        .prefix("assemble-")
        .tempdir_in(&txn_root)
        .with_context(|| format!("create txn dir in {}", txn_root.display()))?;

    let staging_root = txn.path().join("payload");
    stage_payload(&staging_root, payload)?;
    write_manifest_staged(&staging_root, payload)?;
    publish_dir(&staging_root, &paths.payload_dir(), &txn.path().join("backup"))?;

    drop(txn);
    if let Err(err) = fs::remove_dir(&txn_root) {
        tracing::debug!(path = %txn_root.display(), error = %err, "left txn dir in place");
    }
    tracing::info!(
        elapsed_ms = start.elapsed().as_millis(),
        files = payload.len(),
        renamed = payload.renamed_count(),
        "published payload"
    );
    Ok(())
}
