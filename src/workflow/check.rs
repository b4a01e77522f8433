//! Workflow check step: the completeness gate on its own.
use super::status::collision_message;
use super::{ensure_complete, resolve_workspace, ImportContext};
use crate::cli::CheckArgs;
use anyhow::Result;

pub fn run_check(args: &CheckArgs) -> Result<()> {
    let ctx = ImportContext::load(resolve_workspace(args.workspace.as_deref())?)?;
    let (_, session) = ctx.restore_by_name()?;
    ensure_complete(&session.validate(), ctx.paths.root())?;

    let payload = session.assemble();
    for collision in payload.collisions() {
        eprintln!("warning: {}", collision_message(collision));
    }
    println!(
        "complete: {} rows resolved, {} files to submit",
        session.entries().len(),
        payload.len()
    );
    Ok(())
}
