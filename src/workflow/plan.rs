//! Workflow plan step.
//!
//! Planning replaces the row set and/or the image selection, reconciles the
//! mapping against the previous session, and writes `import/session.json`.
use super::status::{build_status_summary, print_summary};
use super::{resolve_workspace, ImportContext};
use crate::cli::PlanArgs;
use crate::import::{self, ImportSession, Row, SessionFile};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

/// Run the plan step and print the reconciled mapping.
pub fn run_plan(args: &PlanArgs) -> Result<()> {
    let workspace = resolve_workspace(args.workspace.as_deref())?;
    let ctx = ImportContext::load(workspace)?;
    let previous = ctx.session.clone().unwrap_or_default();

    let mut session = ImportSession::restore(
        previous.rows.clone(),
        import::name_only_assets(&previous.assets),
        previous.entries.clone(),
    );
    let mut asset_records = previous.assets.clone();
    let mut base = previous;

    let rows = match args.records.as_deref() {
        Some(records_path) => Some(decode_rows(
            &ctx,
            records_path,
            args.sheet.as_deref(),
            &mut base,
        )?),
        None => None,
    };

    let assets = if args.clear_images {
        asset_records = Vec::new();
        Some(Vec::new())
    } else if !args.images.is_empty() {
        let files = import::expand_selection(&args.images)?;
        let (records, assets) = import::load_asset_records(&files)?;
        asset_records = records;
        Some(assets)
    } else {
        None
    };
    session.replace_inputs(rows, assets);

    let file = session.to_session_file(&base, asset_records)?;
    import::write_session(ctx.paths.root(), &file)?;
    tracing::debug!(path = %ctx.paths.session_path().display(), "wrote session");

    let summary = build_status_summary(&ctx.paths, &file, &session);
    print_summary(&summary, args.json)
}

/// Decode the records file into rows, recording decode failures instead of failing.
fn decode_rows(
    ctx: &ImportContext,
    records_path: &Path,
    sheet_path: Option<&Path>,
    base: &mut SessionFile,
) -> Result<Vec<Row>> {
    if !records_path.is_file() {
        return Err(anyhow!(
            "records file {} does not exist",
            records_path.display()
        ));
    }
    let records_path = fs::canonicalize(records_path)
        .with_context(|| format!("resolve {}", records_path.display()))?;
    let sheet_path = match sheet_path {
        Some(sheet) => {
            fs::canonicalize(sheet).with_context(|| format!("resolve sheet {}", sheet.display()))?
        }
        None => records_path.clone(),
    };
    base.records_path = Some(records_path.clone());
    base.sheet_path = Some(sheet_path);

    match import::load_records(&records_path) {
        Ok(records) => {
            base.record_count = records.len();
            base.decode_error = None;
            Ok(import::extract(&records, &ctx.config.reference_columns))
        }
        Err(err) => {
            let message = format!("{err:#}");
            tracing::warn!(error = %message, "spreadsheet decode failed; continuing without rows");
            eprintln!("warning: could not read spreadsheet rows: {message}");
            base.record_count = 0;
            base.decode_error = Some(message);
            Ok(Vec::new())
        }
    }
}
