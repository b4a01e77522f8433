//! Workflow submit and template steps.
//!
//! Submit runs the completeness gate, assembles the upload set, and posts the
//! spreadsheet with every payload file. Each attempt is appended to
//! `import/history.jsonl`; successful responses also replace `import/report.json`.
use super::status::collision_message;
use super::{ensure_complete, resolve_token, resolve_workspace, ImportContext};
use crate::cli::{SubmitArgs, TemplateArgs};
use crate::import::{
    self, ImportHistoryEntry, ImportReport, HISTORY_SCHEMA_VERSION, REPORT_SCHEMA_VERSION,
};
use crate::transport::{encode_multipart, submission_parts, CatalogClient};
use crate::util::now_epoch_ms;
use anyhow::{anyhow, Context, Result};
use std::fs;

const TEMPLATE_FILE_NAME: &str = "exercise_import_template.xlsx";

/// Run the submit step and print the backend summary.
pub fn run_submit(args: &SubmitArgs) -> Result<()> {
    let ctx = ImportContext::load(resolve_workspace(args.workspace.as_deref())?)?;
    let config = ctx.config_with_api_base(args.api_base.as_deref())?;
    let (file, session) = ctx.restore_verified()?;
    ensure_complete(&session.validate(), ctx.paths.root())?;

    let sheet_path = file.sheet_path.as_deref().ok_or_else(|| {
        anyhow!(
            "no spreadsheet selected (run `cimport plan --workspace {} --records <json> --sheet <xlsx>`)",
            ctx.paths.root().display()
        )
    })?;
    if let Some(error) = file.decode_error.as_deref() {
        eprintln!("warning: spreadsheet rows could not be read ({error}); submitting anyway");
    }
    let sheet = fs::read(sheet_path)
        .with_context(|| format!("read spreadsheet {}", sheet_path.display()))?;
    let sheet_name = sheet_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| anyhow!("spreadsheet path {} has no file name", sheet_path.display()))?;

    let payload = session.assemble();
    for collision in payload.collisions() {
        eprintln!("warning: {}", collision_message(collision));
    }
    let body = encode_multipart(&submission_parts(&sheet_name, &sheet, &payload));

    let endpoint = config.endpoint_url(&config.import_endpoint);
    let client = CatalogClient::new(config, resolve_token(args.token.as_deref()));
    let outcome = client.submit(&body);

    let (success_count, failure_count) = outcome
        .as_ref()
        .map(|response| (response.success_count, response.failure_count))
        .unwrap_or((0, 0));
    import::append_history(
        ctx.paths.root(),
        &ImportHistoryEntry {
            schema_version: HISTORY_SCHEMA_VERSION,
            ts_epoch_ms: now_epoch_ms()?,
            endpoint: endpoint.clone(),
            file_count: payload.len(),
            success_count,
            failure_count,
            success: outcome.is_ok(),
        },
    )?;
    let response = outcome?;

    let report = ImportReport {
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at_epoch_ms: now_epoch_ms()?,
        endpoint,
        sheet_path: sheet_path.display().to_string(),
        row_count: session.entries().len(),
        file_count: payload.len(),
        renamed_count: payload.renamed_count(),
        collisions: payload.collisions().to_vec(),
        response,
    };
    import::write_report(ctx.paths.root(), &report)?;

    if args.json {
        let text = serde_json::to_string_pretty(&report.response).context("serialize response")?;
        println!("{text}");
    } else {
        println!(
            "imported {} exercises, {} failed",
            report.response.success_count, report.response.failure_count
        );
        for error in &report.response.errors {
            println!("  {error}");
        }
    }
    Ok(())
}

/// Run the template step and write the downloaded spreadsheet.
pub fn run_template(args: &TemplateArgs) -> Result<()> {
    let ctx = ImportContext::load(resolve_workspace(args.workspace.as_deref())?)?;
    let config = ctx.config_with_api_base(args.api_base.as_deref())?;
    let out = args
        .out
        .clone()
        .unwrap_or_else(|| ctx.paths.root().join(TEMPLATE_FILE_NAME));

    let client = CatalogClient::new(config, resolve_token(args.token.as_deref()));
    let bytes = client.download_template()?;
    if let Some(parent) = out.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(&out, &bytes).with_context(|| format!("write {}", out.display()))?;
    println!("wrote {} ({} bytes)", out.display(), bytes.len());
    Ok(())
}
