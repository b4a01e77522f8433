//! Workflow status step.
//!
//! Status summarizes the session deterministically and names the next action.
use super::{resolve_workspace, ImportContext};
use crate::cli::StatusArgs;
use crate::import::{
    Collision, ImportSession, PayloadMode, SessionFile, Validation, WorkspacePaths,
};
use crate::util::display_path;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Serialize)]
pub(crate) struct StatusSummary {
    pub(crate) workspace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) sheet_path: Option<String>,
    pub(crate) record_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) decode_error: Option<String>,
    pub(crate) assets: Vec<AssetStatus>,
    pub(crate) entries: Vec<EntryStatus>,
    pub(crate) validation: Validation,
    pub(crate) payload: PayloadStatus,
    pub(crate) collisions: Vec<Collision>,
    pub(crate) next_action: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssetStatus {
    pub(crate) index: usize,
    pub(crate) name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct EntryStatus {
    pub(crate) row_index: u32,
    pub(crate) asset_reference: String,
    pub(crate) asset_index: Option<usize>,
    pub(crate) asset_name: Option<String>,
    pub(crate) source: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PayloadStatus {
    pub(crate) mode: PayloadMode,
    pub(crate) files: Vec<String>,
    pub(crate) renamed_count: usize,
}

/// Run the status step and print the mapping table or JSON.
pub fn run_status(args: &StatusArgs) -> Result<()> {
    let ctx = ImportContext::load(resolve_workspace(args.workspace.as_deref())?)?;
    let (file, session) = ctx.restore_by_name()?;
    let summary = build_status_summary(&ctx.paths, file, &session);
    print_summary(&summary, args.json)
}

pub(crate) fn print_summary(summary: &StatusSummary, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(summary).context("serialize status")?;
        println!("{text}");
    } else {
        print!("{}", render_status_text(summary));
    }
    Ok(())
}

pub(crate) fn build_status_summary(
    paths: &WorkspacePaths,
    file: &SessionFile,
    session: &ImportSession,
) -> StatusSummary {
    let assets = session.assets();
    let entries = session
        .entries()
        .iter()
        .map(|entry| EntryStatus {
            row_index: entry.row_index,
            asset_reference: entry.asset_reference.clone(),
            asset_index: entry.asset_index,
            asset_name: entry
                .asset_index
                .and_then(|index| assets.get(index))
                .map(|asset| asset.name.clone()),
            source: entry.source.to_string(),
        })
        .collect();
    let validation = session.validate();
    let payload = session.assemble();
    let next_action = next_action(paths, file, &validation);

    StatusSummary {
        workspace: paths.root().display().to_string(),
        sheet_path: file
            .sheet_path
            .as_deref()
            .map(|path| display_path(path, Some(paths.root()))),
        record_count: file.record_count,
        decode_error: file.decode_error.clone(),
        assets: assets
            .iter()
            .map(|asset| AssetStatus {
                index: asset.index,
                name: asset.name.clone(),
            })
            .collect(),
        entries,
        validation,
        payload: PayloadStatus {
            mode: payload.mode,
            files: payload.names().map(str::to_string).collect(),
            renamed_count: payload.renamed_count(),
        },
        collisions: payload.collisions().to_vec(),
        next_action,
    }
}

fn next_action(paths: &WorkspacePaths, file: &SessionFile, validation: &Validation) -> String {
    let workspace = paths.root().display();
    if file.sheet_path.is_none() || file.decode_error.is_some() {
        return format!("cimport plan --workspace {workspace} --records <json> --sheet <xlsx>");
    }
    match validation.unresolved_row_indexes().first() {
        Some(row) => format!("cimport match --workspace {workspace} --row {row} --asset <name>"),
        None => format!("cimport submit --workspace {workspace}"),
    }
}

pub(crate) fn render_status_text(summary: &StatusSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "workspace: {}", summary.workspace);
    match summary.sheet_path.as_deref() {
        Some(sheet) => {
            let _ = writeln!(
                out,
                "spreadsheet: {sheet} ({} records, {} naming an image)",
                summary.record_count,
                summary.entries.len()
            );
        }
        None => {
            let _ = writeln!(out, "spreadsheet: none");
        }
    }
    if let Some(error) = summary.decode_error.as_deref() {
        let _ = writeln!(out, "decode error: {error}");
    }
    let _ = writeln!(out, "images: {} selected", summary.assets.len());

    if !summary.entries.is_empty() {
        let reference_width = summary
            .entries
            .iter()
            .map(|entry| entry.asset_reference.chars().count())
            .max()
            .unwrap_or(0)
            .max("IMAGE FILE NAME".len());
        let _ = writeln!(
            out,
            "\n{:<5} {:<reference_width$} {:<6} SELECTED IMAGE",
            "ROW", "IMAGE FILE NAME", "SOURCE"
        );
        for entry in &summary.entries {
            let selected = match (&entry.asset_index, &entry.asset_name) {
                (Some(index), Some(name)) => format!("#{index} {name}"),
                _ => "(none)".to_string(),
            };
            let _ = writeln!(
                out,
                "{:<5} {:<reference_width$} {:<6} {selected}",
                entry.row_index, entry.asset_reference, entry.source
            );
        }
        out.push('\n');
    }

    match &summary.validation {
        Validation::Complete => {
            let _ = writeln!(out, "status: complete");
        }
        Validation::Incomplete {
            unresolved_row_indexes,
        } => {
            let rows = unresolved_row_indexes
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(out, "status: incomplete (rows {rows})");
        }
    }
    let mode = match summary.payload.mode {
        PayloadMode::Declared => "declared names",
        PayloadMode::AllAssets => "all images as uploaded",
    };
    let _ = writeln!(
        out,
        "payload: {} files, {} renamed ({mode})",
        summary.payload.files.len(),
        summary.payload.renamed_count
    );
    for collision in &summary.collisions {
        let _ = writeln!(out, "warning: {}", collision_message(collision));
    }
    let _ = writeln!(out, "next: {}", summary.next_action);
    out
}

pub(crate) fn collision_message(collision: &Collision) -> String {
    let rows = match (collision.kept_row, collision.dropped_row) {
        (Some(kept), Some(dropped)) => format!(" (row {kept} kept, row {dropped} dropped)"),
        _ => String::new(),
    };
    format!(
        "{} is claimed by images #{} and #{}; sending #{}{rows}",
        collision.name, collision.kept_asset, collision.dropped_asset, collision.kept_asset
    )
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
