//! Reporting and history persistence for submissions.
//!
//! The report is a snapshot of the latest submission; history is append-only.
use super::{ImportHistoryEntry, ImportReport, WorkspacePaths};
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Write the latest submission report snapshot.
pub fn write_report(workspace_root: &Path, report: &ImportReport) -> Result<()> {
    let paths = WorkspacePaths::new(workspace_root.to_path_buf());
    let path = paths.report_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create import dir")?;
    }
    let text = serde_json::to_string_pretty(report).context("serialize import report")?;
    fs::write(&path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Append a history entry as JSONL.
pub fn append_history(workspace_root: &Path, entry: &ImportHistoryEntry) -> Result<()> {
    let paths = WorkspacePaths::new(workspace_root.to_path_buf());
    let path = paths.history_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create import dir")?;
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut line = serde_json::to_string(entry).context("serialize import history entry")?;
    line.push('\n');
    file.write_all(line.as_bytes())
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::HISTORY_SCHEMA_VERSION;

    #[test]
    fn append_history_writes_one_line_per_submission() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let entry = ImportHistoryEntry {
            schema_version: HISTORY_SCHEMA_VERSION,
            ts_epoch_ms: 1,
            endpoint: "http://localhost:8000/api/exercises/import".to_string(),
            file_count: 2,
            success_count: 3,
            failure_count: 0,
            success: true,
        };

        append_history(dir.path(), &entry).expect("append first");
        append_history(dir.path(), &entry).expect("append second");

        let text = fs::read_to_string(dir.path().join("import/history.jsonl")).expect("read");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: ImportHistoryEntry = serde_json::from_str(lines[1]).expect("parse line");
        assert_eq!(parsed.success_count, 3);
    }
}
