//! Import session: the binding layer between console events and the engine.
//!
//! Mutators replace their inputs wholesale and then run one full reconcile
//! pass before returning. Readers only observe entries computed from a fully
//! updated row set and asset set.
use super::{
    assemble, validate, Asset, AssetRecord, MappingEntry, MappingStore, Payload, Row,
    SessionFile, Validation, WorkspacePaths, SESSION_SCHEMA_VERSION,
};
use crate::util::now_epoch_ms;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

/// Rows, assets and the mapping store they feed.
#[derive(Debug, Clone, Default)]
pub struct ImportSession {
    rows: Vec<Row>,
    assets: Vec<Asset>,
    store: MappingStore,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a session from persisted state.
    ///
    /// Persisted entries act as the previous pass, so manual choices carry over.
    pub fn restore(rows: Vec<Row>, assets: Vec<Asset>, entries: Vec<MappingEntry>) -> Self {
        let mut session = Self {
            rows,
            assets,
            store: MappingStore::from_entries(entries),
        };
        session.reconcile();
        session
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn entries(&self) -> &[MappingEntry] {
        self.store.entries()
    }

    pub fn entry(&self, row_index: u32) -> Option<&MappingEntry> {
        self.store.entry(row_index)
    }

    /// Replace the row set after a spreadsheet decode.
    pub fn replace_rows(&mut self, rows: Vec<Row>) {
        self.replace_inputs(Some(rows), None);
    }

    /// Replace the asset set after the upload selection changed.
    pub fn replace_assets(&mut self, assets: Vec<Asset>) {
        self.replace_inputs(None, Some(assets));
    }

    /// Swap whichever inputs changed, then run a single reconcile pass.
    ///
    /// Both inputs are in place before matching, so rows decoded alongside a
    /// new selection never bind to positions of the old one.
    pub fn replace_inputs(&mut self, rows: Option<Vec<Row>>, assets: Option<Vec<Asset>>) {
        if rows.is_none() && assets.is_none() {
            return;
        }
        if let Some(rows) = rows {
            self.rows = rows;
        }
        if let Some(assets) = assets {
            self.assets = assets;
        }
        self.reconcile();
    }

    /// Apply a manual choice; returns false when the row has no entry.
    pub fn set_match(&mut self, row_index: u32, asset_index: Option<usize>) -> bool {
        self.store.set_match(row_index, asset_index)
    }

    pub fn validate(&self) -> Validation {
        validate(self.store.entries())
    }

    pub fn assemble(&self) -> Payload<'_> {
        assemble(self.store.entries(), &self.assets)
    }

    fn reconcile(&mut self) {
        self.store.reconcile(&self.rows, &self.assets);
        let resolved = self
            .store
            .entries()
            .iter()
            .filter(|entry| entry.asset_index.is_some())
            .count();
        tracing::info!(
            rows = self.rows.len(),
            assets = self.assets.len(),
            resolved,
            "reconciled image mapping"
        );
    }

    /// Snapshot the session for persistence, keeping collaborator metadata.
    pub fn to_session_file(
        &self,
        base: &SessionFile,
        assets: Vec<AssetRecord>,
    ) -> Result<SessionFile> {
        if assets.len() != self.assets.len() {
            return Err(anyhow!(
                "asset records ({}) do not match session assets ({})",
                assets.len(),
                self.assets.len()
            ));
        }
        Ok(SessionFile {
            schema_version: SESSION_SCHEMA_VERSION,
            updated_at_epoch_ms: now_epoch_ms()?,
            records_path: base.records_path.clone(),
            sheet_path: base.sheet_path.clone(),
            record_count: base.record_count,
            decode_error: base.decode_error.clone(),
            rows: self.rows.clone(),
            assets,
            entries: self.store.entries().to_vec(),
        })
    }
}

/// Assets carrying only names and positions, enough for matching.
pub fn name_only_assets(records: &[AssetRecord]) -> Vec<Asset> {
    records
        .iter()
        .map(|record| Asset::new(record.index, record.name.clone(), Vec::new()))
        .collect()
}

/// Load `import/session.json`, or `None` when no session exists yet.
pub fn load_session(workspace_root: &Path) -> Result<Option<SessionFile>> {
    let paths = WorkspacePaths::new(workspace_root.to_path_buf());
    let path = paths.session_path();
    if !path.is_file() {
        return Ok(None);
    }
    let bytes = fs::read(&path).with_context(|| format!("read session {}", path.display()))?;
    let session: SessionFile =
        serde_json::from_slice(&bytes).context("parse import session JSON")?;
    if session.schema_version != SESSION_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported import session schema_version {} (rerun `cimport plan`)",
            session.schema_version
        ));
    }
    Ok(Some(session))
}

/// Persist the session in a stable JSON format.
pub fn write_session(workspace_root: &Path, session: &SessionFile) -> Result<()> {
    let paths = WorkspacePaths::new(workspace_root.to_path_buf());
    let path = paths.session_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create import dir")?;
    }
    let text = serde_json::to_string_pretty(session).context("serialize import session")?;
    fs::write(&path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
