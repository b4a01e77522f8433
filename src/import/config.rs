//! Import workspace configuration helpers.
//!
//! This module loads, validates, and normalizes the workspace-owned config so
//! every console command resolves the backend and the reference column the
//! same way.
use super::{ImportConfig, WorkspacePaths, CONFIG_SCHEMA_VERSION, DEFAULT_REFERENCE_COLUMNS};
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

/// Backend used when the config does not name one.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
const DEFAULT_IMPORT_ENDPOINT: &str = "/api/exercises/import";
const DEFAULT_TEMPLATE_ENDPOINT: &str = "/api/exercises/import/template";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub(crate) fn default_reference_columns() -> Vec<String> {
    DEFAULT_REFERENCE_COLUMNS
        .iter()
        .map(|column| column.to_string())
        .collect()
}

pub(crate) fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Build the default config used when a workspace is first initialized.
pub fn default_config() -> ImportConfig {
    ImportConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        api_base: DEFAULT_API_BASE.to_string(),
        import_endpoint: DEFAULT_IMPORT_ENDPOINT.to_string(),
        template_endpoint: DEFAULT_TEMPLATE_ENDPOINT.to_string(),
        reference_columns: default_reference_columns(),
        timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
}

/// Load the workspace config from `import/config.json`.
pub fn load_config(workspace_root: &Path) -> Result<ImportConfig> {
    let paths = WorkspacePaths::new(workspace_root.to_path_buf());
    let path = paths.config_path();
    let bytes = fs::read(&path).with_context(|| format!("read config {}", path.display()))?;
    let config: ImportConfig =
        serde_json::from_slice(&bytes).context("parse import config JSON")?;
    validate_config(&config)?;
    Ok(config)
}

/// Load the workspace config, falling back to defaults when none was written.
pub fn load_config_or_default(workspace_root: &Path) -> Result<ImportConfig> {
    let paths = WorkspacePaths::new(workspace_root.to_path_buf());
    if !paths.config_path().is_file() {
        tracing::debug!("no import config; using defaults");
        return Ok(default_config());
    }
    load_config(workspace_root)
}

/// Persist a config to disk in a stable JSON format.
pub fn write_config(workspace_root: &Path, config: &ImportConfig) -> Result<()> {
    let paths = WorkspacePaths::new(workspace_root.to_path_buf());
    let path = paths.config_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create import dir")?;
    }
    let text = serde_json::to_string_pretty(config).context("serialize import config")?;
    fs::write(&path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Validate config schema and user-provided values.
pub fn validate_config(config: &ImportConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported import config schema_version {}",
            config.schema_version
        ));
    }
    let api_base = config.api_base.trim();
    if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
        return Err(anyhow!(
            "api_base must start with http:// or https:// (got {:?})",
            config.api_base
        ));
    }
    for (label, endpoint) in [
        ("import_endpoint", &config.import_endpoint),
        ("template_endpoint", &config.template_endpoint),
    ] {
        if !endpoint.starts_with('/') {
            return Err(anyhow!("{label} must start with '/' (got {endpoint:?})"));
        }
    }
    if config.reference_columns.is_empty() {
        return Err(anyhow!("reference_columns must list at least one column"));
    }
    if config
        .reference_columns
        .iter()
        .any(|column| column.trim().is_empty())
    {
        return Err(anyhow!("reference_columns entries must be non-empty"));
    }
    if config.timeout_secs == 0 {
        return Err(anyhow!("timeout_secs must be greater than zero"));
    }
    Ok(())
}

impl ImportConfig {
    /// Join the configured base with an endpoint path.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.api_base.trim().trim_end_matches('/'), endpoint)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
