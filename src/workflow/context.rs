use crate::import::{
    self, ImportConfig, ImportSession, SessionFile, Validation, WorkspacePaths,
};
use crate::util::default_workspace_root;
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// Environment variable consulted when `--token` is omitted.
const TOKEN_ENV: &str = "CATALOG_IMPORT_TOKEN";

pub(crate) struct ImportContext {
    pub(crate) paths: WorkspacePaths,
    pub(crate) config: ImportConfig,
    pub(crate) session: Option<SessionFile>,
}

impl ImportContext {
    pub(crate) fn load(workspace_root: PathBuf) -> Result<Self> {
        let paths = WorkspacePaths::new(workspace_root);
        let config = import::load_config_or_default(paths.root())?;
        let session = import::load_session(paths.root())?;
        Ok(Self {
            paths,
            config,
            session,
        })
    }

    pub(crate) fn require_session(&self) -> Result<&SessionFile> {
        self.session.as_ref().ok_or_else(|| {
            anyhow!(
                "missing import session at {} (run `cimport plan --workspace {} --records <json>` first)",
                self.paths.session_path().display(),
                self.paths.root().display()
            )
        })
    }

    /// Rebuild the session from asset names only; enough for matching and status.
    pub(crate) fn restore_by_name(&self) -> Result<(&SessionFile, ImportSession)> {
        let file = self.require_session()?;
        let session = ImportSession::restore(
            file.rows.clone(),
            import::name_only_assets(&file.assets),
            file.entries.clone(),
        );
        Ok((file, session))
    }

    /// Rebuild the session with asset bytes reloaded and checked against their fingerprints.
    pub(crate) fn restore_verified(&self) -> Result<(&SessionFile, ImportSession)> {
        let file = self.require_session()?;
        let assets = import::verify_assets(&file.assets)?;
        let session = ImportSession::restore(file.rows.clone(), assets, file.entries.clone());
        Ok((file, session))
    }

    /// Config with an optional `--api-base` override applied and validated.
    pub(crate) fn config_with_api_base(&self, api_base: Option<&str>) -> Result<ImportConfig> {
        let mut config = self.config.clone();
        if let Some(api_base) = api_base {
            config.api_base = api_base.trim().to_string();
        }
        import::validate_config(&config)?;
        Ok(config)
    }
}

pub(crate) fn resolve_workspace(workspace: Option<&Path>) -> Result<PathBuf> {
    match workspace {
        Some(path) => Ok(path.to_path_buf()),
        None => default_workspace_root(),
    }
}

pub(crate) fn resolve_token(token: Option<&str>) -> Option<String> {
    token
        .map(str::to_string)
        .or_else(|| std::env::var(TOKEN_ENV).ok())
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Fail with a user-facing message when a named image is unresolved.
pub(crate) fn ensure_complete(validation: &Validation, workspace: &Path) -> Result<()> {
    let unresolved = validation.unresolved_row_indexes();
    if unresolved.is_empty() {
        return Ok(());
    }
    let rows = unresolved
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Err(anyhow!(
        "image not selected for rows {rows}; choose one with `cimport match --workspace {} --row <n> --asset <name>` or clear the imageFileName cell",
        workspace.display()
    ))
}
