//! Typed paths into an import workspace.
//!
//! Centralizing path construction keeps file access consistent across the
//! console commands.
use std::path::{Path, PathBuf};

/// Convenience wrapper for locating workspace artifacts.
#[derive(Debug, Clone)]
pub struct WorkspacePaths {
    root: PathBuf,
}

impl WorkspacePaths {
    /// Create a new path helper rooted at the workspace root.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Return the workspace root used for path derivation.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the `import/` directory path.
    pub fn import_dir(&self) -> PathBuf {
        self.root.join("import")
    }

    /// Return the `import/config.json` path.
    pub fn config_path(&self) -> PathBuf {
        self.import_dir().join("config.json")
    }

    /// Return the `import/session.json` path.
    pub fn session_path(&self) -> PathBuf {
        self.import_dir().join("session.json")
    }

    /// Return the `import/report.json` path.
    pub fn report_path(&self) -> PathBuf {
        self.import_dir().join("report.json")
    }

    /// Return the `import/history.jsonl` path.
    pub fn history_path(&self) -> PathBuf {
        self.import_dir().join("history.jsonl")
    }

    /// Return the `import/txn/` directory used for staged publishes.
    pub fn txn_dir(&self) -> PathBuf {
        self.import_dir().join("txn")
    }

    /// Return the published `payload/` directory.
    pub fn payload_dir(&self) -> PathBuf {
        self.root.join("payload")
    }

    /// Return the `payload/manifest.json` path.
    pub fn payload_manifest_path(&self) -> PathBuf {
        self.payload_dir().join(PAYLOAD_MANIFEST_NAME)
    }
}

/// File name of the manifest written next to published payload files.
pub const PAYLOAD_MANIFEST_NAME: &str = "manifest.json";
