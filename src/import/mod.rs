//! Bulk-import reconciliation engine and its workspace-owned artifacts.
//!
//! The engine pairs spreadsheet rows that name an image with exactly one
//! uploaded file. Rows and assets flow in from collaborators (`records`,
//! `assets`); the mapping store owns the row-to-asset entries; the validator
//! and the payload assembler run at submission time.
//!
//! # Flow
//!
//! ```text
//! records.json ──► rows::extract ──┐
//!                                  ├──► mapping::reconcile ──► MappingStore ◄── set_match
//! --images ──────► assets::load ───┘                              │
//!                                              validate::validate ◄┤
//!                                              payload::assemble ◄─┘
//! ```
//!
//! Every engine operation is a synchronous transformation over in-memory
//! collections; only the console layer touches the filesystem.

/// Current schema version for `import/config.json`.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;
/// Current schema version for `import/session.json`.
pub const SESSION_SCHEMA_VERSION: u32 = 1;
/// Current schema version for `import/report.json`.
pub const REPORT_SCHEMA_VERSION: u32 = 1;
/// Current schema version for `import/history.jsonl`.
pub const HISTORY_SCHEMA_VERSION: u32 = 1;
/// Current schema version for `payload/manifest.json`.
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// Spreadsheet row number of the first data record (row 1 holds the headers).
pub const HEADER_ROW_OFFSET: u32 = 2;

/// Accepted spellings of the image reference column, in lookup order.
pub const DEFAULT_REFERENCE_COLUMNS: [&str; 3] = ["imageFileName", "imagefilename", "ImageFileName"];

mod assets;
mod config;
mod history;
mod mapping;
mod matcher;
mod paths;
mod payload;
mod records;
mod rows;
mod session;
mod types;
mod validate;

pub use assets::{expand_selection, load_asset_records, verify_assets};
pub use config::{
    default_config, load_config, load_config_or_default, validate_config, write_config,
};
pub use history::{append_history, write_report};
pub use mapping::MappingStore;
pub use matcher::{position_by_name, propose_match};
pub use paths::{WorkspacePaths, PAYLOAD_MANIFEST_NAME};
pub use payload::{assemble, Collision, Payload, PayloadMode};
pub use records::{load_records, Record};
pub use rows::extract;
pub use session::{load_session, name_only_assets, write_session, ImportSession};
pub use types::*;
pub use validate::{validate, Validation};
