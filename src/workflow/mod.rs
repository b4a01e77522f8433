//! Console workflow for the bulk-import loop.
//!
//! Each step loads the workspace, applies one operator event to the session,
//! and writes back only the artifacts it owns.
mod assemble;
mod check;
mod context;
mod init;
mod match_row;
mod plan;
mod status;
mod submit;

pub use assemble::run_assemble;
pub use check::run_check;
pub(crate) use context::{ensure_complete, resolve_token, resolve_workspace, ImportContext};
pub use init::run_init;
pub use match_row::run_match;
pub use plan::run_plan;
pub use status::run_status;
pub use submit::{run_submit, run_template};
