//! Workflow init step.
//!
//! Init writes the workspace config so later steps resolve the backend and the
//! reference columns from workspace-owned inputs.
use super::resolve_workspace;
use crate::cli::InitArgs;
use crate::import::{self, WorkspacePaths};
use anyhow::{anyhow, Result};

/// Run the init step, writing `import/config.json`.
pub fn run_init(args: &InitArgs) -> Result<()> {
    let paths = WorkspacePaths::new(resolve_workspace(args.workspace.as_deref())?);
    let config_path = paths.config_path();
    if config_path.is_file() && !args.force {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }

    let mut config = import::default_config();
    if let Some(api_base) = args.api_base.as_deref() {
        config.api_base = api_base.trim().to_string();
    }
    import::validate_config(&config)?;
    import::write_config(paths.root(), &config)?;
    println!("wrote {}", config_path.display());
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
