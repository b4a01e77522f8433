//! CLI argument parsing for the bulk-import console.
//!
//! Every command loads the workspace session, applies one operator event, and
//! writes the session back, so commands can be chained freely from scripts.
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint for the import workflow.
#[derive(Parser, Debug)]
#[command(
    name = "cimport",
    version,
    about = "Reconcile catalog spreadsheet rows with uploaded images and submit them",
    after_help = "Commands:\n  init --workspace <dir>                         Write import/config.json\n  plan --records <json> --images <path>...       Decode rows, select images, reconcile\n  match --row <n> (--asset <name>|--index <i>|--clear)  Override one row's image\n  status                                         Show the row/image mapping\n  check                                          Fail when a named image is unresolved\n  assemble                                       Publish payload/ with renamed images\n  submit                                         Send spreadsheet + images to the backend\n  template                                       Download the import template\n\nExamples:\n  cimport init --workspace /tmp/exercises\n  cimport plan --workspace /tmp/exercises --records rows.json --sheet exercises.xlsx --images ./photos\n  cimport match --workspace /tmp/exercises --row 4 --asset DOG.JPG\n  cimport submit --workspace /tmp/exercises --token $TOKEN",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Emit debug logging (overridden by RUST_LOG)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level workflow commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Init(InitArgs),
    Plan(PlanArgs),
    Match(MatchArgs),
    Status(StatusArgs),
    Check(CheckArgs),
    Assemble(AssembleArgs),
    Submit(SubmitArgs),
    Template(TemplateArgs),
}

/// Init command inputs for bootstrapping a workspace.
#[derive(Parser, Debug)]
#[command(about = "Initialize an import workspace (writes import/config.json)")]
pub struct InitArgs {
    /// Import workspace holding config, session, reports and payload
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Overwrite an existing config.json
    #[arg(long)]
    pub force: bool,

    /// Backend base URL recorded in the config
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,
}

/// Plan command inputs: the decoded spreadsheet and the image selection.
#[derive(Parser, Debug)]
#[command(about = "Load rows and images, then reconcile the image mapping")]
pub struct PlanArgs {
    /// Import workspace holding config, session, reports and payload
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Decoded spreadsheet rows (JSON array of objects); replaces the row set
    #[arg(long, value_name = "PATH")]
    pub records: Option<PathBuf>,

    /// Original spreadsheet uploaded on submit (defaults to --records)
    #[arg(long, value_name = "PATH", requires = "records")]
    pub sheet: Option<PathBuf>,

    /// Image files or directories; replaces the image selection
    #[arg(long, value_name = "PATH", num_args = 1.., conflicts_with = "clear_images")]
    pub images: Vec<PathBuf>,

    /// Drop every selected image
    #[arg(long)]
    pub clear_images: bool,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Match command inputs for a manual override.
#[derive(Parser, Debug)]
#[command(about = "Choose the image for one spreadsheet row")]
#[command(group(ArgGroup::new("choice").required(true).args(["asset", "index", "clear"])))]
pub struct MatchArgs {
    /// Import workspace holding config, session, reports and payload
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Spreadsheet row number (as shown by `cimport status`)
    #[arg(long, value_name = "N")]
    pub row: u32,

    /// Selected image by file name (case-insensitive)
    #[arg(long, value_name = "NAME")]
    pub asset: Option<String>,

    /// Selected image by position in the selection
    #[arg(long, value_name = "I")]
    pub index: Option<usize>,

    /// Leave the row without an image
    #[arg(long)]
    pub clear: bool,
}

/// Status command inputs.
#[derive(Parser, Debug)]
#[command(about = "Show rows, selected images, and completeness")]
pub struct StatusArgs {
    /// Import workspace holding config, session, reports and payload
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Check command inputs.
#[derive(Parser, Debug)]
#[command(about = "Fail when a row names an image that is not resolved")]
pub struct CheckArgs {
    /// Import workspace holding config, session, reports and payload
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,
}

/// Assemble command inputs.
#[derive(Parser, Debug)]
#[command(about = "Publish the upload set to payload/ under declared names")]
pub struct AssembleArgs {
    /// Import workspace holding config, session, reports and payload
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,
}

/// Submit command inputs.
#[derive(Parser, Debug)]
#[command(about = "Submit the spreadsheet and assembled images to the backend")]
pub struct SubmitArgs {
    /// Import workspace holding config, session, reports and payload
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Bearer token (falls back to CATALOG_IMPORT_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Override the configured backend base URL
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Template command inputs.
#[derive(Parser, Debug)]
#[command(about = "Download the spreadsheet import template")]
pub struct TemplateArgs {
    /// Import workspace holding config, session, reports and payload
    #[arg(long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Output path (defaults to exercise_import_template.xlsx in the workspace)
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Bearer token (falls back to CATALOG_IMPORT_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Override the configured backend base URL
    #[arg(long, value_name = "URL")]
    pub api_base: Option<String>,
}
