use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod import;
mod output;
mod staging;
mod transport;
mod util;
mod workflow;

use cli::{Command, RootArgs};

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    match &args.command {
        Command::Init(args) => workflow::run_init(args),
        Command::Plan(args) => workflow::run_plan(args),
        Command::Match(args) => workflow::run_match(args),
        Command::Status(args) => workflow::run_status(args),
        Command::Check(args) => workflow::run_check(args),
        Command::Assemble(args) => workflow::run_assemble(args),
        Command::Submit(args) => workflow::run_submit(args),
        Command::Template(args) => workflow::run_template(args),
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
