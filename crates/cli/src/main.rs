//! `ciam`: command-line client for the CIAM identity-management API.

mod cli;
mod commands;
mod context;
mod exit;
mod output;

use std::process::ExitCode;

use ciam_infra::config::{load_dotenv, process_env};
use ciam_infra::observability::init_tracing;
use clap::Parser;
use tracing::debug;

use crate::cli::Cli;
use crate::context::AppContext;

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();
    let cli = Cli::parse();
    init_tracing(&process_env, cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            let code = exit::code_for(&err);
            debug!(code, "command failed");
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut ctx = AppContext::load(cli.verbose)?;
    if !cli.command.is_meta() {
        commands::history::record(&ctx, std::env::args().skip(1).collect());
    }
    commands::dispatch(&mut ctx, cli.command).await
}
