//! `ciam history`: listing, recording and replay.
//!
//! Replay reuses the recorded argv verbatim but runs against the *current*
//! configuration; a warning names both when they differ.

use std::iter;

use anyhow::Result;
use chrono::Utc;
use ciam_domain::{CiamError, CliConfig, Environment, HistoryEntry, Region};
use clap::Parser;
use tracing::warn;

use crate::cli::{Cli, Command};
use crate::context::AppContext;

/// Append the invocation to the history file. Failures are only logged.
pub fn record(ctx: &AppContext, argv: Vec<String>) {
    let entry = HistoryEntry {
        timestamp: Utc::now(),
        argv,
        region: ctx.config.region,
        env: ctx.config.env,
        store_id: ctx.config.store_id.clone(),
    };
    if let Err(err) = ctx.history().append(&entry) {
        warn!(error = %err, "failed to record command history");
    }
}

pub fn list(ctx: &AppContext, number: usize) -> Result<()> {
    let entries = ctx.history().recent(number)?;
    if entries.is_empty() {
        println!("No history available.");
        return Ok(());
    }

    println!("Command History:");
    for (index, entry) in entries.iter().enumerate() {
        println!("  [{index}] {} | {}", entry.timestamp.to_rfc3339(), entry.command_line());
    }
    Ok(())
}

/// Parse history entry `index` back into a command, ready to dispatch.
///
/// # Errors
/// `InvalidInput` for an unknown index, an entry that no longer parses, or
/// an entry that is itself a history command.
pub fn prepare_replay(ctx: &AppContext, index: usize) -> Result<Cli> {
    let entry = ctx.history().get(index)?;
    let args = iter::once("ciam").chain(entry.argv.iter().map(String::as_str));
    let cli = Cli::try_parse_from(args).map_err(|err| {
        CiamError::InvalidInput(format!(
            "history entry {index} is not a valid command: {}",
            err.to_string().lines().next().unwrap_or_default()
        ))
    })?;

    if matches!(cli.command, Command::History(_)) {
        return Err(CiamError::InvalidInput("refusing to replay a history command".into()).into());
    }

    if ctx.config.differs_from(entry.region, entry.env, entry.store_id.as_deref()) {
        eprintln!(
            "Warning: entry {index} was recorded with {}; replaying with current configuration {}",
            snapshot(entry.region, entry.env, entry.store_id.as_deref()),
            snapshot(ctx.config.region, ctx.config.env, ctx.config.store_id.as_deref()),
        );
    }
    println!("Replaying: {}", entry.command_line());
    Ok(cli)
}

fn snapshot(region: Option<Region>, env: Option<Environment>, store_id: Option<&str>) -> String {
    let config = CliConfig { region, env, store_id: store_id.map(str::to_string) };
    let target = config.target().map_or_else(|| "(no region/env)".to_string(), |t| t.to_string());
    match config.store_id {
        Some(store) => format!("{target} store {store}"),
        None => target,
    }
}
