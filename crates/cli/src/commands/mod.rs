//! Command handlers

pub mod completion;
pub mod config;
pub mod history;
pub mod resources;
pub mod tokens;

use anyhow::Result;
use ciam_core::resources::ResourceKind;

use crate::cli::{Command, HistoryArgs};
use crate::context::AppContext;

/// Route a parsed command to its handler.
pub async fn dispatch(ctx: &mut AppContext, command: Command) -> Result<()> {
    match command {
        Command::Config { command } => config::handle(ctx, command),
        Command::Tokens { command } => tokens::handle(ctx, command).await,
        Command::Users { scope, command } => {
            resources::handle(ctx, ResourceKind::Users, scope.store_id, command.into()).await
        }
        Command::Groups { scope, command } => {
            resources::handle(ctx, ResourceKind::Groups, scope.store_id, command.into()).await
        }
        Command::Orgs { scope, command } => {
            resources::handle(ctx, ResourceKind::Orgs, scope.store_id, command.into()).await
        }
        Command::Stores { command } => resources::handle(ctx, ResourceKind::Stores, None, command.into()).await,
        Command::Products { scope, command } => {
            resources::handle(ctx, ResourceKind::Products, scope.store_id, command.into()).await
        }
        Command::Clients { command } => resources::handle(ctx, ResourceKind::Clients, None, command.into()).await,
        Command::History(HistoryArgs { replay: Some(index), .. }) => {
            let replayed = history::prepare_replay(ctx, index)?;
            ctx.verbose |= replayed.verbose;
            Box::pin(dispatch(ctx, replayed.command)).await
        }
        Command::History(HistoryArgs { number, replay: None }) => history::list(ctx, number),
        Command::Completion { shell } => {
            completion::generate(shell);
            Ok(())
        }
    }
}
