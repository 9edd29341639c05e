//! Command tree

use std::path::PathBuf;

use ciam_domain::{Environment, Region, Target};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "ciam")]
#[command(about = "CIAM identity-management command-line client")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Print per-item detail and add timing metadata to the audit file
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the current region, environment and default store
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Inspect authentication tokens
    Tokens {
        #[command(subcommand)]
        command: TokensCommand,
    },

    /// Manage users
    Users {
        #[command(flatten)]
        scope: StoreScope,
        #[command(subcommand)]
        command: UsersCommand,
    },

    /// Manage groups
    Groups {
        #[command(flatten)]
        scope: StoreScope,
        #[command(subcommand)]
        command: CrudCommand,
    },

    /// Manage organizations
    Orgs {
        #[command(flatten)]
        scope: StoreScope,
        #[command(subcommand)]
        command: DiffableCommand,
    },

    /// Manage stores
    Stores {
        #[command(subcommand)]
        command: DiffableCommand,
    },

    /// Manage products
    Products {
        #[command(flatten)]
        scope: StoreScope,
        #[command(subcommand)]
        command: CrudCommand,
    },

    /// Manage OAuth clients (client-operations credentials)
    Clients {
        #[command(subcommand)]
        command: CrudCommand,
    },

    /// View or replay command history
    History(HistoryArgs),

    /// Print a shell completion script
    Completion {
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

impl Command {
    /// Commands that are not recorded to history.
    pub const fn is_meta(&self) -> bool {
        matches!(self, Self::History(_) | Self::Completion { .. })
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Set the current region/environment and optionally a default store
    #[command(after_help = "EXAMPLES:\n    ciam config use us-qa\n    ciam config use --region uk --env uat --si store-42")]
    Use {
        /// Shorthand `region-env`, e.g. `us-qa`
        #[arg(value_name = "REGION-ENV")]
        shorthand: Option<Target>,

        /// Region (us, uk, can, anz)
        #[arg(long)]
        region: Option<Region>,

        /// Environment (dev, qa, uat, prod)
        #[arg(long)]
        env: Option<Environment>,

        /// Default store id
        #[arg(long = "store-id", alias = "si", value_name = "STORE_ID")]
        store_id: Option<String>,
    },

    /// Show the current configuration
    Get,

    /// List valid regions and environments with the current configuration
    List,
}

#[derive(Debug, Subcommand)]
pub enum TokensCommand {
    /// Print both tokens and their client credentials unmasked
    View,
}

/// Store scope for resources that send the store header.
#[derive(Debug, Clone, Default, Args)]
pub struct StoreScope {
    /// Store id (defaults to the configured store)
    #[arg(long = "store-id", alias = "si", value_name = "STORE_ID", global = true)]
    pub store_id: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum CrudCommand {
    /// List all items
    List,

    /// Fetch one or more items by id
    Get {
        #[arg(value_name = "ID", required = true)]
        ids: Vec<String>,

        /// Maximum requests in flight
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
        concurrency: u16,
    },

    /// Create an item from a JSON document
    Create {
        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Replace an item with a JSON document
    Update {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Delete an item
    Delete {
        #[arg(value_name = "ID")]
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    #[command(flatten)]
    Crud(CrudCommand),

    /// Create users from `{"type":"users","users":[...]}` files
    Import {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Validate the files without creating anything
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum DiffableCommand {
    #[command(flatten)]
    Crud(CrudCommand),

    /// Show the top-level fields a document would change
    Diff {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },

    /// Send only the changed fields (PATCH); nothing is sent when unchanged
    Apply {
        #[arg(value_name = "ID")]
        id: String,

        #[arg(short, long, value_name = "FILE")]
        file: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Number of entries to show (max 100)
    #[arg(short = 'n', long = "number", default_value_t = 10)]
    pub number: usize,

    /// Re-run the entry with this index (0 is the most recent)
    #[arg(short, long, value_name = "INDEX")]
    pub replay: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Powershell,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn store_id_alias_after_subcommand() {
        let cli = Cli::try_parse_from(["ciam", "users", "get", "u-1", "u-2", "--si", "store-9"]).unwrap();
        match cli.command {
            Command::Users { scope, command: UsersCommand::Crud(CrudCommand::Get { ids, concurrency }) } => {
                assert_eq!(scope.store_id.as_deref(), Some("store-9"));
                assert_eq!(ids, vec!["u-1", "u-2"]);
                assert_eq!(concurrency, 1);
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn config_use_accepts_shorthand() {
        let cli = Cli::try_parse_from(["ciam", "config", "use", "us-qa"]).unwrap();
        match cli.command {
            Command::Config { command: ConfigCommand::Use { shorthand, .. } } => {
                assert_eq!(shorthand, Some(Target::new(Region::Us, Environment::Qa)));
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_region() {
        let err = Cli::try_parse_from(["ciam", "config", "use", "--region", "mars"]).unwrap_err();
        assert!(err.to_string().contains("us, uk, can, anz"));
    }

    #[test]
    fn stores_have_no_store_scope() {
        assert!(Cli::try_parse_from(["ciam", "stores", "list", "--si", "s-1"]).is_err());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        assert!(Cli::try_parse_from(["ciam", "groups", "get", "g-1", "--concurrency", "0"]).is_err());
    }
}
