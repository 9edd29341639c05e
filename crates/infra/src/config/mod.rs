//! Configuration loading and management
//!
//! This module provides utilities for loading the CLI configuration file,
//! runtime settings from environment variables, and the endpoint tables.

pub mod endpoints;
pub mod loader;
pub mod settings;

// Re-export commonly used items
pub use endpoints::Endpoints;
pub use loader::{home_dir, load_dotenv, ConfigStore};
pub use settings::RuntimeSettings;

/// Environment lookup, injectable so tests never mutate process state.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Lookup backed by the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
