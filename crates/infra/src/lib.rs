//! # CIAM Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The environment-backed credential store and HTTP token broker
//! - The authenticated request pipeline
//! - The JSONL audit artifact and command history files
//! - Config file, endpoint table and runtime settings loading
//! - Tracing initialisation
//!
//! ## Architecture
//! - Implements traits defined in `ciam-core`
//! - Depends on `ciam-domain` and `ciam-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod audit;
pub mod auth;
pub mod config;
pub mod errors;
pub mod history;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{ApiError, ApiErrorCategory, ApiResponse, RequestPipeline};
pub use audit::JsonlAuditSink;
pub use auth::{EnvCredentialStore, HttpTokenBroker};
pub use config::{ConfigStore, Endpoints, RuntimeSettings};
pub use errors::InfraError;
pub use history::HistoryStore;
pub use http::HttpClient;
