//! # CIAM Domain
//!
//! Domain types and models for the CIAM command-line client.
//!
//! This crate contains:
//! - Deployment targets (region, environment) and credential classes
//! - Credential, token, operation and exchange value types
//! - The audit entry shape written to the per-run artifact
//! - Domain error types and Result definitions
//! - Constants shared by every layer
//!
//! ## Architecture
//! - No dependencies on other CIAM crates
//! - No I/O; pure data and validation

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
