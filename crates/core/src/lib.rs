//! # CIAM Core
//!
//! Pure business logic layer - no HTTP, no filesystem.
//!
//! This crate contains:
//! - Port interfaces (traits) for credentials, token exchange and audit sinks
//! - The expiry-aware, single-flight token cache
//! - Redaction and audit-entry projection
//! - The unmasked token view
//! - Resource catalogue, batch fan-out and document diffing
//!
//! ## Architecture Principles
//! - Only depends on `ciam-domain`
//! - All external effects via traits implemented in `ciam-infra`
//! - Time is injected through [`time::Clock`] so expiry logic is testable

pub mod audit;
pub mod auth;
pub mod resources;
pub mod time;
pub mod tokens;

// Re-export specific items to avoid ambiguity
pub use audit::ports::AuditSink;
pub use audit::{AuditRecorder, InMemoryAuditSink};
pub use auth::ports::{CredentialSource, TokenExchanger};
pub use auth::TokenCache;
pub use resources::{run_batch, BatchReport, ResourceKind};
pub use time::{Clock, SystemClock};
#[cfg(any(test, feature = "test-utils"))]
pub use time::MockClock;
pub use tokens::UnmaskedTokenView;
