//! Credential store and OAuth2 token broker
//!
//! # Architecture
//!
//! - [`EnvCredentialStore`] implements `CredentialSource` from process
//!   environment variables, validated once at start-up
//! - [`HttpTokenBroker`] implements `TokenExchanger` with one handler per
//!   credential class
//! - Neither retries; the pipeline owns the single 401 re-acquisition

pub mod broker;
pub mod credentials;

pub use broker::HttpTokenBroker;
pub use credentials::EnvCredentialStore;
