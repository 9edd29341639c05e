//! Credential resolution and token lifecycle
//!
//! This module provides the ports implemented by infrastructure
//! (credential source, token exchanger) and the [`TokenCache`] that sits
//! between them and the request pipeline.

pub mod ports;
pub mod token_cache;

pub use ports::{CredentialSource, TokenExchanger};
pub use token_cache::TokenCache;
