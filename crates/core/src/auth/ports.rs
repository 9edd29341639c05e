//! Port interfaces for credentials and token exchange

use async_trait::async_trait;
use ciam_domain::{Credential, CredentialClass, Result, Target, Token};

/// Resolves client credentials for a (target, class) pair.
pub trait CredentialSource: Send + Sync {
    /// Look up the credential pair.
    ///
    /// # Errors
    ///
    /// Returns `CiamError::MissingCredential` when either value is absent
    /// or blank. Implementations never touch the network.
    fn resolve(&self, target: Target, class: CredentialClass) -> Result<Credential>;
}

/// Performs one OAuth2 client-credentials exchange.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Exchange `credential` for a token with an absolute expiry.
    ///
    /// Implementations do not retry.
    async fn acquire(&self, credential: &Credential) -> Result<Token>;
}
