//! The unmasked token view.
//!
//! This is the only place secrets are handed out in clear text. Nothing it
//! returns is routed through the audit recorder.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ciam_domain::{CacheKey, CredentialClass, Result, Target};

use crate::auth::{CredentialSource, TokenCache};
use crate::time::Clock;

/// Clear-text token and credential details for one class.
#[derive(Clone, PartialEq, Eq)]
pub struct UnmaskedToken {
    pub target: Target,
    pub class: CredentialClass,
    pub access_token: String,
    pub token_type: Option<String>,
    pub client_id: String,
    pub client_secret: String,
    pub expires_at: DateTime<Utc>,
    pub seconds_remaining: i64,
    /// Whether the token was already cached with enough lifetime left.
    pub from_cache: bool,
}

/// Reveals cached (or freshly acquired) tokens for an explicit operator request.
pub struct UnmaskedTokenView {
    cache: Arc<TokenCache>,
    credentials: Arc<dyn CredentialSource>,
    clock: Arc<dyn Clock>,
}

impl UnmaskedTokenView {
    pub fn new(
        cache: Arc<TokenCache>,
        credentials: Arc<dyn CredentialSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { cache, credentials, clock }
    }

    /// Token and credential for one class, acquiring through the cache.
    ///
    /// # Errors
    ///
    /// Missing credentials or a rejected token exchange.
    pub async fn reveal(&self, target: Target, class: CredentialClass) -> Result<UnmaskedToken> {
        let credential = self.credentials.resolve(target, class)?;
        let key = CacheKey::new(target, class);
        let cached = self
            .cache
            .peek(key)
            .await
            .filter(|t| t.is_usable_at(self.clock.now(), self.cache.margin()));
        let token = self.cache.get_or_refresh(key).await?;
        let from_cache = cached.is_some_and(|c| c.access_token() == token.access_token());
        Ok(UnmaskedToken {
            target,
            class,
            access_token: token.access_token().to_string(),
            token_type: token.token_type().map(str::to_string),
            client_id: credential.client_id().to_string(),
            client_secret: credential.client_secret().to_string(),
            expires_at: token.expires_at(),
            seconds_remaining: token.remaining(self.clock.now()).num_seconds(),
            from_cache,
        })
    }

    /// Every credential class in turn. One class failing does not stop the
    /// next.
    pub async fn reveal_all(&self, target: Target) -> Vec<(CredentialClass, Result<UnmaskedToken>)> {
        let mut rows = Vec::with_capacity(CredentialClass::ALL.len());
        for &class in CredentialClass::ALL {
            rows.push((class, self.reveal(target, class).await));
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Duration;
    use ciam_domain::{CiamError, Credential, Environment, Region, Token};

    use super::*;
    use crate::auth::TokenExchanger;
    use crate::time::MockClock;

    struct GeneralOnly;

    impl CredentialSource for GeneralOnly {
        fn resolve(&self, target: Target, class: CredentialClass) -> Result<Credential> {
            match class {
                CredentialClass::General => Ok(Credential::new(target, class, "gen-id", "gen-secret")),
                CredentialClass::ClientOps => Err(CiamError::MissingCredential {
                    target: target.to_string(),
                    class,
                    missing: vec![class.env_keys(&target).client_id],
                }),
            }
        }
    }

    struct FixedExchanger(MockClock);

    #[async_trait]
    impl TokenExchanger for FixedExchanger {
        async fn acquire(&self, credential: &Credential) -> Result<Token> {
            Ok(Token::new(
                "visible-token",
                Some("Bearer".into()),
                self.0.now() + Duration::hours(1),
                CacheKey::new(credential.target(), credential.class()),
            ))
        }
    }

    #[tokio::test]
    async fn reveals_secrets_and_continues_past_failures() {
        let clock = MockClock::new();
        let credentials: Arc<dyn CredentialSource> = Arc::new(GeneralOnly);
        let cache = Arc::new(TokenCache::new(
            Arc::clone(&credentials),
            Arc::new(FixedExchanger(clock.clone())),
            Arc::new(clock.clone()),
        ));
        let view = UnmaskedTokenView::new(cache, credentials, Arc::new(clock));

        let rows = view.reveal_all(Target::new(Region::Us, Environment::Dev)).await;
        assert_eq!(rows.len(), 2);

        let general = rows[0].1.as_ref().unwrap();
        assert_eq!(general.access_token, "visible-token");
        assert_eq!(general.client_secret, "gen-secret");
        assert_eq!(general.seconds_remaining, 3600);
        assert!(!general.from_cache);

        assert!(matches!(rows[1].1, Err(CiamError::MissingCredential { .. })));
    }

    #[tokio::test]
    async fn second_reveal_reuses_cached_token() {
        let clock = MockClock::new();
        let credentials: Arc<dyn CredentialSource> = Arc::new(GeneralOnly);
        let cache = Arc::new(TokenCache::new(
            Arc::clone(&credentials),
            Arc::new(FixedExchanger(clock.clone())),
            Arc::new(clock.clone()),
        ));
        let view = UnmaskedTokenView::new(cache, credentials, Arc::new(clock));
        let target = Target::new(Region::Us, Environment::Dev);

        let first = view.reveal(target, CredentialClass::General).await.unwrap();
        let second = view.reveal(target, CredentialClass::General).await.unwrap();
        assert!(!first.from_cache);
        assert!(second.from_cache);
    }
}
