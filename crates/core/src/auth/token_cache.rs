//! Process-lifetime token cache with single-flight refresh.
//!
//! One slot per [`CacheKey`]. Each slot is guarded by an async mutex held
//! across the acquisition, so concurrent callers for the same key wait for
//! the in-flight refresh and then read its result instead of calling the
//! token endpoint themselves. Different keys never block each other.

use std::sync::Arc;

use chrono::Duration;
use ciam_domain::{safety_margin, AuthFailure, CacheKey, CiamError, Result, Token};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::ports::{CredentialSource, TokenExchanger};
use crate::time::Clock;

type Slot = Arc<Mutex<Option<Token>>>;

/// Expiry-aware token cache.
///
/// A token is handed out only while it has at least the safety margin of
/// lifetime left; otherwise the cache resolves the credential, calls the
/// exchanger and replaces the slot.
pub struct TokenCache {
    credentials: Arc<dyn CredentialSource>,
    exchanger: Arc<dyn TokenExchanger>,
    clock: Arc<dyn Clock>,
    margin: Duration,
    slots: DashMap<CacheKey, Slot>,
}

impl TokenCache {
    /// Create a cache using the standard safety margin.
    pub fn new(
        credentials: Arc<dyn CredentialSource>,
        exchanger: Arc<dyn TokenExchanger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { credentials, exchanger, clock, margin: safety_margin(), slots: DashMap::new() }
    }

    /// Override the minimum remaining lifetime.
    #[must_use]
    pub const fn with_margin(mut self, margin: Duration) -> Self {
        self.margin = margin;
        self
    }

    pub const fn margin(&self) -> Duration {
        self.margin
    }

    /// Return a usable token for `key`, acquiring one if needed.
    ///
    /// # Errors
    ///
    /// Propagates `MissingCredential` from the credential source and `Auth`
    /// from the exchanger. A failed refresh leaves the previous entry in
    /// place (it is still unusable and will be retried on the next call).
    pub async fn get_or_refresh(&self, key: CacheKey) -> Result<Token> {
        let slot = self.slot(key);
        let mut entry = slot.lock().await;

        if let Some(token) = entry.as_ref().filter(|t| t.is_usable_at(self.clock.now(), self.margin)) {
            debug!(key = %key, "token cache hit");
            return Ok(token.clone());
        }

        let token = self.acquire(key).await?;
        *entry = Some(token.clone());
        Ok(token)
    }

    /// Replace a token the resource server rejected.
    ///
    /// Bypasses the validity short-circuit for `rejected`. If another task
    /// already swapped in a different usable token, that one is returned
    /// without a second exchange.
    ///
    /// # Errors
    ///
    /// Same as [`get_or_refresh`](Self::get_or_refresh).
    pub async fn refresh_rejected(&self, key: CacheKey, rejected: &Token) -> Result<Token> {
        let slot = self.slot(key);
        let mut entry = slot.lock().await;

        if let Some(current) = entry.as_ref().filter(|t| {
            t.access_token() != rejected.access_token() && t.is_usable_at(self.clock.now(), self.margin)
        }) {
            debug!(key = %key, "rejected token already replaced");
            return Ok(current.clone());
        }

        *entry = None;
        let token = self.acquire(key).await?;
        *entry = Some(token.clone());
        Ok(token)
    }

    /// Current entry for `key`, usable or not. Never acquires.
    pub async fn peek(&self, key: CacheKey) -> Option<Token> {
        let slot = self.slots.get(&key).map(|s| Arc::clone(s.value()))?;
        let entry = slot.lock().await;
        entry.clone()
    }

    /// Drop every cached token.
    pub fn clear(&self) {
        self.slots.clear();
    }

    fn slot(&self, key: CacheKey) -> Slot {
        Arc::clone(self.slots.entry(key).or_default().value())
    }

    async fn acquire(&self, key: CacheKey) -> Result<Token> {
        let credential = self.credentials.resolve(key.target, key.class)?;
        let token = self.exchanger.acquire(&credential).await?;

        let remaining = token.remaining(self.clock.now());
        if remaining < self.margin {
            return Err(CiamError::Auth(AuthFailure {
                class: key.class,
                status: None,
                message: format!(
                    "issued token expires in {}s, inside the {}s safety margin",
                    remaining.num_seconds(),
                    self.margin.num_seconds()
                ),
                body_excerpt: None,
            }));
        }

        info!(key = %key, expires_in_secs = remaining.num_seconds(), "token acquired");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use ciam_domain::{Credential, CredentialClass, Environment, Region, Target};

    use super::*;
    use crate::time::MockClock;

    struct StaticCredentials;

    impl CredentialSource for StaticCredentials {
        fn resolve(&self, target: Target, class: CredentialClass) -> Result<Credential> {
            Ok(Credential::new(target, class, "id", "secret"))
        }
    }

    struct CountingExchanger {
        calls: AtomicUsize,
        lifetime: Duration,
        clock: MockClock,
    }

    #[async_trait]
    impl TokenExchanger for CountingExchanger {
        async fn acquire(&self, credential: &Credential) -> Result<Token> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Token::new(
                format!("token-{n}"),
                None,
                self.clock.now() + self.lifetime,
                CacheKey::new(credential.target(), credential.class()),
            ))
        }
    }

    fn cache(lifetime: Duration) -> (TokenCache, Arc<CountingExchanger>, MockClock) {
        let clock = MockClock::new();
        let exchanger =
            Arc::new(CountingExchanger { calls: AtomicUsize::new(0), lifetime, clock: clock.clone() });
        let cache = TokenCache::new(
            Arc::new(StaticCredentials),
            Arc::clone(&exchanger) as Arc<dyn TokenExchanger>,
            Arc::new(clock.clone()),
        );
        (cache, exchanger, clock)
    }

    fn key() -> CacheKey {
        CacheKey::new(Target::new(Region::Us, Environment::Qa), CredentialClass::General)
    }

    #[tokio::test]
    async fn reuses_token_outside_margin() {
        let (cache, exchanger, clock) = cache(Duration::hours(1));
        for _ in 0..5 {
            let token = cache.get_or_refresh(key()).await.unwrap();
            assert_eq!(token.access_token(), "token-1");
            clock.advance(Duration::minutes(5));
        }
        assert_eq!(exchanger.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn refreshes_once_inside_margin() {
        let (cache, exchanger, clock) = cache(Duration::minutes(10));
        cache.get_or_refresh(key()).await.unwrap();
        clock.advance(Duration::minutes(5) + Duration::seconds(1));

        let token = cache.get_or_refresh(key()).await.unwrap();
        assert_eq!(token.access_token(), "token-2");
        assert_eq!(cache.peek(key()).await.unwrap().access_token(), "token-2");
        assert_eq!(exchanger.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn rejects_tokens_shorter_than_margin() {
        let (cache, _exchanger, _clock) = cache(Duration::minutes(2));
        let err = cache.get_or_refresh(key()).await.unwrap_err();
        assert!(matches!(err, CiamError::Auth(_)));
        assert!(cache.peek(key()).await.is_none());
    }

    #[tokio::test]
    async fn refresh_rejected_forces_new_token() {
        let (cache, exchanger, _clock) = cache(Duration::hours(1));
        let first = cache.get_or_refresh(key()).await.unwrap();
        let second = cache.refresh_rejected(key(), &first).await.unwrap();
        assert_ne!(first.access_token(), second.access_token());

        // A stale rejection of the first token does not trigger a third exchange.
        let again = cache.refresh_rejected(key(), &first).await.unwrap();
        assert_eq!(again.access_token(), second.access_token());
        assert_eq!(exchanger.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let (cache, exchanger, _clock) = cache(Duration::hours(1));
        let clientops = CacheKey::new(key().target, CredentialClass::ClientOps);
        cache.get_or_refresh(key()).await.unwrap();
        cache.get_or_refresh(clientops).await.unwrap();
        assert_eq!(exchanger.calls.load(Ordering::SeqCst), 2);

        cache.clear();
        assert!(cache.peek(key()).await.is_none());
    }
}
