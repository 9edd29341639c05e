//! Shared test helpers for `ciam-core` integration tests.
//!
//! In-memory implementations of the auth ports with call counters, so
//! tests can assert how many token exchanges actually happened.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use ciam_core::auth::{CredentialSource, TokenExchanger};
use ciam_domain::{
    AuthFailure, CacheKey, CiamError, Credential, CredentialClass, Result, Target, Token,
};

/// Credential source that always succeeds and counts lookups.
#[derive(Default)]
pub struct CountingCredentials {
    pub resolves: AtomicUsize,
}

impl CredentialSource for CountingCredentials {
    fn resolve(&self, target: Target, class: CredentialClass) -> Result<Credential> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        Ok(Credential::new(target, class, "test-id", "test-secret"))
    }
}

/// Exchanger that sleeps before answering, to widen race windows.
pub struct SlowExchanger {
    pub calls: AtomicUsize,
    pub delay: Duration,
    pub fail: bool,
}

impl SlowExchanger {
    pub fn new(delay: Duration) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), delay, fail: false })
    }

    pub fn failing(delay: Duration) -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), delay, fail: true })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenExchanger for SlowExchanger {
    async fn acquire(&self, credential: &Credential) -> Result<Token> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        if self.fail {
            return Err(CiamError::Auth(AuthFailure {
                class: credential.class(),
                status: Some(401),
                message: "rejected".into(),
                body_excerpt: None,
            }));
        }
        Ok(Token::new(
            format!("token-{n}"),
            Some("Bearer".into()),
            Utc::now() + chrono::Duration::hours(1),
            CacheKey::new(credential.target(), credential.class()),
        ))
    }
}
