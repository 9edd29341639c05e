//! Access tokens and their cache keys

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{REDACTED_PLACEHOLDER, TOKEN_SAFETY_MARGIN_SECS};
use crate::types::credential::CredentialClass;
use crate::types::target::Target;

/// Identity of a cache slot: one live token per (region, environment, class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub target: Target,
    pub class: CredentialClass,
}

impl CacheKey {
    pub const fn new(target: Target, class: CredentialClass) -> Self {
        Self { target, class }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.target, self.class)
    }
}

/// The minimum lifetime a token must have left to be handed to a caller.
pub fn safety_margin() -> Duration {
    Duration::seconds(TOKEN_SAFETY_MARGIN_SECS)
}

/// An OAuth2 bearer token with an absolute expiry.
///
/// Tokens are immutable; refresh replaces the whole value.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    access_token: String,
    token_type: Option<String>,
    expires_at: DateTime<Utc>,
    key: CacheKey,
}

impl Token {
    pub fn new(
        access_token: impl Into<String>,
        token_type: Option<String>,
        expires_at: DateTime<Utc>,
        key: CacheKey,
    ) -> Self {
        Self { access_token: access_token.into(), token_type, expires_at, key }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub const fn key(&self) -> CacheKey {
        self.key
    }

    pub const fn class(&self) -> CredentialClass {
        self.key.class
    }

    pub const fn target(&self) -> Target {
        self.key.target
    }

    /// Lifetime left at `now` (negative once expired).
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at - now
    }

    /// Whether the token may still be handed out at `now`, i.e. it has at
    /// least `margin` of lifetime left.
    pub fn is_usable_at(&self, now: DateTime<Utc>, margin: Duration) -> bool {
        self.remaining(now) >= margin
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &REDACTED_PLACEHOLDER)
            .field("token_type", &self.token_type)
            .field("expires_at", &self.expires_at)
            .field("key", &self.key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::target::{Environment, Region};

    fn token_expiring_at(expires_at: DateTime<Utc>) -> Token {
        Token::new(
            "abc123",
            Some("Bearer".into()),
            expires_at,
            CacheKey::new(Target::new(Region::Us, Environment::Dev), CredentialClass::General),
        )
    }

    #[test]
    fn usable_exactly_at_margin() {
        let now = Utc::now();
        let token = token_expiring_at(now + safety_margin());
        assert!(token.is_usable_at(now, safety_margin()));
        assert!(!token.is_usable_at(now + Duration::seconds(1), safety_margin()));
    }

    #[test]
    fn expired_token_has_negative_remaining() {
        let now = Utc::now();
        let token = token_expiring_at(now - Duration::seconds(30));
        assert!(token.remaining(now) < Duration::zero());
    }

    #[test]
    fn debug_hides_access_token() {
        let token = token_expiring_at(Utc::now());
        assert!(!format!("{token:?}").contains("abc123"));
    }

    #[test]
    fn cache_key_display() {
        let key = CacheKey::new(Target::new(Region::Can, Environment::Qa), CredentialClass::ClientOps);
        assert_eq!(key.to_string(), "can-qa/clientops");
    }
}
