//! Time abstraction for testability
//!
//! Token expiry is wall-clock based, so the cache and broker read time
//! through [`Clock`]. Production uses [`SystemClock`]; tests use
//! `MockClock` (enabled with `cfg(test)` or the `test-utils` feature) to
//! step across the safety margin without sleeping.
//!
//! ```
//! use ciam_core::time::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let before = clock.now();
//! assert!(clock.now() >= before);
//! ```

use chrono::{DateTime, Utc};

/// Source of wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockClock;

#[cfg(any(test, feature = "test-utils"))]
mod mock {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, Utc};
    use parking_lot::Mutex;

    use super::Clock;

    /// Manually driven clock. Clones share the same instant.
    #[derive(Debug, Clone)]
    pub struct MockClock {
        now: Arc<Mutex<DateTime<Utc>>>,
    }

    impl MockClock {
        /// A clock frozen at the current real time.
        pub fn new() -> Self {
            Self::at(Utc::now())
        }

        pub fn at(instant: DateTime<Utc>) -> Self {
            Self { now: Arc::new(Mutex::new(instant)) }
        }

        /// Move time forward without waiting.
        pub fn advance(&self, by: Duration) {
            let mut now = self.now.lock();
            *now += by;
        }

        pub fn set(&self, instant: DateTime<Utc>) {
            *self.now.lock() = instant;
        }
    }

    impl Default for MockClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Clock for MockClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock()
        }
    }
}
