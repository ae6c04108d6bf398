//! Time abstraction for testability
//!
//! Provides a trait-based approach to wall-clock reads so that expiry checks
//! and relative date resolution can be tested deterministically.
//!
//! # Examples
//!
//! ```
//! use chrono::Duration;
//!
//! use intentrelay_common::time::{Clock, MockClock};
//!
//! let mock = MockClock::from_millis(1_700_000_000_000);
//! let start = mock.millis_since_epoch();
//! mock.advance(Duration::seconds(5));
//! assert_eq!(mock.millis_since_epoch() - start, 5_000);
//! ```

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Trait for wall-clock reads
pub trait Clock: Send + Sync {
    /// Current UTC time
    fn now(&self) -> DateTime<Utc>;

    /// Milliseconds since the UNIX epoch
    fn millis_since_epoch(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Real system clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for tests
///
/// Clones share the same underlying instant, so a clone handed to a service
/// can be advanced from the test body.
#[derive(Debug, Clone)]
pub struct MockClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a mock clock frozen at the given instant
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { current: Arc::new(Mutex::new(instant)) }
    }

    /// Create a mock clock frozen at the given epoch milliseconds
    #[must_use]
    pub fn from_millis(millis: i64) -> Self {
        let instant = Utc.timestamp_millis_opt(millis).single().unwrap_or_else(Utc::now);
        Self::at(instant)
    }

    /// Move the clock forward (or backward for negative durations)
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *current += by;
    }

    /// Jump to a specific instant
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut current = self.current.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *current = instant;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
