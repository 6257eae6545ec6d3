//! Time source used to stamp `last_updated`.

use chrono::{DateTime, Utc};

/// Supplies the current time to repositories.
///
/// Injected so tests can pin `last_updated` to a known instant.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
