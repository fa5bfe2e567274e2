//! Injectable time source.

use std::time::{SystemTime, UNIX_EPOCH};

/// A source of the current Unix time in whole seconds.
///
/// Abstracting the clock keeps expiry math deterministic under test.
pub trait Clock: Send + Sync {
    fn unix_now(&self) -> i64;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs() as i64)
    }
}

/// A clock pinned to a fixed instant, for deterministic tests.
#[derive(Debug)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn unix_now(&self) -> i64 {
        self.0
    }
}
