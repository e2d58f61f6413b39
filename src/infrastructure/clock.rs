//! Wall-clock adapter.
//!
//! For deterministic tests use `MockClock` from `crate::infrastructure::mocks`, which is
//! compiled in test builds and with the `test-helpers` feature:
//!
//! ```toml
//! [dev-dependencies]
//! throttled-log = { version = "*", features = ["test-helpers"] }
//! ```

use crate::application::ports::Clock;
use std::time::Instant;

/// Monotonic clock backed by `Instant::now()`.
///
/// Wall-clock throttling measures elapsed time with this clock, so adjusting the
/// system time never opens or closes a throttle window.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
