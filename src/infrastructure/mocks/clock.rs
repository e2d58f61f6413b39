//! Hand-driven clock.

use crate::application::ports::Clock;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Clock that only moves when a test tells it to.
///
/// Clones share the same reading, so a test can keep one handle and give another
/// to the facade.
///
/// # Examples
///
/// ```
/// use throttled_log::infrastructure::mocks::MockClock;
/// use throttled_log::application::ports::Clock;
/// use std::time::Duration;
///
/// let clock = MockClock::new();
/// let start = clock.start();
///
/// clock.advance_secs(4.999);
/// assert!(clock.now() < start + Duration::from_secs(5));
///
/// clock.advance(Duration::from_millis(1));
/// assert_eq!(clock.now(), start + Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    start: Instant,
    reading: Arc<Mutex<Instant>>,
}

impl MockClock {
    /// Create a clock frozen at the current instant.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a clock frozen at `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            reading: Arc::new(Mutex::new(start)),
        }
    }

    /// Instant the clock was created at.
    pub fn start(&self) -> Instant {
        self.start
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut reading = self.reading.lock().unwrap_or_else(PoisonError::into_inner);
        *reading += by;
    }

    /// Move the clock forward by fractional seconds.
    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }

    /// Jump to an absolute instant.
    pub fn set(&self, instant: Instant) {
        *self.reading.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }

    /// Time elapsed since `start`.
    pub fn elapsed(&self) -> Duration {
        self.now().saturating_duration_since(self.start)
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        *self.reading.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_frozen_until_advanced() {
        let clock = MockClock::new();
        assert_eq!(clock.now(), clock.start());
        assert_eq!(clock.now(), clock.start());

        clock.advance(Duration::from_secs(3));
        assert_eq!(clock.elapsed(), Duration::from_secs(3));
    }

    #[test]
    fn test_set_jumps() {
        let clock = MockClock::new();
        let target = clock.start() + Duration::from_secs(60);
        clock.set(target);
        assert_eq!(clock.now(), target);
    }

    #[test]
    fn test_clones_share_reading() {
        let clock = MockClock::new();
        let handle = clock.clone();

        thread::spawn(move || handle.advance_secs(2.5))
            .join()
            .unwrap();

        assert_eq!(clock.elapsed(), Duration::from_millis(2500));
    }
}
