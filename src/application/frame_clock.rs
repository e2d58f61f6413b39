//! Shared frame tick counter.
//!
//! One driver (usually the host's per-frame update hook) advances the counter; every
//! subsystem's frame-mode decisions read it. The counter is a single atomic, so reads
//! never block and never observe a torn value.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Monotonic frame counter.
///
/// # Example
/// ```
/// use throttled_log::FrameClock;
///
/// let clock = FrameClock::new();
/// clock.advance();
/// clock.advance();
/// assert_eq!(clock.current(), 2);
/// ```
#[derive(Debug, Default)]
pub struct FrameClock {
    frame: AtomicU64,
}

impl FrameClock {
    /// Create a counter starting at frame 0.
    pub fn new() -> Self {
        Self {
            frame: AtomicU64::new(0),
        }
    }

    /// The process-wide counter.
    ///
    /// Facades built without an explicit frame clock share this instance.
    pub fn shared() -> Arc<FrameClock> {
        static SHARED: OnceLock<Arc<FrameClock>> = OnceLock::new();
        Arc::clone(SHARED.get_or_init(|| Arc::new(FrameClock::new())))
    }

    /// Advance by exactly one frame and return the new frame number.
    pub fn advance(&self) -> u64 {
        self.frame.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Latest frame number.
    pub fn current(&self) -> u64 {
        self.frame.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(FrameClock::new().current(), 0);
    }

    #[test]
    fn test_advance_returns_new_frame() {
        let clock = FrameClock::new();
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.current(), 2);
    }

    #[test]
    fn test_shared_is_single_instance() {
        let a = FrameClock::shared();
        let b = FrameClock::shared();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_concurrent_advance() {
        let clock = Arc::new(FrameClock::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let clock = Arc::clone(&clock);
            handles.push(thread::spawn(move || {
                for _ in 0..1_000 {
                    clock.advance();
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(clock.current(), 8_000);
    }

    #[test]
    fn test_readers_see_monotonic_values() {
        let clock = Arc::new(FrameClock::new());
        let driver = {
            let clock = Arc::clone(&clock);
            thread::spawn(move || {
                for _ in 0..10_000 {
                    clock.advance();
                }
            })
        };

        let mut last = 0;
        for _ in 0..10_000 {
            let now = clock.current();
            assert!(now >= last);
            last = now;
        }

        driver.join().unwrap();
        assert_eq!(clock.current(), 10_000);
    }
}
