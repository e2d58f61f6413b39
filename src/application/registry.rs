//! Central registry for per-subsystem throttle state.
//!
//! The registry owns, for every subsystem, its timing policy and the emission history
//! of every throttle key seen so far. Both live in a single storage entry so one lock
//! covers the whole decision: lookup-or-create, compare and update.

use crate::application::frame_clock::FrameClock;
use crate::application::ports::{Clock, Storage};
use crate::domain::{
    key::ThrottleKey,
    level::Level,
    subsystem::Subsystem,
    timing::{ThrottleDecision, ThrottleState, TimingPolicy, TimingUpdate},
};
use ahash::RandomState;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// State tracked for each subsystem.
#[derive(Debug)]
pub struct SubsystemThrottle {
    /// Timing policy for this subsystem
    pub timing: TimingPolicy,
    states: HashMap<ThrottleKey, ThrottleState, RandomState>,
}

impl SubsystemThrottle {
    /// Create empty state with a timing policy.
    pub fn new(timing: TimingPolicy) -> Self {
        Self {
            timing,
            states: HashMap::with_hasher(RandomState::new()),
        }
    }

    /// Decide one occurrence of `key`.
    ///
    /// The first occurrence of a key is always allowed and records its timestamps.
    /// Later occurrences are judged by the current timing mode, read now rather than
    /// when the key was first seen.
    pub fn decide(&mut self, key: ThrottleKey, now: Instant, frame: u64) -> ThrottleDecision {
        match self.states.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(ThrottleState::first_emission(now, frame));
                ThrottleDecision::Allow
            }
            Entry::Occupied(mut entry) => entry.get_mut().register_repeat(&self.timing, now, frame),
        }
    }

    /// Number of keys with history.
    pub fn tracked_keys(&self) -> usize {
        self.states.len()
    }

    /// Forget all history. The timing policy is kept.
    pub fn reset(&mut self) {
        self.states.clear();
    }
}

/// Registry managing throttle state for all subsystems.
///
/// Uses the Storage port for concurrent access. Each subsystem's entry is locked for
/// the whole of a decision, so two callers racing on a brand-new key cannot both be
/// allowed.
///
/// This type is generic over the storage implementation. The log facade uses
/// `Arc<ShardedStorage>`.
#[derive(Clone)]
pub struct ThrottleRegistry<S>
where
    S: Storage<Subsystem, SubsystemThrottle> + Clone,
{
    storage: S,
    clock: Arc<dyn Clock>,
    frames: Arc<FrameClock>,
    default_timing: TimingPolicy,
}

impl<S> ThrottleRegistry<S>
where
    S: Storage<Subsystem, SubsystemThrottle> + Clone,
{
    /// Create a new registry.
    ///
    /// Subsystems seen for the first time start with `default_timing`.
    pub fn new(
        storage: S,
        clock: Arc<dyn Clock>,
        frames: Arc<FrameClock>,
        default_timing: TimingPolicy,
    ) -> Self {
        Self {
            storage,
            clock,
            frames,
            default_timing,
        }
    }

    /// Decide whether a throttled message may be emitted, updating its history.
    ///
    /// # Arguments
    /// * `subsystem` - Owner of the throttle history
    /// * `level` - Severity, part of the key
    /// * `scope` - Optional scope label, part of the key
    /// * `message` - Message text, part of the key unless `dedupe_key` is given
    /// * `dedupe_key` - Optional explicit key used in place of `message`
    pub fn should_log(
        &self,
        subsystem: &Subsystem,
        level: Level,
        scope: Option<&str>,
        message: &str,
        dedupe_key: Option<&str>,
    ) -> bool {
        self.check(subsystem, ThrottleKey::new(level, scope, message, dedupe_key))
            .is_allow()
    }

    /// Decide one occurrence of an already composed key.
    pub fn check(&self, subsystem: &Subsystem, key: ThrottleKey) -> ThrottleDecision {
        let default_timing = self.default_timing;
        self.storage.with_entry_mut(
            subsystem.clone(),
            || SubsystemThrottle::new(default_timing),
            |state| {
                // Sampled under the lock so a decision never uses a frame older than
                // the one a concurrent caller just recorded.
                let now = self.clock.now();
                let frame = self.frames.current();
                state.decide(key, now, frame)
            },
        )
    }

    /// Apply a partial timing update and return the resulting policy.
    ///
    /// Existing history is kept; only future decisions use the new thresholds.
    pub fn configure(&self, subsystem: &Subsystem, update: TimingUpdate) -> TimingPolicy {
        let default_timing = self.default_timing;
        self.storage.with_entry_mut(
            subsystem.clone(),
            || SubsystemThrottle::new(default_timing),
            |state| {
                state.timing.apply(update);
                state.timing
            },
        )
    }

    /// Current timing policy of a subsystem.
    pub fn timing(&self, subsystem: &Subsystem) -> TimingPolicy {
        self.storage
            .with_existing_mut(subsystem, |state| state.timing)
            .unwrap_or(self.default_timing)
    }

    /// Clear all throttle history of a subsystem.
    ///
    /// The subsystem's timing policy is untouched. Unknown subsystems are ignored.
    pub fn reset(&self, subsystem: &Subsystem) {
        self.storage.with_existing_mut(subsystem, SubsystemThrottle::reset);
    }

    /// Number of keys with history in a subsystem.
    pub fn tracked_keys(&self, subsystem: &Subsystem) -> usize {
        self.storage
            .with_existing_mut(subsystem, |state| state.tracked_keys())
            .unwrap_or(0)
    }

    /// Number of subsystems seen so far.
    pub fn subsystem_count(&self) -> usize {
        self.storage.len()
    }

    /// Timing policy given to new subsystems.
    pub fn default_timing(&self) -> TimingPolicy {
        self.default_timing
    }

    /// The frame clock decisions read from.
    pub fn frame_clock(&self) -> &Arc<FrameClock> {
        &self.frames
    }
}
