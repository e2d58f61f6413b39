//! Timing policies and per-key throttle state.
//!
//! A [`TimingPolicy`] says how far apart two emissions of the same message must be,
//! measured either in wall-clock seconds or in frame ticks. A [`ThrottleState`] remembers
//! when its key was last emitted and applies the policy to each new occurrence.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Smallest accepted wall-clock interval in seconds.
pub const MIN_WALL_INTERVAL_SECS: f64 = 0.01;

/// Smallest accepted frame interval.
pub const MIN_FRAME_INTERVAL: u64 = 1;

/// Default wall-clock interval in seconds.
pub const DEFAULT_WALL_INTERVAL_SECS: f64 = 5.0;

/// Default frame interval.
pub const DEFAULT_FRAME_INTERVAL: u64 = 300;

/// How repeat intervals are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimingMode {
    /// Seconds of monotonic wall time
    #[default]
    WallClock,
    /// Ticks of the shared frame clock
    Frame,
}

/// Decision made for one throttled occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Emit the message
    Allow,
    /// Drop the message
    Suppress,
}

impl ThrottleDecision {
    /// Check if this decision is Allow.
    pub fn is_allow(&self) -> bool {
        matches!(self, ThrottleDecision::Allow)
    }

    /// Check if this decision is Suppress.
    pub fn is_suppress(&self) -> bool {
        matches!(self, ThrottleDecision::Suppress)
    }
}

/// Per-subsystem timing configuration.
///
/// Intervals are clamped on every write: wall intervals to at least
/// [`MIN_WALL_INTERVAL_SECS`], frame intervals to at least [`MIN_FRAME_INTERVAL`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTimingPolicy")]
pub struct TimingPolicy {
    mode: TimingMode,
    wall_interval_secs: f64,
    frame_interval: u64,
}

impl TimingPolicy {
    /// Create a policy, clamping both intervals.
    pub fn new(mode: TimingMode, wall_interval_secs: f64, frame_interval: u64) -> Self {
        Self {
            mode,
            wall_interval_secs: clamp_wall(wall_interval_secs),
            frame_interval: frame_interval.max(MIN_FRAME_INTERVAL),
        }
    }

    /// Wall-clock policy with the given interval.
    pub fn wall_clock(interval_secs: f64) -> Self {
        Self::new(TimingMode::WallClock, interval_secs, DEFAULT_FRAME_INTERVAL)
    }

    /// Frame policy with the given interval.
    pub fn frames(interval: u64) -> Self {
        Self::new(TimingMode::Frame, DEFAULT_WALL_INTERVAL_SECS, interval)
    }

    /// Active timing mode.
    pub fn mode(&self) -> TimingMode {
        self.mode
    }

    /// Effective wall-clock interval in seconds.
    pub fn wall_interval_secs(&self) -> f64 {
        self.wall_interval_secs
    }

    /// Effective frame interval.
    pub fn frame_interval(&self) -> u64 {
        self.frame_interval
    }

    /// Apply a partial update. Omitted fields keep their current value.
    pub fn apply(&mut self, update: TimingUpdate) {
        if let Some(mode) = update.mode {
            self.mode = mode;
        }
        if let Some(secs) = update.wall_interval_secs {
            self.wall_interval_secs = clamp_wall(secs);
        }
        if let Some(frames) = update.frame_interval {
            self.frame_interval = frames.max(MIN_FRAME_INTERVAL);
        }
    }
}

impl Default for TimingPolicy {
    fn default() -> Self {
        Self {
            mode: TimingMode::WallClock,
            wall_interval_secs: DEFAULT_WALL_INTERVAL_SECS,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }
}

// Deserialized policies go through the same clamping as `new`
#[derive(Deserialize)]
#[serde(default)]
struct RawTimingPolicy {
    mode: TimingMode,
    wall_interval_secs: f64,
    frame_interval: u64,
}

impl Default for RawTimingPolicy {
    fn default() -> Self {
        Self {
            mode: TimingMode::WallClock,
            wall_interval_secs: DEFAULT_WALL_INTERVAL_SECS,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }
}

impl From<RawTimingPolicy> for TimingPolicy {
    fn from(raw: RawTimingPolicy) -> Self {
        TimingPolicy::new(raw.mode, raw.wall_interval_secs, raw.frame_interval)
    }
}

// NaN clamps to the minimum as well
fn clamp_wall(secs: f64) -> f64 {
    secs.max(MIN_WALL_INTERVAL_SECS)
}

/// Partial update for a [`TimingPolicy`].
///
/// # Example
/// ```
/// use throttled_log::{TimingMode, TimingPolicy, TimingUpdate};
///
/// let mut policy = TimingPolicy::default();
/// policy.apply(TimingUpdate::new().mode(TimingMode::Frame).frame_interval(0));
///
/// assert_eq!(policy.mode(), TimingMode::Frame);
/// assert_eq!(policy.frame_interval(), 1);
/// assert_eq!(policy.wall_interval_secs(), 5.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TimingUpdate {
    /// New timing mode, if any
    pub mode: Option<TimingMode>,
    /// New wall-clock interval in seconds, if any
    pub wall_interval_secs: Option<f64>,
    /// New frame interval, if any
    pub frame_interval: Option<u64>,
}

impl TimingUpdate {
    /// An update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timing mode.
    pub fn mode(mut self, mode: TimingMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Set the wall-clock interval in seconds.
    pub fn wall_interval_secs(mut self, secs: f64) -> Self {
        self.wall_interval_secs = Some(secs);
        self
    }

    /// Set the frame interval.
    pub fn frame_interval(mut self, frames: u64) -> Self {
        self.frame_interval = Some(frames);
        self
    }
}

/// Emission history for one throttle key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleState {
    last_emitted_at: Instant,
    last_emitted_frame: u64,
}

impl ThrottleState {
    /// State for a key whose first occurrence was just emitted.
    ///
    /// There is no "not yet logged" state: a key only gets state once its first
    /// occurrence has been allowed.
    pub fn first_emission(now: Instant, frame: u64) -> Self {
        Self {
            last_emitted_at: now,
            last_emitted_frame: frame,
        }
    }

    /// When this key was last allowed.
    pub fn last_emitted_at(&self) -> Instant {
        self.last_emitted_at
    }

    /// Frame at which this key was last allowed.
    pub fn last_emitted_frame(&self) -> u64 {
        self.last_emitted_frame
    }

    /// Decide a repeat occurrence under `policy`.
    ///
    /// Thresholds are inclusive: an occurrence exactly one interval after the last
    /// emission is allowed. On allow both timestamps are refreshed.
    pub fn register_repeat(
        &mut self,
        policy: &TimingPolicy,
        now: Instant,
        frame: u64,
    ) -> ThrottleDecision {
        let ready = match policy.mode() {
            TimingMode::Frame => {
                frame.saturating_sub(self.last_emitted_frame) >= policy.frame_interval()
            }
            TimingMode::WallClock => {
                let elapsed = now.saturating_duration_since(self.last_emitted_at);
                elapsed.as_secs_f64() >= policy.wall_interval_secs()
            }
        };

        if !ready {
            return ThrottleDecision::Suppress;
        }

        self.last_emitted_at = now;
        self.last_emitted_frame = frame;
        ThrottleDecision::Allow
    }
}
