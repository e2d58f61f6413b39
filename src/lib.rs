//! # throttled-log
//!
//! Leveled logging for hosts made of many subsystems, with per-message repeat
//! suppression measured in wall-clock seconds or in frames.
//!
//! Every subsystem (a mod, a plugin, an engine module) gets its own level flags, its
//! own timing policy and its own throttle history. A message logged through a
//! throttled call is emitted the first time it is seen and then at most once per
//! interval. Frame-driven hosts can throttle by frame count instead of time, so a
//! message fired every frame shows up once every N frames.
//!
//! ## Quick Start
//!
//! ```rust
//! use throttled_log::LogFacade;
//! use std::sync::Arc;
//!
//! let facade = Arc::new(LogFacade::new());
//! let log = facade.logger("Net").expect("valid subsystem id");
//!
//! log.info("connected");
//! log.scoped("Socket").warning("slow handshake");
//!
//! // Emitted once, then suppressed for 5 seconds (the default wall-clock interval)
//! for _ in 0..100 {
//!     log.warning_throttled("packet dropped", None);
//! }
//! ```
//!
//! Lines are formatted as `"{tag} [{scope}] {message}"`, for example
//! `[WARNING] [Socket] slow handshake`, and handed to a [`Sink`]. The default
//! [`TracingSink`] forwards them to `tracing` as `INFO`, `WARN` and `ERROR` events, so
//! install any subscriber to see them.
//!
//! ## Levels
//!
//! | Level | Default | Sink channel |
//! |-------|---------|--------------|
//! | Trace, Debug, Verbose | off | info |
//! | Info | on | info |
//! | Warning | on | warning |
//! | Error, Critical, Exception | always on | error |
//!
//! Switchable levels are persisted through a [`SettingsStore`], one category per
//! subsystem, next to a master switch (`"Enable Logging"`). Error, Critical and
//! Exception cannot be filtered out, not even by the master switch.
//!
//! ```rust
//! # use throttled_log::{Level, LogFacade};
//! # use std::sync::Arc;
//! # let facade = Arc::new(LogFacade::new());
//! let log = facade.logger("Audio").unwrap();
//! log.set_level_enabled(Level::Debug, true).unwrap();
//! assert!(log.is_level_enabled(Level::Debug));
//!
//! log.set_logging_enabled(false).unwrap();
//! assert!(!log.is_level_enabled(Level::Info));
//! assert!(log.is_level_enabled(Level::Error));
//! ```
//!
//! With the `json-settings` feature (on by default) flags can live in a JSON file:
//!
//! ```rust,no_run
//! use throttled_log::{JsonFileSettings, LogFacade};
//! use std::sync::Arc;
//!
//! let settings = JsonFileSettings::open("config/logging.json").unwrap();
//! let facade = Arc::new(
//!     LogFacade::builder()
//!         .with_settings(Arc::new(settings))
//!         .build(),
//! );
//! ```
//!
//! ## Throttling
//!
//! A throttle key is made of the level, the scope and the message text. Pass an
//! explicit dedupe key to group messages whose text varies:
//!
//! ```rust
//! # use throttled_log::LogFacade;
//! # use std::sync::Arc;
//! # let facade = Arc::new(LogFacade::new());
//! # let log = facade.logger("Net").unwrap();
//! for peer in ["10.0.0.1", "10.0.0.2"] {
//!     // Both share one throttle window
//!     log.warning_throttled(&format!("peer {} timed out", peer), Some("peer-timeout"));
//! }
//! ```
//!
//! Timing is configured per subsystem. Intervals below their minimum (0.01 seconds,
//! 1 frame) are clamped rather than rejected.
//!
//! ```rust
//! # use throttled_log::{LogFacade, TimingMode};
//! # use std::sync::Arc;
//! # let facade = Arc::new(LogFacade::new());
//! # let log = facade.logger("Physics").unwrap();
//! log.set_timing_mode(TimingMode::Frame);
//! let timing = log.set_frame_interval(0);
//! assert_eq!(timing.frame_interval(), 1);
//!
//! // Once per frame, from the host's frame hook:
//! facade.advance_frame();
//! ```
//!
//! Changing the mode or an interval affects the next decision for every key. Already
//! recorded emission times are kept. [`Logger::reset_throttle`] forgets the history so
//! every key counts as new again.
//!
//! ## Observability
//!
//! ```rust
//! # use throttled_log::LogFacade;
//! # let facade = LogFacade::new();
//! let snapshot = facade.metrics().snapshot();
//! println!("Lines written: {}", snapshot.lines_written);
//! println!("Throttle rate: {:.2}%", snapshot.throttle_rate() * 100.0);
//! ```
//!
//! ## Concurrency
//!
//! All methods take `&self` and may be called from any thread. A subsystem's throttle
//! decision runs under that subsystem's entry lock, so concurrent callers racing on a
//! new key emit it exactly once. The frame counter and level flags are atomics.

#![warn(missing_docs)]

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    key::ThrottleKey,
    level::{Channel, Level},
    subsystem::{ConfigError, Subsystem},
    timing::{ThrottleDecision, ThrottleState, TimingMode, TimingPolicy, TimingUpdate},
};

pub use application::{
    filter::LevelFilter,
    format::{format_line, render_failure},
    frame_clock::FrameClock,
    metrics::{Metrics, MetricsSnapshot},
    ports::{Clock, SettingsError, SettingsStore, Sink, Storage},
    registry::{SubsystemThrottle, ThrottleRegistry},
};

pub use infrastructure::{
    clock::SystemClock,
    facade::{LogFacade, LogFacadeBuilder, Logger, ScopedLogger},
    settings::MemorySettings,
    sink::TracingSink,
    storage::ShardedStorage,
};

#[cfg(feature = "json-settings")]
pub use infrastructure::settings::JsonFileSettings;
