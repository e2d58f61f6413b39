//! Public entry point tying filtering, throttling and output together.
//!
//! A [`LogFacade`] owns the throttle registry, one level filter per subsystem, the sink
//! and the settings store. Hosts usually wrap it in an `Arc` and hand out [`Logger`]
//! handles bound to a subsystem.
//!
//! Every call goes through the same pipeline:
//!
//! 1. Blank messages are dropped.
//! 2. The subsystem's level filter is consulted.
//! 3. Throttled calls ask the registry whether the key may be emitted.
//! 4. The line is formatted as `"{tag} [{scope}] {message}"` and routed to a sink channel.
//!
//! Nothing on this path returns an error.

use crate::application::filter::LevelFilter;
use crate::application::format::{format_line, is_blank, render_failure};
use crate::application::frame_clock::FrameClock;
use crate::application::metrics::Metrics;
use crate::application::ports::{Clock, SettingsError, SettingsStore, Sink};
use crate::application::registry::{SubsystemThrottle, ThrottleRegistry};
use crate::domain::{
    level::{Channel, Level},
    subsystem::{ConfigError, Subsystem},
    timing::{TimingMode, TimingPolicy, TimingUpdate},
};
use crate::infrastructure::{
    clock::SystemClock, settings::MemorySettings, sink::TracingSink, storage::ShardedStorage,
};
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

type SubsystemStorage = Arc<ShardedStorage<Subsystem, SubsystemThrottle>>;

/// Builder for configuring a [`LogFacade`].
#[derive(Debug, Default)]
pub struct LogFacadeBuilder {
    sink: Option<Arc<dyn Sink>>,
    settings: Option<Arc<dyn SettingsStore>>,
    clock: Option<Arc<dyn Clock>>,
    frames: Option<Arc<FrameClock>>,
    default_timing: TimingPolicy,
}

impl LogFacadeBuilder {
    /// Set the destination for formatted lines.
    ///
    /// Defaults to [`TracingSink`].
    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the store holding the persisted level flags.
    ///
    /// Defaults to an empty [`MemorySettings`].
    pub fn with_settings(mut self, settings: Arc<dyn SettingsStore>) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Set a custom clock for wall-clock throttling (mainly for tests).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the frame counter read by frame-mode throttling.
    ///
    /// Defaults to the process-wide [`FrameClock::shared`] counter.
    pub fn with_frame_clock(mut self, frames: Arc<FrameClock>) -> Self {
        self.frames = Some(frames);
        self
    }

    /// Set the timing policy new subsystems start with.
    pub fn with_default_timing(mut self, timing: TimingPolicy) -> Self {
        self.default_timing = timing;
        self
    }

    /// Build the facade.
    pub fn build(self) -> LogFacade {
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        let frames = self.frames.unwrap_or_else(FrameClock::shared);
        let storage = Arc::new(ShardedStorage::new());

        LogFacade {
            registry: ThrottleRegistry::new(storage, clock, frames, self.default_timing),
            filters: DashMap::with_hasher(RandomState::new()),
            sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink::new())),
            settings: self
                .settings
                .unwrap_or_else(|| Arc::new(MemorySettings::new())),
            metrics: Metrics::new(),
        }
    }
}

/// Leveled, filtered and throttled logging for any number of subsystems.
///
/// Each subsystem has its own level flags, timing policy and throttle history.
/// Subsystems never share throttle decisions, even for identical messages.
pub struct LogFacade {
    registry: ThrottleRegistry<SubsystemStorage>,
    filters: DashMap<Subsystem, Arc<LevelFilter>, RandomState>,
    sink: Arc<dyn Sink>,
    settings: Arc<dyn SettingsStore>,
    metrics: Metrics,
}

impl LogFacade {
    /// Create a builder for configuring the facade.
    ///
    /// Defaults:
    /// - Sink: [`TracingSink`]
    /// - Settings: in-memory
    /// - Clock: system monotonic clock
    /// - Frames: the process-wide shared counter
    /// - Timing: wall clock, 5 seconds, 300 frames
    pub fn builder() -> LogFacadeBuilder {
        LogFacadeBuilder::default()
    }

    /// Create a facade with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a handle bound to a subsystem.
    ///
    /// The subsystem's level flags are loaded (and created with their defaults if
    /// missing) right away. Settings that cannot be read fall back to the defaults and
    /// settings that cannot be saved keep their loaded values; both are reported with
    /// `tracing::warn!` instead of failing the call.
    ///
    /// # Errors
    /// Returns `ConfigError::BlankSubsystem` for an empty or whitespace id.
    pub fn logger(self: &Arc<Self>, id: impl AsRef<str>) -> Result<Logger, ConfigError> {
        let subsystem = Subsystem::new(id)?;
        self.filter(&subsystem);
        Ok(Logger {
            subsystem,
            facade: Arc::clone(self),
        })
    }

    /// Log a message if its level is enabled for the subsystem.
    ///
    /// Blank messages are ignored.
    pub fn log(&self, subsystem: &Subsystem, level: Level, message: &str, scope: Option<&str>) {
        if is_blank(message) {
            self.metrics.record_blank();
            return;
        }

        if !self.filter(subsystem).is_enabled(level) {
            self.metrics.record_filtered();
            return;
        }

        self.emit(level, message, scope);
    }

    /// Log a message unless an identical one was emitted too recently.
    ///
    /// The throttle key is built from `level`, `scope` and `dedupe_key` (or `message`
    /// when no key is given). Disabled levels are dropped before the throttle is
    /// consulted, so they never consume a throttle window.
    pub fn log_throttled(
        &self,
        subsystem: &Subsystem,
        level: Level,
        message: &str,
        scope: Option<&str>,
        dedupe_key: Option<&str>,
    ) {
        if is_blank(message) {
            self.metrics.record_blank();
            return;
        }

        if !self.filter(subsystem).is_enabled(level) {
            self.metrics.record_filtered();
            return;
        }

        if !self
            .registry
            .should_log(subsystem, level, scope, message, dedupe_key)
        {
            self.metrics.record_throttled();
            return;
        }

        self.emit(level, message, scope);
    }

    /// Ask the throttle registry directly, updating the key's history.
    ///
    /// No filtering or output happens here.
    pub fn should_log(
        &self,
        subsystem: &Subsystem,
        level: Level,
        scope: Option<&str>,
        message: &str,
        dedupe_key: Option<&str>,
    ) -> bool {
        self.registry
            .should_log(subsystem, level, scope, message, dedupe_key)
    }

    /// Apply a partial timing update to a subsystem and return the new policy.
    ///
    /// Intervals below their minimum are clamped.
    pub fn configure_timing(&self, subsystem: &Subsystem, update: TimingUpdate) -> TimingPolicy {
        let timing = self.registry.configure(subsystem, update);
        tracing::debug!(
            subsystem = %subsystem,
            mode = ?timing.mode(),
            wall_interval_secs = timing.wall_interval_secs(),
            frame_interval = timing.frame_interval(),
            "throttle timing updated"
        );
        timing
    }

    /// Current timing policy of a subsystem.
    pub fn timing(&self, subsystem: &Subsystem) -> TimingPolicy {
        self.registry.timing(subsystem)
    }

    /// Forget the throttle history of a subsystem.
    ///
    /// The next throttled call for any key is treated as its first.
    pub fn reset(&self, subsystem: &Subsystem) {
        let forgotten = self.registry.tracked_keys(subsystem);
        self.registry.reset(subsystem);
        tracing::debug!(subsystem = %subsystem, forgotten, "throttle history reset");
    }

    /// Check whether a level passes the subsystem's filter.
    pub fn is_level_enabled(&self, subsystem: &Subsystem, level: Level) -> bool {
        self.filter(subsystem).is_enabled(level)
    }

    /// Enable or disable a level for a subsystem and persist the change.
    ///
    /// Error, Critical and Exception cannot be disabled; the call is a no-op for them.
    ///
    /// # Errors
    /// Returns the settings store's error if the change cannot be persisted.
    pub fn set_level_enabled(
        &self,
        subsystem: &Subsystem,
        level: Level,
        enabled: bool,
    ) -> Result<(), SettingsError> {
        self.filter(subsystem).set_enabled(level, enabled)?;
        tracing::debug!(subsystem = %subsystem, %level, enabled, "level flag changed");
        Ok(())
    }

    /// Turn a subsystem's master switch on or off and persist the change.
    ///
    /// # Errors
    /// Returns the settings store's error if the change cannot be persisted.
    pub fn set_logging_enabled(
        &self,
        subsystem: &Subsystem,
        enabled: bool,
    ) -> Result<(), SettingsError> {
        self.filter(subsystem).set_logging_enabled(enabled)?;
        tracing::debug!(subsystem = %subsystem, enabled, "master switch changed");
        Ok(())
    }

    /// Advance the frame counter by one tick and return the new frame.
    ///
    /// Call this once per frame from the host's frame hook.
    pub fn advance_frame(&self) -> u64 {
        self.registry.frame_clock().advance()
    }

    /// Frame the counter is currently at.
    pub fn current_frame(&self) -> u64 {
        self.registry.frame_clock().current()
    }

    /// The frame counter used for frame-mode throttling.
    pub fn frame_clock(&self) -> &Arc<FrameClock> {
        self.registry.frame_clock()
    }

    /// Number of keys with throttle history in a subsystem.
    pub fn tracked_keys(&self, subsystem: &Subsystem) -> usize {
        self.registry.tracked_keys(subsystem)
    }

    /// Get the facade's metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn emit(&self, level: Level, message: &str, scope: Option<&str>) {
        let line = format_line(level, message, scope);
        match level.channel() {
            Channel::Info => self.sink.write_info(&line),
            Channel::Warning => self.sink.write_warning(&line),
            Channel::Error => self.sink.write_error(&line),
        }
        self.metrics.record_written();
    }

    fn load_filter(&self, subsystem: &Subsystem) -> Result<Arc<LevelFilter>, SettingsError> {
        if let Some(filter) = self.filters.get(subsystem) {
            return Ok(Arc::clone(filter.value()));
        }

        match self.filters.entry(subsystem.clone()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let filter = Arc::new(LevelFilter::load(
                    subsystem.as_str(),
                    Arc::clone(&self.settings),
                )?);
                entry.insert(Arc::clone(&filter));
                Ok(filter)
            }
        }
    }

    fn filter(&self, subsystem: &Subsystem) -> Arc<LevelFilter> {
        self.load_filter(subsystem).unwrap_or_else(|e| {
            tracing::warn!(
                subsystem = %subsystem,
                error = %e,
                "failed to load level settings, using defaults"
            );
            let filter = self.filters.entry(subsystem.clone()).or_insert_with(|| {
                Arc::new(LevelFilter::with_defaults(
                    subsystem.as_str(),
                    Arc::clone(&self.settings),
                ))
            });
            Arc::clone(filter.value())
        })
    }
}

impl Default for LogFacade {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFacade")
            .field("subsystems", &self.registry.subsystem_count())
            .field("filters", &self.filters.len())
            .field("sink", &self.sink)
            .field("settings", &self.settings)
            .field("metrics", &self.metrics.snapshot())
            .finish()
    }
}

/// Handle bound to one subsystem.
///
/// Cloning is cheap; clones share the facade.
#[derive(Debug, Clone)]
pub struct Logger {
    subsystem: Subsystem,
    facade: Arc<LogFacade>,
}

impl Logger {
    /// Subsystem this handle logs for.
    pub fn subsystem(&self) -> &Subsystem {
        &self.subsystem
    }

    /// The facade behind this handle.
    pub fn facade(&self) -> &Arc<LogFacade> {
        &self.facade
    }

    /// View of this logger that prefixes every line with `scope`.
    pub fn scoped<'a>(&'a self, scope: &'a str) -> ScopedLogger<'a> {
        ScopedLogger {
            logger: self,
            scope,
        }
    }

    /// Log at any level with an optional scope.
    pub fn log(&self, level: Level, message: &str, scope: Option<&str>) {
        self.facade.log(&self.subsystem, level, message, scope);
    }

    /// Log at Trace level (off by default).
    pub fn trace(&self, message: &str) {
        self.log(Level::Trace, message, None);
    }

    /// Log at Debug level (off by default).
    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message, None);
    }

    /// Log at Verbose level (off by default).
    pub fn verbose(&self, message: &str) {
        self.log(Level::Verbose, message, None);
    }

    /// Log at Info level.
    pub fn info(&self, message: &str) {
        self.log(Level::Info, message, None);
    }

    /// Log at Warning level.
    pub fn warning(&self, message: &str) {
        self.log(Level::Warning, message, None);
    }

    /// Log at Error level. Never filtered.
    pub fn error(&self, message: &str) {
        self.log(Level::Error, message, None);
    }

    /// Log at Critical level. Never filtered.
    pub fn critical(&self, message: &str) {
        self.log(Level::Critical, message, None);
    }

    /// Log a failure at Exception level with its full detail.
    pub fn exception<E>(&self, error: &E, scope: Option<&str>)
    where
        E: Error + ?Sized,
    {
        self.log(Level::Exception, &render_failure(error), scope);
    }

    /// Like [`Logger::exception`], doing nothing when there is no failure.
    pub fn exception_opt<E>(&self, error: Option<&E>, scope: Option<&str>)
    where
        E: Error + ?Sized,
    {
        if let Some(error) = error {
            self.exception(error, scope);
        }
    }

    /// Log with repeat suppression at any level.
    pub fn log_throttled(
        &self,
        level: Level,
        message: &str,
        scope: Option<&str>,
        dedupe_key: Option<&str>,
    ) {
        self.facade
            .log_throttled(&self.subsystem, level, message, scope, dedupe_key);
    }

    /// Info with repeat suppression; `dedupe_key` replaces the message in the key.
    pub fn info_throttled(&self, message: &str, dedupe_key: Option<&str>) {
        self.log_throttled(Level::Info, message, None, dedupe_key);
    }

    /// Warning with repeat suppression.
    pub fn warning_throttled(&self, message: &str, dedupe_key: Option<&str>) {
        self.log_throttled(Level::Warning, message, None, dedupe_key);
    }

    /// Error with repeat suppression.
    pub fn error_throttled(&self, message: &str, dedupe_key: Option<&str>) {
        self.log_throttled(Level::Error, message, None, dedupe_key);
    }

    /// Apply a partial timing update and return the new policy.
    pub fn configure_timing(&self, update: TimingUpdate) -> TimingPolicy {
        self.facade.configure_timing(&self.subsystem, update)
    }

    /// Switch between wall-clock and frame throttling.
    pub fn set_timing_mode(&self, mode: TimingMode) -> TimingPolicy {
        self.configure_timing(TimingUpdate::new().mode(mode))
    }

    /// Set the wall-clock interval in seconds (minimum 0.01).
    pub fn set_wall_interval(&self, secs: f64) -> TimingPolicy {
        self.configure_timing(TimingUpdate::new().wall_interval_secs(secs))
    }

    /// Set the frame interval (minimum 1).
    pub fn set_frame_interval(&self, frames: u64) -> TimingPolicy {
        self.configure_timing(TimingUpdate::new().frame_interval(frames))
    }

    /// Current timing policy.
    pub fn timing(&self) -> TimingPolicy {
        self.facade.timing(&self.subsystem)
    }

    /// Forget this subsystem's throttle history.
    pub fn reset_throttle(&self) {
        self.facade.reset(&self.subsystem);
    }

    /// Check whether a level passes this subsystem's filter.
    pub fn is_level_enabled(&self, level: Level) -> bool {
        self.facade.is_level_enabled(&self.subsystem, level)
    }

    /// Enable or disable a level and persist the change.
    ///
    /// # Errors
    /// Returns the settings store's error if the change cannot be persisted.
    pub fn set_level_enabled(&self, level: Level, enabled: bool) -> Result<(), SettingsError> {
        self.facade
            .set_level_enabled(&self.subsystem, level, enabled)
    }

    /// Turn the master switch on or off and persist the change.
    ///
    /// # Errors
    /// Returns the settings store's error if the change cannot be persisted.
    pub fn set_logging_enabled(&self, enabled: bool) -> Result<(), SettingsError> {
        self.facade.set_logging_enabled(&self.subsystem, enabled)
    }
}

/// A [`Logger`] view that tags every line with a scope.
///
/// The scope is also part of the throttle key for throttled calls.
#[derive(Debug, Clone, Copy)]
pub struct ScopedLogger<'a> {
    logger: &'a Logger,
    scope: &'a str,
}

impl ScopedLogger<'_> {
    /// Scope added to every line.
    pub fn scope(&self) -> &str {
        self.scope
    }

    /// Log at any level in this scope.
    pub fn log(&self, level: Level, message: &str) {
        self.logger.log(level, message, Some(self.scope));
    }

    /// Scoped [`Logger::trace`].
    pub fn trace(&self, message: &str) {
        self.log(Level::Trace, message);
    }

    /// Scoped [`Logger::debug`].
    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    /// Scoped [`Logger::verbose`].
    pub fn verbose(&self, message: &str) {
        self.log(Level::Verbose, message);
    }

    /// Scoped [`Logger::info`].
    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    /// Scoped [`Logger::warning`].
    pub fn warning(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    /// Scoped [`Logger::error`].
    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    /// Scoped [`Logger::critical`].
    pub fn critical(&self, message: &str) {
        self.log(Level::Critical, message);
    }

    /// Scoped [`Logger::exception`].
    pub fn exception<E>(&self, error: &E)
    where
        E: Error + ?Sized,
    {
        self.logger.exception(error, Some(self.scope));
    }

    /// Log with repeat suppression; the scope is part of the throttle key.
    pub fn log_throttled(&self, level: Level, message: &str, dedupe_key: Option<&str>) {
        self.logger
            .log_throttled(level, message, Some(self.scope), dedupe_key);
    }

    /// Scoped [`Logger::info_throttled`].
    pub fn info_throttled(&self, message: &str, dedupe_key: Option<&str>) {
        self.log_throttled(Level::Info, message, dedupe_key);
    }

    /// Scoped [`Logger::warning_throttled`].
    pub fn warning_throttled(&self, message: &str, dedupe_key: Option<&str>) {
        self.log_throttled(Level::Warning, message, dedupe_key);
    }

    /// Scoped [`Logger::error_throttled`].
    pub fn error_throttled(&self, message: &str, dedupe_key: Option<&str>) {
        self.log_throttled(Level::Error, message, dedupe_key);
    }
}
