//! Per-subsystem level enablement.
//!
//! Flags are cached in atomics so the read path is lock-free; writes go through the
//! settings store and are serialized per filter.

use crate::application::ports::{SettingsError, SettingsStore};
use crate::domain::level::{Level, FLAG_COUNT, SWITCHABLE_LEVELS};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Name of the persisted master switch.
pub const MASTER_FLAG: &str = "Enable Logging";

/// Enabled/disabled flags for one subsystem.
#[derive(Debug)]
pub struct LevelFilter {
    category: String,
    logging_enabled: AtomicBool,
    flags: [AtomicBool; FLAG_COUNT],
    settings: Arc<dyn SettingsStore>,
    write_lock: Mutex<()>,
}

impl LevelFilter {
    /// Filter with out-of-the-box values, not yet read from the store.
    ///
    /// Master switch on; Info and Warning on; Trace, Debug and Verbose off.
    pub fn with_defaults(category: impl Into<String>, settings: Arc<dyn SettingsStore>) -> Self {
        let flags = SWITCHABLE_LEVELS.map(|level| {
            let default = level.flag().map(|(_, default)| default).unwrap_or(true);
            AtomicBool::new(default)
        });

        Self {
            category: category.into(),
            logging_enabled: AtomicBool::new(true),
            flags,
            settings,
            write_lock: Mutex::new(()),
        }
    }

    /// Load flags from `settings`, creating missing ones with their defaults.
    ///
    /// The store is saved afterwards so created flags get persisted. A failed save is
    /// logged and the loaded values are kept.
    ///
    /// # Errors
    /// Returns the store's error if a flag cannot be read.
    pub fn load(
        category: impl Into<String>,
        settings: Arc<dyn SettingsStore>,
    ) -> Result<Self, SettingsError> {
        let filter = Self::with_defaults(category, settings);

        let master = filter.settings.flag(&filter.category, MASTER_FLAG, true)?;
        filter.logging_enabled.store(master, Ordering::Release);

        for level in SWITCHABLE_LEVELS {
            if let (Some(index), Some((name, default))) = (level.flag_index(), level.flag()) {
                let value = filter.settings.flag(&filter.category, name, default)?;
                filter.flags[index].store(value, Ordering::Release);
            }
        }

        if let Err(e) = filter.settings.save() {
            tracing::warn!(
                category = %filter.category,
                error = %e,
                "failed to save level settings, keeping loaded values"
            );
        }
        Ok(filter)
    }

    /// Settings category this filter reads and writes.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Check whether messages at `level` pass the filter.
    ///
    /// Error, Critical and Exception always pass, even with the master switch off.
    /// Other levels need the master switch and their own flag.
    pub fn is_enabled(&self, level: Level) -> bool {
        if level.is_always_enabled() {
            return true;
        }

        if !self.logging_enabled.load(Ordering::Acquire) {
            return false;
        }

        match level.flag_index() {
            Some(index) => self.flags[index].load(Ordering::Acquire),
            None => true,
        }
    }

    /// Current value of the master switch.
    pub fn logging_enabled(&self) -> bool {
        self.logging_enabled.load(Ordering::Acquire)
    }

    /// Enable or disable a level and persist the change.
    ///
    /// Levels without a flag (the always-enabled ones) are left alone.
    ///
    /// # Errors
    /// Returns the store's error if the change cannot be persisted. The in-memory flag
    /// is updated either way.
    pub fn set_enabled(&self, level: Level, enabled: bool) -> Result<(), SettingsError> {
        let (Some(index), Some((name, _))) = (level.flag_index(), level.flag()) else {
            return Ok(());
        };

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.flags[index].store(enabled, Ordering::Release);
        self.persist(name, enabled)
    }

    /// Turn the master switch on or off and persist the change.
    ///
    /// # Errors
    /// Returns the store's error if the change cannot be persisted.
    pub fn set_logging_enabled(&self, enabled: bool) -> Result<(), SettingsError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.logging_enabled.store(enabled, Ordering::Release);
        self.persist(MASTER_FLAG, enabled)
    }

    fn persist(&self, name: &str, value: bool) -> Result<(), SettingsError> {
        self.settings.set_flag(&self.category, name, value)?;
        self.settings.save()
    }
}
