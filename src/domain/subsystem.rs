//! Subsystem identifiers.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Error returned when a logger cannot be configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Subsystem id was empty or whitespace
    BlankSubsystem,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::BlankSubsystem => {
                write!(f, "subsystem id cannot be empty or whitespace")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validated id of a subsystem that owns its own settings and throttle history.
///
/// Cloning is cheap; the id is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subsystem(Arc<str>);

impl Subsystem {
    /// Validate and wrap a subsystem id.
    ///
    /// # Errors
    /// Returns `ConfigError::BlankSubsystem` if `id` is empty or only whitespace.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ConfigError> {
        let id = id.as_ref();
        if id.trim().is_empty() {
            return Err(ConfigError::BlankSubsystem);
        }
        Ok(Subsystem(Arc::from(id)))
    }

    /// The id as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Subsystem {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Subsystem {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Subsystem {
    type Error = ConfigError;

    fn try_from(id: &str) -> Result<Self, Self::Error> {
        Subsystem::new(id)
    }
}

impl TryFrom<String> for Subsystem {
    type Error = ConfigError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Subsystem::new(id)
    }
}
