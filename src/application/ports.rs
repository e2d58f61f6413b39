//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use std::fmt::{self, Debug};
use std::hash::Hash;
use std::time::Instant;

/// Port for obtaining current wall time.
///
/// Implementations must be monotonic. Infrastructure provides concrete
/// implementations (SystemClock, MockClock).
pub trait Clock: Send + Sync + Debug {
    /// Get the current instant.
    fn now(&self) -> Instant;
}

/// Port for concurrent key-value storage.
///
/// The accessor passed to [`Storage::with_entry_mut`] must run while the entry is
/// exclusively locked, so lookup-or-create, compare and update form one critical
/// section. Infrastructure provides concrete implementations (ShardedStorage).
pub trait Storage<K, V>: Send + Sync + Debug
where
    K: Hash + Eq + Clone + Send + Sync,
    V: Send + Sync,
{
    /// Access an entry with mutable access, creating it if necessary.
    ///
    /// # Arguments
    /// * `key` - The key to look up
    /// * `factory` - Function to create a new value if the key doesn't exist
    /// * `accessor` - Function that gets mutable access to the value
    ///
    /// # Returns
    /// The result from the accessor function
    fn with_entry_mut<F, R>(&self, key: K, factory: impl FnOnce() -> V, accessor: F) -> R
    where
        F: FnOnce(&mut V) -> R;

    /// Access an existing entry with mutable access.
    ///
    /// Returns `None` without calling `accessor` if the key is absent.
    fn with_existing_mut<F, R>(&self, key: &K, accessor: F) -> Option<R>
    where
        F: FnOnce(&mut V) -> R;

    /// Get the number of entries in the storage.
    fn len(&self) -> usize;

    /// Check if the storage is empty.
    fn is_empty(&self) -> bool;
}

/// Port for the underlying log destination.
///
/// The facade formats every line before handing it over; sinks only route text.
/// Sink methods do not return errors, and a panicking sink is not caught.
pub trait Sink: Send + Sync + Debug {
    /// Write to the default channel.
    fn write_info(&self, text: &str);

    /// Write to the warning channel.
    fn write_warning(&self, text: &str);

    /// Write to the error channel.
    fn write_error(&self, text: &str);
}

/// Error returned by a [`SettingsStore`].
#[derive(Debug)]
pub enum SettingsError {
    /// Reading or writing the backing file failed
    Io(std::io::Error),
    /// The backing document could not be parsed or serialized
    #[cfg(feature = "json-settings")]
    Format(serde_json::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "settings I/O error: {}", e),
            #[cfg(feature = "json-settings")]
            SettingsError::Format(e) => write!(f, "settings format error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            #[cfg(feature = "json-settings")]
            SettingsError::Format(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

#[cfg(feature = "json-settings")]
impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Format(e)
    }
}

/// Port for named boolean flags grouped by category and saved durably.
///
/// The facade uses one category per subsystem, holding a master switch and one flag
/// per switchable level.
pub trait SettingsStore: Send + Sync + Debug {
    /// Read a flag, creating it with `default` if it does not exist yet.
    fn flag(&self, category: &str, name: &str, default: bool) -> Result<bool, SettingsError>;

    /// Overwrite a flag's value.
    fn set_flag(&self, category: &str, name: &str, value: bool) -> Result<(), SettingsError>;

    /// Persist all pending changes.
    fn save(&self) -> Result<(), SettingsError>;
}
