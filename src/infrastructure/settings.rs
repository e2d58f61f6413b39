//! Settings store adapters.
//!
//! `MemorySettings` keeps flags in process memory and is the default store.
//! `JsonFileSettings` (feature `json-settings`) keeps them in a JSON document on disk:
//!
//! ```json
//! {
//!   "Net": {
//!     "Enable Debug": false,
//!     "Enable Logging": true
//!   }
//! }
//! ```

use crate::application::ports::{SettingsError, SettingsStore};
use ahash::RandomState;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory settings store.
///
/// Saving only counts how often it was requested, which tests use to check that
/// changes are persisted.
#[derive(Debug)]
pub struct MemorySettings {
    flags: DashMap<(String, String), bool, RandomState>,
    saves: AtomicU64,
}

impl MemorySettings {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            flags: DashMap::with_hasher(RandomState::new()),
            saves: AtomicU64::new(0),
        }
    }

    /// Read a flag without creating it.
    pub fn get(&self, category: &str, name: &str) -> Option<bool> {
        self.flags
            .get(&(category.to_string(), name.to_string()))
            .map(|entry| *entry.value())
    }

    /// Number of times `save` was called.
    pub fn save_count(&self) -> u64 {
        self.saves.load(Ordering::Relaxed)
    }
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for MemorySettings {
    fn flag(&self, category: &str, name: &str, default: bool) -> Result<bool, SettingsError> {
        let entry = self
            .flags
            .entry((category.to_string(), name.to_string()))
            .or_insert(default);
        Ok(*entry.value())
    }

    fn set_flag(&self, category: &str, name: &str, value: bool) -> Result<(), SettingsError> {
        self.flags
            .insert((category.to_string(), name.to_string()), value);
        Ok(())
    }

    fn save(&self) -> Result<(), SettingsError> {
        self.saves.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(feature = "json-settings")]
pub use self::json::JsonFileSettings;

#[cfg(feature = "json-settings")]
mod json {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs::{self, OpenOptions};
    use std::io::{self, Write};
    use std::path::{Path, PathBuf};
    use std::sync::{Mutex, PoisonError};
    use std::time::{SystemTime, UNIX_EPOCH};

    type Document = BTreeMap<String, BTreeMap<String, bool>>;

    #[derive(Debug, Default)]
    struct State {
        document: Document,
        dirty: bool,
    }

    /// Settings store backed by a JSON file.
    ///
    /// Changes stay in memory until [`SettingsStore::save`] writes the whole document.
    /// The file is replaced atomically through a sibling temporary file.
    #[derive(Debug)]
    pub struct JsonFileSettings {
        path: PathBuf,
        state: Mutex<State>,
    }

    impl JsonFileSettings {
        /// Open a settings file, starting empty if it does not exist.
        ///
        /// # Errors
        /// Returns `SettingsError::Io` if the file exists but cannot be read, or
        /// `SettingsError::Format` if it is not a valid settings document.
        pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
            let path = path.into();
            let document = match fs::read_to_string(&path) {
                Ok(text) if text.trim().is_empty() => Document::new(),
                Ok(text) => serde_json::from_str(&text)?,
                Err(e) if e.kind() == io::ErrorKind::NotFound => Document::new(),
                Err(e) => return Err(e.into()),
            };

            Ok(Self {
                path,
                state: Mutex::new(State {
                    document,
                    dirty: false,
                }),
            })
        }

        /// Location of the backing file.
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn state(&self) -> std::sync::MutexGuard<'_, State> {
            self.state.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    impl SettingsStore for JsonFileSettings {
        fn flag(&self, category: &str, name: &str, default: bool) -> Result<bool, SettingsError> {
            let mut state = self.state();
            if let Some(value) = state.document.get(category).and_then(|c| c.get(name)) {
                return Ok(*value);
            }

            state
                .document
                .entry(category.to_string())
                .or_default()
                .insert(name.to_string(), default);
            state.dirty = true;
            Ok(default)
        }

        fn set_flag(&self, category: &str, name: &str, value: bool) -> Result<(), SettingsError> {
            let mut state = self.state();
            let previous = state
                .document
                .entry(category.to_string())
                .or_default()
                .insert(name.to_string(), value);
            if previous != Some(value) {
                state.dirty = true;
            }
            Ok(())
        }

        fn save(&self) -> Result<(), SettingsError> {
            let mut state = self.state();
            if !state.dirty {
                return Ok(());
            }

            let text = serde_json::to_string_pretty(&state.document)?;
            write_file_atomically(&self.path, text.as_bytes())?;

            state.dirty = false;
            tracing::debug!(path = %self.path.display(), "saved logger settings");
            Ok(())
        }
    }

    /// Replace `path` with `contents` through a uniquely named sibling file.
    ///
    /// The temporary file is synced before the rename and removed if the rename fails.
    fn write_file_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
        let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "settings".to_string());
        let nonce = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        let tmp = dir.join(format!(".{file_name}.tmp-{}-{nonce}", std::process::id()));

        {
            let mut file = OpenOptions::new().create_new(true).write(true).open(&tmp)?;
            if let Err(e) = file.write_all(contents).and_then(|()| file.sync_all()) {
                drop(file);
                let _ = fs::remove_file(&tmp);
                return Err(e);
            }
        }

        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_missing_file_starts_empty() {
            let dir = tempfile::tempdir().unwrap();
            let settings = JsonFileSettings::open(dir.path().join("log.json")).unwrap();

            assert!(settings.flag("Net", "Enable Info", true).unwrap());
            assert!(!dir.path().join("log.json").exists());
        }

        #[test]
        fn test_save_and_reopen() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("log.json");

            let settings = JsonFileSettings::open(&path).unwrap();
            settings.flag("Net", "Enable Debug", false).unwrap();
            settings.set_flag("Net", "Enable Debug", true).unwrap();
            settings.save().unwrap();

            let reopened = JsonFileSettings::open(&path).unwrap();
            assert!(reopened.flag("Net", "Enable Debug", false).unwrap());
        }

        #[test]
        fn test_save_leaves_no_temporary_files() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("log.json");
            // A stale file at the old fixed temp name must not block saving
            fs::create_dir(dir.path().join("log.json.tmp")).unwrap();

            let settings = JsonFileSettings::open(&path).unwrap();
            settings.set_flag("Net", "Enable Logging", false).unwrap();
            settings.save().unwrap();
            settings.set_flag("Net", "Enable Logging", true).unwrap();
            settings.save().unwrap();

            let mut names: Vec<String> = fs::read_dir(dir.path())
                .unwrap()
                .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            assert_eq!(names, vec!["log.json".to_string(), "log.json.tmp".to_string()]);

            let reopened = JsonFileSettings::open(&path).unwrap();
            assert!(reopened.flag("Net", "Enable Logging", false).unwrap());
        }

        #[test]
        fn test_failed_rename_removes_temporary_file() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("log.json");

            let settings = JsonFileSettings::open(&path).unwrap();
            settings.set_flag("Net", "Enable Debug", true).unwrap();
            // A non-empty directory at the target makes the rename fail
            fs::create_dir(&path).unwrap();
            fs::write(path.join("keep"), "x").unwrap();

            let err = settings.save().unwrap_err();
            assert!(matches!(err, SettingsError::Io(_)));

            let names: Vec<String> = fs::read_dir(dir.path())
                .unwrap()
                .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
                .collect();
            assert_eq!(names, vec!["log.json".to_string()]);

            // Still dirty, so a later save retries
            fs::remove_dir_all(&path).unwrap();
            settings.save().unwrap();
            assert!(path.is_file());
        }

        #[test]
        fn test_clean_store_skips_write() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("log.json");
            fs::write(&path, r#"{"Net":{"Enable Info":false}}"#).unwrap();

            let settings = JsonFileSettings::open(&path).unwrap();
            assert!(!settings.flag("Net", "Enable Info", true).unwrap());
            settings.set_flag("Net", "Enable Info", false).unwrap();
            settings.save().unwrap();

            // Untouched, so still the compact original text
            let text = fs::read_to_string(&path).unwrap();
            assert_eq!(text, r#"{"Net":{"Enable Info":false}}"#);
        }

        #[test]
        fn test_invalid_document() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("log.json");
            fs::write(&path, "not json").unwrap();

            let err = JsonFileSettings::open(&path).unwrap_err();
            assert!(matches!(err, SettingsError::Format(_)));
        }

        #[test]
        fn test_empty_file_is_empty_document() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("log.json");
            fs::write(&path, "").unwrap();

            let settings = JsonFileSettings::open(&path).unwrap();
            assert!(settings.flag("Net", "Enable Logging", true).unwrap());
        }
    }
}
