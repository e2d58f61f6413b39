#![cfg(feature = "json-settings")]

use std::fs;
use std::sync::Arc;
use throttled_log::infrastructure::mocks::CaptureSink;
use throttled_log::{JsonFileSettings, Level, LogFacade, Subsystem};

fn facade_at(path: &std::path::Path, sink: &CaptureSink) -> Arc<LogFacade> {
    facade_with(JsonFileSettings::open(path).unwrap(), sink)
}

fn facade_with(settings: JsonFileSettings, sink: &CaptureSink) -> Arc<LogFacade> {
    Arc::new(
        LogFacade::builder()
            .with_sink(Arc::new(sink.clone()))
            .with_settings(Arc::new(settings))
            .build(),
    )
}

#[test]
fn test_first_logger_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logging.json");

    let facade = facade_at(&path, &CaptureSink::new());
    facade.logger("Net").unwrap();

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(document["Net"]["Enable Logging"], true);
    assert_eq!(document["Net"]["Enable Trace"], false);
    assert_eq!(document["Net"]["Enable Info"], true);
}

#[test]
fn test_toggles_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logging.json");

    {
        let facade = facade_at(&path, &CaptureSink::new());
        let log = facade.logger("Net").unwrap();
        log.set_level_enabled(Level::Debug, true).unwrap();
        log.set_level_enabled(Level::Info, false).unwrap();
    }

    let sink = CaptureSink::new();
    let facade = facade_at(&path, &sink);
    let log = facade.logger("Net").unwrap();
    log.debug("visible");
    log.info("hidden");

    assert_eq!(sink.texts(), vec!["[DEBUG] visible"]);
}

#[test]
fn test_hand_edited_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logging.json");
    fs::write(&path, r#"{ "Audio": { "Enable Logging": false } }"#).unwrap();

    let sink = CaptureSink::new();
    let facade = facade_at(&path, &sink);
    let log = facade.logger("Audio").unwrap();
    log.warning("hidden");
    log.error("shown");

    assert_eq!(sink.texts(), vec!["[ERROR] shown"]);
}

#[test]
fn test_unwritable_location_still_builds_logger() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config").join("logging.json");
    let settings = JsonFileSettings::open(&path).unwrap();

    // A regular file where the config directory should go
    fs::write(dir.path().join("config"), "").unwrap();

    let sink = CaptureSink::new();
    let facade = facade_with(settings, &sink);

    let log = facade.logger("Net").unwrap();
    log.info("still logged");
    log.debug("still filtered");
    assert_eq!(sink.texts(), vec!["[INFO] still logged"]);

    // Toggles apply in memory and report the failed save
    assert!(log.set_level_enabled(Level::Debug, true).is_err());
    log.debug("now shown");
    assert_eq!(sink.count(), 2);
}

#[test]
fn test_failed_save_keeps_persisted_master_switch() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config");
    let path = config.join("logging.json");
    fs::create_dir(&config).unwrap();
    fs::write(&path, r#"{"Audio":{"Enable Logging":false}}"#).unwrap();

    let settings = JsonFileSettings::open(&path).unwrap();
    // Saving the newly created level flags now fails
    fs::remove_dir_all(&config).unwrap();
    fs::write(&config, "").unwrap();

    let sink = CaptureSink::new();
    let facade = facade_with(settings, &sink);

    let log = facade.logger("Audio").unwrap();
    assert!(!log.is_level_enabled(Level::Info));
    log.info("hidden");
    log.warning("hidden");
    log.error("shown");

    assert_eq!(sink.texts(), vec!["[ERROR] shown"]);
}

#[test]
fn test_failed_save_on_hot_path_keeps_persisted_flags() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config");
    let path = config.join("logging.json");
    fs::create_dir(&config).unwrap();
    fs::write(&path, r#"{"Audio":{"Enable Logging":false}}"#).unwrap();

    let settings = JsonFileSettings::open(&path).unwrap();
    fs::remove_dir_all(&config).unwrap();
    fs::write(&config, "").unwrap();

    let sink = CaptureSink::new();
    let facade = facade_with(settings, &sink);

    // No logger created first, so the filter is loaded lazily here
    let audio = Subsystem::new("Audio").unwrap();
    facade.log(&audio, Level::Warning, "hidden", None);
    facade.log_throttled(&audio, Level::Info, "hidden", None, None);
    facade.log(&audio, Level::Critical, "shown", None);

    assert_eq!(sink.texts(), vec!["[CRITICAL] shown"]);
}
