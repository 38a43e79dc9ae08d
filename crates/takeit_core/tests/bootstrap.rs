use takeit_core::{init_core, logging_status, CoreConfig, InitError, LoggingError};

// Logging is process-wide, so this binary holds a single test.
#[tokio::test]
async fn init_core_starts_logging_from_config_and_opens_storage() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::new(dir.path().join("app")).with_log_level("debug");

    let storage = init_core(&config).unwrap();
    let (level, log_dir) = logging_status().unwrap();
    assert_eq!(level, "debug");
    assert_eq!(log_dir, config.log_dir());
    assert!(config.log_dir().is_dir());
    assert!(config.db_path().is_file());

    storage.add_item("Tent").await.unwrap();
    let reopened = init_core(&config).unwrap();
    assert_eq!(reopened.get_all_items().await.unwrap()[0].text, "Tent");

    let louder = config.clone().with_log_level("warn");
    match init_core(&louder).unwrap_err() {
        InitError::Logging(LoggingError::AlreadyInitialized { .. }) => {}
        other => panic!("unexpected error: {other}"),
    }
}
