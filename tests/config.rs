use std::io::Write;

use whs_index::{
    config::{ConfigError, HandicapConfig, StorageConfig},
    course::CourseDraft,
    engine::{HandicapEngine, differential::DifferentialRounding},
    ledger::Ledger,
    telemetry::init_logger,
};

#[test]
fn empty_document_uses_defaults() {
    let config = HandicapConfig::from_toml_str("").expect("parse");
    assert_eq!(config, HandicapConfig::default());
    assert_eq!(config.engine.window, 20);
    assert_eq!(config.engine.best_of, 8);
    assert_eq!(config.engine.rounding, DifferentialRounding::FloorTenth);
    assert!(config.storage.sqlite_path.is_none());
}

#[test]
fn sections_override_defaults() {
    let config = HandicapConfig::from_toml_str(
        r#"
        [engine]
        rounding = "carry_past_half"

        [runtime]
        command_queue_bound = 16

        [storage]
        sqlite_path = "rounds.db"
        "#,
    )
    .expect("parse");

    assert_eq!(config.engine.rounding, DifferentialRounding::CarryPastHalf);
    assert_eq!(config.engine.window, 20);
    assert_eq!(config.runtime.command_queue_bound, 16);
    assert_eq!(config.runtime.event_capacity, 1024);
    assert_eq!(config.storage.sqlite_path.as_deref(), Some(std::path::Path::new("rounds.db")));

    let engine = HandicapEngine::new(config.engine);
    assert_eq!(
        engine.differential_engine().rounding(),
        DifferentialRounding::CarryPastHalf
    );
}

#[test]
fn window_smaller_than_best_of_is_rejected() {
    let err = HandicapConfig::from_toml_str("[engine]\nwindow = 5\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { .. }));

    let err = HandicapConfig::from_toml_str("[engine]\nrounding = \"nearest\"\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn config_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tmp");
    writeln!(file, "[engine]\nbest_of = 3\nwindow = 10").expect("write");

    let config = HandicapConfig::from_path(file.path()).expect("load");
    assert_eq!(config.engine.best_of, 3);
    assert_eq!(config.engine.window, 10);

    assert!(matches!(
        HandicapConfig::from_path(file.path().with_extension("missing")),
        Err(ConfigError::Io(_))
    ));
}

#[test]
fn storage_section_opens_file_or_memory_database() {
    let tmp = tempfile::TempDir::new().expect("tmp");
    let storage = StorageConfig {
        sqlite_path: Some(tmp.path().join("rounds.db")),
    };

    let mut ledger = Ledger::new(storage.open().expect("open file"), HandicapEngine::default());
    ledger.add_course(CourseDraft::new("Hardelot")).expect("course");
    drop(ledger);

    let reopened = Ledger::new(storage.open().expect("reopen"), HandicapEngine::default());
    assert_eq!(reopened.courses().expect("courses").len(), 1);

    let memory = Ledger::new(
        StorageConfig::default().open().expect("open memory"),
        HandicapEngine::default(),
    );
    assert!(memory.courses().expect("courses").is_empty());
}

#[test]
fn logger_installs_once() {
    assert!(init_logger(true).is_ok());
    assert!(init_logger(false).is_err());
}
