//! Integration tests for the `validate` command.
use migration_map::cli::handle_validate_command;
use migration_map::log::is_logger_initialised;
use migration_map::settings::Settings;
use std::path::PathBuf;

/// Get the path to the example map.
fn get_map_dir() -> PathBuf {
    PathBuf::from("demos/yangtze")
}

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run.
#[test]
fn test_handle_validate_command() {
    unsafe { std::env::set_var("MIGRATION_MAP_LOG_LEVEL", "off") };

    assert!(!is_logger_initialised());

    handle_validate_command(&get_map_dir(), Some(Settings::default())).unwrap();

    assert!(is_logger_initialised());
}
