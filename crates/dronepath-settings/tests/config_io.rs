use dronepath_settings::{Config, ConfigError, SettingsError};
use std::path::PathBuf;
use tempfile::TempDir;

fn customised() -> Config {
    let mut config = Config::default();
    config.connection.drone_address = "127.0.0.1:9000".to_string();
    config.flight.speed = 45;
    config.flight.start = [1.0, 1.5, -1.0];
    config.playback.move_delay_ms = 1500;
    config.camera.follow_height = 3.0;
    config.add_recent_file(PathBuf::from("/tmp/loop.json"));
    config
}

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    let config = customised();
    config.save_to_file(&path).unwrap();
    let loaded = Config::load_from_file(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_json_round_trip_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = customised();
    config.save_to_file(&path).unwrap();
    assert!(path.exists());
    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[flight]\nspeed = 60\n").unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.flight.speed, 60);
    assert_eq!(loaded.flight.distance, 0.5);
    assert_eq!(loaded.playback, Config::default().playback);
}

#[test]
fn test_invalid_values_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"flight": {"speed": 500}}"#).unwrap();

    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::Config(ConfigError::ValueOutOfRange { .. }))
    ));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = Config::load_from_file(&dir.path().join("absent.toml"));
    assert!(matches!(result, Err(SettingsError::LoadError(_))));
}
