//! Unit tests for configuration loading and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate KARAPLAY_SHARE_DIR are marked with #[serial].

use karaplay_common::config::{PlayerConfig, SHARE_DIR_ENV, share_dir};
use karaplay_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_missing_config_file_uses_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = PlayerConfig::load(&temp_dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.kara_folder, PathBuf::new());
    assert!(!config.fullscreen);
    assert_eq!(config.durations.resolve().transition, Duration::from_secs(2));
    assert_eq!(config.logging.level, "info");
    assert!(config.engine.media_parameters.is_empty());
}

#[test]
fn test_full_config_file() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join("player.toml");
    std::fs::write(
        &path,
        r#"
kara_folder = "/srv/karaoke"
fullscreen = true

[durations]
transition_duration = 5

[backgrounds]
directory = "custom/bg"
transition_background_name = "custom_transition.png"
idle_background_name = "custom_idle.png"

[engine]
instance_parameters = ["--no-audio"]
media_parameters = ["no-video"]

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = PlayerConfig::load(&path).unwrap();

    assert_eq!(config.kara_folder, PathBuf::from("/srv/karaoke"));
    assert!(config.fullscreen);

    let durations = config.durations.resolve();
    assert_eq!(durations.transition, Duration::from_secs(5));
    assert_eq!(durations.idle, Duration::from_secs(20));

    assert_eq!(config.backgrounds.directory, Some(PathBuf::from("custom/bg")));
    assert_eq!(
        config.backgrounds.transition_background_name.as_deref(),
        Some("custom_transition.png")
    );
    assert_eq!(
        config.backgrounds.idle_background_name.as_deref(),
        Some("custom_idle.png")
    );
    assert_eq!(config.engine.instance_parameters, vec!["--no-audio".to_string()]);
    assert_eq!(config.engine.media_parameters, vec!["no-video".to_string()]);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_invalid_toml_is_an_error() {
    let result = PlayerConfig::from_toml_str("kara_folder = [unclosed");
    assert!(matches!(result, Err(Error::TomlParse(_))));
}

#[test]
fn test_wrong_type_is_an_error() {
    let result = PlayerConfig::from_toml_str("[durations]\ntransition_duration = \"long\"");
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_share_dir_from_environment() {
    env::set_var(SHARE_DIR_ENV, "/tmp/karaplay-share-test");

    assert_eq!(share_dir(), PathBuf::from("/tmp/karaplay-share-test"));

    let config = PlayerConfig::default();
    assert_eq!(
        config.backgrounds.default_directory(),
        PathBuf::from("/tmp/karaplay-share-test/backgrounds")
    );

    env::remove_var(SHARE_DIR_ENV);
}

#[test]
#[serial]
fn test_share_dir_without_environment() {
    env::remove_var(SHARE_DIR_ENV);

    let dir = share_dir();
    assert!(!dir.as_os_str().is_empty());
    assert!(dir.ends_with("karaplay") || dir.ends_with("share"));
}
