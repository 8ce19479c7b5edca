/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use subedit::app_config::{Config, LogLevel};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.language, "en");
    assert_eq!(config.editor.max_title_chars, 2048);
    assert_eq!(config.editor.max_description_chars, 4096);
    assert_eq!(config.editor.min_caption_duration_ms, 100);
    assert_eq!(config.editor.save_after_events, 10);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.language = "fre".to_string();
    assert!(config.validate().is_ok());

    config.editor.save_after_events = 0;
    assert!(config.validate().is_err());
    config.editor.save_after_events = 1;

    config.editor.max_title_chars = 0;
    assert!(config.validate().is_err());
}

/// Test that a partial JSON file falls back to defaults
#[test]
fn test_fromFile_withPartialJson_shouldFillDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{"language": "de", "editor": {"max_title_chars": 80}, "log_level": "debug"}"#,
    )?;

    let config = Config::from_file(&path)?;

    assert_eq!(config.language, "de");
    assert_eq!(config.editor.max_title_chars, 80);
    assert_eq!(config.editor.save_after_events, 10);
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

/// Test save and reload
#[test]
fn test_saveToFile_thenFromFile_shouldPreserveValues() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.language = "es".to_string();
    config.editor.min_caption_duration_ms = 250;
    config.save_to_file(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.language, "es");
    assert_eq!(loaded.editor.min_caption_duration_ms, 250);
    Ok(())
}

#[test]
fn test_fromFile_withMissingFile_shouldFail() {
    assert!(Config::from_file("/nonexistent/subedit/conf.json").is_err());
}

#[test]
fn test_logLevel_toLevelFilter_shouldMapEachLevel() {
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
}
