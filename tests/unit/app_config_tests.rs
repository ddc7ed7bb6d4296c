/*!
 * Tests for configuration loading and saving
 */

use anyhow::Result;
use subweave::app_config::{LogLevel, Options};
use crate::common;

/// Test that a saved configuration loads back unchanged
#[test]
fn test_save_thenLoad_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut options = Options::default();
    options.log_level = LogLevel::Debug;
    options.read.teletext.page = Some(777);
    options.read.stl.ignore_timecode_start_of_programme = true;
    options.save(&path)?;

    let loaded = Options::from_file(&path)?;
    assert_eq!(loaded, options);
    assert_eq!(loaded.read.teletext.magazine(), Some(7));
    Ok(())
}

/// Test that an empty JSON object gives the defaults
#[test]
fn test_from_file_withEmptyObject_shouldUseDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{}")?;

    let options = Options::from_file(&path)?;
    assert_eq!(options, Options::default());
    Ok(())
}

/// Test that invalid content is rejected with the file name in the message
#[test]
fn test_from_file_withInvalidContent_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let broken = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;
    let err = Options::from_file(&broken).unwrap_err();
    assert!(format!("{:#}", err).contains("broken.json"));

    let out_of_range = common::create_test_file(
        temp_dir.path(),
        "page.json",
        r#"{"read": {"teletext": {"page": 950}}}"#,
    )?;
    assert!(Options::from_file(&out_of_range).is_err());
    Ok(())
}

/// Test that a missing file is an error
#[test]
fn test_from_file_withMissingFile_shouldFail() {
    assert!(Options::from_file("definitely_missing_conf.json").is_err());
}
