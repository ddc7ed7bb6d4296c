/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;
use subweave::SubtitleFormat;
use subweave::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// Test that generate_output_path swaps the extension
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path(
        Path::new("/tmp/input/movie.srt"),
        Path::new("/tmp/output"),
        "vtt",
    );
    assert_eq!(output_path, Path::new("/tmp/output/movie.vtt"));
}

/// Test that ensure_dir creates nested directories
#[test]
fn test_ensure_dir_withNestedPath_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b");

    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));
    FileManager::ensure_dir(&nested)?;
    Ok(())
}

/// Test that only files with subtitle extensions are found, recursively
#[test]
fn test_find_subtitle_files_withMixedFiles_shouldKeepSubtitles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("season1");
    FileManager::ensure_dir(&nested)?;

    common::create_test_file(temp_dir.path(), "a.srt", "")?;
    common::create_test_file(temp_dir.path(), "notes.txt", "")?;
    common::create_test_file(&nested, "b.VTT", "")?;
    common::create_test_file(&nested, "c.ass", "")?;

    let found = FileManager::find_subtitle_files(temp_dir.path())?;
    let formats: Vec<SubtitleFormat> = found.iter().map(|(_, format)| *format).collect();

    assert_eq!(found.len(), 3);
    assert!(formats.contains(&SubtitleFormat::Srt));
    assert!(formats.contains(&SubtitleFormat::WebVtt));
    assert!(formats.contains(&SubtitleFormat::Ssa));
    Ok(())
}
