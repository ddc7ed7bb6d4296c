/*!
 * Tests for error types
 */

use std::error::Error;
use std::io;
use subweave::{AppError, ErrorKind, SubtitleError, parse_duration};

/// Test that number errors keep their source
#[test]
fn test_invalid_number_shouldExposeSource() {
    let err = parse_duration("00:x:00,000", ",", 3).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(err.source().is_some());
    assert!(err.to_string().contains("\"x\""));
}

/// Test parse error messages carry the line number
#[test]
fn test_parse_error_display_shouldMentionLine() {
    let err = SubtitleError::Parse {
        line: 12,
        message: "missing end timestamp".to_string(),
    };
    assert_eq!(err.to_string(), "Parse error at line 12: missing end timestamp");
    assert_eq!(err.kind(), ErrorKind::Format);
}

/// Test that codec errors are format errors
#[test]
fn test_codec_unavailable_shouldBeFormatKind() {
    let err = SubtitleError::CodecUnavailable {
        format: "TTML".to_string(),
        operation: "writer",
    };
    assert_eq!(err.kind(), ErrorKind::Format);
    assert_eq!(err.to_string(), "No writer registered for TTML");
    assert_eq!(SubtitleError::NoSubtitlesToWrite.kind(), ErrorKind::Format);
}

/// Test conversion of library and I/O errors into the application error
#[test]
fn test_app_error_from_shouldWrapSources() {
    let app: AppError = SubtitleError::NoSubtitlesToWrite.into();
    assert!(matches!(app, AppError::Subtitle(SubtitleError::NoSubtitlesToWrite)));

    let app: AppError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
    assert!(matches!(app, AppError::File(_)));

    let app: AppError = anyhow::anyhow!("boom").into();
    assert_eq!(app.to_string(), "Unknown error: boom");
}
