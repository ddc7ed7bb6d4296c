/*!
 * Error types for subweave.
 *
 * The library surfaces a single `SubtitleError` enum built with thiserror.
 * Every variant belongs to one of two kinds: malformed input (`Format`) or a
 * failure of the underlying stream or file (`Io`). The command-line front end
 * wraps these in `AppError`.
 */

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Broad classification of a `SubtitleError`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input could not be understood (bad timestamp, unknown extension...)
    Format,
    /// The underlying stream or file failed
    Io,
}

/// Errors that can occur while reading, writing or decoding subtitles
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// Fractional part of a timestamp has too many digits
    #[error("Invalid number of fraction digits detected in {input:?}")]
    InvalidFractionDigits {
        /// The full timestamp text
        input: String,
    },

    /// Timestamp does not split into minutes:seconds or hours:minutes:seconds
    #[error("No hours, minutes or seconds detected in {input:?}")]
    InvalidComponentCount {
        /// The full timestamp text
        input: String,
    },

    /// A timestamp component is not an integer
    #[error("Invalid number {value:?}: {source}")]
    InvalidNumber {
        /// The offending component
        value: String,
        /// Underlying integer parse error
        #[source]
        source: ParseIntError,
    },

    /// The file extension does not map to a known format
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),

    /// The format is known but no codec has been registered for it
    #[error("No {operation} registered for {format}")]
    CodecUnavailable {
        /// Format name
        format: String,
        /// "reader" or "writer"
        operation: &'static str,
    },

    /// A reader rejected its input
    #[error("Parse error at line {line}: {message}")]
    Parse {
        /// 1-based line number in the source
        line: usize,
        /// What went wrong
        message: String,
    },

    /// A writer was handed a document without items
    #[error("No subtitles to write")]
    NoSubtitlesToWrite,

    /// Opening, creating or closing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Reading from or writing to a stream failed
    #[error("Stream error: {0}")]
    Stream(#[from] io::Error),
}

impl SubtitleError {
    /// Returns the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io { .. } | Self::Stream(_) => ErrorKind::Io,
            _ => ErrorKind::Format,
        }
    }

    /// Wraps an I/O error with the path it happened on
    pub fn io<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse<M: Into<String>>(line: usize, message: M) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result alias used across the library
pub type Result<T> = std::result::Result<T, SubtitleError>;

/// Main application error type used by the command-line front end
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Invalid command-line or configuration value
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::File(error.to_string())
    }
}
