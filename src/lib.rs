/*!
 * # subweave - subtitle interchange library
 *
 * Reads subtitles from several formats into one document model, transforms
 * their timing and styling, and writes them back out.
 *
 * ## Features
 *
 * - One document model shared by every format: items, lines, styled runs,
 *   named styles and regions, document metadata
 * - Style attributes for SRT, SSA, EBU-STL, Teletext, TTML and WebVTT, with
 *   translators that carry styling from one dialect to another
 * - Timing operations: shift, force a duration, fragment on a fixed window,
 *   unfragment, linear drift correction, ordering
 * - Built-in SRT and WebVTT codecs, plus a registry for further codecs
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitles`: The document model and its hygiene operations
 * - `timing`: Temporal transformations on a document
 * - `style`: Per-dialect style attributes and their propagation
 * - `duration`: Timestamp parsing and formatting
 * - `scanner`: Line splitting that accepts `\n`, `\r\n` and `\r`
 * - `color`: ARGB colors and their SSA/TTML encodings
 * - `formats`: Format detection, codec traits and the SRT/WebVTT codecs
 * - `app_config`: Reader options and configuration files
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the library
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod color;
pub mod duration;
pub mod errors;
pub mod file_utils;
pub mod formats;
pub mod scanner;
pub mod style;
pub mod subtitles;
pub mod timing;

// Re-export main types for easier usage
pub use app_config::{Options, ReadOptions};
pub use color::Color;
pub use duration::{TimestampFormat, format_duration, parse_duration};
pub use errors::{AppError, ErrorKind, SubtitleError};
pub use formats::{Codecs, SubtitleFormat, SubtitleReader, SubtitleWriter, open, write};
pub use scanner::LineScanner;
pub use style::{Dialect, StyleAttributes};
pub use subtitles::{Item, Line, LineItem, Metadata, Region, Style, Subtitles};
