/*!
 * Format dispatch: which reader or writer handles which file.
 *
 * Codecs plug in through the `SubtitleReader` and `SubtitleWriter` traits
 * and are looked up in a `Codecs` registry keyed by `SubtitleFormat`. The
 * default registry knows SRT and WebVTT; other formats are recognized by
 * extension but need a codec registered by the caller.
 */

pub mod srt;
pub mod webvtt;

use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use crate::app_config::ReadOptions;
use crate::errors::{Result, SubtitleError};
use crate::style::Dialect;
use crate::subtitles::Subtitles;

/// File formats recognized by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtitleFormat {
    Srt,
    Ssa,
    Stl,
    Teletext,
    Ttml,
    WebVtt,
}

impl SubtitleFormat {
    /// Every recognized format
    pub const ALL: [SubtitleFormat; 6] = [
        SubtitleFormat::Srt,
        SubtitleFormat::Ssa,
        SubtitleFormat::Stl,
        SubtitleFormat::Teletext,
        SubtitleFormat::Ttml,
        SubtitleFormat::WebVtt,
    ];

    /// Maps an extension, with or without the leading dot, to a format
    pub fn from_extension(extension: &str) -> Result<Self> {
        let normalized = extension.trim_start_matches('.').to_lowercase();
        match normalized.as_str() {
            "srt" => Ok(Self::Srt),
            "ssa" | "ass" => Ok(Self::Ssa),
            "stl" => Ok(Self::Stl),
            "ts" => Ok(Self::Teletext),
            "ttml" => Ok(Self::Ttml),
            "vtt" => Ok(Self::WebVtt),
            _ => Err(SubtitleError::UnsupportedFormat(extension.to_string())),
        }
    }

    /// Format of a file, judged by its extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_string())
            .ok_or_else(|| SubtitleError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(&extension)
    }

    /// Canonical extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Ssa => "ass",
            Self::Stl => "stl",
            Self::Teletext => "ts",
            Self::Ttml => "ttml",
            Self::WebVtt => "vtt",
        }
    }

    /// Styling vocabulary of this format
    pub fn dialect(&self) -> Dialect {
        match self {
            Self::Srt => Dialect::Srt,
            Self::Ssa => Dialect::Ssa,
            Self::Stl => Dialect::Stl,
            Self::Teletext => Dialect::Teletext,
            Self::Ttml => Dialect::Ttml,
            Self::WebVtt => Dialect::WebVtt,
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Srt => "SRT",
            Self::Ssa => "SSA",
            Self::Stl => "EBU-STL",
            Self::Teletext => "Teletext",
            Self::Ttml => "TTML",
            Self::WebVtt => "WebVTT",
        };
        f.write_str(name)
    }
}

/// Builds a document from a byte stream
pub trait SubtitleReader {
    fn read(&self, input: &mut dyn Read, options: &ReadOptions) -> Result<Subtitles>;
}

/// Serializes a document to a byte stream
pub trait SubtitleWriter {
    fn write(&self, subtitles: &Subtitles, output: &mut dyn Write) -> Result<()>;
}

/// Registry of readers and writers per format
pub struct Codecs {
    readers: HashMap<SubtitleFormat, Box<dyn SubtitleReader>>,
    writers: HashMap<SubtitleFormat, Box<dyn SubtitleWriter>>,
}

impl Codecs {
    /// Registry without any codec
    pub fn empty() -> Self {
        Self {
            readers: HashMap::new(),
            writers: HashMap::new(),
        }
    }

    /// Adds or replaces the reader for `format`
    pub fn register_reader<R: SubtitleReader + 'static>(&mut self, format: SubtitleFormat, reader: R) {
        self.readers.insert(format, Box::new(reader));
    }

    /// Adds or replaces the writer for `format`
    pub fn register_writer<W: SubtitleWriter + 'static>(&mut self, format: SubtitleFormat, writer: W) {
        self.writers.insert(format, Box::new(writer));
    }

    pub fn can_read(&self, format: SubtitleFormat) -> bool {
        self.readers.contains_key(&format)
    }

    pub fn can_write(&self, format: SubtitleFormat) -> bool {
        self.writers.contains_key(&format)
    }

    fn reader(&self, format: SubtitleFormat) -> Result<&dyn SubtitleReader> {
        self.readers
            .get(&format)
            .map(|reader| reader.as_ref())
            .ok_or_else(|| SubtitleError::CodecUnavailable {
                format: format.to_string(),
                operation: "reader",
            })
    }

    fn writer(&self, format: SubtitleFormat) -> Result<&dyn SubtitleWriter> {
        self.writers
            .get(&format)
            .map(|writer| writer.as_ref())
            .ok_or_else(|| SubtitleError::CodecUnavailable {
                format: format.to_string(),
                operation: "writer",
            })
    }

    /// Reads a document in `format` from a stream
    pub fn read_from(&self, format: SubtitleFormat, input: &mut dyn Read, options: &ReadOptions) -> Result<Subtitles> {
        self.reader(format)?.read(input, options)
    }

    /// Writes a document in `format` to a stream
    pub fn write_to(&self, format: SubtitleFormat, subtitles: &Subtitles, output: &mut dyn Write) -> Result<()> {
        self.writer(format)?.write(subtitles, output)
    }

    /// Opens a file, choosing the reader from its extension
    pub fn open<P: AsRef<Path>>(&self, path: P, options: &ReadOptions) -> Result<Subtitles> {
        let path = path.as_ref();
        let format = SubtitleFormat::from_path(path)?;
        let reader = self.reader(format)?;

        let file = File::open(path).map_err(|e| SubtitleError::io(path, e))?;
        let mut input = BufReader::new(file);
        let subtitles = reader.read(&mut input, options)?;

        debug!("Read {} item(s) from {} ({})", subtitles.items.len(), path.display(), format);
        Ok(subtitles)
    }

    /// Writes a file, choosing the writer from its extension
    pub fn write<P: AsRef<Path>>(&self, subtitles: &Subtitles, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = SubtitleFormat::from_path(path)?;
        let writer = self.writer(format)?;
        if subtitles.is_empty() {
            return Err(SubtitleError::NoSubtitlesToWrite);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SubtitleError::io(parent, e))?;
        }
        let file = File::create(path).map_err(|e| SubtitleError::io(path, e))?;
        let mut output = BufWriter::new(file);
        writer.write(subtitles, &mut output)?;
        output.flush().map_err(|e| SubtitleError::io(path, e))?;

        debug!("Wrote {} item(s) to {} ({})", subtitles.items.len(), path.display(), format);
        Ok(())
    }
}

impl Default for Codecs {
    fn default() -> Self {
        let mut codecs = Self::empty();
        codecs.register_reader(SubtitleFormat::Srt, srt::SrtReader);
        codecs.register_writer(SubtitleFormat::Srt, srt::SrtWriter);
        codecs.register_reader(SubtitleFormat::WebVtt, webvtt::WebVttReader);
        codecs.register_writer(SubtitleFormat::WebVtt, webvtt::WebVttWriter);
        codecs
    }
}

/// Opens a file with the built-in codecs
pub fn open<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Subtitles> {
    Codecs::default().open(path, options)
}

/// Writes a file with the built-in codecs
pub fn write<P: AsRef<Path>>(subtitles: &Subtitles, path: P) -> Result<()> {
    Codecs::default().write(subtitles, path)
}
