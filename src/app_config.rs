use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Configuration module
/// Format-specific read options and front-end settings, loaded from and
/// saved to JSON.

// @const: Valid teletext page range
const MIN_TELETEXT_PAGE: u16 = 100;
const MAX_TELETEXT_PAGE: u16 = 899;

/// Top-level configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Options {
    /// Options handed to readers
    #[serde(default)]
    pub read: ReadOptions,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Options handed to every reader; each format picks what it needs
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ReadOptions {
    /// Teletext page selection
    #[serde(default)]
    pub teletext: TeletextOptions,

    /// EBU-STL profile
    #[serde(default)]
    pub stl: StlOptions,
}

/// Which teletext page carries the subtitles
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct TeletextOptions {
    // @field: Page number (e.g. 888), None to pick the first subtitle page
    #[serde(default)]
    pub page: Option<u16>,

    // @field: Elementary stream PID, None to scan every stream
    #[serde(default)]
    pub pid: Option<u16>,
}

impl TeletextOptions {
    // @returns: Magazine digit of the selected page
    pub fn magazine(&self) -> Option<u8> {
        self.page.map(|page| (page / 100 % 8) as u8)
    }
}

/// EBU-STL reading profile
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct StlOptions {
    // @field: Keep cue times relative to the file instead of the programme start
    #[serde(default)]
    pub ignore_timecode_start_of_programme: bool,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Options {
    /// Load options from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let options: Options = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        options.validate()?;
        Ok(options)
    }

    /// Save options as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(page) = self.read.teletext.page {
            if !(MIN_TELETEXT_PAGE..=MAX_TELETEXT_PAGE).contains(&page) {
                return Err(anyhow!(
                    "Teletext page {} is outside {}..={}",
                    page, MIN_TELETEXT_PAGE, MAX_TELETEXT_PAGE
                ));
            }
        }
        Ok(())
    }
}
