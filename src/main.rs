// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use chrono::TimeDelta;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use subweave::app_config::{LogLevel, Options};
use subweave::errors::AppError;
use subweave::file_utils::FileManager;
use subweave::{Codecs, SubtitleFormat, Subtitles};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for SubtitleFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Srt,
    Ssa,
    Stl,
    Teletext,
    Ttml,
    Vtt,
}

impl From<CliFormat> for SubtitleFormat {
    fn from(cli_format: CliFormat) -> Self {
        match cli_format {
            CliFormat::Srt => SubtitleFormat::Srt,
            CliFormat::Ssa => SubtitleFormat::Ssa,
            CliFormat::Stl => SubtitleFormat::Stl,
            CliFormat::Teletext => SubtitleFormat::Teletext,
            CliFormat::Ttml => SubtitleFormat::Ttml,
            CliFormat::Vtt => SubtitleFormat::WebVtt,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a subtitle file, or every subtitle file of a directory
    Convert {
        /// Input subtitle file or directory
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Output file, required when converting a single file
        #[arg(value_name = "OUTPUT_PATH")]
        output_path: Option<PathBuf>,

        /// Target format, required when converting a directory
        #[arg(short, long, value_enum)]
        to: Option<CliFormat>,

        /// Where converted files of a directory go (defaults to next to each input)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Drop unused styles and regions before writing
        #[arg(long)]
        optimize: bool,
    },

    /// Shift every cue by a fixed offset
    Shift {
        input_path: PathBuf,
        output_path: PathBuf,

        /// Offset in milliseconds, may be negative
        #[arg(long, allow_hyphen_values = true, value_parser = parse_millis)]
        offset_ms: TimeDelta,
    },

    /// Fix drifting timing from two reference points
    Sync {
        input_path: PathBuf,
        output_path: PathBuf,

        /// First reference point as ACTUAL_MS:DESIRED_MS
        #[arg(long, allow_hyphen_values = true, value_parser = parse_sync_point)]
        from: (TimeDelta, TimeDelta),

        /// Second reference point as ACTUAL_MS:DESIRED_MS
        #[arg(long, allow_hyphen_values = true, value_parser = parse_sync_point)]
        to: (TimeDelta, TimeDelta),
    },

    /// Split cues so none crosses a fixed window boundary
    Fragment {
        input_path: PathBuf,
        output_path: PathBuf,

        /// Window length in milliseconds
        #[arg(long, value_parser = parse_millis)]
        period_ms: TimeDelta,
    },

    /// Merge consecutive cues with identical text
    Unfragment {
        input_path: PathBuf,
        output_path: PathBuf,
    },

    /// Remove every style, region and inline style
    Strip {
        input_path: PathBuf,
        output_path: PathBuf,
    },

    /// Print a summary of a subtitle file
    Info {
        input_path: PathBuf,
    },

    /// Generate shell completions for subweave
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subweave - subtitle conversion and retiming
///
/// Reads subtitles into one document model, transforms their timing and
/// styling, and writes them back in any format with a registered codec.
#[derive(Parser, Debug)]
#[command(name = "subweave")]
#[command(version)]
#[command(about = "Subtitle conversion and retiming tool")]
#[command(long_about = "subweave converts subtitle files between formats and fixes their timing.

EXAMPLES:
    subweave convert movie.srt movie.vtt                 # Convert SRT to WebVTT
    subweave convert --to vtt -o out/ /subs/             # Convert a whole directory
    subweave shift movie.srt fixed.srt --offset-ms -1500 # Show everything 1.5s earlier
    subweave sync movie.srt fixed.srt --from 1000:1200 --to 3600000:3603600
    subweave fragment movie.vtt live.vtt --period-ms 2000
    subweave info movie.srt
    subweave completions bash > subweave.bash

CONFIGURATION:
    Reader options and the log level can be loaded from a JSON file with
    --config. Command line flags take precedence.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and label for log level
    fn get_style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, label) = Self::get_style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the max level does the filtering
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();
    let options = load_options(&cli)?;

    let codecs = Codecs::default();
    match cli.command {
        Commands::Convert { input_path, output_path, to, output_dir, optimize } => {
            if input_path.is_dir() {
                let format = to
                    .map(SubtitleFormat::from)
                    .ok_or_else(|| AppError::InvalidArgument("--to is required when converting a directory".to_string()))?;
                convert_folder(&codecs, &options, &input_path, format, output_dir.as_deref(), optimize)
            } else {
                let output_path = output_path
                    .ok_or_else(|| AppError::InvalidArgument("OUTPUT_PATH is required when converting a file".to_string()))?;
                convert_file(&codecs, &options, &input_path, &output_path, optimize)
            }
        }
        Commands::Shift { input_path, output_path, offset_ms } => {
            transform(&codecs, &options, &input_path, &output_path, |subtitles| {
                subtitles.add(offset_ms);
            })
        }
        Commands::Sync { input_path, output_path, from, to } => {
            transform(&codecs, &options, &input_path, &output_path, |subtitles| {
                subtitles.apply_linear_correction(from.0, from.1, to.0, to.1);
            })
        }
        Commands::Fragment { input_path, output_path, period_ms } => {
            transform(&codecs, &options, &input_path, &output_path, |subtitles| {
                subtitles.fragment(period_ms);
            })
        }
        Commands::Unfragment { input_path, output_path } => {
            transform(&codecs, &options, &input_path, &output_path, Subtitles::unfragment)
        }
        Commands::Strip { input_path, output_path } => {
            transform(&codecs, &options, &input_path, &output_path, Subtitles::remove_styling)
        }
        Commands::Info { input_path } => print_info(&codecs, &options, &input_path),
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subweave", &mut std::io::stdout());
            Ok(())
        }
    }
}

// @loads: Options from --config, with the CLI log level taking precedence
fn load_options(cli: &CommandLineOptions) -> Result<Options> {
    let mut options = match &cli.config {
        Some(path) => Options::from_file(path)?,
        None => Options::default(),
    };

    if let Some(level) = cli.log_level {
        options.log_level = level.into();
    }
    log::set_max_level(options.log_level.into());

    debug!("Using options: {:?}", options);
    Ok(options)
}

// @parses: A signed millisecond count, limited to what fits in nanoseconds
fn parse_millis(value: &str) -> Result<TimeDelta, String> {
    let ms = value
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid milliseconds {:?}: {}", value, e))?;
    TimeDelta::try_milliseconds(ms)
        .filter(|duration| duration.num_nanoseconds().is_some())
        .ok_or_else(|| format!("{} ms is out of range", ms))
}

fn parse_sync_point(value: &str) -> Result<(TimeDelta, TimeDelta), String> {
    let (actual, desired) = value
        .split_once(':')
        .ok_or_else(|| format!("expected ACTUAL_MS:DESIRED_MS, got {:?}", value))?;
    let actual = parse_millis(actual).map_err(|e| format!("actual time: {}", e))?;
    let desired = parse_millis(desired).map_err(|e| format!("desired time: {}", e))?;
    Ok((actual, desired))
}

fn read_input(codecs: &Codecs, options: &Options, input_path: &Path) -> Result<Subtitles> {
    if !FileManager::file_exists(input_path) {
        return Err(AppError::File(format!("Input file does not exist: {:?}", input_path)).into());
    }
    codecs
        .open(input_path, &options.read)
        .with_context(|| format!("Failed to read subtitles from {:?}", input_path))
}

fn write_output(codecs: &Codecs, subtitles: &Subtitles, output_path: &Path) -> Result<()> {
    codecs
        .write(subtitles, output_path)
        .with_context(|| format!("Failed to write subtitles to {:?}", output_path))?;
    info!("Success: {:?}", output_path);
    Ok(())
}

// @applies: One in-place operation between reading and writing
fn transform<F>(codecs: &Codecs, options: &Options, input_path: &Path, output_path: &Path, operation: F) -> Result<()>
where
    F: FnOnce(&mut Subtitles),
{
    let mut subtitles = read_input(codecs, options, input_path)?;
    operation(&mut subtitles);
    if subtitles.is_empty() {
        warn!("No subtitles left after processing {:?}", input_path);
    }
    write_output(codecs, &subtitles, output_path)
}

fn convert_file(codecs: &Codecs, options: &Options, input_path: &Path, output_path: &Path, optimize: bool) -> Result<()> {
    let mut subtitles = read_input(codecs, options, input_path)?;
    if optimize {
        subtitles.optimize();
    }
    write_output(codecs, &subtitles, output_path)
}

// @processes: Every readable subtitle file of a directory, continuing past failures
fn convert_folder(
    codecs: &Codecs,
    options: &Options,
    input_dir: &Path,
    format: SubtitleFormat,
    output_dir: Option<&Path>,
    optimize: bool,
) -> Result<()> {
    if !codecs.can_write(format) {
        return Err(anyhow!("No writer available for {}", format));
    }
    if let Some(dir) = output_dir {
        FileManager::ensure_dir(dir)?;
    }

    info!("Converting subtitles in {:?} to {}", input_dir, format);

    let mut processed_count = 0;
    let mut failed_count = 0;
    for (path, source_format) in FileManager::find_subtitle_files(input_dir)? {
        if source_format == format || !codecs.can_read(source_format) {
            debug!("Skipping {:?}", path);
            continue;
        }

        let target_dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| path.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        let output_path = FileManager::generate_output_path(&path, &target_dir, format.extension());

        if let Err(e) = convert_file(codecs, options, &path, &output_path, optimize) {
            error!("Error processing file: {:#}", e);
            failed_count += 1;
        } else {
            processed_count += 1;
        }
    }

    info!("Finished processing {} files ({} failed)", processed_count, failed_count);
    Ok(())
}

fn print_info(codecs: &Codecs, options: &Options, input_path: &Path) -> Result<()> {
    let format = SubtitleFormat::from_path(input_path).map_err(AppError::from)?;
    let subtitles = read_input(codecs, options, input_path)?;

    let mut stdout = std::io::stdout();
    writeln!(stdout, "Format:   {}", format)?;
    writeln!(stdout, "Items:    {}", subtitles.items.len())?;
    writeln!(stdout, "Duration: {}", subweave::TimestampFormat::SRT.format(subtitles.duration()))?;
    writeln!(stdout, "Styles:   {}", subtitles.styles.len())?;
    writeln!(stdout, "Regions:  {}", subtitles.regions.len())?;
    if !subtitles.metadata.title.is_empty() {
        writeln!(stdout, "Title:    {}", subtitles.metadata.title)?;
    }
    if let Some(first) = subtitles.items.first() {
        writeln!(stdout, "First:    {}", first)?;
    }
    Ok(())
}
