/*!
 * Integration tests for converting subtitle files between formats
 */

use anyhow::Result;
use chrono::TimeDelta;
use std::fs;
use std::io::{Read, Write};

use subweave::formats::{SubtitleReader, SubtitleWriter};
use subweave::{Codecs, ReadOptions, SubtitleError, SubtitleFormat, Subtitles, open, write};
use crate::common;

/// Test SRT to WebVTT conversion through files, styling included
#[test]
fn test_convert_withSrtInput_shouldWriteEquivalentWebVtt() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_srt(temp_dir.path(), "movie.srt")?;
    let output = temp_dir.path().join("out").join("movie.vtt");

    let subtitles = open(&input, &ReadOptions::default())?;
    assert_eq!(subtitles.items.len(), 3);
    write(&subtitles, &output)?;

    let content = fs::read_to_string(&output)?;
    assert!(content.starts_with("WEBVTT\n\n"));
    assert!(content.contains("00:00:01.000 --> 00:00:04.000\nThis is a <i>test</i> subtitle.\n"));
    assert!(content.contains("00:00:05.000 --> 00:00:09.000 position:10%\nIt contains\nmultiple entries.\n"));

    let reread = open(&output, &ReadOptions::default())?;
    assert_eq!(reread.items.len(), 3);
    for (before, after) in subtitles.items.iter().zip(&reread.items) {
        assert_eq!(before.start_at, after.start_at);
        assert_eq!(before.end_at, after.end_at);
        assert_eq!(before.to_string(), after.to_string());
    }
    Ok(())
}

/// Test WebVTT to SRT conversion keeps timing, text and flags
#[test]
fn test_convert_withWebVttInput_shouldWriteSrt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_vtt(temp_dir.path(), "story.vtt")?;
    let output = temp_dir.path().join("story.srt");

    let subtitles = open(&input, &ReadOptions::default())?;
    assert_eq!(subtitles.items[0].comments, vec!["opening line".to_string()]);
    assert_eq!(subtitles.items[0].lines[0].voice_name.as_deref(), Some("Narrator"));
    write(&subtitles, &output)?;

    let content = fs::read_to_string(&output)?;
    assert_eq!(
        content,
        "1\n00:00:01,000 --> 00:00:03,500\nOnce upon a <b>time</b>\n\n2\n00:00:04,000 --> 00:00:06,000\nthe end\n\n"
    );
    Ok(())
}

/// Test that a WebVTT document survives a write/read cycle with its regions
#[test]
fn test_webvtt_roundTrip_shouldKeepRegionsAndSettings() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_vtt(temp_dir.path(), "story.vtt")?;
    let output = temp_dir.path().join("copy.vtt");

    let subtitles = open(&input, &ReadOptions::default())?;
    write(&subtitles, &output)?;
    let reread = open(&output, &ReadOptions::default())?;

    let region = reread.region("bottom").expect("region should survive");
    let settings = &region.inline_style.as_ref().unwrap().webvtt;
    assert_eq!(settings.width, "80%");
    assert_eq!(settings.lines, 2);

    let item = &reread.items[0];
    assert_eq!(item.region.as_deref(), Some("bottom"));
    assert_eq!(item.inline_style.as_ref().unwrap().webvtt.align, "right");
    assert_eq!(item.comments, vec!["opening line".to_string()]);
    Ok(())
}

/// Test that unknown extensions and missing codecs are reported
#[test]
fn test_open_withUnsupportedFiles_shouldReportFormatErrors() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let text = common::create_test_file(temp_dir.path(), "notes.txt", "hello")?;
    let ttml = common::create_test_file(temp_dir.path(), "movie.ttml", "<tt/>")?;

    assert!(matches!(
        open(&text, &ReadOptions::default()),
        Err(SubtitleError::UnsupportedFormat(_))
    ));
    assert!(matches!(
        open(&ttml, &ReadOptions::default()),
        Err(SubtitleError::CodecUnavailable { .. })
    ));

    let missing = open(temp_dir.path().join("missing.srt"), &ReadOptions::default()).unwrap_err();
    assert_eq!(missing.kind(), subweave::ErrorKind::Io);
    Ok(())
}

/// Test that writing an empty document fails without creating the file
#[test]
fn test_write_withEmptyDocument_shouldNotCreateFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("empty.srt");

    let err = write(&Subtitles::new(), &output).unwrap_err();
    assert!(matches!(err, SubtitleError::NoSubtitlesToWrite));
    assert!(!output.exists());
    Ok(())
}

/// Reader producing a fixed document regardless of input
struct FixedReader;

impl SubtitleReader for FixedReader {
    fn read(&self, _input: &mut dyn Read, _options: &ReadOptions) -> subweave::errors::Result<Subtitles> {
        Ok(common::document(&[(0, 1_000, "from ttml")]))
    }
}

/// Writer listing cue texts one per line
struct PlainWriter;

impl SubtitleWriter for PlainWriter {
    fn write(&self, subtitles: &Subtitles, output: &mut dyn Write) -> subweave::errors::Result<()> {
        for item in &subtitles.items {
            writeln!(output, "{}", item)?;
        }
        Ok(())
    }
}

/// Test that registered codecs take part in file dispatch
#[test]
fn test_codecs_withRegisteredCodecs_shouldDispatchByExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.ttml", "<tt/>")?;
    let output = temp_dir.path().join("movie.ass");

    let mut codecs = Codecs::default();
    codecs.register_reader(SubtitleFormat::Ttml, FixedReader);
    codecs.register_writer(SubtitleFormat::Ssa, PlainWriter);

    let subtitles = codecs.open(&input, &ReadOptions::default())?;
    assert_eq!(subtitles.items[0].end_at, TimeDelta::seconds(1));
    codecs.write(&subtitles, &output)?;

    assert_eq!(fs::read_to_string(&output)?, "from ttml\n");
    Ok(())
}
