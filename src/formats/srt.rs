/*!
 * SubRip (`.srt`) reader and writer.
 *
 * Cues are blocks of an optional index, a `start --> end` timing line and
 * text lines. Text may carry `<b>`, `<i>`, `<u>` and `<font color>` tags and
 * a leading `{\anN}` numpad position; these become SRT style attributes and
 * are propagated to the other dialects on read.
 */

use std::io::{Read, Write};

use chrono::TimeDelta;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::ReadOptions;
use crate::duration::TimestampFormat;
use crate::errors::{Result, SubtitleError};
use crate::formats::{SubtitleReader, SubtitleWriter};
use crate::scanner::LineScanner;
use crate::style::{Dialect, SrtAttributes, StyleAttributes};
use crate::subtitles::{Item, Line, LineItem, Subtitles};

const TIME_ARROW: &str = "-->";
const BOM: char = '\u{feff}';

// @const: Formatting tags and numpad position overrides
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(/?)(b|i|u|font)\b([^>]*)>|\{\\an([1-9])\}").unwrap()
});

// @const: Color attribute of a font tag
static FONT_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)color\s*=\s*["']?([^"'\s>]+)"#).unwrap()
});

/// Reads SRT documents
#[derive(Debug, Clone, Copy, Default)]
pub struct SrtReader;

/// Writes SRT documents
#[derive(Debug, Clone, Copy, Default)]
pub struct SrtWriter;

impl SubtitleReader for SrtReader {
    fn read(&self, input: &mut dyn Read, _options: &ReadOptions) -> Result<Subtitles> {
        let mut subtitles = Subtitles::new();
        let mut current: Option<Item> = None;
        let mut text: Vec<String> = Vec::new();

        for (n, line) in LineScanner::new(input).enumerate() {
            let mut line = line?;
            let line_number = n + 1;
            if n == 0 {
                line = line.trim_start_matches(BOM).to_string();
            }

            if !line.contains(TIME_ARROW) {
                text.push(line);
                continue;
            }

            let index = pop_index(&mut text);
            match current.take() {
                Some(item) => subtitles.items.push(build_item(item, &text)),
                None if text.iter().any(|l| !l.trim().is_empty()) => {
                    warn!("Ignoring {} line(s) before the first cue", text.len());
                }
                None => {}
            }
            text.clear();

            let (start_at, end_at) = parse_timing(&line, line_number)?;
            current = Some(Item {
                index: index.unwrap_or(subtitles.items.len() + 1),
                start_at,
                end_at,
                ..Item::default()
            });
        }

        if let Some(item) = current {
            subtitles.items.push(build_item(item, &text));
        }

        debug!("Parsed {} SRT item(s)", subtitles.items.len());
        Ok(subtitles)
    }
}

impl SubtitleWriter for SrtWriter {
    fn write(&self, subtitles: &Subtitles, output: &mut dyn Write) -> Result<()> {
        if subtitles.is_empty() {
            return Err(SubtitleError::NoSubtitlesToWrite);
        }

        for (i, item) in subtitles.items.iter().enumerate() {
            writeln!(output, "{}", i + 1)?;
            writeln!(
                output,
                "{} {} {}",
                TimestampFormat::SRT.format(item.start_at),
                TIME_ARROW,
                TimestampFormat::SRT.format(item.end_at)
            )?;

            let position = item
                .inline_style
                .as_ref()
                .map(|style| style.resolved_for(Dialect::Srt).srt.position)
                .filter(|p| (1..=9).contains(p));

            for (n, line) in item.lines.iter().enumerate() {
                let mut rendered = String::new();
                if let (0, Some(position)) = (n, position) {
                    rendered.push_str(&format!("{{\\an{}}}", position));
                }
                for run in &line.items {
                    rendered.push_str(&render_run(run));
                }
                writeln!(output, "{}", rendered)?;
            }
            writeln!(output)?;
        }

        Ok(())
    }
}

/// Removes the index line in front of a timing line, if there is one
fn pop_index(text: &mut Vec<String>) -> Option<usize> {
    while text.last().is_some_and(|l| l.trim().is_empty()) {
        text.pop();
    }

    let index = text.last()?.trim().parse::<usize>().ok()?;
    let separated = text.len() == 1 || text[text.len() - 2].trim().is_empty();
    if !separated {
        return None;
    }
    text.pop();
    Some(index)
}

fn parse_timing(line: &str, line_number: usize) -> Result<(TimeDelta, TimeDelta)> {
    let (start, rest) = line
        .split_once(TIME_ARROW)
        .ok_or_else(|| SubtitleError::parse(line_number, "missing time separator"))?;
    // Anything after the end timestamp is legacy X1/Y1 coordinates
    let end = rest
        .split_whitespace()
        .next()
        .ok_or_else(|| SubtitleError::parse(line_number, "missing end timestamp"))?;

    let parse = |value: &str| {
        TimestampFormat::SRT
            .parse(&value.trim().replace('.', ","))
            .map_err(|e| SubtitleError::parse(line_number, e.to_string()))
    };
    Ok((parse(start)?, parse(end)?))
}

fn build_item(mut item: Item, text: &[String]) -> Item {
    let mut state = SrtAttributes::default();
    let mut colors: Vec<Option<String>> = Vec::new();
    let mut position = None;

    for raw in text.iter().filter(|l| !l.trim().is_empty()) {
        let mut line = Line::default();
        let mut last = 0;

        for caps in TAG_REGEX.captures_iter(raw) {
            let Some(whole) = caps.get(0) else { continue };
            push_run(&mut line, &raw[last..whole.start()], &state);
            last = whole.end();

            if let Some(numpad) = caps.get(4) {
                position = numpad.as_str().parse::<u8>().ok();
                continue;
            }

            let closing = !caps[1].is_empty();
            match caps[2].to_lowercase().as_str() {
                "b" => state.bold = !closing,
                "i" => state.italics = !closing,
                "u" => state.underline = !closing,
                _ => {
                    if closing {
                        colors.pop();
                    } else {
                        let color = FONT_COLOR_REGEX
                            .captures(&caps[3])
                            .map(|c| c[1].to_string());
                        colors.push(color);
                    }
                    state.color = colors.iter().rev().find_map(|c| c.clone());
                }
            }
        }
        push_run(&mut line, &raw[last..], &state);

        if !line.items.is_empty() {
            item.lines.push(line);
        }
    }

    if let Some(position) = position {
        let mut attributes = StyleAttributes::default();
        attributes.srt.position = position;
        attributes.propagate_srt_attributes();
        item.inline_style = Some(attributes);
    }
    item
}

fn push_run(line: &mut Line, text: &str, state: &SrtAttributes) {
    if text.is_empty() {
        return;
    }

    let inline_style = (*state != SrtAttributes::default()).then(|| {
        let mut attributes = StyleAttributes::default();
        attributes.srt = state.clone();
        attributes.propagate_srt_attributes();
        attributes
    });
    line.items.push(LineItem {
        text: text.to_string(),
        inline_style,
        ..LineItem::default()
    });
}

fn render_run(run: &LineItem) -> String {
    let Some(style) = &run.inline_style else {
        return run.text.clone();
    };
    let srt = style.resolved_for(Dialect::Srt).srt;

    let mut open = String::new();
    let mut close = String::new();
    if let Some(color) = &srt.color {
        open.push_str(&format!("<font color=\"{}\">", color));
        close.insert_str(0, "</font>");
    }
    for (enabled, tag) in [(srt.bold, "b"), (srt.italics, "i"), (srt.underline, "u")] {
        if enabled {
            open.push_str(&format!("<{}>", tag));
            close.insert_str(0, &format!("</{}>", tag));
        }
    }
    format!("{}{}{}", open, run.text, close)
}
