/*!
 * WebVTT (`.vtt`) reader and writer.
 *
 * A document is a `WEBVTT` header followed by blocks separated by blank
 * lines: `NOTE` comments, `STYLE` sheets, `REGION` definitions and cues.
 * Cue settings and text tags land in the WebVTT group of the style
 * attributes; the writer derives them from other dialects when needed.
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
use crate::style::{Dialect, StyleAttributes, WebVttAttributes, WebVttTag};
use crate::subtitles::{Item, Line, LineItem, Region, Subtitles, WebVttTimestampMap};

const HEADER: &str = "WEBVTT";
const TIME_ARROW: &str = "-->";
const TIMESTAMP_MAP_PREFIX: &str = "X-TIMESTAMP-MAP=";
const BOM: char = '\u{feff}';

// @const: Any cue text tag, including karaoke timestamps
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<([^>]*)>").unwrap());

/// Reads WebVTT documents
#[derive(Debug, Clone, Copy, Default)]
pub struct WebVttReader;

/// Writes WebVTT documents
#[derive(Debug, Clone, Copy, Default)]
pub struct WebVttWriter;

/// Consecutive non-blank lines and the line number of the first one
struct Block {
    first_line: usize,
    lines: Vec<String>,
}

impl SubtitleReader for WebVttReader {
    fn read(&self, input: &mut dyn Read, _options: &ReadOptions) -> Result<Subtitles> {
        let blocks = read_blocks(input)?;
        let mut blocks = blocks.into_iter();

        let header = blocks
            .next()
            .filter(|b| b.first_line == 1 && b.lines[0].starts_with(HEADER))
            .ok_or_else(|| SubtitleError::parse(1, "missing WEBVTT header"))?;

        let mut subtitles = Subtitles::new();
        subtitles.metadata.webvtt_timestamp_map = parse_header(&header)?;

        let mut comments = Vec::new();
        for block in blocks {
            let first = block.lines[0].as_str();
            if first == "NOTE" || first.starts_with("NOTE ") || first.starts_with("NOTE\t") {
                comments.push(parse_note(&block));
            } else if first == "STYLE" {
                debug!("Skipping STYLE block at line {}", block.first_line);
            } else if first == "REGION" {
                if let Some(region) = parse_region(&block) {
                    subtitles.add_region(region);
                }
            } else if let Some(mut item) = parse_cue(&block, &mut subtitles)? {
                item.comments = std::mem::take(&mut comments);
                subtitles.items.push(item);
            }
        }
        subtitles.metadata.comments = comments;

        debug!("Parsed {} WebVTT item(s)", subtitles.items.len());
        Ok(subtitles)
    }
}

impl SubtitleWriter for WebVttWriter {
    fn write(&self, subtitles: &Subtitles, output: &mut dyn Write) -> Result<()> {
        if subtitles.is_empty() {
            return Err(SubtitleError::NoSubtitlesToWrite);
        }

        writeln!(output, "{}", HEADER)?;
        if let Some(map) = &subtitles.metadata.webvtt_timestamp_map {
            writeln!(
                output,
                "{}MPEGTS:{},LOCAL:{}",
                TIMESTAMP_MAP_PREFIX,
                map.mpegts,
                TimestampFormat::WEBVTT.format(map.local)
            )?;
        }
        writeln!(output)?;

        for region in subtitles.regions.values() {
            write_region(region, output)?;
        }

        for (i, item) in subtitles.items.iter().enumerate() {
            for comment in &item.comments {
                if comment.contains('\n') {
                    writeln!(output, "NOTE\n{}\n", comment)?;
                } else {
                    writeln!(output, "NOTE {}\n", comment)?;
                }
            }

            writeln!(output, "{}", i + 1)?;
            writeln!(
                output,
                "{} {} {}{}",
                TimestampFormat::WEBVTT.format(item.start_at),
                TIME_ARROW,
                TimestampFormat::WEBVTT.format(item.end_at),
                cue_settings(item)
            )?;
            for line in &item.lines {
                writeln!(output, "{}", render_line(line))?;
            }
            writeln!(output)?;
        }

        Ok(())
    }
}

fn read_blocks(input: &mut dyn Read) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut current: Option<Block> = None;

    for (n, line) in LineScanner::new(input).enumerate() {
        let mut line = line?;
        if n == 0 {
            line = line.trim_start_matches(BOM).to_string();
        }

        if line.trim().is_empty() {
            blocks.extend(current.take());
            continue;
        }
        current
            .get_or_insert_with(|| Block { first_line: n + 1, lines: Vec::new() })
            .lines
            .push(line);
    }
    blocks.extend(current);
    Ok(blocks)
}

fn parse_header(block: &Block) -> Result<Option<WebVttTimestampMap>> {
    let Some(value) = block
        .lines
        .iter()
        .find_map(|l| l.trim().strip_prefix(TIMESTAMP_MAP_PREFIX))
    else {
        return Ok(None);
    };

    let mut map = WebVttTimestampMap::default();
    for part in value.split(',') {
        match part.trim().split_once(':') {
            Some(("MPEGTS", ticks)) => {
                map.mpegts = ticks.trim().parse().map_err(|e| SubtitleError::InvalidNumber {
                    value: ticks.to_string(),
                    source: e,
                })?;
            }
            Some(("LOCAL", local)) => map.local = TimestampFormat::WEBVTT.parse(local.trim())?,
            _ => warn!("Ignoring unknown timestamp map field {:?}", part),
        }
    }
    Ok(Some(map))
}

fn parse_note(block: &Block) -> String {
    let mut lines = Vec::new();
    let first = block.lines[0].trim_start_matches("NOTE").trim();
    if !first.is_empty() {
        lines.push(first);
    }
    lines.extend(block.lines[1..].iter().map(String::as_str));
    lines.join("\n")
}

fn parse_region(block: &Block) -> Option<Region> {
    let mut id = None;
    let mut attributes = StyleAttributes::default();

    for setting in block.lines[1..].iter().flat_map(|l| l.split_whitespace()) {
        let Some((key, value)) = setting.split_once(':') else {
            continue;
        };
        let webvtt = &mut attributes.webvtt;
        match key {
            "id" => id = Some(value.to_string()),
            "width" => webvtt.width = value.to_string(),
            "lines" => webvtt.lines = value.parse().unwrap_or_default(),
            "regionanchor" => webvtt.region_anchor = value.to_string(),
            "viewportanchor" => webvtt.viewport_anchor = value.to_string(),
            "scroll" => webvtt.scroll = value.to_string(),
            _ => debug!("Ignoring region setting {:?}", key),
        }
    }

    let Some(id) = id else {
        warn!("Ignoring REGION block without id at line {}", block.first_line);
        return None;
    };
    let has_settings = attributes.webvtt != WebVttAttributes::default();
    Some(Region {
        inline_style: has_settings.then_some(attributes),
        ..Region::new(&id)
    })
}

fn parse_cue(block: &Block, subtitles: &mut Subtitles) -> Result<Option<Item>> {
    let Some(timing_at) = block.lines.iter().take(2).position(|l| l.contains(TIME_ARROW)) else {
        warn!("Ignoring block without timing at line {}", block.first_line);
        return Ok(None);
    };
    let line_number = block.first_line + timing_at;
    let (start, rest) = block.lines[timing_at]
        .split_once(TIME_ARROW)
        .ok_or_else(|| SubtitleError::parse(line_number, "missing time separator"))?;
    let mut fields = rest.split_whitespace();
    let end = fields
        .next()
        .ok_or_else(|| SubtitleError::parse(line_number, "missing end timestamp"))?;

    let parse = |value: &str| {
        TimestampFormat::WEBVTT
            .parse(value.trim())
            .map_err(|e| SubtitleError::parse(line_number, e.to_string()))
    };

    let identifier = (timing_at == 1).then(|| block.lines[0].trim());
    let mut item = Item {
        index: identifier
            .and_then(|id| id.parse().ok())
            .unwrap_or(subtitles.items.len() + 1),
        start_at: parse(start)?,
        end_at: parse(end)?,
        ..Item::default()
    };

    let mut settings = StyleAttributes::default();
    for setting in fields {
        let Some((key, value)) = setting.split_once(':') else {
            continue;
        };
        let webvtt = &mut settings.webvtt;
        match key {
            "align" => webvtt.align = value.to_string(),
            "line" => webvtt.line = value.to_string(),
            "position" => webvtt.position = value.to_string(),
            "size" => webvtt.size = value.to_string(),
            "vertical" => webvtt.vertical = value.to_string(),
            "region" => {
                if subtitles.region(value).is_none() {
                    subtitles.add_region(Region::new(value));
                }
                item.region = Some(value.to_string());
            }
            _ => debug!("Ignoring cue setting {:?} at line {}", key, line_number),
        }
    }
    if settings.webvtt != WebVttAttributes::default() {
        item.inline_style = Some(settings);
    }

    let mut text = CueTextParser::default();
    item.lines = block.lines[timing_at + 1..]
        .iter()
        .map(|raw| text.parse_line(raw))
        .filter(|line| !line.items.is_empty())
        .collect();

    Ok(Some(item))
}

/// Tag state carried across the lines of one cue
#[derive(Default)]
struct CueTextParser {
    tags: Vec<WebVttTag>,
    voice: Option<String>,
    karaoke: Option<TimeDelta>,
}

impl CueTextParser {
    fn parse_line(&mut self, raw: &str) -> Line {
        let mut line = Line {
            voice_name: self.voice.clone(),
            ..Line::default()
        };
        let mut last = 0;

        for caps in TAG_REGEX.captures_iter(raw) {
            let Some(whole) = caps.get(0) else { continue };
            self.push_run(&mut line, &raw[last..whole.start()]);
            last = whole.end();
            self.apply_tag(&mut line, caps[1].trim());
        }
        self.push_run(&mut line, &raw[last..]);
        line
    }

    fn apply_tag(&mut self, line: &mut Line, content: &str) {
        if let Some(name) = content.strip_prefix('/') {
            let name = name.trim();
            if name == "v" {
                self.voice = None;
            } else if let Some(open) = self.tags.iter().rposition(|t| t.name == name) {
                self.tags.truncate(open);
            }
            return;
        }

        if content.starts_with(|c: char| c.is_ascii_digit()) {
            match TimestampFormat::WEBVTT.parse(content) {
                Ok(at) => self.karaoke = Some(at),
                Err(e) => warn!("Ignoring invalid cue timestamp {:?}: {}", content, e),
            }
            return;
        }

        let (head, annotation) = content
            .split_once(char::is_whitespace)
            .map(|(head, annotation)| (head, annotation.trim()))
            .unwrap_or((content, ""));
        let mut parts = head.split('.');
        let name = parts.next().unwrap_or_default().to_lowercase();

        if name == "v" {
            self.voice = Some(annotation.to_string());
            line.voice_name = self.voice.clone();
            return;
        }
        self.tags.push(WebVttTag {
            name,
            annotation: annotation.to_string(),
            classes: parts.map(str::to_string).collect(),
        });
    }

    fn push_run(&self, line: &mut Line, text: &str) {
        if text.is_empty() {
            return;
        }

        let inline_style = (!self.tags.is_empty()).then(|| {
            let has = |name: &str| self.tags.iter().any(|t| t.name == name);
            let mut attributes = StyleAttributes::default();
            attributes.webvtt.bold = has("b");
            attributes.webvtt.italics = has("i");
            attributes.webvtt.underline = has("u");
            attributes.webvtt.tags = self.tags.clone();
            attributes.propagate_webvtt_attributes();
            attributes
        });
        line.items.push(LineItem {
            text: unescape(text),
            start_at: self.karaoke,
            style: None,
            inline_style,
        });
    }
}

fn write_region(region: &Region, output: &mut dyn Write) -> Result<()> {
    writeln!(output, "REGION")?;
    write!(output, "id:{}", region.id)?;

    if let Some(style) = &region.inline_style {
        let webvtt = style.resolved_for(Dialect::WebVtt).webvtt;
        for (key, value) in [
            ("width", &webvtt.width),
            ("regionanchor", &webvtt.region_anchor),
            ("viewportanchor", &webvtt.viewport_anchor),
            ("scroll", &webvtt.scroll),
        ] {
            if !value.is_empty() {
                write!(output, " {}:{}", key, value)?;
            }
        }
        if webvtt.lines > 0 {
            write!(output, " lines:{}", webvtt.lines)?;
        }
    }
    writeln!(output, "\n")?;
    Ok(())
}

fn cue_settings(item: &Item) -> String {
    let mut settings = String::new();
    if let Some(style) = &item.inline_style {
        let webvtt = style.resolved_for(Dialect::WebVtt).webvtt;
        for (key, value) in [
            ("align", &webvtt.align),
            ("line", &webvtt.line),
            ("position", &webvtt.position),
            ("size", &webvtt.size),
            ("vertical", &webvtt.vertical),
        ] {
            if !value.is_empty() {
                settings.push_str(&format!(" {}:{}", key, value));
            }
        }
    }
    if let Some(region) = &item.region {
        settings.push_str(&format!(" region:{}", region));
    }
    settings
}

fn render_line(line: &Line) -> String {
    let mut rendered = String::new();
    if let Some(voice) = &line.voice_name {
        rendered.push_str(&format!("<v {}>", voice));
    }

    for run in &line.items {
        if let Some(at) = run.start_at {
            rendered.push_str(&format!("<{}>", TimestampFormat::WEBVTT.format(at)));
        }
        let tags = run
            .inline_style
            .as_ref()
            .map(|style| style.resolved_for(Dialect::WebVtt).webvtt.tags)
            .unwrap_or_default();

        for tag in &tags {
            rendered.push_str(&tag.start_tag());
        }
        rendered.push_str(&escape(&run.text));
        for tag in tags.iter().rev() {
            rendered.push_str(&tag.end_tag());
        }
    }
    rendered
}

fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&lrm;", "\u{200e}")
        .replace("&rlm;", "\u{200f}")
        .replace("&amp;", "&")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
