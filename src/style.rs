/*!
 * Style attributes for every supported dialect and the translators between them.
 *
 * `StyleAttributes` is a flat bag grouped by dialect. A reader fills the
 * group of its own dialect; a writer asks for the group it needs to be
 * derived from whatever the reader provided by calling one of the
 * `propagate_*` translators. Each translator only writes the fields of its
 * target dialect, so one record can feed several writers in turn.
 */

use crate::color::Color;

/// Average WebVTT line height, as a percentage of the viewport
const WEBVTT_LINE_HEIGHT: f64 = 5.0;

/// Broadcast teletext row count
const TELETEXT_MAX_ROWS: i32 = 23;

/// TTML writing modes starting with this are vertical
const VERTICAL_WRITING_MODE_PREFIX: &str = "tb";

/// Subtitle styling vocabularies known to the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Srt,
    Ssa,
    Stl,
    Teletext,
    Ttml,
    WebVtt,
}

/// EBU-STL horizontal justification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Justification {
    /// Keep whatever the display currently uses
    Unchanged,
    Left,
    Centered,
    Right,
}

/// EBU-STL vertical placement of a subtitle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StlPosition {
    /// Row of the first line, counted from the top
    pub vertical_position: i32,
    /// Number of displayable rows
    pub max_rows: i32,
    /// Number of rows the subtitle spans
    pub rows: i32,
}

/// A WebVTT cue text tag such as `<c.yellow>` or `<v Bob>`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WebVttTag {
    pub name: String,
    pub annotation: String,
    pub classes: Vec<String>,
}

impl WebVttTag {
    /// Tag without classes or annotation
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Opening tag, empty for a nameless tag
    pub fn start_tag(&self) -> String {
        if self.name.is_empty() {
            return String::new();
        }

        let mut tag = self.name.clone();
        if !self.classes.is_empty() {
            tag.push('.');
            tag.push_str(&self.classes.join("."));
        }
        if !self.annotation.is_empty() {
            tag.push(' ');
            tag.push_str(&self.annotation);
        }
        format!("<{}>", tag)
    }

    /// Closing tag, empty for a nameless tag
    pub fn end_tag(&self) -> String {
        if self.name.is_empty() {
            return String::new();
        }
        format!("</{}>", self.name)
    }
}

/// SubRip styling
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SrtAttributes {
    pub bold: bool,
    /// Raw `<font color>` value
    pub color: Option<String>,
    pub italics: bool,
    /// `{\anN}` numpad position, 0 when unset
    pub position: u8,
    pub underline: bool,
}

/// SubStation Alpha / Advanced SubStation styling
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SsaAttributes {
    pub alignment: Option<i32>,
    pub alpha_level: Option<f64>,
    /// Degrees
    pub angle: Option<f64>,
    pub back_colour: Option<Color>,
    pub bold: Option<bool>,
    pub border_style: Option<i32>,
    pub effect: String,
    pub encoding: Option<i32>,
    pub font_name: String,
    pub font_size: Option<f64>,
    pub italic: Option<bool>,
    pub layer: Option<i32>,
    /// Pixels
    pub margin_left: Option<i32>,
    /// Pixels
    pub margin_right: Option<i32>,
    /// Pixels
    pub margin_vertical: Option<i32>,
    pub marked: Option<bool>,
    /// Pixels
    pub outline: Option<f64>,
    pub outline_colour: Option<Color>,
    pub primary_colour: Option<Color>,
    /// Percent
    pub scale_x: Option<f64>,
    /// Percent
    pub scale_y: Option<f64>,
    pub secondary_colour: Option<Color>,
    /// Pixels
    pub shadow: Option<f64>,
    /// Pixels
    pub spacing: Option<f64>,
    pub strikeout: Option<bool>,
    pub underline: Option<bool>,
}

/// EBU-STL styling
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StlAttributes {
    pub boxing: Option<bool>,
    pub italics: Option<bool>,
    pub justification: Option<Justification>,
    pub position: Option<StlPosition>,
    pub underline: Option<bool>,
}

/// Teletext styling
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TeletextAttributes {
    pub color: Option<Color>,
    pub double_height: Option<bool>,
    pub double_size: Option<bool>,
    pub double_width: Option<bool>,
    pub spaces_after: Option<i32>,
    pub spaces_before: Option<i32>,
}

/// TTML styling, kept as the raw attribute values
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TtmlAttributes {
    pub background_color: Option<String>,
    pub color: Option<String>,
    pub direction: Option<String>,
    pub display: Option<String>,
    pub display_align: Option<String>,
    pub extent: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub font_style: Option<String>,
    pub font_weight: Option<String>,
    pub line_height: Option<String>,
    pub opacity: Option<String>,
    pub origin: Option<String>,
    pub overflow: Option<String>,
    pub padding: Option<String>,
    pub show_background: Option<String>,
    pub text_align: Option<String>,
    pub text_decoration: Option<String>,
    pub text_outline: Option<String>,
    pub unicode_bidi: Option<String>,
    pub visibility: Option<String>,
    pub wrap_option: Option<String>,
    pub writing_mode: Option<String>,
    pub z_index: Option<i32>,
}

/// WebVTT cue settings, region settings and text tags
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WebVttAttributes {
    pub align: String,
    pub bold: bool,
    pub italics: bool,
    pub line: String,
    pub lines: i32,
    pub position: String,
    pub region_anchor: String,
    pub scroll: String,
    pub size: String,
    pub styles: Vec<String>,
    pub tags: Vec<WebVttTag>,
    pub underline: bool,
    pub vertical: String,
    pub viewport_anchor: String,
    pub width: String,
}

/// Every style property of every dialect
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyleAttributes {
    pub srt: SrtAttributes,
    pub ssa: SsaAttributes,
    pub stl: StlAttributes,
    pub teletext: TeletextAttributes,
    pub ttml: TtmlAttributes,
    pub webvtt: WebVttAttributes,
}

impl StyleAttributes {
    /// Runs the translator whose source is `dialect`
    pub fn propagate(&mut self, dialect: Dialect) {
        match dialect {
            Dialect::Srt => self.propagate_srt_attributes(),
            Dialect::Ssa => self.propagate_ssa_attributes(),
            Dialect::Stl => self.propagate_stl_attributes(),
            Dialect::Teletext => self.propagate_teletext_attributes(),
            Dialect::Ttml => self.propagate_ttml_attributes(),
            Dialect::WebVtt => self.propagate_webvtt_attributes(),
        }
    }

    /// Copy of these attributes with `target`'s fields derived from the other
    /// dialects when the reader left them empty.
    ///
    /// Writers call this before emitting styling. Fields the target dialect
    /// already carries are never overwritten.
    pub fn resolved_for(&self, target: Dialect) -> StyleAttributes {
        let mut resolved = self.clone();
        match target {
            Dialect::WebVtt if resolved.webvtt == WebVttAttributes::default() => {
                if resolved.srt != SrtAttributes::default() {
                    resolved.propagate_srt_attributes();
                }
                if resolved.stl != StlAttributes::default() {
                    resolved.propagate_stl_attributes();
                }
                if resolved.ttml != TtmlAttributes::default() {
                    resolved.propagate_ttml_attributes();
                }
            }
            Dialect::Srt if resolved.srt == SrtAttributes::default() => {
                if resolved.ttml.color.is_none() {
                    resolved.propagate_teletext_attributes();
                }
                resolved.propagate_webvtt_attributes();
            }
            Dialect::Ttml if resolved.ttml.color.is_none() => {
                resolved.propagate_teletext_attributes();
                if resolved.ttml.color.is_none() && resolved.srt.color.is_some() {
                    resolved.propagate_srt_attributes();
                }
            }
            _ => {}
        }
        resolved
    }

    /// SRT into WebVTT cue settings and tags, and TTML color
    pub fn propagate_srt_attributes(&mut self) {
        if let Some(color) = &self.srt.color {
            self.ttml.color = Some(color.clone());
        }

        // Numpad layout: 7 8 9 on top, 4 5 6 in the middle, 1 2 3 at the bottom
        let row = match self.srt.position {
            7..=9 => Some("10%"),
            4..=6 => Some("50%"),
            1..=3 => Some("90%"),
            _ => None,
        };
        if let Some(row) = row {
            self.webvtt.position = row.to_string();
            match self.srt.position % 3 {
                1 => self.webvtt.align = "left".to_string(),
                0 => self.webvtt.align = "right".to_string(),
                _ => {}
            }
        }

        self.webvtt.bold = self.srt.bold;
        self.webvtt.italics = self.srt.italics;
        self.webvtt.underline = self.srt.underline;

        self.webvtt.tags.clear();
        if self.webvtt.bold {
            self.webvtt.tags.push(WebVttTag::named("b"));
        }
        if self.webvtt.italics {
            self.webvtt.tags.push(WebVttTag::named("i"));
        }
        if self.webvtt.underline {
            self.webvtt.tags.push(WebVttTag::named("u"));
        }
    }

    /// SSA styling has no mapping to other dialects yet
    pub fn propagate_ssa_attributes(&mut self) {}

    /// STL justification and row into WebVTT align and line
    pub fn propagate_stl_attributes(&mut self) {
        match self.stl.justification {
            Some(Justification::Right) => self.webvtt.align = "right".to_string(),
            Some(Justification::Left) => self.webvtt.align = "left".to_string(),
            Some(Justification::Centered) | Some(Justification::Unchanged) | None => {}
        }

        if let Some(position) = self.stl.position.filter(|p| p.max_rows > 0) {
            // WebVTT lines count from 0% at the top while teletext rows start
            // at 1, so the last teletext row would otherwise hang off screen
            let row = if position.max_rows == TELETEXT_MAX_ROWS && position.vertical_position > 0 {
                position.vertical_position - 1
            } else {
                position.vertical_position
            };
            self.webvtt.line = format!("{}%", i64::from(row) * 100 / i64::from(position.max_rows));
        }
    }

    /// Teletext color into TTML color
    pub fn propagate_teletext_attributes(&mut self) {
        if let Some(color) = self.teletext.color {
            self.ttml.color = Some(format!("#{}", color.ttml_string()));
        }
    }

    /// TTML region geometry into WebVTT region and cue settings
    pub fn propagate_ttml_attributes(&mut self) {
        if let Some(align) = &self.ttml.text_align {
            self.webvtt.align = align.clone();
        }

        let vertical = self
            .ttml
            .writing_mode
            .as_deref()
            .is_some_and(|mode| mode.starts_with(VERTICAL_WRITING_MODE_PREFIX));

        if let Some(extent) = &self.ttml.extent {
            let dimensions: Vec<&str> = extent.split_whitespace().collect();
            if let [width, height, ..] = dimensions.as_slice() {
                self.webvtt.width = width.to_string();
                if let Some(height_value) = parse_length(height) {
                    self.webvtt.lines = (height_value / WEBVTT_LINE_HEIGHT).floor() as i32;
                }
                self.webvtt.size = if vertical { width.to_string() } else { height.to_string() };
            }
        }

        if let Some(origin) = &self.ttml.origin {
            let coordinates: Vec<&str> = origin.split_whitespace().collect();
            self.webvtt.region_anchor = "0%,0%".to_string();
            self.webvtt.viewport_anchor = coordinates.join(",");
            self.webvtt.scroll = "up".to_string();
            if let [x, y, ..] = coordinates.as_slice() {
                let (line, position) = if vertical { (y, x) } else { (x, y) };
                self.webvtt.line = line.to_string();
                self.webvtt.position = position.to_string();
            }
        }
    }

    /// WebVTT flags and TTML color back into SRT
    pub fn propagate_webvtt_attributes(&mut self) {
        if let Some(color) = &self.ttml.color {
            self.srt.color = Some(color.clone());
        }
        self.srt.bold = self.webvtt.bold;
        self.srt.italics = self.webvtt.italics;
        self.srt.underline = self.webvtt.underline;
    }
}

/// Numeric part of a TTML length such as `20%` or `120px`
fn parse_length(value: &str) -> Option<f64> {
    let number = value
        .trim()
        .trim_end_matches('%')
        .trim_end_matches("px");
    number.parse::<f64>().ok()
}
