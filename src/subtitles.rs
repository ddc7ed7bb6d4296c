/*!
 * Unified subtitle data model.
 *
 * `Subtitles` owns its styles and regions in ID-keyed maps. Items and line
 * items refer to them by ID, so renaming, deduplicating and pruning only ever
 * touch the maps, and a change to a shared style is seen by every item using
 * it.
 */

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveDate, TimeDelta};
use log::debug;

use crate::style::StyleAttributes;

/// A named style, owned by `Subtitles::styles`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Style {
    pub id: String,
    pub inline_style: Option<StyleAttributes>,
    /// Parent style ID, one level only
    pub style: Option<String>,
}

impl Style {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }
}

/// A named on-screen area, owned by `Subtitles::regions`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Region {
    pub id: String,
    pub inline_style: Option<StyleAttributes>,
    /// Style ID applied to the whole region
    pub style: Option<String>,
}

impl Region {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Self::default()
        }
    }
}

/// A run of text sharing the same styling
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineItem {
    pub text: String,
    /// Karaoke timing of this run
    pub start_at: Option<TimeDelta>,
    pub style: Option<String>,
    pub inline_style: Option<StyleAttributes>,
}

impl LineItem {
    /// Unstyled run of text
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// One displayed line made of styled runs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub items: Vec<LineItem>,
    /// Speaker of this line
    pub voice_name: Option<String>,
}

impl Line {
    /// Line holding a single unstyled run
    pub fn from_text<S: Into<String>>(text: S) -> Self {
        Self {
            items: vec![LineItem::text(text)],
            voice_name: None,
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Runs carry their own spacing
        for item in &self.items {
            f.write_str(&item.text)?;
        }
        Ok(())
    }
}

/// One cue: text shown between two instants
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Item {
    pub comments: Vec<String>,
    /// Position in the source file, informational only
    pub index: usize,
    pub start_at: TimeDelta,
    pub end_at: TimeDelta,
    pub lines: Vec<Line>,
    pub region: Option<String>,
    pub style: Option<String>,
    pub inline_style: Option<StyleAttributes>,
}

impl Item {
    /// Unstyled cue with one line per element of `lines`
    pub fn new<S: AsRef<str>>(start_at: TimeDelta, end_at: TimeDelta, lines: &[S]) -> Self {
        Self {
            start_at,
            end_at,
            lines: lines.iter().map(|l| Line::from_text(l.as_ref())).collect(),
            ..Self::default()
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                f.write_str(" - ")?;
            }
            write!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// WebVTT `X-TIMESTAMP-MAP` header
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WebVttTimestampMap {
    /// MPEG-TS presentation time, 90kHz ticks
    pub mpegts: i64,
    pub local: TimeDelta,
}

impl WebVttTimestampMap {
    /// Shift between cue times and the MPEG-TS clock
    pub fn offset(&self) -> TimeDelta {
        TimeDelta::microseconds(self.mpegts * 100 / 9) - self.local
    }
}

/// Document-level information, per dialect where it only exists in one
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    pub comments: Vec<String>,
    pub framerate: u32,
    pub language: String,
    pub title: String,

    pub ssa_collisions: String,
    pub ssa_original_editing: String,
    pub ssa_original_script: String,
    pub ssa_original_timing: String,
    pub ssa_original_translation: String,
    pub ssa_play_depth: Option<i32>,
    pub ssa_play_res_x: Option<i32>,
    pub ssa_play_res_y: Option<i32>,
    pub ssa_scaled_border_and_shadow: bool,
    pub ssa_script_type: String,
    pub ssa_script_updated_by: String,
    pub ssa_synch_point: String,
    pub ssa_timer: Option<f64>,
    pub ssa_update_details: String,
    pub ssa_wrap_style: String,

    pub stl_country_of_origin: String,
    pub stl_creation_date: Option<NaiveDate>,
    pub stl_display_standard_code: String,
    pub stl_editor_contact_details: String,
    pub stl_editor_name: String,
    pub stl_maximum_number_of_displayable_characters_in_any_text_row: Option<i32>,
    pub stl_maximum_number_of_displayable_rows: Option<i32>,
    pub stl_original_episode_title: String,
    pub stl_publisher: String,
    pub stl_revision_date: Option<NaiveDate>,
    pub stl_revision_number: i32,
    pub stl_subtitle_list_reference_code: String,
    pub stl_timecode_start_of_programme: TimeDelta,
    pub stl_translated_episode_title: String,
    pub stl_translated_program_title: String,
    pub stl_translator_contact_details: String,
    pub stl_translator_name: String,

    pub ttml_copyright: String,

    pub webvtt_timestamp_map: Option<WebVttTimestampMap>,
}

/// A subtitle document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subtitles {
    /// Cues, not necessarily in chronological order
    pub items: Vec<Item>,
    pub metadata: Metadata,
    pub regions: BTreeMap<String, Region>,
    pub styles: BTreeMap<String, Style>,
}

impl Subtitles {
    /// Empty document
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn style(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Inserts or replaces a style under its own ID
    pub fn add_style(&mut self, style: Style) {
        self.styles.insert(style.id.clone(), style);
    }

    /// Inserts or replaces a region under its own ID
    pub fn add_region(&mut self, region: Region) {
        self.regions.insert(region.id.clone(), region);
    }

    /// Appends `other`'s items and adopts the styles and regions this
    /// document does not already have.
    ///
    /// On an ID collision the existing entry is kept, and `other`'s items
    /// referring to that ID now resolve to it.
    pub fn merge(&mut self, other: Subtitles) {
        self.items.extend(other.items);
        self.order();

        for (id, region) in other.regions {
            self.regions.entry(id).or_insert(region);
        }
        for (id, style) in other.styles {
            self.styles.entry(id).or_insert(style);
        }
    }

    /// Removes regions and styles nothing refers to
    pub fn optimize(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.remove_unused_regions_and_styles();
    }

    fn remove_unused_regions_and_styles(&mut self) {
        let mut used_regions = BTreeSet::new();
        let mut used_styles = BTreeSet::new();

        for item in &self.items {
            if let Some(region) = &item.region {
                used_regions.insert(region.clone());
            }
            if let Some(style) = &item.style {
                used_styles.insert(style.clone());
            }
            for line_item in item.lines.iter().flat_map(|l| l.items.iter()) {
                if let Some(style) = &line_item.style {
                    used_styles.insert(style.clone());
                }
            }
        }

        let regions_before = self.regions.len();
        self.regions.retain(|id, _| used_regions.contains(id));
        for region in self.regions.values() {
            if let Some(style) = &region.style {
                used_styles.insert(style.clone());
            }
        }

        let styles_before = self.styles.len();
        self.styles.retain(|id, _| used_styles.contains(id));

        debug!(
            "Pruned {} unused region(s) and {} unused style(s)",
            regions_before - self.regions.len(),
            styles_before - self.styles.len()
        );
    }

    /// Drops every style, region and inline style, leaving plain timed text
    pub fn remove_styling(&mut self) {
        self.regions.clear();
        self.styles.clear();
        for item in &mut self.items {
            item.region = None;
            item.style = None;
            item.inline_style = None;
            for line_item in item.lines.iter_mut().flat_map(|l| l.items.iter_mut()) {
                line_item.style = None;
                line_item.inline_style = None;
            }
        }
    }
}
