/*!
 * Tests for the document model and its hygiene operations
 */

use chrono::TimeDelta;
use subweave::{Item, Line, LineItem, Region, Style, StyleAttributes, Subtitles};

fn item_with(style: Option<&str>, region: Option<&str>) -> Item {
    let mut item = Item::new(TimeDelta::zero(), TimeDelta::seconds(1), &["text"]);
    item.style = style.map(str::to_string);
    item.region = region.map(str::to_string);
    item
}

/// Test that a style reachable only through a region survives optimization
#[test]
fn test_optimize_withStyleReachableThroughRegion_shouldKeepIt() {
    let mut subs = Subtitles::new();
    subs.add_style(Style::new("region_style"));
    subs.add_style(Style::new("dropped"));
    subs.add_region(Region {
        style: Some("region_style".to_string()),
        ..Region::new("top")
    });
    subs.items.push(item_with(None, Some("top")));

    subs.optimize();

    assert!(subs.style("region_style").is_some());
    assert!(subs.style("dropped").is_none());
    assert!(subs.region("top").is_some());
}

/// Test that a style used by a region nothing refers to is dropped with it
#[test]
fn test_optimize_withUnusedRegion_shouldDropItsStyle() {
    let mut subs = Subtitles::new();
    subs.add_style(Style::new("only_in_unused_region"));
    subs.add_region(Region {
        style: Some("only_in_unused_region".to_string()),
        ..Region::new("unused")
    });
    subs.items.push(item_with(None, None));

    subs.optimize();

    assert!(subs.regions.is_empty());
    assert!(subs.styles.is_empty());
}

/// Test that optimizing twice changes nothing more
#[test]
fn test_optimize_twice_shouldBeIdempotent() {
    let mut subs = Subtitles::new();
    subs.add_style(Style::new("a"));
    subs.add_style(Style::new("b"));
    subs.items.push(item_with(Some("a"), None));

    subs.optimize();
    let once = subs.clone();
    subs.optimize();
    assert_eq!(subs, once);
    assert_eq!(subs.styles.len(), 1);
}

/// Test that a shared style is seen by every item referring to it
#[test]
fn test_style_mutation_withSharedId_shouldBeVisibleFromEveryItem() {
    let mut subs = Subtitles::new();
    subs.add_style(Style::new("shared"));
    subs.items.push(item_with(Some("shared"), None));
    subs.items.push(item_with(Some("shared"), None));

    let mut attrs = StyleAttributes::default();
    attrs.srt.bold = true;
    if let Some(style) = subs.styles.get_mut("shared") {
        style.inline_style = Some(attrs);
    }

    for item in &subs.items {
        let id = item.style.as_deref().unwrap();
        let style = subs.style(id).unwrap();
        assert!(style.inline_style.as_ref().unwrap().srt.bold);
    }
}

/// Test that merge interleaves items by start time
#[test]
fn test_merge_withInterleavedItems_shouldOrderThem() {
    let mut first = Subtitles::new();
    first.items.push(Item::new(TimeDelta::seconds(2), TimeDelta::seconds(3), &["b"]));
    first.items.push(Item::new(TimeDelta::seconds(6), TimeDelta::seconds(7), &["d"]));

    let mut second = Subtitles::new();
    second.items.push(Item::new(TimeDelta::seconds(1), TimeDelta::seconds(2), &["a"]));
    second.items.push(Item::new(TimeDelta::seconds(4), TimeDelta::seconds(5), &["c"]));

    first.merge(second);

    let texts: Vec<String> = first.items.iter().map(|i| i.to_string()).collect();
    assert_eq!(texts, vec!["a", "b", "c", "d"]);
}

/// Test that line rendering keeps run text and spacing as is
#[test]
fn test_line_display_withSeveralRuns_shouldConcatenate() {
    let line = Line {
        items: vec![LineItem::text("Hello "), LineItem::text("big "), LineItem::text("world")],
        voice_name: Some("Bob".to_string()),
    };
    assert_eq!(line.to_string(), "Hello big world");
}

/// Test that stripping styling keeps every cue and its text
#[test]
fn test_remove_styling_withStyledDocument_shouldKeepText() {
    let mut subs = Subtitles::new();
    subs.add_style(Style::new("s"));
    subs.add_region(Region::new("r"));
    let mut item = item_with(Some("s"), Some("r"));
    item.lines[0].items[0].inline_style = Some(StyleAttributes::default());
    subs.items.push(item);

    subs.remove_styling();

    assert_eq!(subs.items.len(), 1);
    assert_eq!(subs.items[0].to_string(), "text");
    assert!(subs.items[0].lines[0].items[0].inline_style.is_none());
}
