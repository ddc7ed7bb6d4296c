/*!
 * Tests for style attribute propagation between dialects
 */

use subweave::Color;
use subweave::style::{Dialect, Justification, StlPosition, StyleAttributes, WebVttTag};

/// Test every numpad position against its WebVTT row and alignment
#[test]
fn test_propagate_srt_withAllPositions_shouldMapRowsAndAlignment() {
    let expected = [
        (1, "90%", "left"),
        (2, "90%", ""),
        (3, "90%", "right"),
        (4, "50%", "left"),
        (5, "50%", ""),
        (6, "50%", "right"),
        (7, "10%", "left"),
        (8, "10%", ""),
        (9, "10%", "right"),
    ];

    for (position, row, align) in expected {
        let mut attrs = StyleAttributes::default();
        attrs.srt.position = position;
        attrs.propagate(Dialect::Srt);
        assert_eq!(attrs.webvtt.position, row, "position {}", position);
        assert_eq!(attrs.webvtt.align, align, "position {}", position);
    }
}

/// Test the documented STL example: right justification on teletext row 20
#[test]
fn test_propagate_stl_withTeletextRow20_shouldGive82Percent() {
    let mut attrs = StyleAttributes::default();
    attrs.stl.justification = Some(Justification::Right);
    attrs.stl.position = Some(StlPosition {
        vertical_position: 20,
        max_rows: 23,
        rows: 2,
    });
    attrs.propagate(Dialect::Stl);

    assert_eq!(attrs.webvtt.align, "right");
    assert_eq!(attrs.webvtt.line, "82%");
}

/// Test that left justification is carried and centered is not
#[test]
fn test_propagate_stl_withCenteredJustification_shouldLeaveAlign() {
    let mut left = StyleAttributes::default();
    left.stl.justification = Some(Justification::Left);
    left.propagate(Dialect::Stl);
    assert_eq!(left.webvtt.align, "left");

    let mut centered = StyleAttributes::default();
    centered.stl.justification = Some(Justification::Centered);
    centered.propagate(Dialect::Stl);
    assert_eq!(centered.webvtt.align, "");
}

/// Test that teletext colors become TTML colors, which then reach SRT
#[test]
fn test_propagate_teletext_thenWebVtt_shouldReachSrtColor() {
    let mut attrs = StyleAttributes::default();
    attrs.teletext.color = Some(Color::MAGENTA);
    attrs.propagate(Dialect::Teletext);
    attrs.propagate(Dialect::WebVtt);

    assert_eq!(attrs.ttml.color.as_deref(), Some("#ff00ff"));
    assert_eq!(attrs.srt.color.as_deref(), Some("#ff00ff"));
}

/// Test that pixel extents are read as numbers too
#[test]
fn test_propagate_ttml_withPixelExtent_shouldComputeLines() {
    let mut attrs = StyleAttributes::default();
    attrs.ttml.extent = Some("640px 27px".to_string());
    attrs.propagate(Dialect::Ttml);

    assert_eq!(attrs.webvtt.width, "640px");
    assert_eq!(attrs.webvtt.lines, 5);
    assert_eq!(attrs.webvtt.size, "27px");
}

/// Test that an extent with a single value is ignored
#[test]
fn test_propagate_ttml_withIncompleteExtent_shouldIgnoreIt() {
    let mut attrs = StyleAttributes::default();
    attrs.ttml.extent = Some("80%".to_string());
    attrs.propagate(Dialect::Ttml);
    assert_eq!(attrs.webvtt.width, "");
    assert_eq!(attrs.webvtt.lines, 0);
}

/// Test that writers resolve TTML fields into WebVTT ones on demand
#[test]
fn test_resolved_for_withTtmlRegion_shouldDeriveWebVttSettings() {
    let mut attrs = StyleAttributes::default();
    attrs.ttml.text_align = Some("right".to_string());
    attrs.ttml.origin = Some("10% 80%".to_string());

    let resolved = attrs.resolved_for(Dialect::WebVtt);
    assert_eq!(resolved.webvtt.align, "right");
    assert_eq!(resolved.webvtt.line, "10%");
    assert_eq!(resolved.webvtt.position, "80%");
    assert_eq!(resolved.webvtt.scroll, "up");
}

/// Test that an SRT color feeds the TTML writer when nothing else does
#[test]
fn test_resolved_for_withSrtColorOnly_shouldDeriveTtmlColor() {
    let mut attrs = StyleAttributes::default();
    attrs.srt.color = Some("#123456".to_string());
    let resolved = attrs.resolved_for(Dialect::Ttml);
    assert_eq!(resolved.ttml.color.as_deref(), Some("#123456"));
}

/// Test that WebVTT tags regenerate from SRT flags in b, i, u order
#[test]
fn test_propagate_srt_withAllFlags_shouldEmitTagsInOrder() {
    let mut attrs = StyleAttributes::default();
    attrs.srt.italics = true;
    attrs.srt.underline = true;
    attrs.srt.bold = true;
    attrs.propagate(Dialect::Srt);

    assert_eq!(
        attrs.webvtt.tags,
        vec![WebVttTag::named("b"), WebVttTag::named("i"), WebVttTag::named("u")]
    );
}
