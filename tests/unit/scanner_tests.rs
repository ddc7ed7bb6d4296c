/*!
 * Tests for the line scanner
 */

use std::io::{self, Cursor, Read};
use subweave::LineScanner;
use subweave::scanner::split_line;

fn lines(input: &[u8]) -> Vec<String> {
    LineScanner::new(Cursor::new(input.to_vec()))
        .collect::<io::Result<Vec<_>>>()
        .unwrap()
}

/// Test that every terminator style splits lines the same way
#[test]
fn test_scanner_withMixedTerminators_shouldSplitEachStyle() {
    assert_eq!(lines(b"a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
}

/// Test that blank lines are kept and a final terminator adds nothing
#[test]
fn test_scanner_withBlankLines_shouldKeepThem() {
    assert_eq!(lines(b"a\n\n\r\nb\n"), vec!["a", "", "", "b"]);
    assert!(lines(b"").is_empty());
}

/// Test that a lone carriage return at the end of the input still ends a line
#[test]
fn test_split_line_withTrailingCarriageReturn_shouldWaitUntilEof() {
    assert_eq!(split_line(b"abc\r", false), None);
    assert_eq!(split_line(b"abc\r", true), Some((4, &b"abc"[..])));
    assert_eq!(split_line(b"abc\r\n", false), Some((5, &b"abc"[..])));
    assert_eq!(split_line(b"", true), None);
}

/// Reader failing on the first call
struct Broken;

impl Read for Broken {
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
    }
}

/// Test that read errors reach the caller
#[test]
fn test_scanner_withFailingReader_shouldYieldError() {
    let mut scanner = LineScanner::new(Broken);
    let first = scanner.next().unwrap();
    assert_eq!(first.unwrap_err().kind(), io::ErrorKind::BrokenPipe);
}

/// Test that invalid UTF-8 is replaced instead of failing
#[test]
fn test_scanner_withInvalidUtf8_shouldReplaceBytes() {
    let result = lines(b"caf\xe9\n");
    assert_eq!(result, vec!["caf\u{fffd}"]);
}
