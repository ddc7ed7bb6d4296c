/*!
 * Line splitter used by every textual reader.
 *
 * Subtitle files in the wild mix `\n`, `\r\n` and old Mac-style bare `\r`
 * terminators, sometimes within the same file. `LineScanner` treats all three
 * the same way and hands out line contents without their terminator.
 */

use std::io::{self, Read};

const CHUNK_SIZE: usize = 8 * 1024;

/// Finds the next line in `data`.
///
/// Returns how many bytes to consume and the line content, or `None` when
/// more input is needed. A `\r` at the very end of `data` is only treated as
/// a terminator at end of stream, since the next read may start with `\n`.
pub fn split_line(data: &[u8], at_eof: bool) -> Option<(usize, &[u8])> {
    if at_eof && data.is_empty() {
        return None;
    }

    if let Some(i) = data.iter().position(|&b| b == b'\r' || b == b'\n') {
        if data[i] == b'\n' {
            return Some((i + 1, &data[..i]));
        }
        return match data.get(i + 1) {
            Some(b'\n') => Some((i + 2, &data[..i])),
            Some(_) => Some((i + 1, &data[..i])),
            None if at_eof => Some((i + 1, &data[..i])),
            None => None,
        };
    }

    // Final line without terminator
    if at_eof {
        return Some((data.len(), data));
    }
    None
}

/// Buffered line reader over any byte stream
pub struct LineScanner<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    start: usize,
    eof: bool,
}

impl<R: Read> LineScanner<R> {
    /// Wraps a reader
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::with_capacity(CHUNK_SIZE),
            start: 0,
            eof: false,
        }
    }

    /// Returns the next raw line, or `None` once the stream is exhausted
    pub fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        loop {
            let found = split_line(&self.buffer[self.start..], self.eof)
                .map(|(advance, line)| (advance, line.to_vec()));
            if let Some((advance, line)) = found {
                self.start += advance;
                return Ok(Some(line));
            }
            if self.eof {
                return Ok(None);
            }
            self.fill()?;
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        if self.start > 0 {
            self.buffer.drain(..self.start);
            self.start = 0;
        }

        let mut chunk = [0u8; CHUNK_SIZE];
        loop {
            match self.reader.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(());
                }
                Ok(n) => {
                    self.buffer.extend_from_slice(&chunk[..n]);
                    return Ok(());
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> Iterator for LineScanner<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_line() {
            Ok(Some(line)) => Some(Ok(String::from_utf8_lossy(&line).into_owned())),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}
