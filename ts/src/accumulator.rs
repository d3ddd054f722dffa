//! Boundary detection for JSON objects arriving in arbitrary text chunks
//!
//! The model answers with a sequence of bare objects (not a JSON array), so the
//! buffer is never valid JSON as a whole. Objects are located by counting braces
//! outside string literals; validity of each object is left to the decoder.

use tracing::debug;

/// Characters allowed between two objects
///
/// A closing `]` is accepted so an array-wrapped answer still yields its elements.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == ']'
}

/// Progress of the brace scan, kept between calls so bytes are examined once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ScanState {
    /// Next byte offset to examine
    pos: usize,
    /// Offset of the opening brace of the object being scanned
    start: Option<usize>,
    depth: usize,
    in_string: bool,
    escaped: bool,
}

/// Growing text buffer that yields complete top-level JSON objects
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    buffer: String,
    scan: ScanState,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard all buffered text and scan progress
    pub fn reset(&mut self) {
        debug!(buffered = self.buffer.len(), "StreamAccumulator::reset: called");
        self.buffer.clear();
        self.scan = ScanState::default();
    }

    /// Append a delta verbatim
    pub fn append(&mut self, delta: &str) {
        self.buffer.push_str(delta);
    }

    /// Remove and return the next complete object, if one has fully arrived
    ///
    /// On success the object text (braces included) is returned and the buffer
    /// is advanced past it and any separators that follow. Text before the
    /// opening brace is dropped along with it. When no object is complete the
    /// buffer is left as it was.
    pub fn extract_next(&mut self) -> Option<String> {
        let bytes = self.buffer.as_bytes();
        let mut scan = self.scan;

        // Braces and quotes are ASCII and never occur inside a multi-byte UTF-8
        // sequence, so byte scanning is safe and every offset found here is a
        // char boundary.
        let (start, end) = loop {
            let Some(&byte) = bytes.get(scan.pos) else {
                self.scan = scan;
                return None;
            };
            scan.pos += 1;

            let Some(start) = scan.start else {
                if byte == b'{' {
                    scan.start = Some(scan.pos - 1);
                    scan.depth = 1;
                }
                continue;
            };

            if scan.in_string {
                if scan.escaped {
                    scan.escaped = false;
                } else if byte == b'\\' {
                    scan.escaped = true;
                } else if byte == b'"' {
                    scan.in_string = false;
                }
                continue;
            }

            match byte {
                b'"' => scan.in_string = true,
                b'{' => scan.depth += 1,
                b'}' => {
                    scan.depth -= 1;
                    if scan.depth == 0 {
                        break (start, scan.pos);
                    }
                }
                _ => {}
            }
        };

        let object = self.buffer[start..end].to_string();

        let preamble = &self.buffer[..start];
        if !preamble.trim_matches(is_separator).is_empty() {
            debug!(
                preamble_len = preamble.len(),
                "StreamAccumulator::extract_next: dropping text before object"
            );
        }

        let rest = &self.buffer[end..];
        let consumed = end + (rest.len() - rest.trim_start_matches(is_separator).len());
        self.buffer.drain(..consumed);
        self.scan = ScanState::default();

        debug!(
            object_len = object.len(),
            remaining = self.buffer.len(),
            "StreamAccumulator::extract_next: extracted object"
        );
        Some(object)
    }

    /// Text not yet consumed by [`extract_next`](Self::extract_next)
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// True when an opening brace has been seen but its object has not closed
    ///
    /// Reflects the scan as of the last [`extract_next`](Self::extract_next) call.
    pub fn in_object(&self) -> bool {
        self.scan.start.is_some()
    }

    /// True when nothing but separators is buffered
    pub fn is_blank(&self) -> bool {
        self.buffer.trim_matches(is_separator).is_empty()
    }

    /// Take whatever is left, leaving the accumulator empty
    pub fn take_remainder(&mut self) -> String {
        self.scan = ScanState::default();
        std::mem::take(&mut self.buffer)
    }
}
