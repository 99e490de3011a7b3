//! Line splitting for the block renderer.
//!
//! The input is split once into an immutable, indexable sequence of lines.
//! Block consumers walk it with a plain `usize` cursor that never leaves a
//! single conversion call.
//!
//! Newline scanning uses `memchr` (SIMD on supported platforms) and lines
//! borrow directly from the input.

use memchr::memchr;

/// A single line from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line text (without trailing newline or carriage return).
    pub text: &'a str,
    /// Zero-based line number in the source.
    pub number: usize,
}

impl<'a> Line<'a> {
    /// Check if this line contains only whitespace.
    #[inline(always)]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Get the line text with leading/trailing whitespace removed.
    #[inline(always)]
    pub fn trimmed(&self) -> &'a str {
        self.text.trim()
    }

    /// Check if the trimmed line starts with the given prefix.
    #[inline(always)]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.trimmed().starts_with(prefix)
    }
}

/// The immutable line sequence of one document.
#[derive(Debug, Clone, Default)]
pub struct Lines<'a> {
    lines: Vec<Line<'a>>,
}

impl<'a> Lines<'a> {
    /// Split `input` into lines, handling both LF and CRLF endings.
    ///
    /// A trailing newline does not produce an extra empty line.
    pub fn new(input: &'a str) -> Self {
        let bytes = input.as_bytes();
        let mut lines = Vec::with_capacity(bytes.len() / 32 + 1);
        let mut offset = 0;

        while offset < bytes.len() {
            let start = offset;
            let end = match memchr(b'\n', &bytes[start..]) {
                Some(pos) => start + pos,
                None => bytes.len(),
            };

            let text_end = if end > start && bytes[end - 1] == b'\r' {
                end - 1
            } else {
                end
            };

            lines.push(Line {
                // Newlines and carriage returns are ASCII, so both ends are
                // valid char boundaries.
                text: &input[start..text_end],
                number: lines.len(),
            });

            offset = end + 1;
        }

        Self { lines }
    }

    /// Number of lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the document has no lines at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the line at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Line<'a>> {
        self.lines.get(index)
    }

    /// All lines as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Line<'a>] {
        &self.lines
    }

    /// Find the end of the contiguous run starting at `start` whose lines
    /// all satisfy `pred`. Returns the index one past the last matching line.
    pub fn run_end(&self, start: usize, pred: impl Fn(&Line<'a>) -> bool) -> usize {
        self.lines[start..]
            .iter()
            .position(|line| !pred(line))
            .map_or(self.lines.len(), |offset| start + offset)
    }
}
