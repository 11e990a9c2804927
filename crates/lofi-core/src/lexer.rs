//! Line and block splitting.
//!
//! The lexer splits input into lines on `\n` or `\r\n` (mixed line endings
//! are fine) using `memchr` for the newline scan. [`Blocks`] groups
//! consecutive non-empty lines into the blocks that become sections.
//!
//! Only a line with no characters at all separates blocks. A line of spaces
//! is content and stays inside its block.
//!
//! Everything borrows from the input; nothing is allocated.

use memchr::memchr;

/// A single line from the input, without its line terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// The line text.
    pub text: &'a str,
    /// Byte offset of the line start in the lexer input.
    pub start: usize,
}

impl<'a> Line<'a> {
    /// Check if this line has no characters before its terminator.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset just past the line text.
    #[inline(always)]
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Line-based lexer with peek/consume access.
pub struct Lexer<'a> {
    input: &'a str,
    bytes: &'a [u8],
    offset: usize,
    peeked: Option<Line<'a>>,
}

impl<'a> Lexer<'a> {
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            bytes: input.as_bytes(),
            offset: 0,
            peeked: None,
        }
    }

    /// Peek at the next line without consuming it.
    #[inline]
    pub fn peek_line(&mut self) -> Option<&Line<'a>> {
        if self.peeked.is_none() {
            self.peeked = self.read_line();
        }
        self.peeked.as_ref()
    }

    /// Consume and return the next line.
    #[inline]
    pub fn next_line(&mut self) -> Option<Line<'a>> {
        if let Some(line) = self.peeked.take() {
            return Some(line);
        }
        self.read_line()
    }

    /// Skip empty lines and return the count skipped.
    #[inline]
    pub fn skip_empty_lines(&mut self) -> usize {
        let mut count = 0;
        while let Some(line) = self.peek_line() {
            if !line.is_empty() {
                break;
            }
            self.next_line();
            count += 1;
        }
        count
    }

    /// Slice of the input between two byte offsets produced by this lexer.
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    fn read_line(&mut self) -> Option<Line<'a>> {
        if self.offset >= self.bytes.len() {
            return None;
        }

        let start = self.offset;
        let end = match memchr(b'\n', &self.bytes[start..]) {
            Some(pos) => start + pos,
            None => self.bytes.len(),
        };

        // CRLF: drop the carriage return before the newline.
        let text_end = if end > start && self.bytes[end - 1] == b'\r' {
            end - 1
        } else {
            end
        };

        self.offset = if end < self.bytes.len() { end + 1 } else { end };

        Some(Line {
            text: &self.input[start..text_end],
            start,
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Line<'a>;

    #[inline]
    fn next(&mut self) -> Option<Line<'a>> {
        self.next_line()
    }
}

/// Iterator over empty-line-delimited blocks of the input.
///
/// Each block runs from the start of its first non-empty line to the end of
/// its last one. Any run of empty lines separates two blocks; leading and
/// trailing empty lines yield nothing. A block may consist of whitespace
/// only.
pub struct Blocks<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Blocks<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
        }
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.lexer.skip_empty_lines();
        let first = self.lexer.next_line()?;

        let mut end = first.end();
        while let Some(&line) = self.lexer.peek_line() {
            if line.is_empty() {
                break;
            }
            end = line.end();
            self.lexer.next_line();
        }

        Some(self.lexer.slice(first.start, end))
    }
}
