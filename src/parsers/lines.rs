//! Universal-newline line handling
//!
//! Python accepts `\n`, `\r\n` and a bare `\r` as line terminators. Line
//! numbers from the parser, the line-length check and the line counts all go
//! through these helpers so they agree on what a line is.

use std::borrow::Cow;

/// Iterator over physical lines, terminators excluded.
///
/// Like [`str::lines`], a trailing terminator does not start an extra empty
/// line.
#[derive(Debug, Clone)]
pub struct PhysicalLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for PhysicalLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        match self.rest.find(['\r', '\n']) {
            Some(end) => {
                let line = &self.rest[..end];
                let terminator = if self.rest[end..].starts_with("\r\n") { 2 } else { 1 };
                self.rest = &self.rest[end + terminator..];
                Some(line)
            }
            None => Some(std::mem::take(&mut self.rest)),
        }
    }
}

/// Split `source` on `\r\n`, `\r` and `\n`
pub fn physical_lines(source: &str) -> PhysicalLines<'_> {
    PhysicalLines { rest: source }
}

/// Rewrite every line terminator as `\n` (borrowed when there is no `\r`)
pub fn normalize_newlines(source: &str) -> Cow<'_, str> {
    if source.contains('\r') {
        Cow::Owned(source.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(source)
    }
}
