// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared cursor over the logical line stream
//!
//! Every section extractor advances the same cursor instead of keeping its
//! own line index, so the decoder stays a single linear pass.

use staad_lite_model::{CodecError, Result};

/// Position-tracking view over the joined logical lines
pub struct LineCursor<'a> {
    lines: &'a [String],
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(lines: &'a [String]) -> Self {
        Self { lines, pos: 0 }
    }

    /// Current line without consuming it
    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).map(|l| l.as_str())
    }

    /// Consume the current line
    pub fn advance(&mut self) {
        self.pos += 1;
    }

    /// Consume and return the current line
    pub fn next_line(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.pos += 1;
        Some(line)
    }

    /// Consume the current line when `pred` accepts it
    pub fn take_if(&mut self, pred: impl Fn(&str) -> bool) -> Option<&'a str> {
        let line = self.peek()?;
        if pred(line) {
            self.pos += 1;
            Some(line)
        } else {
            None
        }
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }
}

/// First whitespace-separated token of a line (empty for blank input)
pub fn first_token(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

/// True when the line opens with a digit, i.e. looks like a record row
pub fn starts_numeric(line: &str) -> bool {
    first_token(line)
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
}

/// True when the first token parses as a number (covers negative values)
pub fn starts_with_number(line: &str) -> bool {
    parse_f64(first_token(line)).is_ok()
}

/// Parse a float token, reporting the offending section and line on failure
pub fn require_f64(tok: &str, section: &'static str, line: &str) -> Result<f64> {
    parse_f64(tok).map_err(|_| CodecError::malformed(section, line))
}

/// Parse an integer id token, reporting the offending section and line
pub fn require_u32(tok: &str, section: &'static str, line: &str) -> Result<u32> {
    tok.parse::<u32>()
        .map_err(|_| CodecError::malformed(section, line))
}

pub(crate) fn parse_f64(tok: &str) -> std::result::Result<f64, ()> {
    lexical_core::parse::<f64>(tok.as_bytes()).map_err(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_walks_lines_once() {
        let lines: Vec<String> = vec!["A".into(), "B".into()];
        let mut cur = LineCursor::new(&lines);
        assert_eq!(cur.peek(), Some("A"));
        assert_eq!(cur.next_line(), Some("A"));
        assert_eq!(cur.take_if(|l| l == "X"), None);
        assert_eq!(cur.take_if(|l| l == "B"), Some("B"));
        assert!(cur.at_end());
    }

    #[test]
    fn numeric_line_detection() {
        assert!(starts_numeric("3 1.0 2.0 0.0;"));
        assert!(!starts_numeric("JOINT COORDINATES"));
        assert!(starts_with_number("-0.5 0.5"));
        assert!(!starts_with_number("BETA 90 MEMB 1"));
    }
}
