use crate::line_map::Line;
use std::str::Chars;

/// A source position. Both fields are 1-based, per spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

/// Char-level cursor over [`crate::line_map::Lines`], tracking line/column.
///
/// Lines are joined with a virtual `\n` so callers never special-case line
/// boundaries; the real newline byte from the source file is never part of
/// any `Line::content` (it was split off when the file was read).
pub struct Cursor<'a> {
    lines: &'a [Line],
    line_idx: usize,
    col_idx: usize,
    chars: Chars<'a>,
}

impl<'a> Cursor<'a> {
    pub fn new(lines: &'a [Line]) -> Self {
        let start = lines.first().map(|l| l.content.as_str()).unwrap_or("");
        Self {
            lines,
            line_idx: 0,
            col_idx: 1,
            chars: start.chars(),
        }
    }

    /// Returns the current character without advancing.
    pub fn peek(&self) -> Option<char> {
        let ch = self.chars.clone().next();
        match ch {
            Some(c) => Some(c),
            None => {
                // End of the current line's content: report a virtual
                // newline unless this was the last line.
                if self.line_idx + 1 < self.lines.len() {
                    Some('\n')
                } else {
                    None
                }
            }
        }
    }

    /// Advances to the next character, returning the one passed over.
    pub fn advance(&mut self) -> Option<char> {
        match self.chars.next() {
            Some(c) => {
                self.col_idx += 1;
                Some(c)
            }
            None => {
                if self.line_idx + 1 < self.lines.len() {
                    self.line_idx += 1;
                    self.col_idx = 1;
                    self.chars = self
                        .lines
                        .get(self.line_idx)
                        .map(|l| l.content.as_str())
                        .unwrap_or("")
                        .chars();
                    Some('\n')
                } else {
                    None
                }
            }
        }
    }

    /// Returns the current location for error reporting (1-based).
    pub fn loc(&self) -> Location {
        let line_num = self
            .lines
            .get(self.line_idx)
            .map(|l| l.idx + 1)
            .unwrap_or(self.line_idx + 1);
        Location {
            line: line_num,
            col: self.col_idx,
        }
    }

    /// Advances while `predicate` holds, returning the consumed text.
    pub fn eat_while<F>(&mut self, mut predicate: F) -> String
    where
        F: FnMut(char) -> bool,
    {
        let mut result = String::new();
        while let Some(ch) = self.peek() {
            if predicate(ch) {
                result.push(self.advance().unwrap());
            } else {
                break;
            }
        }
        result
    }
}
