// src/scanner.rs
use crate::value::Value;

/// Character cursor over a single token.
///
/// Tokens are short, so failures carry a plain reason string that callers
/// wrap into their own error.
pub struct Scanner<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// `[A-Za-z0-9]+`
    pub fn parse_name(&mut self) -> Result<&'a str, String> {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() {
                self.i += 1;
            } else {
                break;
            }
        }
        if self.i == start {
            return Err(format!("name expected at offset {start}"));
        }
        Ok(&self.s[start..self.i])
    }

    /// `[0-9]*`, possibly empty.
    pub fn take_digits(&mut self) -> &'a str {
        let start = self.i;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.i += 1;
            } else {
                break;
            }
        }
        &self.s[start..self.i]
    }

    /// Reads `-?[0-9]+(\.[0-9]+)?` and requires it to span the rest of the
    /// input. Returns `None` for anything else, including `.5`, `1.` and `1e3`.
    pub fn parse_number_literal(&mut self) -> Option<Value> {
        let start = self.i;
        self.consume_char('-');
        if self.take_digits().is_empty() {
            return None;
        }
        let mut is_float = false;
        if self.consume_char('.') {
            if self.take_digits().is_empty() {
                return None;
            }
            is_float = true;
        }
        if !self.eof() {
            return None;
        }
        let s = &self.s[start..self.i];
        if is_float {
            s.parse::<f64>().ok().map(Value::Float)
        } else {
            // Out-of-range integers still read as numbers.
            s.parse::<i64>()
                .map(Value::Int)
                .or_else(|_| s.parse::<f64>().map(Value::Float))
                .ok()
        }
    }

    pub fn expect(&mut self, c: char) -> Result<(), String> {
        if self.consume_char(c) {
            Ok(())
        } else {
            Err(format!("expected '{c}' at offset {}", self.i))
        }
    }

    pub fn consume_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.i += c.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn peek_char(&self) -> Option<char> {
        self.s[self.i..].chars().next()
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }
}
