use std::io::BufRead;

use crate::*;

/// Line-oriented reader that skips blank lines and remembers line numbers
/// for error messages.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    line: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, line: 0 }
    }

    /// Number of the line most recently returned.
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Next non-blank line, trimmed, with its 1-based number.
    pub fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.inner.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;

            let trimmed = buf.trim();
            if !trimmed.is_empty() {
                return Ok(Some((self.line, trimmed.to_owned())));
            }
        }
    }

    /// Next line holding exactly `N` integers.
    pub fn next_ints<const N: usize>(&mut self) -> Result<Option<[i64; N]>> {
        match self.next_line()? {
            Some((line, text)) => parse_ints(line, &text).map(Some),
            None => Ok(None),
        }
    }

    pub fn expect_ints<const N: usize>(&mut self, expected: &'static str) -> Result<[i64; N]> {
        self.next_ints()?
            .ok_or(ProtocolError::UnexpectedEof { expected })
    }

    pub fn expect_line(&mut self, expected: &'static str) -> Result<(usize, String)> {
        self.next_line()?
            .ok_or(ProtocolError::UnexpectedEof { expected })
    }
}

pub fn parse_ints<const N: usize>(line: usize, text: &str) -> Result<[i64; N]> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() != N {
        return Err(ProtocolError::TokenCount {
            line,
            expected: N,
            found: tokens.len(),
        });
    }

    let mut values = [0; N];
    for (value, token) in values.iter_mut().zip(tokens) {
        *value = token.parse().map_err(|_| ProtocolError::InvalidInteger {
            line,
            token: token.to_owned(),
        })?;
    }
    Ok(values)
}
