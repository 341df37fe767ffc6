//! Line source for delimited postal datasets
//!
//! Reads one logical record per line, skips the header and splits lines on
//! a single-character delimiter. There is no quoting: a field containing the
//! delimiter is split like any other.

use crate::constants::RECORD_FIELD_COUNT;
use arrayvec::ArrayVec;
use std::io::{self, BufRead};
use tracing::debug;

/// Positional fields of one line, capped at the record width
pub type LineFields<'a> = ArrayVec<&'a str, RECORD_FIELD_COUNT>;

/// Split `line` on `delimiter`, keeping at most the positions a record uses
pub fn split_fields(line: &str, delimiter: char) -> LineFields<'_> {
    line.split(delimiter).take(RECORD_FIELD_COUNT).collect()
}

/// Sequential line reader reusing a single line buffer
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    line: String,
    line_number: usize,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
            line_number: 0,
        }
    }

    /// Consume the header line, returning it if the input was not empty
    pub fn skip_header(&mut self) -> io::Result<Option<String>> {
        let header = self.next_line()?.map(str::to_string);
        if let Some(header) = &header {
            debug!("Skipped header: {}", header);
        }
        Ok(header)
    }

    /// Next line without its line terminator, or `None` at end of input
    pub fn next_line(&mut self) -> io::Result<Option<&str>> {
        self.line.clear();
        if self.reader.read_line(&mut self.line)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        let trimmed = self.line.trim_end_matches(['\n', '\r']);
        Ok(Some(trimmed))
    }

    /// 1-based number of the line last returned
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}
