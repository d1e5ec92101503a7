//! Lexical splitting of a chain stream into raw blocks
//!
//! A block starts at any line whose first whitespace-delimited token is
//! `chain` and runs up to the next such line or the end of the stream.
//! No field is interpreted here; that is the job of [`crate::core::ChainRecord`].

use std::io::{self, BufRead};

/// A data line together with its position in the source stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    /// Line number (1-based)
    pub number: usize,
    pub text: String,
}

/// One header line plus the data lines that follow it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub header: RawLine,
    /// Data lines, with leading and trailing blank lines stripped
    pub lines: Vec<RawLine>,
}

/// Pull-based reader yielding one [`RawBlock`] at a time
///
/// Only the block under construction is buffered. Lines before the first
/// header and `#` comment lines are ignored. A truncated final block simply
/// ends at EOF.
pub struct BlockReader<R: BufRead> {
    reader: R,
    buffer: String,
    line_number: usize,
    pending_header: Option<RawLine>,
    finished: bool,
}

fn is_header(line: &str) -> bool {
    line.split_whitespace().next() == Some("chain")
}

impl<R: BufRead> BlockReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::with_capacity(1024),
            line_number: 0,
            pending_header: None,
            finished: false,
        }
    }

    /// Read the next line into the internal buffer, without its line terminator
    fn advance(&mut self) -> io::Result<bool> {
        self.buffer.clear();
        if self.reader.read_line(&mut self.buffer)? == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        if self.buffer.ends_with('\n') {
            self.buffer.pop();
            if self.buffer.ends_with('\r') {
                self.buffer.pop();
            }
        }
        Ok(true)
    }

    fn read_block(&mut self) -> io::Result<Option<RawBlock>> {
        let mut lines: Vec<RawLine> = Vec::new();

        loop {
            if !self.advance()? {
                self.finished = true;
                break;
            }
            let number = self.line_number;
            let line = self.buffer.as_str();

            if line.trim_start().starts_with('#') {
                continue;
            }

            if is_header(line) {
                let header = RawLine { number, text: line.to_string() };
                match self.pending_header.replace(header) {
                    Some(previous) => return Ok(Some(Self::finish(previous, lines))),
                    None => continue,
                }
            }

            if self.pending_header.is_none() {
                continue;
            }
            if lines.is_empty() && line.trim().is_empty() {
                continue;
            }
            lines.push(RawLine { number, text: line.to_string() });
        }

        Ok(self.pending_header.take().map(|header| Self::finish(header, lines)))
    }

    fn finish(header: RawLine, mut lines: Vec<RawLine>) -> RawBlock {
        while lines.last().is_some_and(|l| l.text.trim().is_empty()) {
            lines.pop();
        }
        RawBlock { header, lines }
    }
}

impl<R: BufRead> Iterator for BlockReader<R> {
    type Item = io::Result<RawBlock>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_block() {
            Ok(block) => block.map(Ok),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
