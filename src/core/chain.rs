//! Chain file parsing
//!
//! Parses UCSC chain format files into typed records.
//!
//! # Chain File Format
//!
//! ```text
//! chain score tName tSize tStrand tStart tEnd qName qSize qStrand qStart qEnd id
//! size dt dq
//! size dt dq
//! size
//! ```
//!
//! - Header line starts with "chain" and has exactly 13 fields
//! - Data lines contain: size (ungapped block), dt (target gap), dq (query gap)
//! - Last data line has only size (no gaps)
//! - When qStrand is '-', qStart/qEnd are given on the reverse strand

use crate::core::block::{BlockReader, RawBlock, RawLine};
use crate::core::io::ChainInput;
use crate::core::mapper::Blocks;
use crate::core::{
    ChainParseError, ChainResult, ConsistencyError, ErrorMode, MappingResult, Strand,
};
use std::fmt;
use std::io::{self, BufRead};
use std::path::Path;
use std::str::FromStr;

/// Number of whitespace-delimited tokens in a header line
pub const HEADER_FIELDS: usize = 13;

/// Parsed chain header
///
/// "target" is the reference side (`t*` fields) and "query" the aligned
/// side (`q*` fields), following UCSC naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainHeader {
    pub score: i64,
    pub target_name: String,
    pub target_size: u64,
    pub target_strand: Strand,
    pub target_start: u64,
    pub target_end: u64,
    pub query_name: String,
    pub query_size: u64,
    pub query_strand: Strand,
    pub query_start: u64,
    pub query_end: u64,
    pub id: u64,
}

fn header_number<T: FromStr>(
    fields: &[&str],
    index: usize,
    name: &str,
    line: &str,
    line_number: usize,
) -> ChainResult<T> {
    fields[index].parse::<T>().map_err(|_| {
        ChainParseError::malformed_header(
            format!("Invalid {} value '{}': expected an integer", name, fields[index]),
            line_number,
            line,
        )
    })
}

fn header_strand(
    fields: &[&str],
    index: usize,
    name: &str,
    line: &str,
    line_number: usize,
) -> ChainResult<Strand> {
    Strand::from_token(fields[index]).ok_or_else(|| {
        ChainParseError::malformed_header(
            format!("Invalid {} '{}': expected '+' or '-'", name, fields[index]),
            line_number,
            line,
        )
    })
}

fn check_span(
    side: &str,
    start: u64,
    end: u64,
    size: u64,
    line: &str,
    line_number: usize,
) -> ChainResult<()> {
    if start > end {
        return Err(ChainParseError::malformed_header(
            format!("{} start ({}) > {} end ({})", side, start, side, end),
            line_number,
            line,
        ));
    }
    if end > size {
        return Err(ChainParseError::malformed_header(
            format!("{} end ({}) > {} size ({})", side, end, side, size),
            line_number,
            line,
        ));
    }
    Ok(())
}

impl ChainHeader {
    /// Parse a chain header line
    ///
    /// Format: chain score tName tSize tStrand tStart tEnd qName qSize qStrand qStart qEnd id
    pub fn parse(line: &str, line_number: usize) -> ChainResult<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();

        if fields.len() != HEADER_FIELDS {
            return Err(ChainParseError::malformed_header(
                format!("Expected {} fields, got {}", HEADER_FIELDS, fields.len()),
                line_number,
                line,
            ));
        }

        if fields[0] != "chain" {
            return Err(ChainParseError::malformed_header(
                format!("Expected 'chain' keyword, got '{}'", fields[0]),
                line_number,
                line,
            ));
        }

        let header = Self {
            score: header_number(&fields, 1, "score", line, line_number)?,
            target_name: fields[2].to_string(),
            target_size: header_number(&fields, 3, "target size", line, line_number)?,
            target_strand: header_strand(&fields, 4, "target strand", line, line_number)?,
            target_start: header_number(&fields, 5, "target start", line, line_number)?,
            target_end: header_number(&fields, 6, "target end", line, line_number)?,
            query_name: fields[7].to_string(),
            query_size: header_number(&fields, 8, "query size", line, line_number)?,
            query_strand: header_strand(&fields, 9, "query strand", line, line_number)?,
            query_start: header_number(&fields, 10, "query start", line, line_number)?,
            query_end: header_number(&fields, 11, "query end", line, line_number)?,
            id: header_number(&fields, 12, "chain id", line, line_number)?,
        };

        check_span("Target", header.target_start, header.target_end, header.target_size, line, line_number)?;
        check_span("Query", header.query_start, header.query_end, header.query_size, line, line_number)?;

        Ok(header)
    }
}

/// Fields are joined by single spaces regardless of the input's separators
impl fmt::Display for ChainHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chain {} {} {} {} {} {} {} {} {} {} {} {}",
            self.score,
            self.target_name,
            self.target_size,
            self.target_strand,
            self.target_start,
            self.target_end,
            self.query_name,
            self.query_size,
            self.query_strand,
            self.query_start,
            self.query_end,
            self.id,
        )
    }
}

/// One alignment data line: an ungapped run followed by gaps on each side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlignmentStep {
    /// Ungapped block size
    pub size: u64,
    /// Gap in the target after this block
    pub dt: u64,
    /// Gap in the query after this block
    pub dq: u64,
}

impl AlignmentStep {
    pub fn new(size: u64, dt: u64, dq: u64) -> Self {
        Self { size, dt, dq }
    }

    /// Parse a data line (middle line with 3 fields or last line with 1 field)
    ///
    /// `header` is the record the line belongs to, reported with any error.
    pub fn parse(line: &str, line_number: usize, header: &ChainHeader) -> ChainResult<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let fail = |message: String| {
            ChainParseError::malformed_step(message, line_number, header.id, line, &header.to_string())
        };

        let number = |index: usize, name: &str| -> ChainResult<u64> {
            fields[index].parse::<u64>().map_err(|_| {
                fail(format!(
                    "Invalid {} value '{}': expected a non-negative integer",
                    name, fields[index]
                ))
            })
        };

        match fields.len() {
            1 => Ok(Self::new(number(0, "block size")?, 0, 0)),
            3 => Ok(Self::new(
                number(0, "block size")?,
                number(1, "target gap (dt)")?,
                number(2, "query gap (dq)")?,
            )),
            n => Err(fail(format!("Expected 1 or 3 fields, got {}", n))),
        }
    }
}

/// Written tab-separated whatever separator the input used; the final
/// single-value line is written by [`ChainRecord`]'s `Display`.
impl fmt::Display for AlignmentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.size, self.dt, self.dq)
    }
}

/// A chain header with its ordered alignment steps
///
/// Aggregates are computed once at construction. A record owns all of its
/// data and holds no reference back to the stream it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRecord {
    header: ChainHeader,
    steps: Vec<AlignmentStep>,
    total_ungapped: u64,
    total_dt: u64,
    total_dq: u64,
}

impl ChainRecord {
    /// Build a record from already-parsed parts
    ///
    /// Unlike the parsers this does not reject an empty step list, and totals
    /// saturate at `u64::MAX` instead of failing.
    pub fn new(header: ChainHeader, steps: Vec<AlignmentStep>) -> Self {
        let (total_ungapped, total_dt, total_dq) = steps.iter().fold((0u64, 0u64, 0u64), |(u, t, q), s| {
            (u.saturating_add(s.size), t.saturating_add(s.dt), q.saturating_add(s.dq))
        });
        Self {
            header,
            steps,
            total_ungapped,
            total_dt,
            total_dq,
        }
    }

    /// Parse a raw block produced by [`BlockReader`]
    pub fn from_block(block: &RawBlock) -> ChainResult<Self> {
        let header = ChainHeader::parse(&block.header.text, block.header.number)?;

        let data: Vec<&RawLine> = block
            .lines
            .iter()
            .filter(|l| !l.text.trim().is_empty())
            .collect();

        if data.is_empty() {
            return Err(ChainParseError::empty_alignment(
                block.header.number,
                header.id,
                &block.header.text,
            ));
        }

        let last = data.len() - 1;
        let mut steps = Vec::with_capacity(data.len());
        let mut totals = (0u64, 0u64, 0u64);
        for (i, line) in data.iter().enumerate() {
            let step = AlignmentStep::parse(&line.text, line.number, &header)?;
            totals = match (
                totals.0.checked_add(step.size),
                totals.1.checked_add(step.dt),
                totals.2.checked_add(step.dq),
            ) {
                (Some(u), Some(t), Some(q)) => (u, t, q),
                _ => {
                    return Err(ChainParseError::malformed_step(
                        "Step sizes overflow a 64-bit total",
                        line.number,
                        header.id,
                        &line.text,
                        &block.header.text,
                    ))
                }
            };
            if i < last && line.text.split_whitespace().nth(1).is_none() {
                log::debug!(
                    "Chain {}: single-value step at line {} is not the last; assuming zero gaps",
                    header.id,
                    line.number
                );
            }
            steps.push(step);
        }

        Ok(Self::new(header, steps))
    }

    /// Parse a header line and its data lines, numbering lines from 1
    pub fn parse(header: &str, lines: &[&str]) -> ChainResult<Self> {
        let block = RawBlock {
            header: RawLine { number: 1, text: header.to_string() },
            lines: lines
                .iter()
                .enumerate()
                .map(|(i, text)| RawLine { number: i + 2, text: text.to_string() })
                .collect(),
        };
        Self::from_block(&block)
    }

    pub fn header(&self) -> &ChainHeader {
        &self.header
    }

    pub fn steps(&self) -> &[AlignmentStep] {
        &self.steps
    }

    pub fn id(&self) -> u64 {
        self.header.id
    }

    /// Sum of ungapped block sizes
    pub fn total_ungapped(&self) -> u64 {
        self.total_ungapped
    }

    /// Sum of target gaps
    pub fn total_dt(&self) -> u64 {
        self.total_dt
    }

    /// Sum of query gaps
    pub fn total_dq(&self) -> u64 {
        self.total_dq
    }

    /// Walk the record's blocks in absolute coordinates
    ///
    /// Fails with `UnsupportedStrand` unless the target strand is `+`, and with
    /// `TargetOutOfBounds`/`QueryOutOfBounds` if the steps run past either sequence.
    pub fn blocks(&self) -> MappingResult<Blocks<'_>> {
        Blocks::new(self)
    }

    /// Check that the header spans agree with the summed steps
    ///
    /// The reverse-strand query span is measured in reverse coordinates,
    /// so the same equation holds for both query strands.
    pub fn check_consistency(&self) -> Result<(), ConsistencyError> {
        let h = &self.header;

        let target_span = h.target_end - h.target_start;
        let target_steps = self.total_ungapped + self.total_dt;
        if target_span != target_steps {
            return Err(ConsistencyError::TargetSpan {
                chain_id: h.id,
                header_span: target_span,
                step_span: target_steps,
            });
        }

        let query_span = h.query_end - h.query_start;
        let query_steps = self.total_ungapped + self.total_dq;
        if query_span != query_steps {
            return Err(ConsistencyError::QuerySpan {
                chain_id: h.id,
                header_span: query_span,
                step_span: query_steps,
            });
        }

        Ok(())
    }
}

impl fmt::Display for ChainRecord {
    /// Serialize in chain format, final step as a single value, followed by a blank line
    ///
    /// Output is normalized: the header uses single spaces and steps use
    /// tabs, so input written that way round-trips byte for byte.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        if let Some((last, body)) = self.steps.split_last() {
            for step in body {
                writeln!(f, "{}", step)?;
            }
            writeln!(f, "{}", last.size)?;
        }
        writeln!(f)
    }
}

/// Lazy reader producing one [`ChainRecord`] per block
pub struct ChainReader<R: BufRead> {
    blocks: BlockReader<R>,
}

impl<R: BufRead> ChainReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            blocks: BlockReader::new(reader),
        }
    }
}

impl ChainReader<ChainInput> {
    /// Open a (possibly compressed) chain file
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        Ok(Self::new(ChainInput::open(path)?))
    }
}

impl<R: BufRead> Iterator for ChainReader<R> {
    type Item = ChainResult<ChainRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.blocks.next()?;
        Some(block.map_err(ChainParseError::from).and_then(|b| ChainRecord::from_block(&b)))
    }
}

/// All records of a chain file, with file-wide totals
#[derive(Debug, Clone, Default)]
pub struct ChainFile {
    pub records: Vec<ChainRecord>,
    /// Total ungapped bases over all records
    pub ungapped: u64,
    /// Total target gap bases over all records
    pub dt: u64,
    /// Total query gap bases over all records
    pub dq: u64,
}

impl ChainFile {
    /// Totals saturate at `u64::MAX`
    pub fn new(records: Vec<ChainRecord>) -> Self {
        let total = |field: fn(&ChainRecord) -> u64| {
            records.iter().fold(0u64, |acc, r| acc.saturating_add(field(r)))
        };
        let ungapped = total(ChainRecord::total_ungapped);
        let dt = total(ChainRecord::total_dt);
        let dq = total(ChainRecord::total_dq);
        Self {
            records,
            ungapped,
            dt,
            dq,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChainRecord> {
        self.records.iter()
    }
}

/// Record count and base totals gathered in one pass over a chain stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainSummary {
    pub records: usize,
    pub failed: usize,
    pub ungapped: u64,
    pub dt: u64,
    pub dq: u64,
}

/// Summarize a chain stream without keeping its records
///
/// In [`ErrorMode::Skip`] malformed records are logged and counted as failed.
/// I/O errors always abort.
pub fn summarize_chain<R: BufRead>(reader: R, mode: ErrorMode) -> ChainResult<ChainSummary> {
    let mut summary = ChainSummary::default();

    for result in ChainReader::new(reader) {
        match result {
            Ok(record) => {
                summary.records += 1;
                summary.ungapped = summary.ungapped.saturating_add(record.total_ungapped());
                summary.dt = summary.dt.saturating_add(record.total_dt());
                summary.dq = summary.dq.saturating_add(record.total_dq());
            }
            Err(e @ ChainParseError::Io(_)) => return Err(e),
            Err(e) if mode.is_strict() => return Err(e),
            Err(e) => {
                log::warn!("Skipping record: {}", e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}

/// Parse a whole chain stream, stopping at the first error
pub fn parse_chain_reader<R: BufRead>(reader: R) -> ChainResult<ChainFile> {
    let records = ChainReader::new(reader).collect::<ChainResult<Vec<_>>>()?;
    Ok(ChainFile::new(records))
}

/// Parse a chain file from a path
///
/// Handles gzip and bzip2 compression, see [`ChainInput::open`].
pub fn parse_chain_file<P: AsRef<Path>>(path: P) -> ChainResult<ChainFile> {
    parse_chain_reader(ChainInput::open(path)?)
}

/// Parse a chain file from bytes (for testing)
pub fn parse_chain_bytes(data: &[u8]) -> ChainResult<ChainFile> {
    parse_chain_reader(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ChainParseErrorKind;

    const CANONICAL: &str =
        "chain 4900 chrY 58368225 + 25985403 25985638 chr5 151006098 - 43257292 43257528 1";

    #[test]
    fn test_parse_chain_header() {
        let header = ChainHeader::parse(CANONICAL, 1).unwrap();

        assert_eq!(header.score, 4900);
        assert_eq!(header.target_name, "chrY");
        assert_eq!(header.target_size, 58368225);
        assert_eq!(header.target_strand, Strand::Plus);
        assert_eq!(header.target_start, 25985403);
        assert_eq!(header.target_end, 25985638);
        assert_eq!(header.query_name, "chr5");
        assert_eq!(header.query_size, 151006098);
        assert_eq!(header.query_strand, Strand::Minus);
        assert_eq!(header.query_start, 43257292);
        assert_eq!(header.query_end, 43257528);
        assert_eq!(header.id, 1);
    }

    #[test]
    fn test_header_round_trip() {
        let header = ChainHeader::parse(CANONICAL, 1).unwrap();
        assert_eq!(header.to_string(), CANONICAL);
    }

    #[test]
    fn test_header_tab_separated() {
        let line = CANONICAL.replace(' ', "\t");
        let header = ChainHeader::parse(&line, 1).unwrap();
        assert_eq!(header.to_string(), CANONICAL);
    }

    #[test]
    fn test_error_twelve_fields() {
        let line = "chain 4900 chrY 58368225 + 25985403 25985638 chr5 151006098 - 43257292 43257528";
        let err = ChainHeader::parse(line, 7).unwrap_err();
        assert_eq!(err.kind(), ChainParseErrorKind::MalformedHeader);
        assert_eq!(err.line_number(), Some(7));
        assert!(err.to_string().contains("13"));
    }

    #[test]
    fn test_error_fourteen_fields() {
        let line = format!("{} extra", CANONICAL);
        let err = ChainHeader::parse(&line, 1).unwrap_err();
        assert!(err.is_kind(ChainParseErrorKind::MalformedHeader));
    }

    #[test]
    fn test_error_invalid_number() {
        let line = "chain abc chr1 1000 + 0 100 chr1 1000 + 0 100 1";
        let err = ChainHeader::parse(line, 3).unwrap_err();
        assert!(err.is_kind(ChainParseErrorKind::MalformedHeader));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_error_invalid_strand() {
        for strand in ["X", ".", "++", "+-"] {
            let line = format!("chain 1 chr1 1000 {} 0 100 chr1 1000 + 0 100 1", strand);
            let err = ChainHeader::parse(&line, 5).unwrap_err();
            assert!(err.is_kind(ChainParseErrorKind::MalformedHeader), "strand {strand}");
        }
        let line = "chain 1 chr1 1000 + 0 100 chr1 1000 ? 0 100 1";
        assert!(ChainHeader::parse(line, 1).is_err());
    }

    #[test]
    fn test_negative_score_accepted() {
        let line = "chain -5 chr1 1000 + 0 100 chr1 1000 + 0 100 1";
        assert_eq!(ChainHeader::parse(line, 1).unwrap().score, -5);
    }

    #[test]
    fn test_error_invalid_coordinates() {
        let line = "chain 1 chr1 1000 + 200 100 chr1 1000 + 0 100 1";
        assert!(ChainHeader::parse(line, 1).unwrap_err().to_string().contains("start"));
        let line = "chain 1 chr1 1000 + 0 100 chr1 1000 + 0 2000 1";
        assert!(ChainHeader::parse(line, 1).unwrap_err().to_string().contains("size"));
    }

    fn step_header(id: u64) -> ChainHeader {
        let line = format!("chain 1 chrA 1000 + 0 100 chrB 1000 + 0 100 {}", id);
        ChainHeader::parse(&line, 1).unwrap()
    }

    #[test]
    fn test_parse_step_three_fields() {
        let header = step_header(1);
        assert_eq!(AlignmentStep::parse("100 50 30", 1, &header).unwrap(), AlignmentStep::new(100, 50, 30));
        assert_eq!(AlignmentStep::parse("9\t1\t0", 1, &header).unwrap(), AlignmentStep::new(9, 1, 0));
    }

    #[test]
    fn test_parse_step_one_field() {
        assert_eq!(AlignmentStep::parse("48", 1, &step_header(1)).unwrap(), AlignmentStep::new(48, 0, 0));
    }

    #[test]
    fn test_error_step_two_fields() {
        let err = AlignmentStep::parse("9 1", 10, &step_header(4)).unwrap_err();
        assert_eq!(err.kind(), ChainParseErrorKind::MalformedStep);
        assert_eq!(err.line_number(), Some(10));
        match err {
            ChainParseError::MalformedStep { chain_id, content, header, .. } => {
                assert_eq!(chain_id, 4);
                assert_eq!(content, "9 1");
                assert_eq!(header, "chain 1 chrA 1000 + 0 100 chrB 1000 + 0 100 4");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_step_bad_number() {
        let header = step_header(1);
        assert!(AlignmentStep::parse("9 x 0", 1, &header).unwrap_err().is_kind(ChainParseErrorKind::MalformedStep));
        assert!(AlignmentStep::parse("-9", 1, &header).unwrap_err().is_kind(ChainParseErrorKind::MalformedStep));
        assert!(AlignmentStep::parse("1 2 3 4", 1, &header).is_err());
    }

    #[test]
    fn test_record_step_total_overflow() {
        let data = b"chain 1 a 100 + 0 10 b 100 + 0 10 1\n18446744073709551615 1 0\n5\n";
        let err = ChainReader::new(&data[..]).next().unwrap().unwrap_err();
        assert!(err.is_kind(ChainParseErrorKind::MalformedStep));
        assert_eq!(err.line_number(), Some(3));
        assert!(err.to_string().contains("overflow"));

        let err = ChainRecord::parse("chain 1 a 100 + 0 10 b 100 + 0 10 1", &["1 18446744073709551615 0", "1 1 0", "1"])
            .unwrap_err();
        assert_eq!(err.line_number(), Some(3));
    }

    #[test]
    fn test_new_saturates_totals() {
        let steps = vec![AlignmentStep::new(u64::MAX, 0, 0), AlignmentStep::new(7, 0, 0)];
        let rec = ChainRecord::new(step_header(1), steps);
        assert_eq!(rec.total_ungapped(), u64::MAX);
        assert_eq!(ChainFile::new(vec![rec.clone(), rec]).ungapped, u64::MAX);
    }

    #[test]
    fn test_record_aggregates() {
        let rec = ChainRecord::parse(CANONICAL, &["9 1 0", "10 0 5", "48"]).unwrap();
        assert_eq!(rec.steps().len(), 3);
        assert_eq!(rec.total_ungapped(), 67);
        assert_eq!(rec.total_dt(), 1);
        assert_eq!(rec.total_dq(), 5);
        assert_eq!(rec.id(), 1);
    }

    #[test]
    fn test_record_skips_interior_blank_lines() {
        let rec = ChainRecord::parse(CANONICAL, &["9 1 0", "", "  ", "10 0 5", "48"]).unwrap();
        assert_eq!(rec.steps().len(), 3);
    }

    #[test]
    fn test_record_accepts_mid_block_single_value() {
        let rec = ChainRecord::parse(CANONICAL, &["9", "10 0 5", "48"]).unwrap();
        assert_eq!(rec.steps()[0], AlignmentStep::new(9, 0, 0));
    }

    #[test]
    fn test_record_empty_alignment() {
        let err = ChainRecord::parse(CANONICAL, &[]).unwrap_err();
        assert!(err.is_kind(ChainParseErrorKind::EmptyAlignment));
        let err = ChainRecord::parse(CANONICAL, &["", " "]).unwrap_err();
        assert!(err.is_kind(ChainParseErrorKind::EmptyAlignment));
    }

    #[test]
    fn test_record_step_error_line_number() {
        let err = ChainRecord::parse(CANONICAL, &["9 1 0", "9 1", "48"]).unwrap_err();
        assert_eq!(err.line_number(), Some(3));
    }

    #[test]
    fn test_consistency() {
        let rec = ChainRecord::parse("chain 1 a 1000 + 100 400 b 1000 - 10 290 1", &["100 50 30", "100 50 50", "100"]).unwrap();
        let expected = ConsistencyError::TargetSpan { chain_id: 1, header_span: 300, step_span: 400 };
        assert_eq!(rec.check_consistency(), Err(expected));

        let rec = ChainRecord::parse("chain 1 a 1000 + 100 500 b 1000 - 10 390 1", &["100 50 30", "100 50 50", "100"]).unwrap();
        assert!(rec.check_consistency().is_ok());

        let rec = ChainRecord::parse("chain 1 a 1000 + 100 500 b 1000 - 10 300 1", &["100 50 30", "100 50 50", "100"]).unwrap();
        assert!(matches!(rec.check_consistency(), Err(ConsistencyError::QuerySpan { .. })));
    }

    #[test]
    fn test_record_display_round_trip() {
        let text = format!("{}\n9\t1\t0\n10\t0\t5\n48\n\n", CANONICAL);
        let file = parse_chain_bytes(text.as_bytes()).unwrap();
        assert_eq!(file.records[0].to_string(), text);
    }

    #[test]
    fn test_record_display_normalizes_separators() {
        let text = format!("{}\n9 1 0\n10  0 5\n  48\n", CANONICAL.replace(' ', "\t"));
        let file = parse_chain_bytes(text.as_bytes()).unwrap();
        let expected = format!("{}\n9\t1\t0\n10\t0\t5\n48\n\n", CANONICAL);
        assert_eq!(file.records[0].to_string(), expected);
    }

    #[test]
    fn test_parse_multiple_chains() {
        let chain_data = b"\
chain 1000 chr1 1000 + 0 100 chr1 1000 + 0 100 1
100

chain 500 chr2 2000 + 0 60 chr2 2000 - 0 50 2
20 10 0
30
";
        let file = parse_chain_bytes(chain_data).unwrap();
        assert_eq!(file.len(), 2);
        assert_eq!(file.records[0].header().target_name, "chr1");
        assert_eq!(file.records[1].header().query_strand, Strand::Minus);
        assert_eq!(file.ungapped, 150);
        assert_eq!(file.dt, 10);
        assert_eq!(file.dq, 0);
    }

    #[test]
    fn test_parse_empty_stream() {
        let file = parse_chain_bytes(b"").unwrap();
        assert!(file.is_empty());
        let file = parse_chain_bytes(b"# only a comment\n").unwrap();
        assert!(file.is_empty());
    }

    #[test]
    fn test_parse_chain_error_line_number() {
        let chain_data = b"\
chain 1000 chr1 1000 + 0 100 chr1 1000 + 0 100 1
invalid_data
";
        let err = parse_chain_bytes(chain_data).unwrap_err();
        assert_eq!(err.line_number(), Some(2));
    }

    #[test]
    fn test_reader_continues_after_bad_record() {
        let chain_data = b"\
chain 1 chr1 1000 + 0 100 chr1 1000 + 0 100 1
9 1

chain 2 chr1 1000 + 0 100 chr1 1000 + 0 100 2
100
";
        let results: Vec<_> = ChainReader::new(&chain_data[..]).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert_eq!(results[1].as_ref().unwrap().id(), 2);
    }

    #[test]
    fn test_summarize_modes() {
        let chain_data = b"\
chain 1 chr1 1000 + 0 100 chr1 1000 + 0 100 1
9 1

chain 2 chr1 1000 + 0 100 chr1 1000 + 0 100 2
60 10 10
30
";
        assert!(summarize_chain(&chain_data[..], ErrorMode::Strict).is_err());

        let summary = summarize_chain(&chain_data[..], ErrorMode::Skip).unwrap();
        assert_eq!(
            summary,
            ChainSummary { records: 1, failed: 1, ungapped: 90, dt: 10, dq: 10 }
        );
    }
}
