//! Coordinate mapping algorithm
//!
//! Turns the run-length steps of a chain record into absolute
//! target/query interval pairs, one per ungapped block.
//!
//! The walk keeps two offsets relative to the start of the chain:
//! 1. Each step covers `[offset, offset + size)` on both sides
//! 2. Target intervals are `targetStart + offset`; the target strand must be `+`
//! 3. Forward query intervals are `queryStart + offset`
//! 4. Reverse query intervals are subtracted from the forward-strand end of the chain
//! 5. After each step the offsets advance by `size + dt` and `size + dq`

use crate::core::{AlignmentStep, ChainHeader, ChainRecord, MappingError, MappingResult};
use std::fmt;

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Strand {
    #[default]
    Plus,
    Minus,
}

impl Strand {
    /// Get the complement strand
    ///
    /// # Examples
    /// ```
    /// use chainmap::core::Strand;
    /// assert_eq!(Strand::Plus.complement(), Strand::Minus);
    /// assert_eq!(Strand::Minus.complement(), Strand::Plus);
    /// ```
    pub fn complement(&self) -> Self {
        match self {
            Strand::Plus => Strand::Minus,
            Strand::Minus => Strand::Plus,
        }
    }

    /// Parse a strand field; only the exact tokens `+` and `-` are accepted
    ///
    /// # Examples
    /// ```
    /// use chainmap::core::Strand;
    /// assert_eq!(Strand::from_token("+"), Some(Strand::Plus));
    /// assert_eq!(Strand::from_token("-"), Some(Strand::Minus));
    /// assert_eq!(Strand::from_token("+-"), None);
    /// assert_eq!(Strand::from_token("."), None);
    /// ```
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Strand::Plus),
            "-" => Some(Strand::Minus),
            _ => None,
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Half-open interval `[start, end)` in 0-based coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    pub start: u64,
    pub end: u64,
}

impl Interval {
    pub fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Start in 1-based inclusive coordinates
    pub fn one_based_start(&self) -> u64 {
        self.start + 1
    }
}

/// One ungapped block projected onto both assemblies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedBlock {
    pub target: Interval,
    pub query: Interval,
    /// Query strand of the owning chain
    pub strand: Strand,
}

/// Lazy walk over the blocks of one chain record
///
/// Created by [`ChainRecord::blocks`]. Calling that again restarts the walk.
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    header: &'a ChainHeader,
    steps: std::slice::Iter<'a, AlignmentStep>,
    target_offset: u64,
    query_offset: u64,
    /// Forward-strand end of the query span, used only for `-` queries
    query_block_end: u64,
}

impl<'a> Blocks<'a> {
    pub(crate) fn new(record: &'a ChainRecord) -> MappingResult<Self> {
        let header = record.header();

        if header.target_strand != Strand::Plus {
            return Err(MappingError::unsupported_strand(
                header.id,
                header.target_strand,
                &header.to_string(),
            ));
        }

        // Both walks must stay inside their sequences
        let target_span = record.total_ungapped().checked_add(record.total_dt());
        let target_available = header.target_size.saturating_sub(header.target_start);
        match target_span {
            Some(span) if span <= target_available => {}
            span => {
                return Err(MappingError::target_out_of_bounds(
                    header.id,
                    span.unwrap_or(u64::MAX),
                    target_available,
                    &header.to_string(),
                ))
            }
        }

        let query_span = record.total_ungapped().checked_add(record.total_dq());
        let query_available = header.query_size.saturating_sub(header.query_start);
        match query_span {
            Some(span) if span <= query_available => {}
            span => {
                return Err(MappingError::query_out_of_bounds(
                    header.id,
                    span.unwrap_or(u64::MAX),
                    query_available,
                    &header.to_string(),
                ))
            }
        }

        let query_block_end = match header.query_strand {
            Strand::Plus => header.query_end,
            // Header query coordinates are on the reverse strand; flip the start
            Strand::Minus => query_available,
        };

        Ok(Self {
            header,
            steps: record.steps().iter(),
            target_offset: 0,
            query_offset: 0,
            query_block_end,
        })
    }

    /// Query span of the whole chain on the forward strand
    pub fn query_block(&self) -> Interval {
        match self.header.query_strand {
            Strand::Plus => Interval::new(self.header.query_start, self.header.query_end),
            Strand::Minus => Interval::new(
                self.header.query_size - self.header.query_end,
                self.query_block_end,
            ),
        }
    }
}

impl Iterator for Blocks<'_> {
    type Item = AlignedBlock;

    fn next(&mut self) -> Option<AlignedBlock> {
        let step = self.steps.next()?;

        let rel_target = Interval::new(self.target_offset, self.target_offset + step.size);
        let rel_query = Interval::new(self.query_offset, self.query_offset + step.size);

        let target = Interval::new(
            self.header.target_start + rel_target.start,
            self.header.target_start + rel_target.end,
        );
        let query = match self.header.query_strand {
            Strand::Plus => Interval::new(
                self.header.query_start + rel_query.start,
                self.header.query_start + rel_query.end,
            ),
            Strand::Minus => Interval::new(
                self.query_block_end - rel_query.end,
                self.query_block_end - rel_query.start,
            ),
        };

        self.target_offset += step.size + step.dt;
        self.query_offset += step.size + step.dq;

        Some(AlignedBlock {
            target,
            query,
            strand: self.header.query_strand,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.steps.size_hint()
    }
}

impl ExactSizeIterator for Blocks<'_> {}
