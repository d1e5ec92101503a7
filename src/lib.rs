//! chainmap - UCSC chain file parsing and block projection
//!
//! Reads chain alignments between a target and a query assembly and
//! reconstructs, for every ungapped block, the interval it occupies in
//! both coordinate systems.
//!
//! # Features
//!
//! - Lazy, record-at-a-time parsing of plain, gzip and bzip2 chain files
//! - Reverse-strand query flip handled in the mapper
//! - BED and TSV projections of the aligned blocks
//! - Strict or skip-on-error processing, optionally parallel with rayon
//!
//! # Example
//!
//! ```
//! use chainmap::{ChainReader, Interval};
//!
//! let data = b"chain 10 chrA 100 + 0 30 chrB 100 + 5 30 1\n10 5 0\n15\n";
//! for record in ChainReader::new(&data[..]) {
//!     let record = record?;
//!     let blocks: Vec<_> = record.blocks()?.collect();
//!     assert_eq!(blocks[1].target, Interval::new(15, 30));
//!     assert_eq!(blocks[1].query, Interval::new(15, 30));
//! }
//! # Ok::<(), chainmap::ChainMapError>(())
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    parse_chain_bytes, parse_chain_file, parse_chain_reader, AlignedBlock, AlignmentStep,
    ChainFile, ChainHeader, ChainMapError, ChainParseError, ChainReader, ChainRecord, ErrorMode,
    Interval, MappingError, Strand,
};
pub use formats::{bed, tsv};
