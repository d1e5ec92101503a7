//! Core chain functionality
//!
//! This module contains the block reader, the chain record model,
//! and the block coordinate mapping algorithm.

pub mod block;
mod chain;
mod error;
pub mod io;
mod mapper;

pub use block::{BlockReader, RawBlock, RawLine};
pub use chain::{
    parse_chain_bytes, parse_chain_file, parse_chain_reader, summarize_chain, AlignmentStep,
    ChainFile, ChainHeader, ChainReader, ChainRecord, ChainSummary, HEADER_FIELDS,
};
pub use error::{
    ChainMapError, ChainParseError, ChainParseErrorKind, ChainResult, ConsistencyError,
    ErrorMode, MappingError, MappingResult, Result,
};
pub use io::{detect_compression, ChainInput, CompressionFormat};
pub use mapper::{AlignedBlock, Blocks, Interval, Strand};
