//! Error types for chainmap
//!
//! Defines all error types used throughout the library.

use crate::core::Strand;
use thiserror::Error;

/// Longest slice of an offending line kept in an error
const MAX_CONTENT_LEN: usize = 100;

fn clip(content: &str) -> String {
    content.chars().take(MAX_CONTENT_LEN).collect()
}

/// Main error type for chainmap operations
#[derive(Debug, Error)]
pub enum ChainMapError {
    /// Chain file parsing errors
    #[error("Chain parse error: {0}")]
    ChainParse(#[from] ChainParseError),

    /// Coordinate mapping errors
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Specific kinds of chain parsing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainParseErrorKind {
    MalformedHeader,
    MalformedStep,
    EmptyAlignment,
    Io,
}

/// Errors that can occur while turning raw blocks into chain records
#[derive(Debug, Error)]
pub enum ChainParseError {
    /// Header line has the wrong token count, a bad number or a bad strand
    #[error("Malformed chain header at line {line}: {message} ('{content}')")]
    MalformedHeader {
        line: usize,
        message: String,
        content: String,
    },

    /// Data line has a token count other than 1 or 3, a bad number, or
    /// sizes whose running sum no longer fits in 64 bits
    #[error("Malformed alignment step at line {line} of chain {chain_id}: {message} ('{content}' under '{header}')")]
    MalformedStep {
        line: usize,
        chain_id: u64,
        message: String,
        content: String,
        header: String,
    },

    /// Record without a single alignment step
    #[error("Chain {chain_id} at line {line} has no alignment steps ('{header}')")]
    EmptyAlignment {
        line: usize,
        chain_id: u64,
        header: String,
    },

    /// I/O error while reading the stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChainParseError {
    pub fn malformed_header(message: impl Into<String>, line: usize, content: &str) -> Self {
        Self::MalformedHeader {
            line,
            message: message.into(),
            content: clip(content),
        }
    }

    pub fn malformed_step(
        message: impl Into<String>,
        line: usize,
        chain_id: u64,
        content: &str,
        header: &str,
    ) -> Self {
        Self::MalformedStep {
            line,
            chain_id,
            message: message.into(),
            content: clip(content),
            header: clip(header),
        }
    }

    pub fn empty_alignment(line: usize, chain_id: u64, header: &str) -> Self {
        Self::EmptyAlignment {
            line,
            chain_id,
            header: clip(header),
        }
    }

    pub fn kind(&self) -> ChainParseErrorKind {
        match self {
            Self::MalformedHeader { .. } => ChainParseErrorKind::MalformedHeader,
            Self::MalformedStep { .. } => ChainParseErrorKind::MalformedStep,
            Self::EmptyAlignment { .. } => ChainParseErrorKind::EmptyAlignment,
            Self::Io(_) => ChainParseErrorKind::Io,
        }
    }

    /// Check if this is a specific kind of error
    pub fn is_kind(&self, kind: ChainParseErrorKind) -> bool {
        self.kind() == kind
    }

    /// Line number (1-based) the error points at, if any
    pub fn line_number(&self) -> Option<usize> {
        match self {
            Self::MalformedHeader { line, .. }
            | Self::MalformedStep { line, .. }
            | Self::EmptyAlignment { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}

/// Errors that can occur during coordinate mapping
#[derive(Debug, Error)]
pub enum MappingError {
    /// Only forward-target chains can be projected
    #[error("Chain {chain_id} has target strand '{strand}', only '+' is supported ('{header}')")]
    UnsupportedStrand {
        chain_id: u64,
        strand: Strand,
        header: String,
    },

    /// Steps cover more target bases than remain after the target start
    #[error("Chain {chain_id} spans {span} target bases but only {available} follow the start ('{header}')")]
    TargetOutOfBounds {
        chain_id: u64,
        span: u64,
        available: u64,
        header: String,
    },

    /// Steps cover more query bases than remain after the query start
    #[error("Chain {chain_id} spans {span} query bases but only {available} follow the start ('{header}')")]
    QueryOutOfBounds {
        chain_id: u64,
        span: u64,
        available: u64,
        header: String,
    },
}

impl MappingError {
    pub fn unsupported_strand(chain_id: u64, strand: Strand, header: &str) -> Self {
        Self::UnsupportedStrand {
            chain_id,
            strand,
            header: clip(header),
        }
    }

    pub fn target_out_of_bounds(chain_id: u64, span: u64, available: u64, header: &str) -> Self {
        Self::TargetOutOfBounds {
            chain_id,
            span,
            available,
            header: clip(header),
        }
    }

    pub fn query_out_of_bounds(chain_id: u64, span: u64, available: u64, header: &str) -> Self {
        Self::QueryOutOfBounds {
            chain_id,
            span,
            available,
            header: clip(header),
        }
    }
}

/// Disagreement between a header's spans and the summed alignment steps
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("Chain {chain_id}: target span is {header_span} but steps cover {step_span}")]
    TargetSpan {
        chain_id: u64,
        header_span: u64,
        step_span: u64,
    },

    #[error("Chain {chain_id}: query span is {header_span} but steps cover {step_span}")]
    QuerySpan {
        chain_id: u64,
        header_span: u64,
        step_span: u64,
    },
}

/// How a run reacts to a record that fails to parse or map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Abort the whole run on the first failing record
    #[default]
    Strict,
    /// Log the failing record, count it and continue with the next one
    Skip,
}

impl ErrorMode {
    pub fn is_strict(&self) -> bool {
        matches!(self, ErrorMode::Strict)
    }
}

/// Result type alias for chainmap operations
pub type Result<T> = std::result::Result<T, ChainMapError>;

/// Result type alias for chain parsing operations
pub type ChainResult<T> = std::result::Result<T, ChainParseError>;

/// Result type alias for mapping operations
pub type MappingResult<T> = std::result::Result<T, MappingError>;
