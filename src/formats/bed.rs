//! BED-style projection
//!
//! One line per aligned block, 5 tab-separated columns:
//! `chrom  start  end  strand  otherLocus`. The primary interval is 0-based
//! half-open; `otherLocus` is `name:start-end` in 1-based inclusive
//! coordinates on the other assembly. The strand column is the query strand.

use super::{convert_chain, ConversionStats, ConvertOptions, Projection};
use crate::core::{AlignedBlock, ChainHeader, ChainMapError};
use std::io::{BufRead, Write};

/// Which assembly supplies the primary BED interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimarySystem {
    #[default]
    Target,
    Query,
}

/// BED projection with a chosen primary coordinate system
#[derive(Debug, Clone, Copy, Default)]
pub struct BedProjection {
    pub primary: PrimarySystem,
}

impl BedProjection {
    pub fn new(primary: PrimarySystem) -> Self {
        Self { primary }
    }
}

fn push_bed_fields(
    out: &mut String,
    header: &ChainHeader,
    block: &AlignedBlock,
    primary: PrimarySystem,
) {
    let (name, interval, other_name, other) = match primary {
        PrimarySystem::Target => (
            header.target_name.as_str(),
            &block.target,
            header.query_name.as_str(),
            &block.query,
        ),
        PrimarySystem::Query => (
            header.query_name.as_str(),
            &block.query,
            header.target_name.as_str(),
            &block.target,
        ),
    };

    out.push_str(name);
    out.push('\t');
    out.push_str(&interval.start.to_string());
    out.push('\t');
    out.push_str(&interval.end.to_string());
    out.push('\t');
    out.push(block.strand.to_char());
    out.push('\t');
    out.push_str(other_name);
    out.push(':');
    out.push_str(&other.one_based_start().to_string());
    out.push('-');
    out.push_str(&other.end.to_string());
}

/// Format one block as a BED line (without trailing newline)
pub fn format_bed_line(header: &ChainHeader, block: &AlignedBlock, primary: PrimarySystem) -> String {
    let mut output = String::with_capacity(96);
    push_bed_fields(&mut output, header, block, primary);
    output
}

impl Projection for BedProjection {
    fn write_block(&self, header: &ChainHeader, block: &AlignedBlock, out: &mut String) {
        push_bed_fields(out, header, block, self.primary);
        out.push('\n');
    }
}

/// Convert a chain stream to BED lines
pub fn convert_bed<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    primary: PrimarySystem,
    options: &ConvertOptions,
) -> Result<ConversionStats, ChainMapError> {
    convert_chain(reader, writer, &BedProjection::new(primary), options)
}
