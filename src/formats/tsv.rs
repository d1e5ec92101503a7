//! TSV-style projection
//!
//! One line per aligned block, 8 tab-separated columns, both assemblies
//! in 1-based inclusive coordinates:
//! `id  targetName  targetStart  targetEnd  queryStrand  queryName  queryStart  queryEnd`.

use super::{convert_chain, ConversionStats, ConvertOptions, Projection};
use crate::core::{AlignedBlock, ChainHeader, ChainMapError};
use std::io::{BufRead, Write};

/// TSV projection (no settings)
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvProjection;

fn push_tsv_fields(out: &mut String, header: &ChainHeader, block: &AlignedBlock) {
    out.push_str(&header.id.to_string());
    out.push('\t');
    out.push_str(&header.target_name);
    out.push('\t');
    out.push_str(&block.target.one_based_start().to_string());
    out.push('\t');
    out.push_str(&block.target.end.to_string());
    out.push('\t');
    out.push(block.strand.to_char());
    out.push('\t');
    out.push_str(&header.query_name);
    out.push('\t');
    out.push_str(&block.query.one_based_start().to_string());
    out.push('\t');
    out.push_str(&block.query.end.to_string());
}

/// Format one block as a TSV line (without trailing newline)
pub fn format_tsv_line(header: &ChainHeader, block: &AlignedBlock) -> String {
    let mut output = String::with_capacity(96);
    push_tsv_fields(&mut output, header, block);
    output
}

impl Projection for TsvProjection {
    fn write_block(&self, header: &ChainHeader, block: &AlignedBlock, out: &mut String) {
        push_tsv_fields(out, header, block);
        out.push('\n');
    }
}

/// Convert a chain stream to TSV lines
pub fn convert_tsv<R: BufRead, W: Write>(
    reader: R,
    writer: W,
    options: &ConvertOptions,
) -> Result<ConversionStats, ChainMapError> {
    convert_chain(reader, writer, &TsvProjection, options)
}
