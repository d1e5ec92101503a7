//! Projection emitters
//!
//! Adapters that print the aligned blocks of each chain record as
//! BED-style or TSV-style lines, plus the shared conversion driver.

pub mod bed;
pub mod tsv;

pub use bed::{convert_bed, format_bed_line, BedProjection, PrimarySystem};
pub use tsv::{convert_tsv, format_tsv_line, TsvProjection};

use crate::core::{
    AlignedBlock, ChainHeader, ChainMapError, ChainParseError, ChainReader, ChainRecord,
    ChainResult, ErrorMode, MappingResult,
};
use rayon::prelude::*;
use std::io::{self, BufRead, BufWriter, Write};

/// Records handed to the thread pool at once
const CHUNK_SIZE: usize = 1024;

/// Output buffer size
const WRITE_BUFFER_SIZE: usize = 128 * 1024;

/// A stateless, line-per-block formatter
pub trait Projection: Sync {
    /// Append the line for `block` (newline included) to `out`
    fn write_block(&self, header: &ChainHeader, block: &AlignedBlock, out: &mut String);
}

/// Render every block of one record, returning the number of lines written
pub fn project_record<P: Projection + ?Sized>(
    projection: &P,
    record: &ChainRecord,
    out: &mut String,
) -> MappingResult<usize> {
    let blocks = record.blocks()?;
    let count = blocks.len();
    for block in blocks {
        projection.write_block(record.header(), &block, out);
    }
    Ok(count)
}

/// Settings for a conversion run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    pub mode: ErrorMode,
    /// Number of threads (1 = sequential)
    pub threads: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            mode: ErrorMode::Strict,
            threads: 1,
        }
    }
}

/// Conversion statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    /// Records read
    pub total: usize,
    /// Records projected
    pub success: usize,
    /// Records skipped
    pub failed: usize,
    /// Output lines written
    pub lines: usize,
}

struct Rendered {
    text: String,
    lines: usize,
}

fn render<P: Projection>(
    projection: &P,
    item: ChainResult<ChainRecord>,
) -> Result<Rendered, ChainMapError> {
    let record = item?;
    let mut text = String::with_capacity(64 * record.steps().len());
    let lines = project_record(projection, &record, &mut text)?;
    Ok(Rendered { text, lines })
}

/// Write one rendered record or apply the error mode to its failure
fn emit<W: Write>(
    writer: &mut W,
    stats: &mut ConversionStats,
    mode: ErrorMode,
    result: Result<Rendered, ChainMapError>,
) -> Result<(), ChainMapError> {
    match result {
        Ok(rendered) => {
            writer.write_all(rendered.text.as_bytes())?;
            stats.total += 1;
            stats.success += 1;
            stats.lines += rendered.lines;
            Ok(())
        }
        Err(e @ ChainMapError::ChainParse(ChainParseError::Io(_))) | Err(e @ ChainMapError::Io(_)) => Err(e),
        Err(e) => {
            stats.total += 1;
            if mode.is_strict() {
                return Err(e);
            }
            log::warn!("Skipping record: {}", e);
            stats.failed += 1;
            Ok(())
        }
    }
}

/// Project every record of a chain stream to `writer`, in file order
///
/// # Arguments
/// * `reader` - Chain text
/// * `writer` - Destination for the projected lines
/// * `projection` - Line formatter
/// * `options` - Error mode and thread count
///
/// # Returns
/// Conversion statistics
pub fn convert_chain<R: BufRead, W: Write, P: Projection>(
    reader: R,
    writer: W,
    projection: &P,
    options: &ConvertOptions,
) -> Result<ConversionStats, ChainMapError> {
    let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, writer);
    let stats = if options.threads > 1 {
        convert_parallel(reader, &mut writer, projection, options)?
    } else {
        convert_sequential(reader, &mut writer, projection, options.mode)?
    };
    writer.flush()?;

    log::info!(
        "Projected {} of {} records ({} lines, {} skipped)",
        stats.success,
        stats.total,
        stats.lines,
        stats.failed
    );
    Ok(stats)
}

/// Sequential conversion (single-threaded)
fn convert_sequential<R: BufRead, W: Write, P: Projection>(
    reader: R,
    writer: &mut W,
    projection: &P,
    mode: ErrorMode,
) -> Result<ConversionStats, ChainMapError> {
    let mut stats = ConversionStats::default();
    for item in ChainReader::new(reader) {
        emit(writer, &mut stats, mode, render(projection, item))?;
    }
    Ok(stats)
}

/// Parallel conversion using rayon
///
/// Records are read in chunks, rendered in parallel and written back in
/// their original order, so the output matches the sequential path.
fn convert_parallel<R: BufRead, W: Write, P: Projection>(
    reader: R,
    writer: &mut W,
    projection: &P,
    options: &ConvertOptions,
) -> Result<ConversionStats, ChainMapError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()
        .map_err(|e| {
            io::Error::new(
                io::ErrorKind::Other,
                format!("Failed to create thread pool: {}", e),
            )
        })?;

    let mut stats = ConversionStats::default();
    let mut records = ChainReader::new(reader);

    loop {
        let chunk: Vec<ChainResult<ChainRecord>> = records.by_ref().take(CHUNK_SIZE).collect();
        if chunk.is_empty() {
            break;
        }

        let rendered: Vec<Result<Rendered, ChainMapError>> = pool.install(|| {
            chunk
                .into_par_iter()
                .map(|item| render(projection, item))
                .collect()
        });

        for result in rendered {
            emit(writer, &mut stats, options.mode, result)?;
        }
    }

    Ok(stats)
}
