//! Input layer for chain files
//!
//! Opens plain, gzip or bzip2 chain files behind a single `BufRead`,
//! memory-mapping large plain files.

use memmap2::Mmap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;

/// Read buffer for plain and decompressed streams
pub const DEFAULT_BUFFER_SIZE: usize = 128 * 1024;

/// Plain files at least this large are memory-mapped
pub const MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;

/// On-disk encoding of a chain file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionFormat {
    Plain,
    Gzip,
    Bzip2,
}

impl CompressionFormat {
    /// Classify by extension first, then by the leading magic bytes
    fn classify(extension: &str, magic: &[u8]) -> Self {
        if extension == "gz" || magic.starts_with(&[0x1f, 0x8b]) {
            CompressionFormat::Gzip
        } else if extension == "bz2" || magic.starts_with(b"BZh") {
            CompressionFormat::Bzip2
        } else {
            CompressionFormat::Plain
        }
    }
}

/// Peek at a chain file's extension and first bytes
pub fn detect_compression(path: &Path) -> io::Result<CompressionFormat> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let mut file = File::open(path)?;
    let mut magic = [0u8; 3];
    let bytes_read = file.read(&mut magic)?;

    Ok(CompressionFormat::classify(extension, &magic[..bytes_read]))
}

/// Map a whole file read-only; the cursor supplies `Read` and `BufRead`
fn map_file(file: &File) -> io::Result<Cursor<Mmap>> {
    // SAFETY: the file must not be truncated or rewritten while mapped
    let mmap = unsafe { Mmap::map(file)? };
    Ok(Cursor::new(mmap))
}

/// A chain input stream, whatever its on-disk encoding
pub enum ChainInput {
    /// Buffered plain text
    Plain(BufReader<File>),
    /// Memory-mapped plain text for large files
    Mapped(Cursor<Mmap>),
    /// Gzip-decoded stream
    Gzip(BufReader<flate2::read::MultiGzDecoder<File>>),
    /// Bzip2-decoded stream
    Bzip2(BufReader<bzip2::read::BzDecoder<File>>),
}

impl ChainInput {
    /// Open a chain file, detecting compression by extension or magic bytes
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let format = detect_compression(path)?;
        let file = File::open(path)?;
        log::info!("Opening chain file {:?} ({:?})", path, format);

        match format {
            CompressionFormat::Gzip => {
                let decoder = flate2::read::MultiGzDecoder::new(file);
                Ok(ChainInput::Gzip(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, decoder)))
            }
            CompressionFormat::Bzip2 => {
                let decoder = bzip2::read::BzDecoder::new(file);
                Ok(ChainInput::Bzip2(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, decoder)))
            }
            CompressionFormat::Plain => {
                if file.metadata()?.len() >= MMAP_THRESHOLD {
                    Ok(ChainInput::Mapped(map_file(&file)?))
                } else {
                    Ok(ChainInput::Plain(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file)))
                }
            }
        }
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self, ChainInput::Mapped(_))
    }
}

impl Read for ChainInput {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            ChainInput::Plain(reader) => reader.read(buf),
            ChainInput::Mapped(reader) => reader.read(buf),
            ChainInput::Gzip(reader) => reader.read(buf),
            ChainInput::Bzip2(reader) => reader.read(buf),
        }
    }
}

impl BufRead for ChainInput {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            ChainInput::Plain(reader) => reader.fill_buf(),
            ChainInput::Mapped(reader) => reader.fill_buf(),
            ChainInput::Gzip(reader) => reader.fill_buf(),
            ChainInput::Bzip2(reader) => reader.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            ChainInput::Plain(reader) => reader.consume(amt),
            ChainInput::Mapped(reader) => reader.consume(amt),
            ChainInput::Gzip(reader) => reader.consume(amt),
            ChainInput::Bzip2(reader) => reader.consume(amt),
        }
    }
}
