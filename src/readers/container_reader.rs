use crate::compression::{BlockCompressor, Lz4BlockCompressor};
use crate::error::{ProcessingError, Result};
use crate::utils::constants::{BLOCK_COUNT_LEN, BLOCK_HEADER_LEN, DEFAULT_BUFFER_SIZE};
use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use tracing::debug;

const LZ4_MAX_EXPANSION: usize = 255;
const LZ4_EXPANSION_SLACK: usize = 16;

/// Per-block sizes as stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub compressed_size: usize,
    pub original_size: usize,
}

impl BlockHeader {
    pub fn from_bytes(bytes: [u8; BLOCK_HEADER_LEN], index: usize) -> Result<Self> {
        let compressed = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let original = i32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

        Ok(Self {
            compressed_size: non_negative(compressed, "compressed size", index)?,
            original_size: non_negative(original, "original size", index)?,
        })
    }
}

fn non_negative(value: i32, field: &str, index: usize) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        ProcessingError::InvalidHeader(format!("block {} has negative {}: {}", index, field, value))
    })
}

/// Streams the blocks of a container in file order.
///
/// Both the compressed and decompressed buffers are reused across blocks and
/// only ever grow, so peak memory follows the largest block seen.
pub struct ContainerReader<R, C = Lz4BlockCompressor> {
    reader: R,
    compressor: C,
    block_count: usize,
    blocks_read: usize,
    compressed: Vec<u8>,
    decompressed: Vec<u8>,
}

impl ContainerReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))
    }
}

impl<R: Read> ContainerReader<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        Self::with_compressor(reader, Lz4BlockCompressor::new())
    }
}

impl<R: Read, C: BlockCompressor> ContainerReader<R, C> {
    pub fn with_compressor(mut reader: R, compressor: C) -> Result<Self> {
        let mut count_bytes = [0u8; BLOCK_COUNT_LEN];
        read_fully(&mut reader, &mut count_bytes, "block count")?;

        let raw_count = i32::from_le_bytes(count_bytes);
        let block_count = usize::try_from(raw_count).map_err(|_| {
            ProcessingError::InvalidHeader(format!("negative block count: {}", raw_count))
        })?;

        debug!(block_count, "opened container");

        Ok(Self {
            reader,
            compressor,
            block_count,
            blocks_read: 0,
            compressed: Vec::new(),
            decompressed: Vec::new(),
        })
    }

    pub fn block_count(&self) -> usize {
        self.block_count
    }

    pub fn blocks_read(&self) -> usize {
        self.blocks_read
    }

    /// Capacities of the (compressed, decompressed) buffers.
    pub fn buffer_capacity(&self) -> (usize, usize) {
        (self.compressed.capacity(), self.decompressed.capacity())
    }

    /// Decompress the next block. The returned view is invalidated by the next call.
    pub fn next_block(&mut self) -> Result<Option<&[u8]>> {
        if self.blocks_read == self.block_count {
            return Ok(None);
        }
        let index = self.blocks_read;

        let mut header_bytes = [0u8; BLOCK_HEADER_LEN];
        read_fully(
            &mut self.reader,
            &mut header_bytes,
            &format!("header of block {}", index),
        )?;
        let header = BlockHeader::from_bytes(header_bytes, index)?;

        // LZ4 expands at most ~255x; anything larger cannot decompress.
        let max_original = header
            .compressed_size
            .saturating_mul(LZ4_MAX_EXPANSION)
            .saturating_add(LZ4_EXPANSION_SLACK);
        if header.original_size > max_original {
            return Err(ProcessingError::Decompression {
                block: index,
                message: format!(
                    "declared size {} cannot come from {} compressed bytes",
                    header.original_size, header.compressed_size
                ),
            });
        }

        self.read_payload(header.compressed_size, index)?;

        if self.decompressed.len() < header.original_size {
            self.decompressed.resize(header.original_size, 0);
        }
        let dst = &mut self.decompressed[..header.original_size];

        let written = self
            .compressor
            .decompress_into(&self.compressed, dst)
            .map_err(|e| match e {
                ProcessingError::Decompression { message, .. } => {
                    ProcessingError::Decompression { block: index, message }
                }
                other => other,
            })?;

        if written != header.original_size {
            return Err(ProcessingError::Decompression {
                block: index,
                message: format!(
                    "expected {} bytes, decompressed {}",
                    header.original_size, written
                ),
            });
        }

        debug!(
            block = index,
            compressed = header.compressed_size,
            original = header.original_size,
            "decompressed block"
        );

        self.blocks_read += 1;
        Ok(Some(&self.decompressed[..header.original_size]))
    }

    /// Reads exactly `len` payload bytes into the compressed buffer.
    ///
    /// The buffer grows with the data actually read, so a bogus size in a
    /// truncated file fails on the short read rather than on allocation.
    fn read_payload(&mut self, len: usize, index: usize) -> Result<()> {
        self.compressed.clear();
        let actual = (&mut self.reader)
            .take(len as u64)
            .read_to_end(&mut self.compressed)?;

        if actual < len {
            return Err(ProcessingError::TruncatedContainer {
                context: format!("payload of block {}", index),
                expected: len,
                actual,
            });
        }
        Ok(())
    }
}

/// Like `read_exact`, but a short read reports how many bytes did arrive.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8], context: &str) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(ProcessingError::TruncatedContainer {
                    context: context.to_string(),
                    expected: buf.len(),
                    actual: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
