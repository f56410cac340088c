use crate::compression::{BlockCompressor, Lz4BlockCompressor};
use crate::error::{ProcessingError, Result};
use crate::models::temperature::format_x10;
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, RECORD_DELIMITER, RECORD_TERMINATOR};
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerSummary {
    pub blocks: usize,
    pub records: u64,
    pub raw_bytes: u64,
    pub compressed_bytes: u64,
}

impl ContainerSummary {
    pub fn compression_ratio(&self) -> f64 {
        if self.compressed_bytes == 0 {
            return 0.0;
        }
        self.raw_bytes as f64 / self.compressed_bytes as f64
    }

    pub fn summary(&self) -> String {
        format!(
            "{} blocks, {} records, {} raw bytes -> {} compressed ({:.2}x)",
            self.blocks,
            self.records,
            self.raw_bytes,
            self.compressed_bytes,
            self.compression_ratio()
        )
    }
}

/// Packs records into compressed blocks of at most `block_size` raw bytes.
///
/// The block count is written as a placeholder at the sink's current
/// position and patched there by [`finish`], so the sink must be seekable.
///
/// [`finish`]: ContainerWriter::finish
pub struct ContainerWriter<W: Write + Seek, C = Lz4BlockCompressor> {
    writer: W,
    compressor: C,
    header_offset: u64,
    block_size: usize,
    buffer: Vec<u8>,
    line: Vec<u8>,
    summary: ContainerSummary,
}

impl ContainerWriter<BufWriter<File>> {
    pub fn create(path: &Path, block_size: usize) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file), block_size)
    }
}

impl<W: Write + Seek> ContainerWriter<W> {
    pub fn new(writer: W, block_size: usize) -> Result<Self> {
        Self::with_compressor(writer, Lz4BlockCompressor::new(), block_size)
    }
}

impl<W: Write + Seek, C: BlockCompressor> ContainerWriter<W, C> {
    pub fn with_compressor(mut writer: W, compressor: C, block_size: usize) -> Result<Self> {
        if block_size == 0 || block_size > i32::MAX as usize {
            return Err(ProcessingError::Config(format!(
                "block size must be between 1 and {} bytes, got {}",
                i32::MAX,
                block_size
            )));
        }

        let header_offset = writer.stream_position()?;
        writer.write_all(&0i32.to_le_bytes())?;

        Ok(Self {
            writer,
            compressor,
            header_offset,
            block_size,
            buffer: Vec::new(),
            line: Vec::with_capacity(128),
            summary: ContainerSummary::default(),
        })
    }

    /// Append one complete record, `\n` included.
    ///
    /// Flushes the pending block first if the record would push it past the
    /// budget. A record larger than the budget becomes a block of its own.
    pub fn push_record(&mut self, record: &[u8]) -> Result<()> {
        if !self.buffer.is_empty() && self.buffer.len() + record.len() > self.block_size {
            self.flush_pending()?;
        }
        self.buffer.extend_from_slice(record);
        self.summary.records += 1;
        Ok(())
    }

    /// Format and append `<station>;<temperature>\n`.
    pub fn push_measurement(&mut self, station: &str, temperature_x10: i32) -> Result<()> {
        let mut line = std::mem::take(&mut self.line);
        line.clear();
        line.extend_from_slice(station.as_bytes());
        line.push(RECORD_DELIMITER);
        line.extend_from_slice(format_x10(temperature_x10).as_bytes());
        line.push(RECORD_TERMINATOR);

        let result = self.push_record(&line);
        self.line = line;
        result
    }

    /// Write `raw` as a block on its own, after any pending records.
    pub fn write_block(&mut self, raw: &[u8]) -> Result<()> {
        self.flush_pending()?;
        self.emit_block(raw)
    }

    /// Raw bytes waiting for the next block flush.
    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn blocks_written(&self) -> usize {
        self.summary.blocks
    }

    /// Flush the last block and patch the block count into the header.
    pub fn finish(mut self) -> Result<ContainerSummary> {
        self.flush_pending()?;

        let block_count = i32::try_from(self.summary.blocks).map_err(|_| {
            ProcessingError::InvalidHeader(format!(
                "{} blocks do not fit the block count field",
                self.summary.blocks
            ))
        })?;

        self.writer.seek(SeekFrom::Start(self.header_offset))?;
        self.writer.write_all(&block_count.to_le_bytes())?;
        self.writer.seek(SeekFrom::End(0))?;
        self.writer.flush()?;

        Ok(self.summary)
    }

    /// Compress and write the buffered records as a block now.
    pub fn flush_pending(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let buffer = std::mem::take(&mut self.buffer);
        let result = self.emit_block(&buffer);
        self.buffer = buffer;
        self.buffer.clear();
        result
    }

    fn emit_block(&mut self, raw: &[u8]) -> Result<()> {
        let compressed = self.compressor.compress(raw)?;

        let compressed_size = i32::try_from(compressed.len()).map_err(|_| {
            ProcessingError::Compression(format!(
                "compressed block of {} bytes exceeds the size field",
                compressed.len()
            ))
        })?;
        let original_size = i32::try_from(raw.len()).map_err(|_| {
            ProcessingError::Compression(format!(
                "raw block of {} bytes exceeds the size field",
                raw.len()
            ))
        })?;

        self.writer.write_all(&compressed_size.to_le_bytes())?;
        self.writer.write_all(&original_size.to_le_bytes())?;
        self.writer.write_all(&compressed)?;

        debug!(
            block = self.summary.blocks,
            original = raw.len(),
            compressed = compressed.len(),
            "wrote block"
        );

        self.summary.blocks += 1;
        self.summary.raw_bytes += raw.len() as u64;
        self.summary.compressed_bytes += compressed.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readers::ContainerReader;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn read_blocks(bytes: Vec<u8>) -> Result<Vec<Vec<u8>>> {
        let mut reader = ContainerReader::from_reader(Cursor::new(bytes))?;
        let mut blocks = Vec::new();
        while let Some(block) = reader.next_block()? {
            blocks.push(block.to_vec());
        }
        Ok(blocks)
    }

    #[test]
    fn test_header_is_patched_with_block_count() -> Result<()> {
        let mut writer = ContainerWriter::new(Cursor::new(Vec::new()), 24)?;
        for record in [&b"Tokyo;15.4\n"[..], b"Tokyo;16.0\n", b"Paris;-3.7\n"] {
            writer.push_record(record)?;
        }
        let summary = writer.finish()?;
        assert_eq!(summary.blocks, 2);
        assert_eq!(summary.records, 3);
        assert_eq!(summary.raw_bytes, 33);

        Ok(())
    }

    #[test]
    fn test_blocks_split_on_record_boundaries() -> Result<()> {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = ContainerWriter::new(&mut cursor, 24)?;
        writer.push_record(b"Tokyo;15.4\n")?;
        writer.push_record(b"Tokyo;16.0\n")?;
        writer.push_record(b"Paris;-3.7\n")?;
        writer.finish()?;

        let bytes = cursor.into_inner();
        assert_eq!(&bytes[..4], &2i32.to_le_bytes());
        assert_eq!(
            read_blocks(bytes)?,
            vec![b"Tokyo;15.4\nTokyo;16.0\n".to_vec(), b"Paris;-3.7\n".to_vec()]
        );
        Ok(())
    }

    #[test]
    fn test_oversized_record_gets_own_block() -> Result<()> {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = ContainerWriter::new(&mut cursor, 8)?;
        writer.push_record(b"Rio;30.1\n")?;
        writer.push_record(b"Baku;7.2\n")?;
        let summary = writer.finish()?;

        assert_eq!(summary.blocks, 2);
        assert_eq!(
            read_blocks(cursor.into_inner())?,
            vec![b"Rio;30.1\n".to_vec(), b"Baku;7.2\n".to_vec()]
        );
        Ok(())
    }

    #[test]
    fn test_push_measurement_formats_record() -> Result<()> {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = ContainerWriter::new(&mut cursor, 1024)?;
        writer.push_measurement("Paris", -37)?;
        writer.push_measurement("Tokyo", 160)?;
        writer.push_measurement("Quito", -5)?;
        assert_eq!(writer.pending_bytes(), 33);
        writer.finish()?;

        assert_eq!(
            read_blocks(cursor.into_inner())?,
            vec![b"Paris;-3.7\nTokyo;16.0\nQuito;-0.5\n".to_vec()]
        );
        Ok(())
    }

    #[test]
    fn test_write_block_keeps_order() -> Result<()> {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = ContainerWriter::new(&mut cursor, 1024)?;
        writer.push_record(b"A;1.0\n")?;
        writer.write_block(b"B;2.0\n")?;
        writer.push_record(b"C;3.0\n")?;
        writer.finish()?;

        assert_eq!(
            read_blocks(cursor.into_inner())?,
            vec![b"A;1.0\n".to_vec(), b"B;2.0\n".to_vec(), b"C;3.0\n".to_vec()]
        );
        Ok(())
    }

    #[test]
    fn test_empty_container() -> Result<()> {
        let mut cursor = Cursor::new(Vec::new());
        let summary = ContainerWriter::new(&mut cursor, 1024)?.finish()?;
        assert_eq!(summary.blocks, 0);
        assert_eq!(cursor.into_inner(), 0i32.to_le_bytes().to_vec());
        Ok(())
    }

    #[test]
    fn test_header_patched_at_starting_offset() -> Result<()> {
        let mut cursor = Cursor::new(b"PREFIX".to_vec());
        cursor.seek(SeekFrom::End(0))?;
        let mut writer = ContainerWriter::new(&mut cursor, 1024)?;
        writer.push_record(b"Accra;26.4\n")?;
        writer.finish()?;

        let bytes = cursor.into_inner();
        assert_eq!(&bytes[..6], b"PREFIX");
        assert_eq!(read_blocks(bytes[6..].to_vec())?, vec![b"Accra;26.4\n".to_vec()]);
        Ok(())
    }

    /// Accepts `limit` bytes, then reports zero-length writes.
    struct ShortSink {
        inner: Cursor<Vec<u8>>,
        limit: usize,
    }

    impl Write for ShortSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let room = self.limit.saturating_sub(self.inner.get_ref().len());
            let n = buf.len().min(room);
            self.inner.write(&buf[..n])
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Seek for ShortSink {
        fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
            self.inner.seek(pos)
        }
    }

    #[test]
    fn test_short_write_is_io_error() -> Result<()> {
        let sink = ShortSink {
            inner: Cursor::new(Vec::new()),
            limit: 10,
        };
        let mut writer = ContainerWriter::new(sink, 1024)?;
        writer.push_record(b"Tokyo;15.4\n")?;

        assert!(matches!(writer.finish(), Err(ProcessingError::Io(_))));
        Ok(())
    }

    #[test]
    fn test_zero_block_size_rejected() {
        let result = ContainerWriter::new(Cursor::new(Vec::new()), 0);
        assert!(matches!(result, Err(ProcessingError::Config(_))));
    }
}
