use crate::compression::BlockCompressor;
use crate::error::{ProcessingError, Result};

/// Raw LZ4 block codec, wire-compatible with `LZ4_compress_default` output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4BlockCompressor;

impl Lz4BlockCompressor {
    pub fn new() -> Self {
        Self
    }
}

impl BlockCompressor for Lz4BlockCompressor {
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>> {
        Ok(lz4_flex::block::compress(raw))
    }

    fn decompress_into(&self, compressed: &[u8], dst: &mut [u8]) -> Result<usize> {
        lz4_flex::block::decompress_into(compressed, dst).map_err(|e| {
            ProcessingError::Decompression {
                block: 0,
                message: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decompress_restores_block() {
        let codec = Lz4BlockCompressor::new();
        let raw = b"Tokyo;15.4\nTokyo;16.0\nParis;-3.7\n".repeat(64);

        let compressed = codec.compress(&raw).unwrap();
        assert!(compressed.len() < raw.len());

        let mut out = vec![0u8; raw.len()];
        let written = codec.decompress_into(&compressed, &mut out).unwrap();
        assert_eq!(written, raw.len());
        assert_eq!(out, raw);
    }

    #[test]
    fn test_undersized_destination_is_an_error() {
        let codec = Lz4BlockCompressor::new();
        let raw = b"Hamburg;12.0\n".repeat(32);
        let compressed = codec.compress(&raw).unwrap();

        let mut out = vec![0u8; raw.len() / 2];
        let err = codec.decompress_into(&compressed, &mut out).unwrap_err();
        assert!(matches!(err, ProcessingError::Decompression { .. }));
    }

    #[test]
    fn test_garbage_input_is_an_error() {
        let codec = Lz4BlockCompressor::new();
        let mut out = vec![0u8; 64];
        // Literal length nibble claims 15+255 bytes that are not there.
        let garbage = [0xF0u8, 0xFF, 0x01, 0x02];
        assert!(codec.decompress_into(&garbage, &mut out).is_err());
    }
}
