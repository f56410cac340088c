pub mod lz4;

pub use lz4::Lz4BlockCompressor;

use crate::error::Result;

/// Byte-level codec applied to each container block.
///
/// The container stores the compressed and original sizes itself, so
/// implementations deal in raw blocks with no framing of their own.
pub trait BlockCompressor {
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>>;

    /// Decompresses `compressed` into `dst`, returning the number of bytes written.
    /// `dst` is sized to the block's declared original size.
    fn decompress_into(&self, compressed: &[u8], dst: &mut [u8]) -> Result<usize>;
}
