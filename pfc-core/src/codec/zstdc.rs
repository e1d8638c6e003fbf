use super::{BlockCodec, CodecId};
use std::ops::RangeInclusive;

/// One complete zstd frame per block, so blocks decode independently.
pub struct ZstdCodec;

impl BlockCodec for ZstdCodec {
    fn id(&self) -> CodecId {
        CodecId::Zstd
    }

    fn compress_bound(&self, src_len: usize) -> usize {
        zstd::zstd_safe::compress_bound(src_len)
    }

    fn level_range(&self) -> RangeInclusive<i32> {
        zstd::compression_level_range()
    }

    fn compress_into(&self, dst: &mut [u8], src: &[u8], level: i32) -> Result<usize, String> {
        zstd::bulk::compress_to_buffer(src, dst, level).map_err(|e| e.to_string())
    }
}
