use super::{BlockCodec, CodecId};
use std::ops::RangeInclusive;

/// Identity codec: the block is copied as-is and the level is ignored.
pub struct Store;

impl BlockCodec for Store {
    fn id(&self) -> CodecId {
        CodecId::Store
    }

    fn compress_bound(&self, src_len: usize) -> usize {
        src_len
    }

    fn level_range(&self) -> RangeInclusive<i32> {
        i32::MIN..=i32::MAX
    }

    fn compress_into(&self, dst: &mut [u8], src: &[u8], _level: i32) -> Result<usize, String> {
        let cap = dst.len();
        let out = dst
            .get_mut(..src.len())
            .ok_or_else(|| format!("destination holds {cap} of {} bytes", src.len()))?;
        out.copy_from_slice(src);
        Ok(src.len())
    }
}
