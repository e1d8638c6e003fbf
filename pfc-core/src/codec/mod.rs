use crate::chunking::partition::Chunk;
use crate::error::ChunkError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

#[repr(u8)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecId {
    Store = 0,
    #[default]
    Zstd = 1,
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecId::Store => f.write_str("store"),
            CodecId::Zstd => f.write_str("zstd"),
        }
    }
}

/// A block compression primitive. Every call produces a self-contained block.
pub trait BlockCodec: Send + Sync {
    fn id(&self) -> CodecId;

    /// Worst-case output size for `src_len` input bytes.
    fn compress_bound(&self, src_len: usize) -> usize;

    /// Levels the codec itself accepts.
    fn level_range(&self) -> RangeInclusive<i32>;

    /// Compress `src` into `dst`, which holds at least `compress_bound(src.len())`
    /// bytes. Returns the number of bytes written.
    fn compress_into(&self, dst: &mut [u8], src: &[u8], level: i32) -> Result<usize, String>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompressedChunk {
    pub index: usize,
    pub data: Vec<u8>,
}

/// Compress one chunk: allocate the codec's bound, compress, shrink to fit.
pub fn compress_chunk(
    codec: &dyn BlockCodec,
    chunk: &Chunk,
    level: i32,
) -> Result<CompressedChunk, ChunkError> {
    let range = codec.level_range();
    if !range.contains(&level) {
        return Err(ChunkError::new(
            chunk.index,
            format!(
                "{} does not accept level {level} (valid {}..={})",
                codec.id(),
                range.start(),
                range.end()
            ),
        ));
    }

    let bound = codec.compress_bound(chunk.len());
    let mut dst = vec![0u8; bound];
    let n = codec
        .compress_into(&mut dst, &chunk.data, level)
        .map_err(|msg| ChunkError::new(chunk.index, msg))?;
    if n > bound {
        return Err(ChunkError::new(
            chunk.index,
            format!("codec wrote {n} bytes past its bound of {bound}"),
        ));
    }
    dst.truncate(n);
    Ok(CompressedChunk {
        index: chunk.index,
        data: dst,
    })
}

pub fn for_id(id: CodecId) -> Box<dyn BlockCodec> {
    match id {
        CodecId::Store => Box::new(store::Store),
        CodecId::Zstd => Box::new(zstdc::ZstdCodec),
    }
}

pub mod store;
pub mod zstdc;
