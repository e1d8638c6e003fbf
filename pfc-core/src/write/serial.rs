use crate::error::{PfcError, Result};
use crate::slots::ResultSlots;
use crate::util::hash_forward::HashingForward;
use std::io::Write;

/// What the serial writer put on the output stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Written {
    pub chunks: usize,
    pub bytes: u64,
    pub digest: blake3::Hash,
}

/// Append every slot's bytes to `out` in index order, with no framing.
///
/// Fails with `MissingChunk` on the first unset slot; nothing from that slot
/// onward is written.
pub fn write_ordered<W: Write>(slots: ResultSlots, out: W) -> Result<(W, Written)> {
    let mut w = HashingForward::new(out);
    let mut chunks = 0;
    for (index, slot) in slots.into_ordered().into_iter().enumerate() {
        let cc = slot.ok_or(PfcError::MissingChunk { index })?;
        w.write_all(&cc.data)?;
        chunks += 1;
    }
    w.flush()?;
    let bytes = w.written;
    let (out, digest) = w.finish();
    tracing::debug!(chunks, bytes, "chunks written");
    Ok((
        out,
        Written {
            chunks,
            bytes,
            digest,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CompressedChunk;

    fn filled(parts: &[&[u8]]) -> ResultSlots {
        let slots = ResultSlots::new(parts.len());
        // fill back to front; output order must not depend on it
        for (i, p) in parts.iter().enumerate().rev() {
            slots
                .store(CompressedChunk {
                    index: i,
                    data: p.to_vec(),
                })
                .unwrap();
        }
        slots
    }

    #[test]
    fn concatenates_in_index_order() {
        let (out, written) = write_ordered(filled(&[b"ab", b"", b"cde"]), Vec::new()).unwrap();
        assert_eq!(out, b"abcde");
        assert_eq!(written.chunks, 3);
        assert_eq!(written.bytes, 5);
        assert_eq!(written.digest, blake3::hash(b"abcde"));
    }

    #[test]
    fn unset_slot_is_fatal() {
        let slots = ResultSlots::new(3);
        slots
            .store(CompressedChunk {
                index: 0,
                data: b"xy".to_vec(),
            })
            .unwrap();
        let mut out = Vec::new();
        let err = write_ordered(slots, &mut out).unwrap_err();
        assert!(matches!(err, PfcError::MissingChunk { index: 1 }));
        assert_eq!(out, b"xy");
    }

    #[test]
    fn no_slots_writes_nothing() {
        let (out, written) = write_ordered(ResultSlots::new(0), Vec::new()).unwrap();
        assert!(out.is_empty());
        assert_eq!(written.bytes, 0);
    }
}
