use crate::codec::CompressedChunk;
use std::sync::OnceLock;

/// Index-addressed, write-once storage for compressed chunks.
///
/// Workers own disjoint index sets, so stores never contend; the `OnceLock`
/// only turns an accidental second write into an error instead of an overwrite.
pub struct ResultSlots {
    slots: Vec<OnceLock<CompressedChunk>>,
}

impl ResultSlots {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| OnceLock::new()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Put `chunk` into slot `chunk.index`. Hands the chunk back if the index
    /// is out of range or the slot was already filled.
    pub fn store(&self, chunk: CompressedChunk) -> Result<(), CompressedChunk> {
        match self.slots.get(chunk.index) {
            Some(slot) => slot.set(chunk),
            None => Err(chunk),
        }
    }

    pub fn get(&self, index: usize) -> Option<&CompressedChunk> {
        self.slots.get(index).and_then(OnceLock::get)
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.get().is_some()).count()
    }

    /// Drain in index order; unset slots come out as `None`.
    pub fn into_ordered(self) -> Vec<Option<CompressedChunk>> {
        self.slots.into_iter().map(OnceLock::into_inner).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cc(index: usize, byte: u8) -> CompressedChunk {
        CompressedChunk {
            index,
            data: vec![byte; 3],
        }
    }

    #[test]
    fn second_store_is_rejected() {
        let slots = ResultSlots::new(2);
        assert!(slots.store(cc(1, 0xaa)).is_ok());
        let back = slots.store(cc(1, 0xbb)).unwrap_err();
        assert_eq!(back.data, vec![0xbb; 3]);
        assert_eq!(slots.get(1).unwrap().data, vec![0xaa; 3]);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let slots = ResultSlots::new(1);
        assert!(slots.store(cc(5, 1)).is_err());
    }

    #[test]
    fn ordered_drain_keeps_holes() {
        let slots = ResultSlots::new(3);
        slots.store(cc(2, 2)).unwrap();
        slots.store(cc(0, 0)).unwrap();
        assert_eq!(slots.filled(), 2);

        let ordered = slots.into_ordered();
        assert_eq!(ordered[0].as_ref().map(|c| c.index), Some(0));
        assert!(ordered[1].is_none());
        assert_eq!(ordered[2].as_ref().map(|c| c.index), Some(2));
    }

    #[test]
    fn concurrent_disjoint_stores() {
        let slots = ResultSlots::new(64);
        std::thread::scope(|s| {
            for t in 0..4 {
                let slots = &slots;
                s.spawn(move || {
                    for i in (t..64).step_by(4) {
                        slots.store(cc(i, i as u8)).unwrap();
                    }
                });
            }
        });
        assert_eq!(slots.filled(), 64);
    }
}
