use crate::error::{PfcError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// 4 MiB, the chunk size used when a job does not set one.
pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// A contiguous slice of the source, identified by its dense 0-based index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Number of chunks a source of `total_len` bytes splits into.
pub fn chunk_count(total_len: u64, chunk_size: usize) -> usize {
    if chunk_size == 0 {
        return 0;
    }
    total_len.div_ceil(chunk_size as u64) as usize
}

/// Split everything `r` yields into ordered `chunk_size` pieces.
///
/// Buffers grow with what is actually read, so an oversized `chunk_size`
/// costs nothing on a small source. Short reads are coalesced; only the
/// final chunk can come up short.
pub fn partition<R: Read>(mut r: R, chunk_size: usize) -> Result<Vec<Chunk>> {
    if chunk_size == 0 {
        return Err(PfcError::Validation("chunk size must be at least 1".into()));
    }
    let mut chunks = Vec::new();
    loop {
        let mut buf = Vec::with_capacity(chunk_size.min(DEFAULT_CHUNK_SIZE));
        let n = r.by_ref().take(chunk_size as u64).read_to_end(&mut buf)?;
        if n == 0 {
            break;
        }
        let last = n < chunk_size;
        if last {
            buf.shrink_to_fit();
        }
        chunks.push(Chunk {
            index: chunks.len(),
            data: buf,
        });
        if last {
            break;
        }
    }
    Ok(chunks)
}

pub fn partition_file(path: &Path, chunk_size: usize) -> Result<Vec<Chunk>> {
    let f = File::open(path)?;
    partition(BufReader::new(f), chunk_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reader that hands out at most `step` bytes per call.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn covers_source_without_gaps() {
        let data: Vec<u8> = (0..10_007u32).map(|i| (i % 251) as u8).collect();
        let chunks = partition(&data[..], 1000).unwrap();

        assert_eq!(chunks.len(), 11);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.index, i);
        }
        assert_eq!(chunks.last().unwrap().len(), 7);
        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.data.clone()).collect();
        assert_eq!(joined, data);
    }

    #[test]
    fn exact_multiple_ends_with_full_chunk() {
        let data = vec![7u8; 3000];
        let chunks = partition(&data[..], 1000).unwrap();
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() == 1000));
    }

    #[test]
    fn empty_source_has_no_chunks() {
        let chunks = partition(&[][..], 4096).unwrap();
        assert!(chunks.is_empty());
        assert_eq!(chunk_count(0, 4096), 0);
    }

    #[test]
    fn short_reads_are_coalesced() {
        let data = vec![1u8; 2500];
        let r = Trickle {
            data: &data,
            step: 33,
        };
        let sizes: Vec<usize> = partition(r, 1000).unwrap().iter().map(Chunk::len).collect();
        assert_eq!(sizes, vec![1000, 1000, 500]);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert!(matches!(
            partition(&b"abc"[..], 0),
            Err(PfcError::Validation(_))
        ));
    }

    #[test]
    fn huge_chunk_size_only_holds_what_was_read() {
        let chunks = partition(&b"0123456789"[..], usize::MAX).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].data, b"0123456789");
        assert!(chunks[0].data.capacity() < DEFAULT_CHUNK_SIZE);
    }

    /// Fails once with `Interrupted`, then reads normally.
    struct Flaky<'a> {
        data: &'a [u8],
        interrupted: bool,
    }

    impl Read for Flaky<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::ErrorKind::Interrupted.into());
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let r = Flaky {
            data: b"abcdef",
            interrupted: false,
        };
        let sizes: Vec<usize> = partition(r, 4).unwrap().iter().map(Chunk::len).collect();
        assert_eq!(sizes, vec![4, 2]);
    }

    #[test]
    fn read_failure_is_io_error() {
        assert!(matches!(partition(Broken, 16), Err(PfcError::Io(_))));
    }

    #[test]
    fn count_matches_partition() {
        assert_eq!(chunk_count(10 * 1024 * 1024, DEFAULT_CHUNK_SIZE), 3);
        assert_eq!(chunk_count(8 * 1024 * 1024, DEFAULT_CHUNK_SIZE), 2);
        assert_eq!(chunk_count(1, DEFAULT_CHUNK_SIZE), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let res = partition_file(&dir.path().join("nope.bin"), 16);
        assert!(matches!(res, Err(PfcError::Io(_))));
    }
}
