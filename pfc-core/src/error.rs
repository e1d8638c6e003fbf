use thiserror::Error;

/// Failure of a single chunk. Reported as an event by the worker that hit it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("chunk {index}: {message}")]
pub struct ChunkError {
    pub index: usize,
    pub message: String,
}

impl ChunkError {
    pub fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PfcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid job: {0}")]
    Validation(String),

    #[error("{count} chunk(s) failed to compress, first: {first}")]
    ChunkFailures { count: usize, first: ChunkError },

    #[error("chunk {index} has no compressed data")]
    MissingChunk { index: usize },

    #[error("worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}

// Convenient crate-wide result type
pub type Result<T> = std::result::Result<T, PfcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_failures_message_names_first_chunk() {
        let err = PfcError::ChunkFailures {
            count: 2,
            first: ChunkError::new(3, "dst too small"),
        };
        assert_eq!(
            err.to_string(),
            "2 chunk(s) failed to compress, first: chunk 3: dst too small"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: PfcError = io.into();
        assert!(matches!(err, PfcError::Io(_)));
    }
}
