#![forbid(unsafe_code)]

pub mod error;
pub mod job;

pub mod util {
    pub mod hash_forward;
}

pub mod chunking {
    pub mod partition;
}

pub mod codec;
pub mod dispatch;
pub mod progress;
pub mod slots;

pub mod write {
    pub mod serial;
}

pub mod engine;
pub mod stats;

// Re-exports: stable API surface
pub use engine::{compress_file, compress_file_with, compress_to_writer};
pub use job::{CompressOptions, Job};
pub use progress::{Event, EventSink, NullSink};
pub use stats::Report;
