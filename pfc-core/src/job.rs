use crate::chunking::partition::DEFAULT_CHUNK_SIZE;
use crate::codec::CodecId;
use crate::dispatch::Schedule;
use crate::error::{PfcError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MIN_LEVEL: i32 = 1;
pub const MAX_LEVEL: i32 = 22;
pub const DEFAULT_LEVEL: i32 = 3;

pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressOptions {
    pub level: i32,
    pub threads: usize,
    pub chunk_size: usize,
    pub codec: CodecId,
    pub schedule: Schedule,
    /// Stop starting new chunks once one has failed. The job fails either way.
    pub halt_on_error: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            threads: default_threads(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            codec: CodecId::default(),
            schedule: Schedule::default(),
            halt_on_error: false,
        }
    }
}

impl CompressOptions {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.level) {
            return Err(PfcError::Validation(format!(
                "compression level must be between {MIN_LEVEL} and {MAX_LEVEL}, got {}",
                self.level
            )));
        }
        if self.threads < 1 {
            return Err(PfcError::Validation(
                "thread count must be at least 1".into(),
            ));
        }
        if self.chunk_size < 1 {
            return Err(PfcError::Validation("chunk size must be at least 1".into()));
        }
        Ok(())
    }
}

/// One compression request. Built once, never changed after dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub opts: CompressOptions,
}

impl Job {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>, opts: CompressOptions) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            opts,
        }
    }

    /// Checks that need no file system access.
    pub fn validate(&self) -> Result<()> {
        if is_blank(&self.source) || is_blank(&self.dest) {
            return Err(PfcError::Validation(
                "both source and destination paths are required".into(),
            ));
        }
        self.opts.validate()
    }
}

fn is_blank(p: &Path) -> bool {
    p.as_os_str().is_empty()
}
