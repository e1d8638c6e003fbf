use crate::codec::CodecId;
use crate::dispatch::Schedule;
use serde::{Deserialize, Serialize};

/// Summary of one successful job.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub chunks: usize,
    pub chunk_size: usize,
    pub input_bytes: u64,
    pub output_bytes: u64,
    /// input / output; 0.0 for an empty output.
    pub compression_ratio: f32,
    pub level: i32,
    pub threads: usize,
    pub codec: CodecId,
    pub schedule: Schedule,
    pub elapsed_ms: u64,
    /// BLAKE3 of the bytes written, hex.
    pub output_blake3: String,
}

pub fn ratio(input_bytes: u64, output_bytes: u64) -> f32 {
    if output_bytes == 0 {
        return 0.0;
    }
    (input_bytes as f64 / output_bytes as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_handles_empty_output() {
        assert_eq!(ratio(0, 0), 0.0);
        assert_eq!(ratio(100, 25), 4.0);
    }
}
