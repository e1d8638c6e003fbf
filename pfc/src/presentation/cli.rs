use clap::{Parser, Subcommand, ValueEnum};
use pfc_core::codec::CodecId;
use pfc_core::dispatch::Schedule;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Parallel chunked file compressor", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum CodecArg {
    Zstd,
    Store,
}

impl From<CodecArg> for CodecId {
    fn from(c: CodecArg) -> Self {
        match c {
            CodecArg::Zstd => CodecId::Zstd,
            CodecArg::Store => CodecId::Store,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ScheduleArg {
    /// worker t takes chunks t, t+T, t+2T, ...
    Strided,
    /// workers pull chunks from a shared queue
    Queue,
}

impl From<ScheduleArg> for Schedule {
    fn from(s: ScheduleArg) -> Self {
        match s {
            ScheduleArg::Strided => Schedule::Strided,
            ScheduleArg::Queue => Schedule::Queue,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress SOURCE into DEST as independently compressed chunks
    Compress {
        source: PathBuf,
        dest: PathBuf,

        /// compression level (1-22)
        #[arg(short, long, default_value_t = pfc_core::job::DEFAULT_LEVEL, allow_negative_numbers = true)]
        level: i32,

        /// worker threads (defaults to available parallelism)
        #[arg(short, long)]
        threads: Option<usize>,

        /// chunk size in bytes; K, M and G suffixes are powers of 1024
        #[arg(long, default_value = "4M", value_parser = parse_size)]
        chunk_size: usize,

        #[arg(long, value_enum, default_value_t = CodecArg::Zstd)]
        codec: CodecArg,

        #[arg(long, value_enum, default_value_t = ScheduleArg::Strided)]
        schedule: ScheduleArg,

        /// stop starting new chunks after the first failure
        #[arg(long)]
        halt_on_error: bool,

        /// do not draw a progress bar
        #[arg(long)]
        no_progress: bool,

        /// print the run report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Show how SOURCE would be chunked and which worker gets each chunk
    Plan {
        source: PathBuf,

        #[arg(short, long)]
        threads: Option<usize>,

        #[arg(long, default_value = "4M", value_parser = parse_size)]
        chunk_size: usize,
    },
}

/// Parse `4096`, `512K`, `4M`, `1G` (also `4MiB`, `4mb`).
pub fn parse_size(s: &str) -> Result<usize, String> {
    let t = s.trim();
    let split = t.find(|c: char| !c.is_ascii_digit()).unwrap_or(t.len());
    let (digits, suffix) = t.split_at(split);
    let n: usize = digits
        .parse()
        .map_err(|_| format!("invalid size `{s}`"))?;
    let shift = match suffix.to_ascii_uppercase().as_str() {
        "" | "B" => 0,
        "K" | "KB" | "KIB" => 10,
        "M" | "MB" | "MIB" => 20,
        "G" | "GB" | "GIB" => 30,
        _ => return Err(format!("unknown size suffix in `{s}`")),
    };
    n.checked_mul(1usize << shift)
        .ok_or_else(|| format!("size `{s}` is too large"))
}
