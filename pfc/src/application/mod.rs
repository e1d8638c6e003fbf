pub mod handlers;

use crate::presentation::cli::{Cli, Commands};
use handlers::CompressArgs;
use pfc_core::CompressOptions;
use pfc_core::error::Result;
use pfc_core::job::default_threads;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compress {
            source,
            dest,
            level,
            threads,
            chunk_size,
            codec,
            schedule,
            halt_on_error,
            no_progress,
            json,
        } => handlers::handle_compress(CompressArgs {
            source,
            dest,
            opts: CompressOptions {
                level,
                threads: threads.unwrap_or_else(default_threads),
                chunk_size,
                codec: codec.into(),
                schedule: schedule.into(),
                halt_on_error,
            },
            progress: !no_progress,
            json,
        }),
        Commands::Plan {
            source,
            threads,
            chunk_size,
        } => handlers::handle_plan(source, threads, chunk_size),
    }
}
