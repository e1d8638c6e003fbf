mod application;

mod presentation {
    pub mod cli;
    pub mod progress;
}

use clap::Parser;
use pfc_core::error::Result;
use presentation::cli::Cli;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    // PFC_LOG=debug shows per-worker activity
    let filter = EnvFilter::try_from_env("PFC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    application::run(Cli::parse())
}
