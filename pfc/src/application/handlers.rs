use std::path::PathBuf;

use crossbeam_channel::unbounded;
use pfc_core::chunking::partition::chunk_count;
use pfc_core::dispatch::{Schedule, plan};
use pfc_core::error::Result;
use pfc_core::job::default_threads;
use pfc_core::{CompressOptions, Event, Job, Report, compress_file};

use crate::presentation::progress::ProgressView;

pub struct CompressArgs {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub opts: CompressOptions,
    pub progress: bool,
    pub json: bool,
}

/// Run the job on a background thread and render its events here.
pub fn handle_compress(args: CompressArgs) -> Result<()> {
    let job = Job::new(args.source, args.dest, args.opts);
    tracing::debug!(?job, "starting job");
    let view = ProgressView::new(args.progress);
    let (tx, rx) = unbounded::<Event>();

    let result = std::thread::scope(|s| {
        let job = &job;
        let runner = s.spawn(move || compress_file(job, &tx));
        // ends when the runner drops `tx`
        for event in rx.iter() {
            view.on_event(&event);
        }
        runner
            .join()
            .unwrap_or_else(|p| std::panic::resume_unwind(p))
    });

    let report = result?;
    if args.json {
        let s = serde_json::to_string_pretty(&report).map_err(std::io::Error::from)?;
        println!("{s}");
    } else {
        eprintln!("{}", summary(&job, &report));
    }
    Ok(())
}

fn summary(job: &Job, r: &Report) -> String {
    format!(
        "compress: {} -> {} ({} chunks, {} -> {} bytes, ratio {:.2}, {} threads, {} ms)",
        job.source.display(),
        job.dest.display(),
        r.chunks,
        r.input_bytes,
        r.output_bytes,
        r.compression_ratio,
        r.threads,
        r.elapsed_ms
    )
}

pub fn handle_plan(source: PathBuf, threads: Option<usize>, chunk_size: usize) -> Result<()> {
    let opts = CompressOptions {
        threads: threads.unwrap_or_else(default_threads),
        chunk_size,
        schedule: Schedule::Strided,
        ..Default::default()
    };
    opts.validate()?;

    let total = std::fs::metadata(&source)?.len();
    let n = chunk_count(total, opts.chunk_size);
    println!(
        "{}: {} bytes, {} chunks of {} bytes, {} threads",
        source.display(),
        total,
        n,
        opts.chunk_size,
        opts.threads
    );
    let mut owner = vec![0usize; n];
    for (worker, indices) in plan(n, opts.threads).into_iter().enumerate() {
        for idx in indices {
            owner[idx] = worker;
        }
    }
    for (idx, worker) in owner.into_iter().enumerate() {
        let off = idx as u64 * opts.chunk_size as u64;
        let len = (total - off).min(opts.chunk_size as u64);
        println!("#{idx:<5} worker={worker:<3} u={len} off={off}");
    }
    Ok(())
}
