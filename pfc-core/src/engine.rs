use crate::chunking::partition::{Chunk, partition};
use crate::codec::{self, BlockCodec};
use crate::dispatch::Dispatcher;
use crate::error::{PfcError, Result};
use crate::job::{CompressOptions, Job};
use crate::progress::{Event, EventSink, Progress};
use crate::slots::ResultSlots;
use crate::stats::{Report, ratio};
use crate::write::serial::{Written, write_ordered};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::time::Instant;

/// Compress `job.source` into `job.dest`.
///
/// The destination is written through a temporary file in the same directory
/// and renamed into place only after every chunk compressed and was written,
/// so a failed job never leaves a truncated output behind. Exactly one
/// `Event::Finished` is emitted, whatever the outcome.
pub fn compress_file(job: &Job, sink: &dyn EventSink) -> Result<Report> {
    compress_file_with(job, codec::for_id(job.opts.codec).as_ref(), sink)
}

/// `compress_file` with a caller-supplied codec; `job.opts.codec` is ignored.
pub fn compress_file_with(job: &Job, codec: &dyn BlockCodec, sink: &dyn EventSink) -> Result<Report> {
    let result = run_file(job, codec, sink);
    finish(sink, &result);
    result
}

/// Same pipeline over arbitrary streams. `out` receives the concatenated blocks.
pub fn compress_to_writer<R: Read, W: Write>(
    src: R,
    out: W,
    opts: &CompressOptions,
    sink: &dyn EventSink,
) -> Result<Report> {
    let codec = codec::for_id(opts.codec);
    let result = run_stream(src, out, opts, codec.as_ref(), sink);
    finish(sink, &result);
    result
}

fn run_file(job: &Job, codec: &dyn BlockCodec, sink: &dyn EventSink) -> Result<Report> {
    job.validate()?;
    let started = Instant::now();
    tracing::info!(
        source = %job.source.display(),
        dest = %job.dest.display(),
        level = job.opts.level,
        threads = job.opts.threads,
        "compressing"
    );

    let src = File::open(&job.source)?;
    let dir = job
        .dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    // Opened before any work so an unwritable destination fails fast.
    let tmp = temp_builder().tempfile_in(dir)?;

    let chunks = partition(BufReader::new(src), job.opts.chunk_size)?;
    let slots = compress_all(&chunks, &job.opts, codec, sink)?;

    let (out, written) = write_ordered(slots, BufWriter::new(tmp))?;
    let tmp = out.into_inner().map_err(|e| e.into_error())?;
    tmp.persist(&job.dest).map_err(|e| e.error)?;

    sink.emit(Event::Progress(100));
    Ok(report(&chunks, &job.opts, codec, &written, started))
}

/// Temp file for the destination. On Unix it is created with the mode a plain
/// `File::create` would get (0666 less the umask) rather than tempfile's 0600,
/// since it is renamed into place as the final output.
fn temp_builder() -> tempfile::Builder<'static, 'static> {
    let mut b = tempfile::Builder::new();
    b.prefix(".pfc-").suffix(".partial");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        b.permissions(std::fs::Permissions::from_mode(0o666));
    }
    b
}

fn run_stream<R: Read, W: Write>(
    src: R,
    out: W,
    opts: &CompressOptions,
    codec: &dyn BlockCodec,
    sink: &dyn EventSink,
) -> Result<Report> {
    opts.validate()?;
    let started = Instant::now();
    let chunks = partition(src, opts.chunk_size)?;
    let slots = compress_all(&chunks, opts, codec, sink)?;
    let (_, written) = write_ordered(slots, out)?;
    sink.emit(Event::Progress(100));
    Ok(report(&chunks, opts, codec, &written, started))
}

/// Fan the chunks out to the workers and wait. Any failed chunk fails the job.
fn compress_all(
    chunks: &[Chunk],
    opts: &CompressOptions,
    codec: &dyn BlockCodec,
    sink: &dyn EventSink,
) -> Result<ResultSlots> {
    let progress = Progress::new(chunks.len(), sink);
    let dispatched = Dispatcher {
        codec,
        level: opts.level,
        threads: opts.threads,
        schedule: opts.schedule,
        halt_on_error: opts.halt_on_error,
    }
    .run(chunks, &progress)?;

    match dispatched.failures.first() {
        Some(first) => Err(PfcError::ChunkFailures {
            count: dispatched.failures.len(),
            first: first.clone(),
        }),
        None => Ok(dispatched.slots),
    }
}

fn report(
    chunks: &[Chunk],
    opts: &CompressOptions,
    codec: &dyn BlockCodec,
    written: &Written,
    started: Instant,
) -> Report {
    let input_bytes = chunks.iter().map(|c| c.len() as u64).sum();
    Report {
        chunks: chunks.len(),
        chunk_size: opts.chunk_size,
        input_bytes,
        output_bytes: written.bytes,
        compression_ratio: ratio(input_bytes, written.bytes),
        level: opts.level,
        threads: opts.threads,
        codec: codec.id(),
        schedule: opts.schedule,
        elapsed_ms: started.elapsed().as_millis() as u64,
        output_blake3: written.digest.to_hex().to_string(),
    }
}

fn finish(sink: &dyn EventSink, result: &Result<Report>) {
    match result {
        Ok(r) => tracing::info!(
            chunks = r.chunks,
            input = r.input_bytes,
            output = r.output_bytes,
            elapsed_ms = r.elapsed_ms,
            "job finished"
        ),
        Err(e) => tracing::error!(error = %e, "job failed"),
    }
    sink.emit(Event::Finished { ok: result.is_ok() });
}
