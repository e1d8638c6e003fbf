use crate::chunking::partition::Chunk;
use crate::codec::{BlockCodec, compress_chunk};
use crate::error::{ChunkError, PfcError, Result};
use crate::progress::Progress;
use crate::slots::ResultSlots;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::thread;

/// How chunk indices are handed to workers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    /// Worker `t` of `T` takes `t, t+T, t+2T, ...`. Deterministic mapping.
    #[default]
    Strided,
    /// Workers pull the next index from a shared blocking queue.
    Queue,
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Strided => f.write_str("strided"),
            Schedule::Queue => f.write_str("queue"),
        }
    }
}

/// Chunk indices worker `worker` of `threads` owns under the strided schedule.
pub fn stride_indices(worker: usize, threads: usize, total: usize) -> impl Iterator<Item = usize> {
    (worker..total).step_by(threads.max(1))
}

/// Strided assignment for every worker: `plan(n, t)[w]` lists worker `w`'s chunks.
pub fn plan(total: usize, threads: usize) -> Vec<Vec<usize>> {
    (0..threads)
        .map(|w| stride_indices(w, threads, total).collect())
        .collect()
}

pub struct Dispatched {
    pub slots: ResultSlots,
    /// Sorted by chunk index.
    pub failures: Vec<ChunkError>,
}

pub struct Dispatcher<'a> {
    pub codec: &'a dyn BlockCodec,
    pub level: i32,
    pub threads: usize,
    pub schedule: Schedule,
    /// Skip chunks not yet started once any chunk has failed.
    pub halt_on_error: bool,
}

impl Dispatcher<'_> {
    /// Compress every chunk on `threads` OS threads and wait for all of them.
    pub fn run(&self, chunks: &[Chunk], progress: &Progress<'_>) -> Result<Dispatched> {
        let threads = self.threads.max(1);
        let slots = ResultSlots::new(chunks.len());
        tracing::debug!(
            chunks = chunks.len(),
            threads,
            schedule = %self.schedule,
            "dispatching"
        );

        let failures = match self.schedule {
            Schedule::Strided => self.run_pool(
                threads,
                || {},
                |worker| {
                    let mut failures = Vec::new();
                    for idx in stride_indices(worker, threads, chunks.len()) {
                        self.work_on(&chunks[idx], &slots, progress, &mut failures);
                    }
                    failures
                },
            )?,
            Schedule::Queue => {
                let (tx, rx) = crossbeam_channel::unbounded::<usize>();
                self.run_pool(
                    threads,
                    move || {
                        // `rx` outlives the feed, so sends cannot fail
                        for idx in 0..chunks.len() {
                            let _ = tx.send(idx);
                        }
                    },
                    |_worker| {
                        let mut failures = Vec::new();
                        for idx in rx.iter() {
                            self.work_on(&chunks[idx], &slots, progress, &mut failures);
                        }
                        failures
                    },
                )?
            }
        };

        Ok(Dispatched { slots, failures })
    }

    fn work_on(
        &self,
        chunk: &Chunk,
        slots: &ResultSlots,
        progress: &Progress<'_>,
        failures: &mut Vec<ChunkError>,
    ) {
        if self.halt_on_error && progress.has_failed() {
            return;
        }
        let err = match compress_chunk(self.codec, chunk, self.level) {
            Ok(cc) => match slots.store(cc) {
                Ok(()) => {
                    progress.chunk_done();
                    return;
                }
                Err(cc) => ChunkError::new(cc.index, "result slot already filled"),
            },
            Err(e) => e,
        };
        progress.chunk_failed(&err);
        failures.push(err);
    }

    /// Spawn `threads` workers running `body`, run `feed` on the calling
    /// thread, then join every worker.
    fn run_pool<F>(&self, threads: usize, feed: impl FnOnce(), body: F) -> Result<Vec<ChunkError>>
    where
        F: Fn(usize) -> Vec<ChunkError> + Sync,
    {
        thread::scope(|s| {
            let body = &body;
            let mut handles = Vec::with_capacity(threads);
            let mut first_err: Option<PfcError> = None;

            for worker in 0..threads {
                let spawned = thread::Builder::new()
                    .name(format!("pfc-worker-{worker}"))
                    .spawn_scoped(s, move || body(worker));
                match spawned {
                    Ok(h) => handles.push((worker, h)),
                    Err(e) => {
                        first_err = Some(e.into());
                        break;
                    }
                }
            }

            // Feed even after a failed spawn; dropping the sender lets queue workers exit.
            feed();

            let mut failures = Vec::new();
            for (worker, h) in handles {
                match h.join() {
                    Ok(mut f) => {
                        tracing::debug!(worker, failed = f.len(), "worker joined");
                        failures.append(&mut f);
                    }
                    Err(_) if first_err.is_none() => {
                        first_err = Some(PfcError::WorkerPanicked { worker });
                    }
                    Err(_) => {}
                }
            }

            match first_err {
                Some(e) => Err(e),
                None => {
                    failures.sort_by_key(|e| e.index);
                    Ok(failures)
                }
            }
        })
    }
}
