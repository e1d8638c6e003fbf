use crate::error::ChunkError;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Notifications a running job sends to whoever drives it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Completed share of chunks, 0..=100. Never decreases within a job.
    Progress(u8),
    ChunkFailed { index: usize, message: String },
    /// Exactly once per job.
    Finished { ok: bool },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

impl<F> EventSink for F
where
    F: Fn(Event) + Send + Sync,
{
    fn emit(&self, event: Event) {
        self(event)
    }
}

impl EventSink for crossbeam_channel::Sender<Event> {
    fn emit(&self, event: Event) {
        // receiver gone means nobody is listening anymore
        let _ = self.send(event);
    }
}

/// Discards everything.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: Event) {}
}

pub fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    (done.min(total) * 100 / total) as u8
}

/// Shared completion counter plus the error side-channel for one job.
pub struct Progress<'a> {
    total: usize,
    done: AtomicUsize,
    failed: AtomicBool,
    emit_lock: Mutex<()>,
    sink: &'a dyn EventSink,
}

impl<'a> Progress<'a> {
    pub fn new(total: usize, sink: &'a dyn EventSink) -> Self {
        Self {
            total,
            done: AtomicUsize::new(0),
            failed: AtomicBool::new(false),
            emit_lock: Mutex::new(()),
            sink,
        }
    }

    pub fn completed(&self) -> usize {
        self.done.load(Ordering::Acquire)
    }

    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::Acquire)
    }

    pub fn chunk_done(&self) {
        self.done.fetch_add(1, Ordering::AcqRel);
        // Reading the counter under the lock keeps emitted values in order.
        let _guard = self.emit_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.sink
            .emit(Event::Progress(percent(self.completed(), self.total)));
    }

    pub fn chunk_failed(&self, err: &ChunkError) {
        self.failed.store(true, Ordering::Release);
        tracing::warn!(chunk = err.index, error = %err.message, "chunk failed");
        self.sink.emit(Event::ChunkFailed {
            index: err.index,
            message: err.message.clone(),
        });
    }
}
