//! Buffer feeder: serializes chunk delivery into the media sink.
//!
//! Owns the FIFO queue of pending chunks and the single busy flag. At most
//! one append is outstanding at any time; the queue drains strictly in
//! arrival order; no chunk is dropped or reordered while the session is
//! healthy.

use std::collections::VecDeque;

use mselink_core::Chunk;

use crate::sink::{MediaSink, SinkError};

/// Running counters for stats logging.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeederStats {
    pub submitted: u64,
    pub appended: u64,
    pub dropped: u64,
    pub queue_peak: usize,
}

pub struct BufferFeeder<S> {
    sink: S,
    pending: VecDeque<Chunk>,
    /// True while an append is outstanding. Checked synchronously within the
    /// single-threaded actor, so there is no race window.
    busy: bool,
    close_seen: bool,
    eos_signaled: bool,
    failed: bool,
    stats: FeederStats,
}

impl<S: MediaSink> BufferFeeder<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            pending: VecDeque::new(),
            busy: false,
            close_seen: false,
            eos_signaled: false,
            failed: false,
            stats: FeederStats::default(),
        }
    }

    /// Hand one chunk to the sink, or queue it if an append is outstanding
    /// or earlier chunks are still waiting.
    pub fn submit(&mut self, chunk: Chunk) {
        self.stats.submitted += 1;

        if self.failed || self.eos_signaled {
            // Nothing left to feed into; late frames are logged and dropped.
            self.stats.dropped += 1;
            tracing::debug!(len = chunk.len(), "chunk dropped after stream end");
            return;
        }

        if self.busy || !self.pending.is_empty() {
            self.pending.push_back(chunk);
            self.stats.queue_peak = self.stats.queue_peak.max(self.pending.len());
        } else {
            self.begin_append(chunk);
        }
    }

    /// The sink finished its outstanding append.
    pub fn on_append_complete(&mut self, result: Result<(), SinkError>) {
        self.busy = false;

        match result {
            Ok(()) => self.stats.appended += 1,
            Err(e) => {
                // Fatal for the session: a rejected append of opaque media
                // data cannot be retried meaningfully.
                tracing::error!(
                    error = %e,
                    queued = self.pending.len(),
                    "append failed, abandoning session"
                );
                self.stats.dropped += self.pending.len() as u64;
                self.pending.clear();
                self.failed = true;
                return;
            }
        }

        if let Some(next) = self.pending.pop_front() {
            self.begin_append(next);
        } else if self.close_seen {
            self.signal_end_of_stream();
        }
    }

    /// The connection closed. End-of-stream goes to the sink immediately if
    /// the feeder is idle, otherwise once the outstanding append and the
    /// queue have drained. Never signaled twice.
    pub fn on_stream_closed(&mut self) {
        self.close_seen = true;
        if !self.busy && self.pending.is_empty() {
            self.signal_end_of_stream();
        }
    }

    /// True once no further sink activity can happen: the connection closed
    /// and everything drained, or the session failed.
    pub fn finished(&self) -> bool {
        self.failed || (self.close_seen && !self.busy && self.pending.is_empty())
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn stats(&self) -> FeederStats {
        self.stats
    }

    fn begin_append(&mut self, chunk: Chunk) {
        self.busy = true;
        self.sink.start_append(chunk);
    }

    fn signal_end_of_stream(&mut self) {
        if self.eos_signaled {
            return;
        }
        if !self.sink.is_open() {
            tracing::debug!("sink no longer open, skipping end-of-stream");
            return;
        }
        tracing::info!("signaling end-of-stream");
        self.sink.end_of_stream();
        self.eos_signaled = true;
    }
}
