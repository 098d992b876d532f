//! Media sink: where appended chunks go.
//!
//! Mirrors the native buffering facility the client was written against: an
//! append is started, runs asynchronously, and reports completion as an
//! event. The feeder guarantees at most one append is outstanding.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use mselink_core::{Chunk, CodecSpec};

use crate::events::{EventSender, SessionEvent};

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("invalid codec string: {0}")]
    InvalidCodec(#[from] mselink_core::codec::CodecError),
    #[error("unsupported codec: {0}")]
    UnsupportedCodec(String),
    #[error("sink is closed")]
    Closed,
    #[error("append failed: {0}")]
    Append(#[from] std::io::Error),
    #[error("end-of-stream failed: {0}")]
    EndOfStream(std::io::Error),
}

// ── Sink state ────────────────────────────────────────────────────────────────

const STATE_OPEN: u8 = 0;
const STATE_ENDED: u8 = 1;
const STATE_FAILED: u8 = 2;

/// Shared open/ended/failed flag. Append tasks flip it on failure; the
/// feeder reads it before signaling end-of-stream.
#[derive(Debug, Clone)]
pub struct SinkState(Arc<AtomicU8>);

impl SinkState {
    fn new() -> Self {
        Self(Arc::new(AtomicU8::new(STATE_OPEN)))
    }

    pub fn is_open(&self) -> bool {
        self.0.load(Ordering::Acquire) == STATE_OPEN
    }

    fn set_ended(&self) {
        self.0.store(STATE_ENDED, Ordering::Release);
    }

    fn set_failed(&self) {
        self.0.store(STATE_FAILED, Ordering::Release);
    }
}

// ── Trait ─────────────────────────────────────────────────────────────────────

/// The append target for the buffer feeder.
///
/// Intentionally minimal. Callers must never start an append while one is
/// outstanding and must call `end_of_stream` at most once; the feeder
/// enforces both.
pub trait MediaSink: Send {
    /// Begin appending one chunk. Completion (success or failure) is
    /// reported as an `AppendComplete` event on the session channel.
    fn start_append(&mut self, chunk: Chunk);

    /// Signal that no more chunks will arrive. Only called when no append is
    /// outstanding.
    fn end_of_stream(&mut self);

    /// Whether the sink can still accept appends or end-of-stream.
    fn is_open(&self) -> bool;
}

// ── Writer-backed sink ────────────────────────────────────────────────────────

/// Appends chunks to an async writer: a regular file, or a FIFO a player
/// reads from. Each append is a spawned write+flush whose result comes back
/// on the session event channel, so the feeder sees the same busy/complete
/// cycle the native facility exposes.
pub struct WriterSink<W> {
    writer: Arc<Mutex<W>>,
    state: SinkState,
    events: EventSender,
}

impl<W: AsyncWrite + Unpin + Send + 'static> WriterSink<W> {
    /// Validate the codec string and wrap the writer. An unsupported codec
    /// means no sink exists and the session cannot stream (fatal).
    pub fn new(codec: &str, writer: W, events: EventSender) -> Result<Self, SinkError> {
        let spec = CodecSpec::parse(codec)?;
        if !spec.is_supported() {
            return Err(SinkError::UnsupportedCodec(codec.to_string()));
        }
        tracing::debug!(container = %spec.container, "media sink ready");
        Ok(Self {
            writer: Arc::new(Mutex::new(writer)),
            state: SinkState::new(),
            events,
        })
    }

    pub fn state(&self) -> SinkState {
        self.state.clone()
    }
}

impl<W: AsyncWrite + Unpin + Send + 'static> MediaSink for WriterSink<W> {
    fn start_append(&mut self, chunk: Chunk) {
        if !self.state.is_open() {
            let _ = self
                .events
                .send(SessionEvent::AppendComplete(Err(SinkError::Closed)));
            return;
        }

        let writer = self.writer.clone();
        let state = self.state.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = async {
                let mut w = writer.lock().await;
                w.write_all(&chunk.payload).await?;
                w.flush().await?;
                Ok(())
            }
            .await
            .map_err(SinkError::Append);

            if result.is_err() {
                state.set_failed();
            }
            // The session may already be gone on shutdown; that's fine.
            let _ = events.send(SessionEvent::AppendComplete(result));
        });
    }

    fn end_of_stream(&mut self) {
        if !self.state.is_open() {
            return;
        }
        self.state.set_ended();

        let writer = self.writer.clone();
        tokio::spawn(async move {
            let mut w = writer.lock().await;
            if let Err(e) = w.shutdown().await.map_err(SinkError::EndOfStream) {
                // The stream is already over; the failure is logged, not
                // delivered as a completion event.
                tracing::warn!(error = %e, "sink shutdown failed");
            }
        });
    }

    fn is_open(&self) -> bool {
        self.state.is_open()
    }
}
