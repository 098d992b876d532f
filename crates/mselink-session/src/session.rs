//! Session actor: owns the feeder, processes inbound events one at a time.
//!
//! One session per connection. All feeder state is owned here; nothing is
//! shared across sessions. Event-channel order is append order.

use std::time::Duration;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};

use crate::events::{EventReceiver, EventSender, SessionEvent};
use crate::feeder::{BufferFeeder, FeederStats};
use crate::sink::MediaSink;

/// How often session stats are logged while streaming.
const STATS_INTERVAL: Duration = Duration::from_secs(5);

/// Create the event channel shared by the receiver, the sink, and the actor.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

pub struct Session<S> {
    feeder: BufferFeeder<S>,
    events: EventReceiver,
    shutdown: broadcast::Receiver<()>,
}

impl<S: MediaSink> Session<S> {
    pub fn new(sink: S, events: EventReceiver, shutdown: broadcast::Receiver<()>) -> Self {
        Self {
            feeder: BufferFeeder::new(sink),
            events,
            shutdown,
        }
    }

    /// Run until the connection has closed and the feeder has drained, or
    /// until shutdown. Returns the final stats.
    pub async fn run(mut self) -> Result<FeederStats> {
        let mut stats_interval = tokio::time::interval(STATS_INTERVAL);

        loop {
            tokio::select! {
                _ = self.shutdown.recv() => {
                    tracing::info!("session shutting down");
                    return Ok(self.feeder.stats());
                }

                _ = stats_interval.tick() => {
                    let s = self.feeder.stats();
                    tracing::info!(
                        submitted = s.submitted,
                        appended = s.appended,
                        queued = self.feeder.pending_len(),
                        queue_peak = s.queue_peak,
                        "session stats"
                    );
                }

                event = self.events.recv() => {
                    let Some(event) = event else {
                        tracing::info!("event channel closed, session exiting");
                        return Ok(self.feeder.stats());
                    };
                    self.handle(event);
                    if self.feeder.finished() {
                        let s = self.feeder.stats();
                        tracing::info!(
                            appended = s.appended,
                            dropped = s.dropped,
                            failed = self.feeder.is_failed(),
                            "session complete"
                        );
                        return Ok(s);
                    }
                }
            }
        }
    }

    fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::ChunkArrived(chunk) => self.feeder.submit(chunk),
            SessionEvent::AppendComplete(result) => self.feeder.on_append_complete(result),
            SessionEvent::ConnectionClosed(reason) => {
                tracing::info!(?reason, "stream connection closed");
                self.feeder.on_stream_closed();
            }
        }
    }
}
