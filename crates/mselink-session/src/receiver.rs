//! Stream receiver: one WebSocket session, inbound frames relayed in order.
//!
//! Connects, requests the init segment with the single control message, then
//! forwards every binary frame verbatim to the session event channel. No
//! frame is inspected or validated here. Closed is terminal: there is no
//! reconnect and no backoff.

use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use mselink_core::{control, Chunk};

use crate::events::{CloseReason, EventSender, SessionEvent};

pub struct StreamReceiver {
    url: String,
    events: EventSender,
}

impl StreamReceiver {
    pub fn new(url: impl Into<String>, events: EventSender) -> Self {
        Self {
            url: url.into(),
            events,
        }
    }

    /// Run the connection to completion. Always posts exactly one
    /// `ConnectionClosed` event before returning, including when the
    /// connection never comes up: the session actor must see Closed on
    /// every path or it would wait for events forever.
    pub async fn run(self) -> Result<()> {
        let (reason, result) = match self.connect_and_relay().await {
            Ok(reason) => (reason, Ok(())),
            Err(e) => (CloseReason::TransportError, Err(e)),
        };
        let _ = self.events.send(SessionEvent::ConnectionClosed(reason));
        result
    }

    async fn connect_and_relay(&self) -> Result<CloseReason> {
        let (ws, _response) = connect_async(self.url.as_str())
            .await
            .with_context(|| format!("failed to connect to {}", self.url))?;
        tracing::info!(url = %self.url, "stream connection open");

        let (mut tx, mut rx) = ws.split();

        let request = control::ControlRequest::InitSegment;
        tx.send(Message::text(request.as_text()))
            .await
            .context("failed to send init segment request")?;
        tracing::debug!(request = request.as_text(), "init segment requested");

        let reason = loop {
            match rx.next().await {
                Some(Ok(Message::Binary(payload))) => {
                    tracing::trace!(len = payload.len(), "binary frame received");
                    if self
                        .events
                        .send(SessionEvent::ChunkArrived(Chunk::new(payload)))
                        .is_err()
                    {
                        // Session actor is gone; nothing left to relay to.
                        break CloseReason::StreamEnded;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(frame = ?frame, "peer closed the stream");
                    break CloseReason::PeerClosed;
                }
                Some(Ok(other)) => {
                    tracing::trace!(kind = message_kind(&other), "ignoring non-binary frame");
                }
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "transport error, ending session");
                    break CloseReason::TransportError;
                }
                None => break CloseReason::StreamEnded,
            }
        };

        Ok(reason)
    }
}

fn message_kind(msg: &Message) -> &'static str {
    match msg {
        Message::Text(_) => "text",
        Message::Binary(_) => "binary",
        Message::Ping(_) => "ping",
        Message::Pong(_) => "pong",
        Message::Close(_) => "close",
        Message::Frame(_) => "frame",
    }
}
