//! Session events: everything the actor reacts to.
//!
//! Events are delivered over a single unbounded channel and processed one at
//! a time, in arrival order. The channel order is the append order.

use tokio::sync::mpsc;

use mselink_core::Chunk;

use crate::sink::SinkError;

/// Why the connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The peer sent a close frame.
    PeerClosed,
    /// The transport failed. Logged, never retried.
    TransportError,
    /// The socket stream ended without a close frame.
    StreamEnded,
}

/// Inbound events, processed one at a time by the session actor.
#[derive(Debug)]
pub enum SessionEvent {
    /// A binary frame arrived from the server.
    ChunkArrived(Chunk),
    /// The sink finished (or failed) its outstanding append.
    AppendComplete(Result<(), SinkError>),
    /// The connection is gone. Terminal for the session; no reconnect.
    ConnectionClosed(CloseReason),
}

pub type EventSender = mpsc::UnboundedSender<SessionEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<SessionEvent>;
