//! mselink-session: the streaming engine.
//!
//! A `Session` owns a `BufferFeeder` over a `MediaSink` and processes events
//! from a `StreamReceiver` one at a time, preserving the ordering and
//! single-append invariants without relying on a host event loop.

pub mod events;
pub mod feeder;
pub mod receiver;
pub mod session;
pub mod sink;

pub use events::{CloseReason, EventReceiver, EventSender, SessionEvent};
pub use feeder::{BufferFeeder, FeederStats};
pub use receiver::StreamReceiver;
pub use session::{event_channel, Session};
pub use sink::{MediaSink, SinkError, WriterSink};
