//! Chunk types: the atomic unit of the stream.

use bytes::Bytes;

/// One opaque binary unit of media data as received from the server.
///
/// The client never inspects the payload. Framing and semantics are the
/// server's responsibility. The first chunk of a session is conventionally
/// the initialization segment, but nothing here distinguishes it: it is
/// appended or queued under the same rule as every other chunk.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub payload: Bytes,
}

impl Chunk {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
