//! Control protocol: the one message the client ever sends.
//!
//! The text below IS the protocol. The server answers the init request with
//! the initialization segment as a binary frame, then media fragments follow
//! unprompted. Changing the request text is a breaking change.

/// Sent exactly once, immediately after the connection opens, to request the
/// initialization segment. No other control message exists.
pub const INIT_SEGMENT_REQUEST: &str = "get_init";

/// The client-to-server control requests. There is exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    /// Ask the server for the initialization segment.
    InitSegment,
}

impl ControlRequest {
    /// Wire text for this request.
    pub fn as_text(self) -> &'static str {
        match self {
            ControlRequest::InitSegment => INIT_SEGMENT_REQUEST,
        }
    }
}
