//! Codec string parsing and the fixed support check.
//!
//! The client negotiates a single MIME-with-codecs string at startup, e.g.
//! `video/mp4; codecs="avc1.42E01E"`. If the sink cannot handle it, the
//! session cannot stream at all.

/// The codec negotiated by default. H.264 baseline in an fMP4 container,
/// matching what the server's remux pipeline produces.
pub const DEFAULT_CODEC: &str = "video/mp4; codecs=\"avc1.42E01E\"";

/// A parsed MIME-with-codecs string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecSpec {
    /// Container MIME type, e.g. `video/mp4`.
    pub container: String,
    /// Codec identifiers from the `codecs` parameter, e.g. `avc1.42E01E`.
    pub codecs: Vec<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("empty codec string")]
    Empty,
    #[error("not a MIME type: {0}")]
    BadContainer(String),
}

impl CodecSpec {
    /// Parse `container; codecs="a,b"`. The `codecs` parameter is optional;
    /// other parameters are ignored.
    pub fn parse(input: &str) -> Result<Self, CodecError> {
        let mut parts = input.split(';').map(str::trim);

        let container = parts.next().unwrap_or("").to_string();
        if container.is_empty() {
            return Err(CodecError::Empty);
        }
        if !container.contains('/') {
            return Err(CodecError::BadContainer(container));
        }

        let mut codecs = Vec::new();
        for param in parts {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            if key.trim().eq_ignore_ascii_case("codecs") {
                let value = value.trim().trim_matches('"');
                codecs.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                        .map(String::from),
                );
            }
        }

        Ok(Self { container, codecs })
    }

    /// Whether the sink can accept this stream: fMP4 container, AVC codecs.
    pub fn is_supported(&self) -> bool {
        if !self.container.eq_ignore_ascii_case("video/mp4") {
            return false;
        }
        self.codecs
            .iter()
            .all(|c| c.starts_with("avc1.") || c.starts_with("avc3."))
    }
}
