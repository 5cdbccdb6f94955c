//! Codec trait and implementations for serializing values for a transport.
//!
//! Transports that push render views somewhere other than a chat API
//! (a web front end, a log, a test harness) need bytes, not Rust values.
//! The [`Codec`] trait is the seam; [`JsonCodec`] is the default.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// A codec that can encode Rust types to bytes and decode bytes back.
///
/// `Send + Sync + 'static` so a single codec can be shared by every
/// task of a transport.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed,
    /// incomplete, or don't match the expected type.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use tabletop_protocol::{Codec, JsonCodec, RenderView, SessionId};
///
/// let codec = JsonCodec;
/// let view = RenderView {
///     session: SessionId(1),
///     version: 3,
///     rows: vec![],
///     status: "Draw game.".into(),
///     finished: true,
/// };
///
/// let bytes = codec.encode(&view).unwrap();
/// let decoded: RenderView = codec.decode(&bytes).unwrap();
/// assert_eq!(view, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClickEvent, PlayerId, SessionId};

    #[test]
    fn test_json_codec_decodes_click_event() {
        let bytes = br#"{"session": 10, "identity": 4, "version": 2, "payload": "1 1"}"#;
        let event: ClickEvent = JsonCodec.decode(bytes).unwrap();
        assert_eq!(event.session, SessionId(10));
        assert_eq!(event.identity, PlayerId(4));
        assert_eq!(event.version, Some(2));
    }

    #[test]
    fn test_json_codec_decode_garbage_returns_error() {
        let result: Result<ClickEvent, _> = JsonCodec.decode(b"not json at all");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
