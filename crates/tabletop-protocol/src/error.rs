//! Error types for the protocol layer.
//!
//! Each crate in Tabletop defines its own error enum, so a
//! `ProtocolError` always means something went wrong turning values
//! into strings or bytes (or back), never a game or routing problem.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields,
    /// wrong data types, or truncated messages.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A button callback string doesn't have the
    /// `session:version:payload` shape.
    #[error("invalid callback data: {0:?}")]
    InvalidCallback(String),

    /// Encoded callback data exceeds the platform limit.
    #[error("callback data is {0} bytes, limit is {max}", max = crate::MAX_CALLBACK_LEN)]
    CallbackTooLong(usize),
}
