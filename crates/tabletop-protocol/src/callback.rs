//! Callback data: the string a transport embeds in every button.
//!
//! Chat platforms hand back an opaque string when an inline button is
//! pressed, capped at [`MAX_CALLBACK_LEN`] bytes. Tabletop packs the
//! session id, the board version, and the game payload into it:
//!
//! ```text
//! 00000a3f00000001:12:2 5
//! └── session ───┘ └┘ └─┘
//!              version payload
//! ```
//!
//! The payload is last so it may itself contain `:`.

use std::fmt;
use std::str::FromStr;

use crate::{ClickEvent, PlayerId, ProtocolError, SessionId};

/// Upper bound on encoded callback data, in bytes.
pub const MAX_CALLBACK_LEN: usize = 64;

/// Decoded contents of a button's callback string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackData {
    pub session: SessionId,
    pub version: u64,
    pub payload: String,
}

impl CallbackData {
    pub fn new(session: SessionId, version: u64, payload: impl Into<String>) -> Self {
        Self {
            session,
            version,
            payload: payload.into(),
        }
    }

    /// Encodes to the wire string.
    ///
    /// # Errors
    /// Returns [`ProtocolError::CallbackTooLong`] if the result would not
    /// fit in [`MAX_CALLBACK_LEN`] bytes.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        let encoded = self.to_string();
        if encoded.len() > MAX_CALLBACK_LEN {
            return Err(ProtocolError::CallbackTooLong(encoded.len()));
        }
        Ok(encoded)
    }

    /// Attaches the clicking identity, producing a routable event.
    pub fn into_click(self, identity: PlayerId) -> ClickEvent {
        ClickEvent::new(self.session, identity, self.payload).at_version(self.version)
    }
}

impl fmt::Display for CallbackData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.session, self.version, self.payload)
    }
}

impl FromStr for CallbackData {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProtocolError::InvalidCallback(s.to_string());

        if s.len() > MAX_CALLBACK_LEN {
            return Err(invalid());
        }
        let mut parts = s.splitn(3, ':');
        let session = parts
            .next()
            .and_then(|p| p.parse::<SessionId>().ok())
            .ok_or_else(invalid)?;
        let version = parts
            .next()
            .and_then(|p| p.parse::<u64>().ok())
            .ok_or_else(invalid)?;
        let payload = parts.next().ok_or_else(invalid)?;

        Ok(Self::new(session, version, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let data = CallbackData::new(SessionId(0xa3f), 12, "2 5");
        assert_eq!(data.encode().unwrap(), "0000000000000a3f:12:2 5");
    }

    #[test]
    fn test_parse_encoded_callback() {
        let data: CallbackData = "0000000000000a3f:12:2 5".parse().unwrap();
        assert_eq!(data, CallbackData::new(SessionId(0xa3f), 12, "2 5"));
    }

    #[test]
    fn test_parse_keeps_colons_in_payload() {
        let data: CallbackData = "0000000000000001:0:a:b".parse().unwrap();
        assert_eq!(data.payload, "a:b");
    }

    #[test]
    fn test_parse_missing_payload_returns_error() {
        let result = "0000000000000001:0".parse::<CallbackData>();
        assert!(matches!(result, Err(ProtocolError::InvalidCallback(_))));
    }

    #[test]
    fn test_parse_bad_version_returns_error() {
        let result = "0000000000000001:x:1 1".parse::<CallbackData>();
        assert!(matches!(result, Err(ProtocolError::InvalidCallback(_))));
    }

    #[test]
    fn test_parse_bad_session_returns_error() {
        let result = "not-hex:0:1 1".parse::<CallbackData>();
        assert!(matches!(result, Err(ProtocolError::InvalidCallback(_))));
    }

    #[test]
    fn test_encode_too_long_returns_error() {
        let data = CallbackData::new(SessionId(1), 0, "x".repeat(60));
        assert!(matches!(
            data.encode(),
            Err(ProtocolError::CallbackTooLong(len)) if len > MAX_CALLBACK_LEN
        ));
    }

    #[test]
    fn test_into_click_carries_version() {
        let event = CallbackData::new(SessionId(9), 4, "0 1").into_click(PlayerId(3));
        assert_eq!(event.session, SessionId(9));
        assert_eq!(event.identity, PlayerId(3));
        assert_eq!(event.version, Some(4));
        assert_eq!(event.payload, "0 1");
    }
}
