//! Error types for the registry layer.

use tabletop_engine::EngineError;
use tabletop_protocol::GameKind;

/// Errors from building the catalog or starting sessions.
///
/// Click routing itself reports [`EngineError`] directly; this type only
/// adds what can go wrong around it.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two games were registered under the same key.
    #[error("game {0} is already registered")]
    DuplicateGame(GameKind),

    /// The registry already holds its configured maximum of sessions.
    #[error("session limit of {0} reached")]
    AtCapacity(usize),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[cfg(test)]
mod tests {
    use tabletop_protocol::SessionId;

    use super::*;

    #[test]
    fn test_registry_error_display() {
        assert_eq!(
            RegistryError::DuplicateGame(GameKind::new("othello")).to_string(),
            "game othello is already registered"
        );
        assert_eq!(
            RegistryError::AtCapacity(3).to_string(),
            "session limit of 3 reached"
        );
    }

    #[test]
    fn test_registry_error_from_engine_is_transparent() {
        let engine = EngineError::SessionNotFound(SessionId(0xab));
        let expected = engine.to_string();
        let err: RegistryError = engine.into();
        assert!(matches!(err, RegistryError::Engine(_)));
        assert_eq!(err.to_string(), expected);
    }
}
