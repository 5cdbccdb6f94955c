//! Unified error type for Tabletop.

use tabletop_engine::EngineError;
use tabletop_protocol::ProtocolError;
use tabletop_registry::RegistryError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `tabletop` crate you deal with this single error type
/// instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant generates the `From` impls, so `?` converts
/// sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum TabletopError {
    /// Encoding or decoding callback data or views.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A click or session operation was rejected.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Catalog or capacity problem.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl TabletopError {
    /// The engine error underneath, if there is one.
    pub fn as_engine(&self) -> Option<&EngineError> {
        match self {
            Self::Engine(e) | Self::Registry(RegistryError::Engine(e)) => Some(e),
            _ => None,
        }
    }
}
