//! Registry configuration.

use serde::{Deserialize, Serialize};

/// Settings for a [`SessionRegistry`](crate::SessionRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Capacity of each session actor's command channel. When it fills
    /// up, callers wait (bounded channel backpressure).
    pub channel_size: usize,

    /// Maximum number of live sessions.
    pub max_sessions: usize,

    /// Drop a session as soon as a move finishes it. Later clicks on its
    /// buttons then get `SessionNotFound` instead of `SessionTerminal`.
    pub discard_finished: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            channel_size: 64,
            max_sessions: 10_000,
            discard_finished: false,
        }
    }
}
