//! The game catalog: which games sessions can be started from.
//!
//! Games are added once, while the registry is being built. After that
//! the catalog is read-only and shared by every `create_session` call.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tabletop_engine::{DynSession, EngineError, RuleAdapter, Session};
use tabletop_protocol::{GameKind, Participant, SessionId};

use crate::RegistryError;

/// Starts sessions of one game, type-erased so games with different
/// board types can share a catalog.
pub trait GameFactory: Send + Sync {
    /// Display name of the game.
    fn title(&self) -> &str;

    /// Starts a new session of this game.
    ///
    /// # Errors
    /// [`EngineError::InvalidParticipants`] if the participant list does
    /// not fit the game.
    fn start(
        &self,
        id: SessionId,
        kind: GameKind,
        participants: Vec<Participant>,
    ) -> Result<Box<dyn DynSession>, EngineError>;
}

impl<R: RuleAdapter> GameFactory for Arc<R> {
    fn title(&self) -> &str {
        self.name()
    }

    fn start(
        &self,
        id: SessionId,
        kind: GameKind,
        participants: Vec<Participant>,
    ) -> Result<Box<dyn DynSession>, EngineError> {
        let session = Session::new(id, kind, Arc::clone(self), participants)?;
        Ok(Box::new(session))
    }
}

/// Registered games, keyed by the name clients use to pick them.
#[derive(Default)]
pub struct GameCatalog {
    games: HashMap<GameKind, Box<dyn GameFactory>>,
}

impl GameCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a game under `kind`.
    ///
    /// # Errors
    /// [`RegistryError::DuplicateGame`] if `kind` is already taken.
    pub fn register<R: RuleAdapter>(
        &mut self,
        kind: impl Into<GameKind>,
        adapter: R,
    ) -> Result<(), RegistryError> {
        let kind = kind.into();
        if self.games.contains_key(&kind) {
            return Err(RegistryError::DuplicateGame(kind));
        }
        tracing::debug!(game = %kind, title = adapter.name(), "game registered");
        self.games.insert(kind, Box::new(Arc::new(adapter)));
        Ok(())
    }

    pub fn get(&self, kind: &GameKind) -> Option<&dyn GameFactory> {
        self.games.get(kind).map(|f| f.as_ref())
    }

    pub fn contains(&self, kind: &GameKind) -> bool {
        self.games.contains_key(kind)
    }

    /// Registered game keys, sorted.
    pub fn kinds(&self) -> Vec<GameKind> {
        let mut kinds: Vec<GameKind> = self.games.keys().cloned().collect();
        kinds.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        kinds
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl fmt::Debug for GameCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameCatalog")
            .field("kinds", &self.kinds())
            .finish()
    }
}
