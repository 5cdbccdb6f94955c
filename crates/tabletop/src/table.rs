//! `Tabletop` builder and front door.
//!
//! This ties the layers together: a catalog of games, a session registry
//! running one actor per session, and the click routing between them.

use std::sync::Arc;

use tabletop_engine::{EngineError, RuleAdapter};
use tabletop_games::{Minesweeper, MinesweeperConfig, Othello, TicTacToe};
use tabletop_protocol::{ClickEvent, GameKind, Participant, PlayerId, RenderView, SessionId};
use tabletop_registry::{
    GameCatalog, RegistryConfig, RegistryError, RegistryStats, SessionInfo, SessionRegistry,
};

use crate::TabletopError;

/// Catalog key of the built-in tic-tac-toe.
pub const TICTACTOE: &str = "tictactoe";
/// Catalog key of the built-in othello.
pub const OTHELLO: &str = "othello";
/// Catalog key of the built-in co-op minesweeper.
pub const MINES: &str = "mines";

/// Builder for a [`Tabletop`].
///
/// # Example
///
/// ```rust
/// use tabletop::prelude::*;
///
/// let table = Tabletop::builder()
///     .config(RegistryConfig { discard_finished: true, ..RegistryConfig::default() })
///     .game("ttt", TicTacToe)
///     .build()?;
/// assert_eq!(table.games().len(), 1);
/// # Ok::<(), TabletopError>(())
/// ```
#[derive(Debug, Default)]
pub struct TabletopBuilder {
    config: RegistryConfig,
    catalog: GameCatalog,
    error: Option<RegistryError>,
}

impl TabletopBuilder {
    /// Creates a builder with default settings and no games.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the registry configuration.
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers a game under `kind`. A duplicate key is reported by
    /// [`build`](Self::build).
    pub fn game<R: RuleAdapter>(mut self, kind: impl Into<GameKind>, adapter: R) -> Self {
        if let Err(e) = self.catalog.register(kind, adapter) {
            self.error.get_or_insert(e);
        }
        self
    }

    /// Registers tic-tac-toe, othello, and minesweeper under
    /// [`TICTACTOE`], [`OTHELLO`], and [`MINES`].
    pub fn default_games(self) -> Self {
        self.game(TICTACTOE, TicTacToe)
            .game(OTHELLO, Othello)
            .game(MINES, Minesweeper::new(MinesweeperConfig::default()))
    }

    /// Builds the table.
    ///
    /// # Errors
    /// [`RegistryError::DuplicateGame`] if two games shared a key.
    pub fn build(self) -> Result<Tabletop, TabletopError> {
        if let Some(e) = self.error {
            return Err(e.into());
        }
        tracing::info!(
            games = ?self.catalog.kinds(),
            max_sessions = self.config.max_sessions,
            "tabletop ready"
        );
        Ok(Tabletop {
            registry: Arc::new(SessionRegistry::new(self.catalog, self.config)),
        })
    }
}

/// Handle to a set of running game sessions. Cheap to clone.
///
/// A transport calls [`start`](Self::start) when a chat asks for a game
/// and [`press`](Self::press) for every inline-button callback, then
/// shows the returned [`RenderView`] (or the error's text).
#[derive(Debug, Clone)]
pub struct Tabletop {
    registry: Arc<SessionRegistry>,
}

impl Tabletop {
    /// Creates a new builder.
    pub fn builder() -> TabletopBuilder {
        TabletopBuilder::new()
    }

    /// A table with the built-in games and default settings.
    pub fn with_default_games() -> Result<Self, TabletopError> {
        Self::builder().default_games().build()
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Registered game keys, sorted.
    pub fn games(&self) -> Vec<GameKind> {
        self.registry.catalog().kinds()
    }

    /// Starts a game of `kind` and returns its id and first view.
    pub async fn start(
        &self,
        kind: &str,
        participants: Vec<Participant>,
    ) -> Result<(SessionId, RenderView), TabletopError> {
        Ok(self
            .registry
            .create_session(&GameKind::new(kind), participants)
            .await?)
    }

    /// Routes a button callback pressed by `identity`.
    pub async fn press(
        &self,
        identity: PlayerId,
        callback: &str,
    ) -> Result<RenderView, EngineError> {
        self.registry.handle_callback(identity, callback).await
    }

    /// Routes an already-decoded click.
    pub async fn click(&self, event: ClickEvent) -> Result<RenderView, EngineError> {
        self.registry.handle(event).await
    }

    pub async fn view(&self, id: SessionId) -> Result<RenderView, EngineError> {
        self.registry.view(id).await
    }

    pub async fn info(&self, id: SessionId) -> Result<SessionInfo, EngineError> {
        self.registry.info(id).await
    }

    /// Ends a session early.
    pub async fn end(&self, id: SessionId) -> Result<(), EngineError> {
        self.registry.discard_session(id).await
    }

    /// Session counts by status.
    pub async fn stats(&self) -> RegistryStats {
        self.registry.stats().await
    }

    /// Stops every session.
    pub async fn shutdown(&self) {
        self.registry.shutdown_all().await;
    }
}
