//! # Tabletop
//!
//! Turn-based game sessions for chat bots whose only input is a click on
//! an inline button.
//!
//! A game implements one trait, [`RuleAdapter`](tabletop_engine::RuleAdapter);
//! Tabletop handles who may click, turn order, stale keyboards, one
//! actor per session, and rendering each state into a grid of buttons.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabletop::prelude::*;
//!
//! # async fn run() -> Result<(), TabletopError> {
//! let table = Tabletop::with_default_games()?;
//! let (id, view) = table
//!     .start("tictactoe", vec![
//!         Participant::new(PlayerId(1), "ann"),
//!         Participant::new(PlayerId(2), "bob"),
//!     ])
//!     .await?;
//!
//! // Send `view` as an inline keyboard. When a button comes back:
//! let callback = view.rows[1][1].callback.clone();
//! let view = table.press(PlayerId(1), &callback).await?;
//! println!("{}", view.status);
//! # let _ = id;
//! # Ok(())
//! # }
//! ```

mod error;
mod logging;
mod table;

pub use error::TabletopError;
pub use logging::{init_tracing, init_tracing_with};
pub use table::{MINES, OTHELLO, TICTACTOE, Tabletop, TabletopBuilder};

pub use tabletop_engine as engine;
pub use tabletop_games as games;
pub use tabletop_protocol as protocol;
pub use tabletop_registry as registry;

/// The types a transport usually needs.
pub mod prelude {
    pub use crate::{Tabletop, TabletopBuilder, TabletopError, init_tracing};
    pub use tabletop_engine::{
        DecodeError, EngineError, GateKind, Outcome, RuleAdapter, SeatRange, SessionStatus,
    };
    pub use tabletop_games::{Minesweeper, MinesweeperConfig, Othello, TicTacToe};
    pub use tabletop_protocol::{
        Button, CallbackData, CellStyle, CellView, ClickEvent, Coord, GameKind, Participant,
        PlayerId, RenderView, SessionId,
    };
    pub use tabletop_registry::{RegistryConfig, RegistryStats, SessionInfo};
}
