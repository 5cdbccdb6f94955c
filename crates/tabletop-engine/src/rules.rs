//! The `RuleAdapter` trait: the one extension point for adding a game.
//!
//! A game is a value implementing this trait. The engine calls through it
//! for everything game-specific (initial board, decoding clicks, legality,
//! applying moves, turn order, outcome, and what each cell looks like) and
//! handles everything else: authorization, turn enforcement, atomic
//! commits, terminal states, and callback encoding.

use std::fmt;

use tabletop_protocol::{CellView, Participant};

use crate::{DecodeError, Outcome};

/// How many participants a game accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatRange {
    pub min: usize,
    pub max: usize,
}

impl SeatRange {
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: n }
    }

    pub const fn at_least(n: usize) -> Self {
        Self {
            min: n,
            max: usize::MAX,
        }
    }

    pub fn contains(&self, n: usize) -> bool {
        (self.min..=self.max).contains(&n)
    }
}

impl fmt::Display for SeatRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "exactly {}", self.min)
        } else if self.max == usize::MAX {
            write!(f, "at least {}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// Which player gate a game wants by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateKind {
    /// Only the participant whose turn it is may click.
    #[default]
    Strict,
    /// Anyone may click on behalf of the current seat.
    Cooperative,
}

/// The capability contract a concrete game implements.
///
/// `Board` is the whole game state; `Move` is what a click decodes to.
/// Methods take `&self` so an adapter can carry configuration (board
/// size, mine count) chosen when the game was registered.
///
/// # Contract
///
/// - `apply` must be deterministic and must not panic for any move that
///   passed `is_legal`. The engine never calls it on an unchecked move.
/// - `next_turn` must return an index below `participants`.
/// - Nothing here may block or perform I/O.
pub trait RuleAdapter: Send + Sync + 'static {
    /// The full game state.
    type Board: Clone + Send + Sync + fmt::Debug + 'static;

    /// A decoded click.
    type Move: Clone + Send + fmt::Debug;

    /// Human-readable game title, used in status text.
    fn name(&self) -> &str;

    /// Participant counts this game accepts. Default: exactly two.
    fn seats(&self) -> SeatRange {
        SeatRange::exactly(2)
    }

    /// The gate sessions of this game use. Default: strict turn order.
    fn gate(&self) -> GateKind {
        GateKind::Strict
    }

    /// Builds the starting board for a new session.
    fn initial_state(&self, participants: &[Participant]) -> Self::Board;

    /// Turns a button payload into a move, or explains why it can't.
    fn decode_move(
        &self,
        board: &Self::Board,
        payload: &str,
    ) -> Result<Self::Move, DecodeError>;

    /// Whether the participant at `actor` may make `mv` on `board`.
    fn is_legal(&self, board: &Self::Board, actor: usize, mv: &Self::Move) -> bool;

    /// Returns the board after `mv`. Must not touch `board`.
    fn apply(&self, board: &Self::Board, mv: &Self::Move) -> Self::Board;

    /// Who moves next, given the board *after* `mv`.
    ///
    /// Default: round-robin. Override for extra turns or passes.
    fn next_turn(
        &self,
        _board: &Self::Board,
        prior: usize,
        participants: usize,
        _mv: &Self::Move,
    ) -> usize {
        (prior + 1) % participants
    }

    /// Whether the game is over, and how.
    fn outcome(&self, board: &Self::Board) -> Outcome;

    /// Labels and styles for every cell, row by row. Each cell becomes
    /// a button whose payload is its `"row col"` coordinate.
    fn grid(&self, board: &Self::Board) -> Vec<Vec<CellView>>;

    /// Optional game-specific line shown above the turn/result line
    /// (scores, mine count). Default: none.
    fn headline(&self, _board: &Self::Board, _participants: &[Participant]) -> Option<String> {
        None
    }
}
