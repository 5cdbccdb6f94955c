//! Error types for the engine.
//!
//! Every variant except [`EngineError::ContractViolation`] is an ordinary
//! rejection: the caller shows the user some text and carries on, and the
//! session is guaranteed to be exactly as it was before the click.

use tabletop_protocol::{Coord, GameKind, ParseCoordError, PlayerId, SessionId};

/// Why a payload couldn't be turned into a move for a game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The payload isn't shaped like anything this game understands.
    #[error("malformed payload: {0}")]
    Malformed(#[from] ParseCoordError),

    /// A well-formed coordinate that lies off the board.
    #[error("{0} is outside the board")]
    OutOfBounds(Coord),

    /// The button's callback string itself couldn't be read.
    #[error("{0}")]
    Callback(String),
}

/// Errors returned by session and registry operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The click names a session that doesn't exist (or was discarded).
    /// Typical cause: a stale keyboard from before a restart.
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    /// The game in this session is over.
    #[error("session {0} has finished")]
    SessionTerminal(SessionId),

    /// The clicker has no seat in this session.
    #[error("{0} is not playing in this game")]
    NotAParticipant(PlayerId),

    /// The clicker has a seat, but it isn't their turn.
    #[error("it is not {0}'s turn")]
    NotYourTurn(PlayerId),

    /// The authorized seat doesn't match the turn pointer.
    #[error("seat {actor} acted but seat {current} is to move")]
    OutOfTurn { actor: usize, current: usize },

    /// The payload doesn't decode to a move for this game.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] DecodeError),

    /// The move decodes but the rules don't allow it right now.
    #[error("illegal move")]
    IllegalMove,

    /// The button was rendered from an older board than the current one.
    #[error("stale view: board is at version {expected}, button was for {got}")]
    StaleView { expected: u64, got: u64 },

    /// Participant list rejected at session creation.
    #[error("invalid participants: {0}")]
    InvalidParticipants(String),

    /// No game is registered under this kind.
    #[error("unknown game {0}")]
    UnknownGame(GameKind),

    /// The session's actor stopped answering.
    #[error("session {0} is unavailable")]
    Unavailable(SessionId),

    /// A rule adapter broke its contract (e.g. returned a turn index
    /// outside the participant list). This is a bug, not user error.
    #[error("rule adapter contract violated: {0}")]
    ContractViolation(String),
}

impl EngineError {
    /// Returns `true` for the ordinary, user-caused rejections.
    ///
    /// `false` means a defect somewhere in the engine or an adapter.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::ContractViolation(_) | Self::Unavailable(_))
    }
}
