//! Outcomes and the session lifecycle state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What a rule adapter says about a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Play continues.
    Ongoing,
    /// The participant at this index won.
    Win(usize),
    /// Nobody won.
    Draw,
    /// Everybody lost together (co-operative games, e.g. hitting a mine).
    Defeat,
}

impl Outcome {
    pub fn is_ongoing(self) -> bool {
        matches!(self, Self::Ongoing)
    }
}

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// The lifecycle state of a session.
///
/// There is exactly one transition and no way back:
///
/// ```text
/// Active ──(move with outcome ≠ Ongoing)──→ Finished(outcome)
/// ```
///
/// - **Active**: moves are accepted (subject to the gate and the rules).
/// - **Finished**: the board is frozen. Every further click is rejected
///   with `SessionTerminal`; the final view can still be projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionStatus {
    Active,
    Finished(Outcome),
}

impl SessionStatus {
    /// Returns `true` if the session still accepts moves.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// The state a session moves to once a move yields `outcome`.
    ///
    /// Returns `None` if the transition isn't allowed: nothing leaves
    /// `Finished`, and an `Ongoing` outcome keeps an active session as is.
    pub fn after(self, outcome: Outcome) -> Option<Self> {
        match (self, outcome) {
            (Self::Finished(_), _) => None,
            (Self::Active, Outcome::Ongoing) => Some(Self::Active),
            (Self::Active, finished) => Some(Self::Finished(finished)),
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Finished(Outcome::Win(seat)) => write!(f, "Finished(Win({seat}))"),
            Self::Finished(Outcome::Draw) => write!(f, "Finished(Draw)"),
            Self::Finished(Outcome::Defeat) => write!(f, "Finished(Defeat)"),
            Self::Finished(Outcome::Ongoing) => write!(f, "Finished(Ongoing)"),
        }
    }
}
