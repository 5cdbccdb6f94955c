//! Player control: who may act on a session right now.
//!
//! The gate only answers an authorization question. It never looks at
//! the board or the payload; that is the turn sequencer's job, and the
//! sequencer is never reached for a click the gate has refused. This is
//! why a click from the wrong player is reported as `NotYourTurn` even
//! when its payload would have been a perfectly legal move.

use std::fmt;

use tabletop_protocol::{Participant, PlayerId};

use crate::{EngineError, GateKind};

/// Maps a clicking identity to the seat it may act for.
///
/// Implement this to relax or tighten authorization for a game. The
/// default for two-player games is [`StrictTurnGate`].
pub trait PlayerGate: Send + Sync + fmt::Debug {
    /// Returns the participant index `identity` acts as.
    ///
    /// # Errors
    /// - [`EngineError::NotAParticipant`]: identity has no seat
    /// - [`EngineError::NotYourTurn`]: identity has a seat, but another
    ///   seat is to move
    fn authorize(
        &self,
        participants: &[Participant],
        current_turn: usize,
        identity: PlayerId,
    ) -> Result<usize, EngineError>;
}

/// One actor per turn: only the participant at the turn pointer may click.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictTurnGate;

impl PlayerGate for StrictTurnGate {
    fn authorize(
        &self,
        participants: &[Participant],
        current_turn: usize,
        identity: PlayerId,
    ) -> Result<usize, EngineError> {
        let seat = participants
            .iter()
            .position(|p| p.id == identity)
            .ok_or(EngineError::NotAParticipant(identity))?;
        if seat != current_turn {
            return Err(EngineError::NotYourTurn(identity));
        }
        Ok(seat)
    }
}

/// Anyone in the chat may click for the current seat.
///
/// Used by co-operative games like minesweeper, where the whole group
/// shares one board and the session only keeps score of who clicked.
#[derive(Debug, Clone, Copy, Default)]
pub struct CooperativeGate;

impl PlayerGate for CooperativeGate {
    fn authorize(
        &self,
        _participants: &[Participant],
        current_turn: usize,
        _identity: PlayerId,
    ) -> Result<usize, EngineError> {
        Ok(current_turn)
    }
}

/// Builds the gate a [`GateKind`] names.
pub fn gate_for(kind: GateKind) -> Box<dyn PlayerGate> {
    match kind {
        GateKind::Strict => Box::new(StrictTurnGate),
        GateKind::Cooperative => Box::new(CooperativeGate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seats() -> Vec<Participant> {
        vec![
            Participant::new(PlayerId(10), "alice"),
            Participant::new(PlayerId(20), "bob"),
        ]
    }

    #[test]
    fn test_strict_authorize_current_player_returns_seat() {
        assert_eq!(StrictTurnGate.authorize(&seats(), 0, PlayerId(10)).unwrap(), 0);
        assert_eq!(StrictTurnGate.authorize(&seats(), 1, PlayerId(20)).unwrap(), 1);
    }

    #[test]
    fn test_strict_authorize_other_participant_returns_not_your_turn() {
        let result = StrictTurnGate.authorize(&seats(), 0, PlayerId(20));
        assert!(matches!(result, Err(EngineError::NotYourTurn(p)) if p == PlayerId(20)));
    }

    #[test]
    fn test_strict_authorize_stranger_returns_not_a_participant() {
        let result = StrictTurnGate.authorize(&seats(), 0, PlayerId(99));
        assert!(matches!(result, Err(EngineError::NotAParticipant(p)) if p == PlayerId(99)));
    }

    #[test]
    fn test_cooperative_authorize_anyone_acts_for_current_seat() {
        assert_eq!(CooperativeGate.authorize(&seats(), 1, PlayerId(99)).unwrap(), 1);
        assert_eq!(CooperativeGate.authorize(&seats(), 0, PlayerId(20)).unwrap(), 0);
    }

    #[test]
    fn test_gate_for_strict_rejects_stranger() {
        let gate = gate_for(GateKind::Strict);
        assert!(gate.authorize(&seats(), 0, PlayerId(5)).is_err());
        let gate = gate_for(GateKind::Cooperative);
        assert!(gate.authorize(&seats(), 0, PlayerId(5)).is_ok());
    }
}
