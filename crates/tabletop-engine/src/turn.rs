//! Turn sequencing: abstract play, assuming the actor is already authorized.
//!
//! The sequencer answers "is it structurally this seat's turn, and is the
//! move legal?" and, if so, computes the complete next state in one go.
//! It never mutates anything; the session commits the [`Transition`] it
//! returns or throws it away.

use tabletop_protocol::SessionId;

use crate::{EngineError, Outcome, RuleAdapter, SessionStatus};

/// The parts of a session the sequencer reads.
#[derive(Debug)]
pub struct TurnContext<'a, B> {
    pub session: SessionId,
    pub board: &'a B,
    pub status: SessionStatus,
    pub turn: usize,
    pub version: u64,
    pub participants: usize,
}

/// A fully computed next state, applied atomically by the session.
#[derive(Debug, Clone)]
pub struct Transition<B> {
    pub board: B,
    pub turn: usize,
    pub outcome: Outcome,
}

/// Validates a move and packages its effects.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnSequencer;

impl TurnSequencer {
    /// Runs the validation pipeline for `actor`'s click.
    ///
    /// Steps, in order: terminal check, turn check, stale-view check
    /// (only when the click carries a version), decode, legality, then
    /// `apply` / `next_turn` / `outcome`.
    ///
    /// # Errors
    /// - [`EngineError::SessionTerminal`], [`EngineError::OutOfTurn`],
    ///   [`EngineError::StaleView`], [`EngineError::InvalidInput`],
    ///   [`EngineError::IllegalMove`]: ordinary rejections
    /// - [`EngineError::ContractViolation`]: `next_turn` returned a seat
    ///   that doesn't exist
    pub fn validate<R: RuleAdapter>(
        adapter: &R,
        ctx: &TurnContext<'_, R::Board>,
        actor: usize,
        version: Option<u64>,
        payload: &str,
    ) -> Result<Transition<R::Board>, EngineError> {
        if !ctx.status.is_active() {
            return Err(EngineError::SessionTerminal(ctx.session));
        }
        if actor != ctx.turn {
            return Err(EngineError::OutOfTurn {
                actor,
                current: ctx.turn,
            });
        }
        if let Some(got) = version {
            if got != ctx.version {
                return Err(EngineError::StaleView {
                    expected: ctx.version,
                    got,
                });
            }
        }

        let mv = adapter.decode_move(ctx.board, payload)?;
        if !adapter.is_legal(ctx.board, actor, &mv) {
            return Err(EngineError::IllegalMove);
        }

        let board = adapter.apply(ctx.board, &mv);
        let turn = adapter.next_turn(&board, actor, ctx.participants, &mv);
        if turn >= ctx.participants {
            tracing::error!(
                session_id = %ctx.session,
                game = adapter.name(),
                turn,
                participants = ctx.participants,
                ?mv,
                "next_turn returned a seat outside the participant list"
            );
            return Err(EngineError::ContractViolation(format!(
                "{} returned turn {turn} for {} participants",
                adapter.name(),
                ctx.participants
            )));
        }
        let outcome = adapter.outcome(&board);

        Ok(Transition {
            board,
            turn,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use tabletop_protocol::{CellView, Coord, Participant};

    use super::*;
    use crate::DecodeError;

    /// A one-row strip of cells. Each click claims a cell; the game ends
    /// once every cell is claimed. `extra_turn_at` gives the mover another
    /// go when they claim that column; `broken` makes `next_turn` lie.
    #[derive(Debug, Default)]
    struct Strip {
        extra_turn_at: Option<u32>,
        broken: bool,
    }

    const WIDTH: u32 = 4;

    impl RuleAdapter for Strip {
        type Board = Vec<bool>;
        type Move = u32;

        fn name(&self) -> &str {
            "strip"
        }

        fn initial_state(&self, _participants: &[Participant]) -> Vec<bool> {
            vec![false; WIDTH as usize]
        }

        fn decode_move(&self, _board: &Vec<bool>, payload: &str) -> Result<u32, DecodeError> {
            let coord: Coord = payload.parse()?;
            if !coord.within(1, WIDTH) {
                return Err(DecodeError::OutOfBounds(coord));
            }
            Ok(coord.col)
        }

        fn is_legal(&self, board: &Vec<bool>, _actor: usize, mv: &u32) -> bool {
            !board[*mv as usize]
        }

        fn apply(&self, board: &Vec<bool>, mv: &u32) -> Vec<bool> {
            let mut next = board.clone();
            next[*mv as usize] = true;
            next
        }

        fn next_turn(
            &self,
            _board: &Vec<bool>,
            prior: usize,
            participants: usize,
            mv: &u32,
        ) -> usize {
            if self.broken {
                return participants;
            }
            if self.extra_turn_at == Some(*mv) {
                prior
            } else {
                (prior + 1) % participants
            }
        }

        fn outcome(&self, board: &Vec<bool>) -> Outcome {
            if board.iter().all(|c| *c) {
                Outcome::Draw
            } else {
                Outcome::Ongoing
            }
        }

        fn grid(&self, board: &Vec<bool>) -> Vec<Vec<CellView>> {
            vec![
                board
                    .iter()
                    .map(|c| CellView::plain(if *c { "#" } else { "." }))
                    .collect(),
            ]
        }
    }

    fn ctx(board: &Vec<bool>) -> TurnContext<'_, Vec<bool>> {
        TurnContext {
            session: SessionId(1),
            board,
            status: SessionStatus::Active,
            turn: 0,
            version: 5,
            participants: 2,
        }
    }

    #[test]
    fn test_validate_legal_move_returns_transition() {
        let board = vec![false; 4];
        let t = TurnSequencer::validate(&Strip::default(), &ctx(&board), 0, None, "0 1").unwrap();
        assert_eq!(t.board, vec![false, true, false, false]);
        assert_eq!(t.turn, 1);
        assert_eq!(t.outcome, Outcome::Ongoing);
        assert_eq!(board, vec![false; 4], "input board must be untouched");
    }

    #[test]
    fn test_validate_finished_session_returns_terminal() {
        let board = vec![false; 4];
        let mut c = ctx(&board);
        c.status = SessionStatus::Finished(Outcome::Draw);
        let result = TurnSequencer::validate(&Strip::default(), &c, 0, None, "0 1");
        assert!(matches!(result, Err(EngineError::SessionTerminal(_))));
    }

    #[test]
    fn test_validate_wrong_seat_returns_out_of_turn() {
        let board = vec![false; 4];
        let result = TurnSequencer::validate(&Strip::default(), &ctx(&board), 1, None, "0 1");
        assert!(matches!(
            result,
            Err(EngineError::OutOfTurn { actor: 1, current: 0 })
        ));
    }

    #[test]
    fn test_validate_old_version_returns_stale_view() {
        let board = vec![false; 4];
        let result = TurnSequencer::validate(&Strip::default(), &ctx(&board), 0, Some(4), "0 1");
        assert!(matches!(
            result,
            Err(EngineError::StaleView { expected: 5, got: 4 })
        ));
    }

    #[test]
    fn test_validate_matching_version_passes() {
        let board = vec![false; 4];
        let result = TurnSequencer::validate(&Strip::default(), &ctx(&board), 0, Some(5), "0 1");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_garbage_payload_returns_invalid_input() {
        let board = vec![false; 4];
        let result = TurnSequencer::validate(&Strip::default(), &ctx(&board), 0, None, "left");
        assert!(matches!(
            result,
            Err(EngineError::InvalidInput(DecodeError::Malformed(_)))
        ));
    }

    #[test]
    fn test_validate_off_board_returns_invalid_input() {
        let board = vec![false; 4];
        let result = TurnSequencer::validate(&Strip::default(), &ctx(&board), 0, None, "0 9");
        assert!(matches!(
            result,
            Err(EngineError::InvalidInput(DecodeError::OutOfBounds(_)))
        ));
    }

    #[test]
    fn test_validate_occupied_cell_returns_illegal_move() {
        let board = vec![false, true, false, false];
        let result = TurnSequencer::validate(&Strip::default(), &ctx(&board), 0, None, "0 1");
        assert!(matches!(result, Err(EngineError::IllegalMove)));
    }

    #[test]
    fn test_validate_extra_turn_keeps_seat() {
        let board = vec![false; 4];
        let strip = Strip {
            extra_turn_at: Some(2),
            ..Strip::default()
        };
        let t = TurnSequencer::validate(&strip, &ctx(&board), 0, None, "0 2").unwrap();
        assert_eq!(t.turn, 0);
    }

    #[test]
    fn test_validate_last_cell_reports_outcome() {
        let board = vec![true, true, true, false];
        let t = TurnSequencer::validate(&Strip::default(), &ctx(&board), 0, None, "0 3").unwrap();
        assert_eq!(t.outcome, Outcome::Draw);
    }

    #[test]
    fn test_validate_bad_next_turn_returns_contract_violation() {
        let board = vec![false; 4];
        let strip = Strip {
            broken: true,
            ..Strip::default()
        };
        let result = TurnSequencer::validate(&strip, &ctx(&board), 0, None, "0 0");
        assert!(matches!(result, Err(EngineError::ContractViolation(_))));
    }
}
