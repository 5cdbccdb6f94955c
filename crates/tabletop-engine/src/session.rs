//! The session state machine: one running game and everything it owns.
//!
//! A [`Session`] is the only thing allowed to change a board. Every click
//! goes through [`Session::handle`], which runs the player gate, then the
//! turn sequencer, and only then swaps in the new state in one step. A
//! rejected click returns before anything is assigned, so the session is
//! exactly as it was.
//!
//! ```text
//! ClickEvent ──→ terminal? ──→ gate ──→ sequencer ──→ commit ──→ RenderView
//!                    │           │          │
//!                    ▼           ▼          ▼
//!              SessionTerminal  NotYourTurn / IllegalMove / ...
//! ```
//!
//! Sessions are plain synchronous values. Serializing access (one click
//! at a time per session) is the registry's job.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tabletop_protocol::{ClickEvent, GameKind, Participant, PlayerId, RenderView, SessionId};

use crate::gate::gate_for;
use crate::turn::{Transition, TurnContext, TurnSequencer};
use crate::{EngineError, GateKind, PlayerGate, RuleAdapter, SessionStatus};

/// How many accepted clicks one identity has made in a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contribution {
    pub name: String,
    pub moves: u32,
}

/// One instantiated game.
pub struct Session<R: RuleAdapter> {
    id: SessionId,
    kind: GameKind,
    adapter: Arc<R>,
    gate: Box<dyn PlayerGate>,
    participants: Vec<Participant>,
    board: R::Board,
    turn: usize,
    status: SessionStatus,
    /// Bumped on every committed move. Buttons carry it so clicks on an
    /// outdated keyboard can be told apart.
    version: u64,
    tally: BTreeMap<PlayerId, Contribution>,
    last_actor: Option<PlayerId>,
}

impl<R: RuleAdapter> Session<R> {
    /// Starts a new game.
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidParticipants`] if the list is empty,
    /// outside the game's seat range, or names someone twice.
    pub fn new(
        id: SessionId,
        kind: GameKind,
        adapter: Arc<R>,
        participants: Vec<Participant>,
    ) -> Result<Self, EngineError> {
        if participants.is_empty() {
            return Err(EngineError::InvalidParticipants(
                "at least one participant is required".into(),
            ));
        }
        let seats = adapter.seats();
        if !seats.contains(participants.len()) {
            return Err(EngineError::InvalidParticipants(format!(
                "{} needs {seats} participants, got {}",
                adapter.name(),
                participants.len()
            )));
        }
        for (i, p) in participants.iter().enumerate() {
            if participants[..i].iter().any(|q| q.id == p.id) {
                return Err(EngineError::InvalidParticipants(format!(
                    "{} appears more than once",
                    p.id
                )));
            }
        }

        let board = adapter.initial_state(&participants);
        let gate = gate_for(adapter.gate());

        tracing::info!(
            session_id = %id,
            game = %kind,
            participants = participants.len(),
            "session started"
        );

        Ok(Self {
            id,
            kind,
            adapter,
            gate,
            participants,
            board,
            turn: 0,
            status: SessionStatus::Active,
            version: 0,
            tally: BTreeMap::new(),
            last_actor: None,
        })
    }

    /// Replaces the gate the adapter asked for.
    pub fn with_gate(mut self, gate: Box<dyn PlayerGate>) -> Self {
        self.gate = gate;
        self
    }

    /// Processes one click and returns the view to show afterwards.
    ///
    /// # Errors
    /// Any [`EngineError`] rejection; the session is unchanged in every
    /// error case.
    pub fn handle(&mut self, event: &ClickEvent) -> Result<RenderView, EngineError> {
        match self.try_handle(event) {
            Ok(view) => Ok(view),
            Err(e) => {
                if e.is_rejection() {
                    tracing::debug!(
                        session_id = %self.id,
                        player_id = %event.identity,
                        payload = %event.payload,
                        error = %e,
                        "click rejected"
                    );
                } else {
                    tracing::error!(
                        session_id = %self.id,
                        player_id = %event.identity,
                        error = %e,
                        "click failed"
                    );
                }
                Err(e)
            }
        }
    }

    fn try_handle(&mut self, event: &ClickEvent) -> Result<RenderView, EngineError> {
        // Finished sessions answer the same way to everyone, before the
        // gate gets a say.
        if !self.status.is_active() {
            return Err(EngineError::SessionTerminal(self.id));
        }

        let actor = self
            .gate
            .authorize(&self.participants, self.turn, event.identity)?;

        let ctx = TurnContext {
            session: self.id,
            board: &self.board,
            status: self.status,
            turn: self.turn,
            version: self.version,
            participants: self.participants.len(),
        };
        let transition =
            TurnSequencer::validate(&*self.adapter, &ctx, actor, event.version, &event.payload)?;

        self.commit(event, transition)?;
        Ok(self.project())
    }

    /// Swaps in a validated transition. All fallible checks happen before
    /// the first assignment.
    fn commit(
        &mut self,
        event: &ClickEvent,
        transition: Transition<R::Board>,
    ) -> Result<(), EngineError> {
        let status = self.status.after(transition.outcome).ok_or_else(|| {
            EngineError::ContractViolation(format!(
                "no transition from {} on {:?}",
                self.status, transition.outcome
            ))
        })?;

        self.board = transition.board;
        self.turn = transition.turn;
        self.status = status;
        self.version += 1;
        self.last_actor = Some(event.identity);

        let name = self.display_name(event);
        self.tally
            .entry(event.identity)
            .or_insert(Contribution { name, moves: 0 })
            .moves += 1;

        if !self.status.is_active() {
            tracing::info!(
                session_id = %self.id,
                game = %self.kind,
                status = %self.status,
                moves = self.version,
                "session finished"
            );
        }
        Ok(())
    }

    /// Participant name if the clicker has a seat, otherwise whatever the
    /// transport told us, otherwise the bare identity.
    fn display_name(&self, event: &ClickEvent) -> String {
        self.participants
            .iter()
            .find(|p| p.id == event.identity)
            .map(|p| p.name.clone())
            .or_else(|| event.display_name.clone())
            .unwrap_or_else(|| event.identity.to_string())
    }

    /// Renders the committed state. Pure; call as often as needed.
    pub fn project(&self) -> RenderView {
        crate::render::project(self)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn kind(&self) -> &GameKind {
        &self.kind
    }

    pub fn adapter(&self) -> &R {
        &self.adapter
    }

    pub fn gate_kind(&self) -> GateKind {
        self.adapter.gate()
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn board(&self) -> &R::Board {
        &self.board
    }

    pub fn current_turn(&self) -> usize {
        self.turn
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Accepted clicks per identity, ordered by identity.
    pub fn tally(&self) -> &BTreeMap<PlayerId, Contribution> {
        &self.tally
    }

    /// Who made the last accepted move.
    pub fn last_actor(&self) -> Option<PlayerId> {
        self.last_actor
    }
}

impl<R: RuleAdapter> fmt::Debug for Session<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("status", &self.status)
            .field("turn", &self.turn)
            .field("version", &self.version)
            .field("board", &self.board)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// DynSession
// ---------------------------------------------------------------------------

/// Object-safe view of a [`Session`], so one registry can hold sessions
/// of every registered game side by side.
pub trait DynSession: Send + Sync + fmt::Debug {
    fn id(&self) -> SessionId;
    fn kind(&self) -> &GameKind;
    fn status(&self) -> SessionStatus;
    fn version(&self) -> u64;
    fn current_turn(&self) -> usize;
    fn participants(&self) -> &[Participant];
    fn handle(&mut self, event: &ClickEvent) -> Result<RenderView, EngineError>;
    fn project(&self) -> RenderView;
}

impl<R: RuleAdapter> DynSession for Session<R> {
    fn id(&self) -> SessionId {
        self.id
    }

    fn kind(&self) -> &GameKind {
        &self.kind
    }

    fn status(&self) -> SessionStatus {
        self.status
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn current_turn(&self) -> usize {
        self.turn
    }

    fn participants(&self) -> &[Participant] {
        &self.participants
    }

    fn handle(&mut self, event: &ClickEvent) -> Result<RenderView, EngineError> {
        Session::handle(self, event)
    }

    fn project(&self) -> RenderView {
        Session::project(self)
    }
}
