//! The turn-based session engine for Tabletop.
//!
//! This crate is game-agnostic. A game plugs in by implementing
//! [`RuleAdapter`]; the engine supplies the rest:
//!
//! 1. **Player control**: [`PlayerGate`] decides whether the clicker may
//!    act at all ([`StrictTurnGate`], [`CooperativeGate`])
//! 2. **Turn sequencing**: [`TurnSequencer`] checks turn order, staleness,
//!    decoding, and legality, then computes the next state
//! 3. **Session state machine**: [`Session`] commits that state
//!    atomically and tracks the lifecycle ([`SessionStatus`])
//! 4. **Projection**: [`project`] renders a [`RenderView`](tabletop_protocol::RenderView)
//!
//! # How it fits in the stack
//!
//! ```text
//! Registry (above)  ← routes clicks to sessions, one at a time per session
//!     ↕
//! Engine (this crate)  ← validates and applies moves
//!     ↕
//! Protocol (below)  ← ids, ClickEvent, RenderView
//! ```

mod error;
mod gate;
mod render;
mod rules;
mod session;
mod status;
mod turn;

pub use error::{DecodeError, EngineError};
pub use gate::{CooperativeGate, PlayerGate, StrictTurnGate, gate_for};
pub use render::project;
pub use rules::{GateKind, RuleAdapter, SeatRange};
pub use session::{Contribution, DynSession, Session};
pub use status::{Outcome, SessionStatus};
pub use turn::{Transition, TurnContext, TurnSequencer};
