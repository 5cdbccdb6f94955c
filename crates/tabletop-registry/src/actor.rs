//! Session actor: an isolated Tokio task that owns one session.
//!
//! Each session runs in its own task and talks to the outside world only
//! through an mpsc channel, so clicks on one session are handled strictly
//! one after another, in arrival order, while different sessions run
//! independently.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tabletop_engine::{DynSession, EngineError, SessionStatus};
use tabletop_protocol::{ClickEvent, GameKind, Participant, RenderView, SessionId};
use tokio::sync::{mpsc, oneshot};

/// Commands sent to a session actor through its channel.
///
/// The `oneshot::Sender` in each variant is the reply channel: the caller
/// sends a command and waits for the answer on it.
enum SessionCommand {
    /// Process one click.
    Click {
        event: ClickEvent,
        reply: oneshot::Sender<Result<RenderView, EngineError>>,
    },

    /// Render the current state.
    View { reply: oneshot::Sender<RenderView> },

    /// Report session metadata.
    Info { reply: oneshot::Sender<SessionInfo> },

    /// Stop the actor.
    Shutdown,
}

/// A snapshot of session metadata (not the board itself).
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: SessionId,
    pub kind: GameKind,
    pub status: SessionStatus,
    pub participants: Vec<Participant>,
    pub version: u64,
}

/// Handle to a running session actor.
///
/// Cheap to clone; it's just an `mpsc::Sender` wrapper. The registry
/// holds one per session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Sends a click to the session and waits for the resulting view.
    pub async fn click(&self, event: ClickEvent) -> Result<RenderView, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Click {
                event,
                reply: reply_tx,
            })
            .await
            .map_err(|_| EngineError::Unavailable(self.id))?;
        reply_rx
            .await
            .map_err(|_| EngineError::Unavailable(self.id))?
    }

    /// Requests the current view.
    pub async fn view(&self) -> Result<RenderView, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::View { reply: reply_tx })
            .await
            .map_err(|_| EngineError::Unavailable(self.id))?;
        reply_rx
            .await
            .map_err(|_| EngineError::Unavailable(self.id))
    }

    /// Requests session metadata.
    pub async fn info(&self) -> Result<SessionInfo, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| EngineError::Unavailable(self.id))?;
        reply_rx
            .await
            .map_err(|_| EngineError::Unavailable(self.id))
    }

    /// Tells the session to shut down. Commands already queued ahead of
    /// this one are still processed.
    pub async fn shutdown(&self) -> Result<(), EngineError> {
        self.sender
            .send(SessionCommand::Shutdown)
            .await
            .map_err(|_| EngineError::Unavailable(self.id))
    }

    /// `true` once the actor task has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// The actor state. Runs inside a Tokio task.
struct SessionActor {
    session: Box<dyn DynSession>,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl SessionActor {
    async fn run(mut self) {
        let session_id = self.session.id();
        tracing::info!(%session_id, game = %self.session.kind(), "session actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SessionCommand::Click { event, reply } => {
                    let _ = reply.send(self.click(&event));
                }
                SessionCommand::View { reply } => {
                    let _ = reply.send(self.session.project());
                }
                SessionCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                SessionCommand::Shutdown => {
                    tracing::info!(%session_id, "session shutting down");
                    break;
                }
            }
        }

        tracing::info!(%session_id, "session actor stopped");
    }

    /// Runs one click. A panicking rule adapter is reported as a contract
    /// violation; the sequencer only commits after `apply` returns, so the
    /// session stays usable.
    fn click(&mut self, event: &ClickEvent) -> Result<RenderView, EngineError> {
        let session = &mut self.session;
        let result = panic::catch_unwind(AssertUnwindSafe(|| session.handle(event)));
        result.unwrap_or_else(|payload| {
            let reason = panic_message(payload.as_ref());
            tracing::error!(
                session_id = %event.session,
                player_id = %event.identity,
                reason,
                "rule adapter panicked"
            );
            Err(EngineError::ContractViolation(format!("rule adapter panicked: {reason}")))
        })
    }

    fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.session.id(),
            kind: self.session.kind().clone(),
            status: self.session.status(),
            participants: self.session.participants().to_vec(),
            version: self.session.version(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Spawns a session actor and returns a handle to it.
///
/// `channel_size` bounds the command queue; when it fills up, senders
/// wait.
pub(crate) fn spawn_session(session: Box<dyn DynSession>, channel_size: usize) -> SessionHandle {
    let (tx, rx) = mpsc::channel(channel_size.max(1));
    let id = session.id();

    let actor = SessionActor {
        session,
        receiver: rx,
    };
    tokio::spawn(actor.run());

    SessionHandle { id, sender: tx }
}
