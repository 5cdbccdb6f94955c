//! The session registry: creates sessions and routes clicks to them.

use std::collections::HashMap;

use tabletop_engine::{DecodeError, EngineError, SessionStatus};
use tabletop_protocol::{
    CallbackData, ClickEvent, GameKind, Participant, PlayerId, RenderView, SessionId,
};
use tokio::sync::RwLock;

use crate::actor::spawn_session;
use crate::{
    GameCatalog, RegistryConfig, RegistryError, SessionHandle, SessionIdGenerator, SessionInfo,
};

/// Session counts by lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub active: usize,
    pub finished: usize,
}

impl RegistryStats {
    pub fn total(&self) -> usize {
        self.active + self.finished
    }
}

/// Owns every live session and the catalog they are started from.
///
/// The map lock is only held for the lookup, insert, or remove itself,
/// never while a session is processing a click, so a slow session can't
/// hold up the others.
#[derive(Debug)]
pub struct SessionRegistry {
    config: RegistryConfig,
    catalog: GameCatalog,
    ids: SessionIdGenerator,
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new(catalog: GameCatalog, config: RegistryConfig) -> Self {
        Self::with_ids(catalog, config, SessionIdGenerator::new())
    }

    /// Like [`new`](Self::new) with a caller-supplied id generator.
    pub fn with_ids(catalog: GameCatalog, config: RegistryConfig, ids: SessionIdGenerator) -> Self {
        Self {
            config,
            catalog,
            ids,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    /// Starts a new session of `kind` and returns its id and first view.
    ///
    /// # Errors
    /// - [`RegistryError::AtCapacity`] if `max_sessions` are already live
    /// - [`EngineError::UnknownGame`] / [`EngineError::InvalidParticipants`]
    ///   wrapped in [`RegistryError::Engine`]
    pub async fn create_session(
        &self,
        kind: &GameKind,
        participants: Vec<Participant>,
    ) -> Result<(SessionId, RenderView), RegistryError> {
        let factory = self
            .catalog
            .get(kind)
            .ok_or_else(|| EngineError::UnknownGame(kind.clone()))?;

        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.config.max_sessions {
            tracing::warn!(max = self.config.max_sessions, "session limit reached");
            return Err(RegistryError::AtCapacity(self.config.max_sessions));
        }

        let id = self.ids.next_id();
        let session = factory.start(id, kind.clone(), participants)?;
        let view = session.project();
        let handle = spawn_session(session, self.config.channel_size);
        sessions.insert(id, handle);
        drop(sessions);

        tracing::info!(session_id = %id, game = %kind, "session created");
        Ok((id, view))
    }

    /// Returns a handle to a live session.
    pub async fn handle_of(&self, id: SessionId) -> Result<SessionHandle, EngineError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(EngineError::SessionNotFound(id))
    }

    /// Routes a click to its session and returns the view to show.
    ///
    /// # Errors
    /// [`EngineError::SessionNotFound`] for unknown or discarded sessions,
    /// otherwise whatever the session rejected the click with.
    pub async fn handle(&self, event: ClickEvent) -> Result<RenderView, EngineError> {
        let id = event.session;
        let handle = self.handle_of(id).await?;

        let result = self.settle(id, handle.click(event).await).await;

        if let Ok(view) = &result {
            if view.finished && self.config.discard_finished {
                // A concurrent discard may have beaten us to it.
                let _ = self.discard_session(id).await;
            }
        }
        result
    }

    /// Decodes a button's callback string and routes the click.
    ///
    /// # Errors
    /// [`EngineError::InvalidInput`] if `data` isn't callback data, then
    /// as [`handle`](Self::handle).
    pub async fn handle_callback(
        &self,
        identity: PlayerId,
        data: &str,
    ) -> Result<RenderView, EngineError> {
        let callback = data
            .parse::<CallbackData>()
            .map_err(|e| DecodeError::Callback(e.to_string()))?;
        self.handle(callback.into_click(identity)).await
    }

    /// Renders a session's current state.
    pub async fn view(&self, id: SessionId) -> Result<RenderView, EngineError> {
        let result = self.handle_of(id).await?.view().await;
        self.settle(id, result).await
    }

    pub async fn info(&self, id: SessionId) -> Result<SessionInfo, EngineError> {
        let result = self.handle_of(id).await?.info().await;
        self.settle(id, result).await
    }

    /// Removes a session and stops its actor. Its id is never handed out
    /// again.
    pub async fn discard_session(&self, id: SessionId) -> Result<(), EngineError> {
        let handle = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or(EngineError::SessionNotFound(id))?;

        // The actor may already be gone; either way it's out of the map.
        let _ = handle.shutdown().await;

        tracing::info!(session_id = %id, "session discarded");
        Ok(())
    }

    pub async fn contains(&self, id: SessionId) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Ids of all live sessions.
    pub async fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().copied().collect()
    }

    /// Metadata for every live session.
    ///
    /// Sessions whose actor has died are removed on the way.
    pub async fn list(&self) -> Vec<SessionInfo> {
        let handles = self.handles().await;
        let mut infos = Vec::with_capacity(handles.len());
        for handle in handles {
            let id = handle.id();
            if let Ok(info) = self.settle(id, handle.info().await).await {
                infos.push(info);
            }
        }
        infos
    }

    /// Counts live sessions by status.
    pub async fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats::default();
        for info in self.list().await {
            match info.status {
                SessionStatus::Active => stats.active += 1,
                SessionStatus::Finished(_) => stats.finished += 1,
            }
        }
        stats
    }

    /// Shuts down every session.
    pub async fn shutdown_all(&self) {
        let handles: Vec<SessionHandle> = self
            .sessions
            .write()
            .await
            .drain()
            .map(|(_, handle)| handle)
            .collect();
        for handle in &handles {
            let _ = handle.shutdown().await;
        }
        tracing::info!(sessions = handles.len(), "all sessions shut down");
    }

    /// Sorts out an `Unavailable` answer from a session actor.
    ///
    /// If the session is no longer in the map it was discarded while the
    /// command was in flight. If it still is, the actor died without being
    /// told to stop (a rule adapter panicked outside a click), so the entry
    /// is dropped and the failure reported as a contract violation.
    async fn settle<T>(
        &self,
        id: SessionId,
        result: Result<T, EngineError>,
    ) -> Result<T, EngineError> {
        match result {
            Err(EngineError::Unavailable(_)) => {
                if self.sessions.write().await.remove(&id).is_none() {
                    return Err(EngineError::SessionNotFound(id));
                }
                tracing::error!(session_id = %id, "session actor died; session removed");
                Err(EngineError::ContractViolation(format!("session {id} stopped unexpectedly")))
            }
            other => other,
        }
    }

    /// Cloned handles, so callers can talk to sessions without holding
    /// the map lock.
    async fn handles(&self) -> Vec<SessionHandle> {
        self.sessions.read().await.values().cloned().collect()
    }
}
