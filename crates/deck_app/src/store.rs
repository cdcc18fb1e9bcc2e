use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use deck_domain::SessionId;
use derive_setters::Setters;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{Error, FormContext, Result, Session, SessionHandle};

#[derive(Debug, Clone, Setters)]
#[setters(into)]
pub struct StoreConfig {
    /// Sessions idle for longer than this are dropped on the next prune.
    pub idle_ttl: Duration,
    pub max_history_messages: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { idle_ttl: Duration::from_secs(3600), max_history_messages: 40 }
    }
}

/// Owns every live session, keyed by id.
pub struct SessionStore {
    form: Arc<FormContext>,
    config: StoreConfig,
    sessions: RwLock<HashMap<SessionId, Arc<SessionHandle>>>,
}

impl SessionStore {
    pub fn new(form: Arc<FormContext>, config: StoreConfig) -> Self {
        Self { form, config, sessions: RwLock::new(HashMap::new()) }
    }

    pub fn form(&self) -> &Arc<FormContext> {
        &self.form
    }

    /// Starts a fresh session with the schema's default values. Idle
    /// sessions are pruned first.
    pub async fn create(&self) -> Arc<SessionHandle> {
        self.prune_idle().await;

        let id = SessionId::generate();
        let session = Session::new(id, self.form.clone(), self.config.max_history_messages);
        let handle = Arc::new(SessionHandle::new(session));

        let mut sessions = self.sessions.write().await;
        sessions.insert(id, handle.clone());
        info!(session = %id, live = sessions.len(), "Session created");
        handle
    }

    pub async fn get(&self, id: SessionId) -> Result<Arc<SessionHandle>> {
        let handle = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(Error::SessionNotFound(id))?;
        handle.touch();
        Ok(handle)
    }

    /// Tears a session down. Returns `false` if it did not exist.
    pub async fn remove(&self, id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session = %id, "Session closed");
        }
        removed
    }

    /// Drops sessions idle for longer than the configured TTL, except those
    /// with a chat turn in flight.
    pub async fn prune_idle(&self) -> usize {
        let ttl = self.config.idle_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| handle.is_busy() || handle.idle_for() <= ttl);
        let pruned = before - sessions.len();
        if pruned > 0 {
            debug!(pruned, live = sessions.len(), "Pruned idle sessions");
        }
        pruned
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
