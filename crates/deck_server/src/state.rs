use std::sync::Arc;

use deck_app::{EditAgent, FormContext, SessionHandle, SessionStore};
use deck_domain::SessionId;

use crate::ApiResult;

/// Shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub agent: Arc<EditAgent>,
}

impl AppState {
    pub fn new(store: SessionStore, agent: EditAgent) -> Self {
        Self { store: Arc::new(store), agent: Arc::new(agent) }
    }

    pub fn form(&self) -> &FormContext {
        self.store.form()
    }

    /// Looks up a session from the raw id in a request path.
    pub async fn session(&self, id: &str) -> ApiResult<Arc<SessionHandle>> {
        let id = SessionId::parse(id).map_err(deck_app::Error::from)?;
        Ok(self.store.get(id).await?)
    }
}
