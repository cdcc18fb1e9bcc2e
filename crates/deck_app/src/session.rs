use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use deck_domain::{
    ChatMessage, ConversationHistory, FieldChange, FieldValues, SessionId, Transcript,
};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::{Error, FormContext, Result, render_preview, render_transcript};

/// One visitor's form state, preview, chat log and conversation history.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    form: Arc<FormContext>,
    values: FieldValues,
    preview: String,
    transcript: Transcript,
    history: ConversationHistory,
}

impl Session {
    pub fn new(id: SessionId, form: Arc<FormContext>, max_history_messages: usize) -> Self {
        let values = form.initial_values();
        let mut session = Self {
            id,
            form,
            values,
            preview: String::new(),
            transcript: Transcript::default(),
            history: ConversationHistory::new(max_history_messages),
        };
        session.refresh_preview();
        session
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn form(&self) -> &FormContext {
        &self.form
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn transcript_html(&self) -> String {
        render_transcript(&self.transcript).render()
    }

    /// Handles a change of one field: stores the value and rebuilds the
    /// preview.
    pub fn set_field(&mut self, name: &str, value: impl ToString) -> Result<()> {
        if !self.values.set(name, value) {
            return Err(Error::UnknownField(name.to_string()));
        }
        debug!(session = %self.id, field = name, "Field changed");
        self.refresh_preview();
        Ok(())
    }

    /// Applies proposed changes in order and returns the ones that named an
    /// existing field. Entries without a field and unknown fields are ignored.
    pub fn apply_changes(&mut self, changes: &[FieldChange]) -> Vec<FieldChange> {
        changes
            .iter()
            .filter(|change| !change.field.is_empty())
            .filter(|change| match self.set_field(&change.field, &change.new_value) {
                Ok(()) => true,
                Err(_) => {
                    warn!(session = %self.id, field = %change.field, "Ignoring change to unknown field");
                    false
                }
            })
            .cloned()
            .collect()
    }

    pub fn record_turn(&mut self, user: ChatMessage, assistant: ChatMessage) {
        self.history.push_turn(user, assistant);
    }

    fn refresh_preview(&mut self) {
        self.preview = render_preview(&self.form, &self.values).render();
    }
}

/// Shared handle to a session.
///
/// The busy flag and activity clock live outside the mutex so they can be
/// read and released without awaiting the lock.
#[derive(Debug)]
pub struct SessionHandle {
    id: SessionId,
    state: Mutex<Session>,
    busy: AtomicBool,
    created: Instant,
    touched_ms: AtomicU64,
}

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self {
            id: session.id(),
            state: Mutex::new(session),
            busy: AtomicBool::new(false),
            created: Instant::now(),
            touched_ms: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub async fn lock(&self) -> MutexGuard<'_, Session> {
        self.state.lock().await
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Marks a chat turn as started. Fails if one is already running; the
    /// flag is released when the returned guard is dropped.
    pub fn begin_turn(self: &Arc<Self>) -> Result<TurnGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| Error::TurnInFlight)?;
        Ok(TurnGuard { handle: Arc::clone(self) })
    }

    pub fn touch(&self) {
        let elapsed = self.created.elapsed().as_millis();
        self.touched_ms
            .store(u64::try_from(elapsed).unwrap_or(u64::MAX), Ordering::SeqCst);
    }

    pub fn idle_for(&self) -> Duration {
        let touched = Duration::from_millis(self.touched_ms.load(Ordering::SeqCst));
        self.created.elapsed().saturating_sub(touched)
    }
}

/// Holds a session's busy flag for the duration of a chat turn.
#[derive(Debug)]
pub struct TurnGuard {
    handle: Arc<SessionHandle>,
}

impl Drop for TurnGuard {
    fn drop(&mut self) {
        self.handle.busy.store(false, Ordering::SeqCst);
    }
}
