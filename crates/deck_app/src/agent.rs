use std::sync::Arc;

use deck_domain::{ChatMessage, EditReply, FieldChange};
use deck_provider::ChatProvider;
use tracing::{info, warn};

use crate::{Error, Result, SessionHandle, system_message};

/// How a chat turn ended. A failed turn is still a handled turn: its detail
/// has already been written to the session transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Replied { message: String, applied: Vec<FieldChange> },
    Failed { detail: String },
}

impl TurnOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, TurnOutcome::Replied { .. })
    }
}

/// Sends user messages to the chat provider along with the current form
/// state and applies the edits it proposes.
pub struct EditAgent {
    provider: Arc<dyn ChatProvider>,
    persona: String,
}

impl EditAgent {
    pub fn new(provider: Arc<dyn ChatProvider>, persona: impl ToString) -> Self {
        Self { provider, persona: persona.to_string() }
    }

    /// Runs one turn for the session.
    ///
    /// Returns an error only when the turn could not start: the message is
    /// blank or another turn is already running. Provider and reply failures
    /// end the turn with [`TurnOutcome::Failed`] and leave the history as it
    /// was.
    pub async fn run_turn(&self, handle: &Arc<SessionHandle>, message: &str) -> Result<TurnOutcome> {
        if message.trim().is_empty() {
            return Err(Error::EmptyMessage);
        }
        let _guard = handle.begin_turn()?;

        let user = ChatMessage::user(message);
        let messages = {
            let mut session = handle.lock().await;
            session.transcript_mut().user(message);

            let mut messages = Vec::with_capacity(session.history().len() + 2);
            messages.push(system_message(&self.persona, session.form(), session.values()));
            messages.extend(session.history().messages().iter().cloned());
            messages.push(user.clone());
            messages
        };

        let reply = match self.provider.complete(messages).await {
            Ok(text) => EditReply::parse(&text)
                .map(|reply| (text, reply))
                .map_err(Error::from),
            Err(error) => Err(Error::from(error)),
        };

        let mut session = handle.lock().await;
        match reply {
            Ok((text, reply)) => {
                session.record_turn(user, ChatMessage::assistant(text));
                let applied = session.apply_changes(&reply.changes);
                info!(
                    session = %handle.id(),
                    proposed = reply.changes.len(),
                    applied = applied.len(),
                    "Chat turn completed"
                );
                session.transcript_mut().assistant(&reply.message, applied.clone());
                Ok(TurnOutcome::Replied { message: reply.message, applied })
            }
            Err(error) => {
                let detail = error.to_string();
                warn!(session = %handle.id(), error = %detail, "Chat turn failed");
                session.transcript_mut().error(&detail);
                Ok(TurnOutcome::Failed { detail })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use deck_domain::{
        FieldDefinition, FormSchema, InputRegistry, Role, SessionId, TranscriptEntry,
    };
    use pretty_assertions::assert_eq;
    use tokio::sync::Notify;

    use super::*;
    use crate::{FormContext, Session};

    /// Replays canned replies and records every request it receives.
    #[derive(Default)]
    struct ScriptedProvider {
        replies: Mutex<VecDeque<deck_provider::Result<String>>>,
        requests: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedProvider {
        fn new(replies: impl IntoIterator<Item = deck_provider::Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into_iter().collect()),
                requests: Mutex::default(),
            })
        }

        fn requests(&self) -> Vec<Vec<ChatMessage>> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ChatProvider for ScriptedProvider {
        async fn complete(&self, messages: Vec<ChatMessage>) -> deck_provider::Result<String> {
            self.requests.lock().unwrap().push(messages);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(deck_provider::Error::EmptyChoices))
        }
    }

    /// Blocks until released so a turn can be observed in flight.
    #[derive(Default)]
    struct GatedProvider {
        entered: Notify,
        release: Notify,
    }

    #[async_trait::async_trait]
    impl ChatProvider for GatedProvider {
        async fn complete(&self, _: Vec<ChatMessage>) -> deck_provider::Result<String> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(r#"{"message": "done"}"#.to_string())
        }
    }

    fn handle() -> Arc<SessionHandle> {
        let form = FormContext::new(
            FormSchema::new(vec![
                FieldDefinition::new("companyName", "Company Name", "text").default_value("Acme"),
                FieldDefinition::new("tagline", "Tagline", "text"),
            ]),
            InputRegistry::default(),
        );
        Arc::new(SessionHandle::new(Session::new(
            SessionId::generate(),
            Arc::new(form),
            40,
        )))
    }

    fn ok(text: &str) -> deck_provider::Result<String> {
        Ok(text.to_string())
    }

    #[tokio::test]
    async fn test_turn_applies_changes() {
        let provider = ScriptedProvider::new([ok(
            r#"{"message": "Updated", "changes": [{"field": "tagline", "newValue": "X"}]}"#,
        )]);
        let agent = EditAgent::new(provider.clone(), "Persona: ");
        let fixture = handle();

        let actual = agent.run_turn(&fixture, "Shorter tagline").await.unwrap();

        let expected = TurnOutcome::Replied {
            message: "Updated".to_string(),
            applied: vec![FieldChange::new("tagline", "X")],
        };
        assert_eq!(actual, expected);

        let session = fixture.lock().await;
        assert_eq!(session.values().get("tagline"), "X");
        assert!(session.preview().contains("<h2>X</h2>"));
        assert_eq!(
            session.transcript().entries(),
            &[
                TranscriptEntry::User { text: "Shorter tagline".to_string() },
                TranscriptEntry::Assistant {
                    message: "Updated".to_string(),
                    changes: vec![FieldChange::new("tagline", "X")],
                },
            ]
        );
        assert!(!fixture.is_busy());
    }

    #[tokio::test]
    async fn test_request_carries_system_history_and_user() {
        let provider = ScriptedProvider::new([
            ok(r#"{"message": "first"}"#),
            ok(r#"{"message": "second"}"#),
        ]);
        let agent = EditAgent::new(provider.clone(), "Persona: ");
        let fixture = handle();

        agent.run_turn(&fixture, "one").await.unwrap();
        agent.run_turn(&fixture, "two").await.unwrap();

        let requests = provider.requests();
        let actual = requests[1]
            .iter()
            .map(|message| (message.role, message.content.as_str()))
            .skip(1)
            .collect::<Vec<_>>();
        let expected = vec![
            (Role::User, "one"),
            (Role::Assistant, r#"{"message": "first"}"#),
            (Role::User, "two"),
        ];
        assert_eq!(actual, expected);
        assert_eq!(requests[1][0].role, Role::System);
        assert!(requests[1][0].content.starts_with("Persona: Acme\n"));
        assert!(requests[1][0].content.contains("Field is one of: companyName,tagline."));
    }

    #[tokio::test]
    async fn test_two_turns_fill_history_in_order() {
        let provider = ScriptedProvider::new([
            ok(r#"{"message": "a1"}"#),
            ok(r#"{"message": "a2"}"#),
        ]);
        let agent = EditAgent::new(provider, "");
        let fixture = handle();

        agent.run_turn(&fixture, "u1").await.unwrap();
        agent.run_turn(&fixture, "u2").await.unwrap();

        let session = fixture.lock().await;
        let actual = session
            .history()
            .messages()
            .iter()
            .map(|message| message.content.as_str())
            .collect::<Vec<_>>();
        let expected = vec!["u1", r#"{"message": "a1"}"#, "u2", r#"{"message": "a2"}"#];
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_non_json_reply_leaves_history_unchanged() {
        let provider = ScriptedProvider::new([ok("Sure! Here is a better tagline.")]);
        let agent = EditAgent::new(provider, "");
        let fixture = handle();

        let actual = agent.run_turn(&fixture, "Help").await.unwrap();

        let TurnOutcome::Failed { detail } = actual else {
            panic!("expected a failed turn");
        };
        assert!(detail.starts_with("Reply is not valid JSON"));

        let session = fixture.lock().await;
        assert!(session.history().is_empty());
        assert_eq!(session.values().get("tagline"), "");
        assert_eq!(
            session.transcript().last(),
            Some(&TranscriptEntry::Error { detail })
        );
        assert!(!fixture.is_busy());
    }

    #[tokio::test]
    async fn test_provider_failure_is_reported() {
        let provider = ScriptedProvider::new([Err(deck_provider::Error::Timeout)]);
        let agent = EditAgent::new(provider, "");
        let fixture = handle();

        let actual = agent.run_turn(&fixture, "Help").await.unwrap();

        let expected = TurnOutcome::Failed { detail: "Chat request timed out".to_string() };
        assert_eq!(actual, expected);
        assert!(fixture.lock().await.history().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_field_is_ignored() {
        let provider = ScriptedProvider::new([ok(
            r#"{"message": "Added revenue", "changes": [{"field": "revenue", "newValue": "1M"}]}"#,
        )]);
        let agent = EditAgent::new(provider, "");
        let fixture = handle();

        let actual = agent.run_turn(&fixture, "Add revenue").await.unwrap();

        let expected =
            TurnOutcome::Replied { message: "Added revenue".to_string(), applied: vec![] };
        assert_eq!(actual, expected);

        let session = fixture.lock().await;
        assert_eq!(session.values().get("companyName"), "Acme");
        assert_eq!(session.values().get("tagline"), "");
        assert_eq!(
            session.transcript().last(),
            Some(&TranscriptEntry::Assistant {
                message: "Added revenue".to_string(),
                changes: vec![]
            })
        );
    }

    #[tokio::test]
    async fn test_empty_change_entry_is_a_no_op() {
        let provider =
            ScriptedProvider::new([ok(r#"{"message": "Looks good", "changes": [{}]}"#)]);
        let agent = EditAgent::new(provider, "");
        let fixture = handle();

        let actual = agent.run_turn(&fixture, "Anything to fix?").await.unwrap();

        let expected =
            TurnOutcome::Replied { message: "Looks good".to_string(), applied: vec![] };
        assert_eq!(actual, expected);
        let session = fixture.lock().await;
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.values().get("companyName"), "Acme");
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let provider = ScriptedProvider::new([]);
        let agent = EditAgent::new(provider.clone(), "");
        let fixture = handle();

        let actual = agent.run_turn(&fixture, "   ").await;

        assert!(matches!(actual, Err(Error::EmptyMessage)));
        assert!(provider.requests().is_empty());
        assert!(fixture.lock().await.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_second_submission_while_busy_is_rejected() {
        let provider = Arc::new(GatedProvider::default());
        let agent = Arc::new(EditAgent::new(provider.clone(), ""));
        let fixture = handle();

        let first = tokio::spawn({
            let agent = agent.clone();
            let fixture = fixture.clone();
            async move { agent.run_turn(&fixture, "first").await }
        });
        provider.entered.notified().await;

        let actual = agent.run_turn(&fixture, "second").await;
        assert!(matches!(actual, Err(Error::TurnInFlight)));

        provider.release.notify_one();
        let outcome = first.await.unwrap().unwrap();

        assert!(outcome.is_ok());
        assert!(!fixture.is_busy());
        assert_eq!(fixture.lock().await.history().len(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_turn_releases_busy_flag() {
        let provider = Arc::new(GatedProvider::default());
        let agent = Arc::new(EditAgent::new(provider.clone(), ""));
        let fixture = handle();

        let turn = tokio::spawn({
            let agent = agent.clone();
            let fixture = fixture.clone();
            async move { agent.run_turn(&fixture, "first").await }
        });
        provider.entered.notified().await;
        assert!(fixture.is_busy());

        turn.abort();
        let _ = turn.await;

        assert!(!fixture.is_busy());
        assert!(fixture.lock().await.history().is_empty());
    }
}
