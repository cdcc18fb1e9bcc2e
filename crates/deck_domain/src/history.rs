use serde::{Deserialize, Serialize};

use crate::ChatMessage;

/// Messages exchanged in past turns, oldest first.
///
/// A turn is only recorded once it completed, so the history always holds
/// whole user/assistant pairs. When `max_messages` is non-zero the oldest
/// pairs are dropped to stay within it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
    max_messages: usize,
}

impl ConversationHistory {
    pub fn new(max_messages: usize) -> Self {
        Self { messages: Vec::new(), max_messages }
    }

    pub fn push_turn(&mut self, user: ChatMessage, assistant: ChatMessage) {
        self.messages.push(user);
        self.messages.push(assistant);

        if self.max_messages == 0 {
            return;
        }

        // Always keep at least the latest pair, and drop in pairs.
        let limit = self.max_messages.max(2);
        while self.messages.len() > limit {
            let drop = 2.min(self.messages.len());
            self.messages.drain(..drop);
            tracing::debug!(retained = self.messages.len(), "Trimmed conversation history");
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn turn(history: &mut ConversationHistory, n: usize) {
        history.push_turn(
            ChatMessage::user(format!("q{n}")),
            ChatMessage::assistant(format!("a{n}")),
        );
    }

    fn contents(history: &ConversationHistory) -> Vec<&str> {
        history.messages().iter().map(|m| m.content.as_str()).collect()
    }

    #[test]
    fn test_two_turns_in_order() {
        let mut fixture = ConversationHistory::new(40);
        turn(&mut fixture, 1);
        turn(&mut fixture, 2);

        let actual = contents(&fixture);

        let expected = vec!["q1", "a1", "q2", "a2"];
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_cap_drops_oldest_pair() {
        let mut fixture = ConversationHistory::new(4);
        turn(&mut fixture, 1);
        turn(&mut fixture, 2);
        turn(&mut fixture, 3);

        let actual = contents(&fixture);

        let expected = vec!["q2", "a2", "q3", "a3"];
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_odd_cap_keeps_whole_pairs() {
        let mut fixture = ConversationHistory::new(3);
        turn(&mut fixture, 1);
        turn(&mut fixture, 2);

        let actual = contents(&fixture);

        let expected = vec!["q2", "a2"];
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_zero_cap_is_unbounded() {
        let mut fixture = ConversationHistory::new(0);
        (0..30).for_each(|n| turn(&mut fixture, n));
        assert_eq!(fixture.len(), 60);
    }
}
