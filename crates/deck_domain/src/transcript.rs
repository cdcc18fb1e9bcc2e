use serde::{Deserialize, Serialize};

use crate::FieldChange;

/// A line of the visible chat log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptEntry {
    User { text: String },
    Assistant { message: String, changes: Vec<FieldChange> },
    Error { detail: String },
}

/// What the user sees in the chat panel. Unlike the conversation history it
/// records failed turns as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(Vec<TranscriptEntry>);

impl Transcript {
    pub fn user(&mut self, text: impl ToString) {
        self.0.push(TranscriptEntry::User { text: text.to_string() });
    }

    pub fn assistant(&mut self, message: impl ToString, changes: Vec<FieldChange>) {
        self.0
            .push(TranscriptEntry::Assistant { message: message.to_string(), changes });
    }

    pub fn error(&mut self, detail: impl ToString) {
        self.0.push(TranscriptEntry::Error { detail: detail.to_string() });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.0
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
