use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[display("system")]
    System,
    #[display("user")]
    User,
    #[display("assistant")]
    Assistant,
}

/// A single role/content turn as exchanged with the chat service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl ToString) -> Self {
        Self { role, content: content.to_string() }
    }

    pub fn system(content: impl ToString) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl ToString) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl ToString) -> Self {
        Self::new(Role::Assistant, content)
    }
}
