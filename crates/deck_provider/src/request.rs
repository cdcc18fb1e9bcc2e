use deck_domain::ChatMessage;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl ToString, messages: Vec<ChatMessage>) -> Self {
        Self { model: model.to_string(), messages }
    }
}
