use deck_domain::ChatMessage;

use crate::Result;

/// Sends a complete, ordered message list to a chat service and returns the
/// assistant's text.
#[async_trait::async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String>;
}
