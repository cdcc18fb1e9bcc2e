use serde::Deserialize;

use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text content of the first choice.
    pub fn into_content(self) -> Result<String> {
        let choice = self.choices.into_iter().next().ok_or(Error::EmptyChoices)?;
        choice.message.content.ok_or(Error::EmptyContent)
    }
}
