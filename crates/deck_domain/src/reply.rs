use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::{Error, Result};

/// A field edit proposed by the assistant. An entry without a `field` names
/// nothing and is skipped when changes are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    #[serde(default)]
    pub field: String,
    #[serde(rename = "newValue", default, deserialize_with = "scalar_as_string")]
    pub new_value: String,
}

impl FieldChange {
    pub fn new(field: impl ToString, new_value: impl ToString) -> Self {
        Self { field: field.to_string(), new_value: new_value.to_string() }
    }
}

/// The structured reply the assistant is instructed to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditReply {
    pub message: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub changes: Vec<FieldChange>,
}

impl EditReply {
    /// Parses the assistant's text content as a single JSON object.
    ///
    /// A Markdown code fence around the object is tolerated; anything else
    /// that is not JSON, or JSON without a string `message`, is an error.
    pub fn parse(text: &str) -> Result<Self> {
        let body = strip_code_fence(text);
        let value: Value = serde_json::from_str(body).map_err(Error::ReplyNotJson)?;
        serde_json::from_value(value).map_err(Error::ReplyShape)
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Skip the info string (e.g. `json`) on the opening line, or directly
    // after the fence when everything is on one line.
    let body = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<FieldChange>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<FieldChange>>::deserialize(deserializer)?.unwrap_or_default())
}

fn scalar_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected newValue to be a string, got {other}"
        ))),
    }
}
