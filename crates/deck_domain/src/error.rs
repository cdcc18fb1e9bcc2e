#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Field '{0}' is defined more than once in the form schema")]
    DuplicateField(String),

    #[error("Field definition at position {0} has an empty name")]
    EmptyFieldName(usize),

    #[error("Form schema is malformed: {0}")]
    Schema(serde_json::Error),

    #[error("Reply is not valid JSON: {0}")]
    ReplyNotJson(serde_json::Error),

    #[error("Reply does not match the expected shape: {0}")]
    ReplyShape(serde_json::Error),

    #[error("Invalid session id: {0}")]
    SessionId(uuid::Error),
}

pub type Result<A> = std::result::Result<A, Error>;
