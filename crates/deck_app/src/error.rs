use std::path::PathBuf;

use deck_domain::SessionId;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Domain(#[from] deck_domain::Error),

    #[error(transparent)]
    Provider(#[from] deck_provider::Error),

    #[error("Session {0} not found")]
    SessionNotFound(SessionId),

    #[error("Field '{0}' is not part of the form")]
    UnknownField(String),

    #[error("A chat turn is already in progress for this session")]
    TurnInFlight,

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Failed to read form schema from {path}: {source}")]
    SchemaRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch form schema from {url}: {source}")]
    SchemaFetch {
        url: url::Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to access credential file {path}: {source}")]
    CredentialIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Credential file {path} is malformed: {source}")]
    CredentialFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read credential from terminal: {0}")]
    Prompt(#[from] rustyline::error::ReadlineError),
}

pub type Result<A> = std::result::Result<A, Error>;
