#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Chat request timed out")]
    Timeout,

    #[error("Chat request failed: {0}")]
    Request(reqwest::Error),

    #[error("Chat service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Chat service response could not be decoded: {0}")]
    Decode(serde_json::Error),

    #[error("Chat service returned no choices")]
    EmptyChoices,

    #[error("Chat service returned a choice without text content")]
    EmptyContent,

    #[error("Invalid credential: {0}")]
    Credential(reqwest::header::InvalidHeaderValue),
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Error::Timeout
        } else {
            Error::Request(error)
        }
    }
}

pub type Result<A> = std::result::Result<A, Error>;
