#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Configuration value '{key}' is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

pub type Result<A> = std::result::Result<A, Error>;
