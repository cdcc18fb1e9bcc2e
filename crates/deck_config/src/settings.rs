use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use deck_domain::{InputControl, InputRegistry};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

const DEFAULT_CONFIG: &str = include_str!("../defaults.json");
const ENV_PREFIX: &str = "DECK";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[setters(into)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Sessions idle for longer than this are discarded.
    pub session_ttl_secs: u64,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[setters(into)]
pub struct SchemaConfig {
    /// A path to a JSON file or an `http(s)` URL.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[setters(into)]
pub struct ProviderConfig {
    /// Full URL of the chat completions endpoint.
    pub url: Url,
    pub model: String,
    #[serde(default, skip_serializing)]
    #[setters(strip_option)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[setters(into)]
pub struct AgentConfig {
    /// Opening sentence of every system message.
    pub persona: String,
    /// Upper bound on retained history messages; 0 keeps everything.
    pub max_history_messages: usize,
}

/// Service configuration.
///
/// Sources, lowest precedence first:
/// 1. `defaults.json` embedded in the binary
/// 2. an optional TOML/JSON file passed on the command line
/// 3. environment variables prefixed with `DECK_`, using `__` to reach
///    nested keys, e.g. `DECK_SERVER__PORT=9000` or
///    `DECK_PROVIDER__API_KEY=sk-...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[setters(into)]
pub struct DeckConfig {
    pub server: ServerConfig,
    pub schema: SchemaConfig,
    pub provider: ProviderConfig,
    pub agent: AgentConfig,
    /// Extra field types on top of `text` and `textarea`.
    #[serde(default)]
    pub inputs: HashMap<String, InputControl>,
    /// Where the credential file lives. Defaults to the user's config dir.
    #[serde(default)]
    #[setters(strip_option)]
    pub base_path: Option<PathBuf>,
}

impl DeckConfig {
    pub fn load(file: Option<&Path>) -> Result<Self> {
        Self::load_with_env(file, None)
    }

    /// Same as [`DeckConfig::load`] but reads variables from `env` instead of
    /// the process environment when given.
    pub fn load_with_env(
        file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut builder = ::config::Config::builder().add_source(::config::File::from_str(
            DEFAULT_CONFIG,
            ::config::FileFormat::Json,
        ));

        if let Some(path) = file {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let config: DeckConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.session_ttl_secs == 0 {
            return Err(Error::Invalid {
                key: "server.session_ttl_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.provider.timeout_secs == 0 {
            return Err(Error::Invalid {
                key: "provider.timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.provider.model.trim().is_empty() {
            return Err(Error::Invalid {
                key: "provider.model",
                reason: "must not be empty".to_string(),
            });
        }
        if self.schema.source.trim().is_empty() {
            return Err(Error::Invalid {
                key: "schema.source",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn input_registry(&self) -> InputRegistry {
        InputRegistry::default().extend(self.inputs.clone())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.base_path.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .map(|dir| dir.join("deckform"))
                .unwrap_or_else(|| PathBuf::from(".deckform"))
        })
    }

    pub fn credentials_path(&self) -> PathBuf {
        self.data_dir().join("credentials.json")
    }
}
