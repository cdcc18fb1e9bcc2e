use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use deck_app::credential::{API_KEY_ENV, CredentialStore, prompt_terminal, resolve_api_key};
use deck_app::{EditAgent, FormContext, SchemaSource, SessionStore, StoreConfig, load_schema};
use deck_config::DeckConfig;
use deck_provider::OpenAiCompat;
use deck_server::{AppState, serve, shutdown_signal};
use tokio::net::TcpListener;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_FILTER: &str = "deckform=info,deck_app=info,deck_server=info,tower_http=info";

/// Serves the pitch deck form with its live preview and editing assistant.
#[derive(Parser, Debug)]
#[command(name = "deckform", version, about)]
struct Cli {
    /// Configuration file (TOML or JSON) layered over the built-in defaults.
    #[arg(long, short, env = "DECK_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind.
    #[arg(long)]
    host: Option<String>,

    #[arg(long, short)]
    port: Option<u16>,

    /// Form schema: a JSON file path or an http(s) URL.
    #[arg(long)]
    schema: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut DeckConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(schema) = &self.schema {
            config.schema.source = schema.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config =
        DeckConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);

    config.provider.api_key = resolve_credential(&config).await?;
    if config.provider.api_key.is_none() {
        tracing::warn!("No API key available; chat requests will be sent unauthenticated");
    }

    let source: SchemaSource = config
        .schema
        .source
        .parse()
        .with_context(|| format!("Invalid schema source '{}'", config.schema.source))?;
    let schema = load_schema(&source)
        .await
        .with_context(|| format!("Failed to load form schema from {source}"))?;
    let form = FormContext::new(schema, config.input_registry());
    tracing::info!(editable = form.editable_names().len(), "Form ready");

    let store = SessionStore::new(
        Arc::new(form),
        StoreConfig::default()
            .idle_ttl(config.server.session_ttl())
            .max_history_messages(config.agent.max_history_messages),
    );
    let provider =
        OpenAiCompat::new(&config.provider).context("Failed to create chat provider client")?;
    tracing::info!(url = %config.provider.url, model = provider.model(), "Chat provider configured");
    let agent = EditAgent::new(Arc::new(provider), &config.agent.persona);

    let addr = config.server.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    serve(listener, AppState::new(store, agent), shutdown_signal()).await?;
    Ok(())
}

/// Runs on a blocking thread since it may read from the terminal.
async fn resolve_credential(config: &DeckConfig) -> Result<Option<String>> {
    let configured = config.provider.api_key.clone();
    let env = std::env::var(API_KEY_ENV).ok();
    let store = CredentialStore::new(config.credentials_path());

    tokio::task::spawn_blocking(move || resolve_api_key(configured, env, &store, prompt_terminal))
        .await
        .context("Credential lookup was interrupted")?
        .context("Failed to resolve API key")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_flags_override_config() {
        let fixture = Cli::parse_from([
            "deckform",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--schema",
            "https://example.com/form.json",
        ]);
        let mut actual = DeckConfig::load_with_env(None, Some(Default::default())).unwrap();

        fixture.apply(&mut actual);

        assert_eq!(actual.server.bind_addr(), "0.0.0.0:9000");
        assert_eq!(actual.schema.source, "https://example.com/form.json");
    }

    #[test]
    fn test_no_flags_keep_config() {
        let fixture = Cli::parse_from(["deckform"]);
        let expected = DeckConfig::load_with_env(None, Some(Default::default())).unwrap();
        let mut actual = expected.clone();

        fixture.apply(&mut actual);

        assert_eq!(actual, expected);
    }
}
