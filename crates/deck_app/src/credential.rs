use std::collections::BTreeMap;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, info};

use crate::{Error, Result};

/// Slot of the chat service key in the credential file.
pub const API_KEY_SLOT: &str = "openai_api_key";

/// Environment variable consulted when no key is configured.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// A small JSON object of named secrets kept on the operator's machine.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads a slot. A missing file is the same as an empty one.
    pub fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.remove(key).filter(|value| !value.is_empty()))
    }

    /// Stores a slot, keeping any others already in the file.
    pub fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries()?;
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }
        let body = serde_json::to_string_pretty(&entries)
            .map_err(|source| Error::CredentialFormat { path: self.path.clone(), source })?;
        std::fs::write(&self.path, body).map_err(|source| self.io_error(source))?;
        self.restrict_permissions()?;

        debug!(path = %self.path.display(), key, "Stored credential");
        Ok(())
    }

    fn entries(&self) -> Result<BTreeMap<String, String>> {
        let body = match std::fs::read_to_string(&self.path) {
            Ok(body) => body,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(source) => return Err(self.io_error(source)),
        };
        serde_json::from_str(&body)
            .map_err(|source| Error::CredentialFormat { path: self.path.clone(), source })
    }

    #[cfg(unix)]
    fn restrict_permissions(&self) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
            .map_err(|source| self.io_error(source))
    }

    #[cfg(not(unix))]
    fn restrict_permissions(&self) -> Result<()> {
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        Error::CredentialIo { path: self.path.clone(), source }
    }
}

/// Finds the chat service key: configured value, then the environment, then
/// the credential file, then `prompt`. A prompted key is saved to the file.
pub fn resolve_api_key<F>(
    configured: Option<String>,
    env: Option<String>,
    store: &CredentialStore,
    prompt: F,
) -> Result<Option<String>>
where
    F: FnOnce() -> Result<Option<String>>,
{
    let non_empty = |value: Option<String>| value.filter(|value| !value.trim().is_empty());

    if let Some(key) = non_empty(configured) {
        debug!("Using configured API key");
        return Ok(Some(key));
    }
    if let Some(key) = non_empty(env) {
        debug!(variable = API_KEY_ENV, "Using API key from environment");
        return Ok(Some(key));
    }
    if let Some(key) = store.read(API_KEY_SLOT)? {
        debug!(path = %store.path().display(), "Using stored API key");
        return Ok(Some(key));
    }

    let Some(key) = non_empty(prompt()?) else {
        return Ok(None);
    };
    let key = key.trim().to_string();
    store.write(API_KEY_SLOT, &key)?;
    info!(path = %store.path().display(), "Saved API key for later runs");
    Ok(Some(key))
}

/// Asks the operator for the key when stdin is a terminal. Returns `None`
/// without prompting otherwise, or when the prompt is dismissed.
pub fn prompt_terminal() -> Result<Option<String>> {
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let mut editor = DefaultEditor::new()?;
    match editor.readline("Enter your OpenAI API key: ") {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(error) => Err(error.into()),
    }
}
