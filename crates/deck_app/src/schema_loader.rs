use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use deck_domain::FormSchema;
use tracing::info;
use url::Url;

use crate::{Error, Result};

/// Where the form schema is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    File(PathBuf),
    Url(Url),
}

impl FromStr for SchemaSource {
    type Err = url::ParseError;

    /// `http://` and `https://` values are URLs, anything else is a path.
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        if value.starts_with("http://") || value.starts_with("https://") {
            Ok(SchemaSource::Url(Url::parse(value)?))
        } else {
            Ok(SchemaSource::File(PathBuf::from(value)))
        }
    }
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaSource::File(path) => write!(f, "{}", path.display()),
            SchemaSource::Url(url) => write!(f, "{url}"),
        }
    }
}

/// Reads and validates the form schema once, at startup.
pub async fn load_schema(source: &SchemaSource) -> Result<FormSchema> {
    let body = match source {
        SchemaSource::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|source| Error::SchemaRead { path: path.clone(), source })?,
        SchemaSource::Url(url) => fetch(url)
            .await
            .map_err(|source| Error::SchemaFetch { url: url.clone(), source })?,
    };

    let schema = FormSchema::from_json(&body)?;
    info!(source = %source, fields = schema.len(), "Loaded form schema");
    Ok(schema)
}

async fn fetch(url: &Url) -> reqwest::Result<String> {
    reqwest::get(url.clone())
        .await?
        .error_for_status()?
        .text()
        .await
}
