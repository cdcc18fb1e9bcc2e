use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(value: impl AsRef<str>) -> Result<Self> {
        Ok(Self(Uuid::parse_str(value.as_ref()).map_err(Error::SessionId)?))
    }

    pub fn into_string(&self) -> String {
        self.0.to_string()
    }
}
