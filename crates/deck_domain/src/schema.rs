use std::collections::HashSet;

use derive_more::{Display, From};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Name of the field rendered as the preview title.
pub const TITLE_FIELD: &str = "companyName";
/// Name of the field rendered as the preview subtitle.
pub const SUBTITLE_FIELD: &str = "tagline";

/// The declared type of a field, e.g. `text` or `textarea`.
///
/// The set of type names is open; whether a type can be rendered is decided
/// by an [`InputRegistry`](crate::InputRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldType(String);

impl FieldType {
    pub fn new(name: impl ToString) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One editable entry of the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Setters)]
#[serde(rename_all = "camelCase")]
#[setters(into, strip_option)]
pub struct FieldDefinition {
    pub name: String,
    pub title: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl FieldDefinition {
    pub fn new(name: impl ToString, title: impl ToString, field_type: impl Into<FieldType>) -> Self {
        Self {
            name: name.to_string(),
            title: title.to_string(),
            field_type: field_type.into(),
            placeholder: None,
            default_value: None,
        }
    }
}

/// The ordered list of fields served to the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub form: Vec<FieldDefinition>,
}

impl FormSchema {
    pub fn new(form: Vec<FieldDefinition>) -> Self {
        Self { form }
    }

    /// Parses a schema document and checks that field names are unique.
    pub fn from_json(json: &str) -> Result<Self> {
        let schema: FormSchema = serde_json::from_str(json).map_err(Error::Schema)?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (position, field) in self.form.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(Error::EmptyFieldName(position));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(Error::DuplicateField(field.name.clone()));
            }
        }
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.form.iter().find(|field| field.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.form.iter().map(|field| field.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.form.len()
    }

    pub fn is_empty(&self) -> bool {
        self.form.is_empty()
    }
}
