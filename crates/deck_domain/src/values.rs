use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{FormSchema, InputRegistry};

/// Current value of every rendered field, in schema order.
///
/// Only fields that have an input hold a slot; asking for any other name
/// yields the empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(IndexMap<String, String>);

impl FieldValues {
    /// Seeds a slot for every field the registry can render, starting from
    /// its default value.
    pub fn initial(schema: &FormSchema, registry: &InputRegistry) -> Self {
        Self(
            schema
                .form
                .iter()
                .filter(|field| registry.supports(&field.field_type))
                .map(|field| {
                    (
                        field.name.clone(),
                        field.default_value.clone().unwrap_or_default(),
                    )
                })
                .collect(),
        )
    }

    pub fn get(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Writes a value into an existing slot. Returns `false` when no field
    /// with that name was rendered, leaving every value untouched.
    pub fn set(&mut self, name: &str, value: impl ToString) -> bool {
        match self.0.get_mut(name) {
            Some(slot) => {
                *slot = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::FieldDefinition;

    fn schema() -> FormSchema {
        FormSchema::new(vec![
            FieldDefinition::new("companyName", "Company Name", "text").default_value("Acme"),
            FieldDefinition::new("logo", "Logo", "file"),
            FieldDefinition::new("problem", "Problem", "textarea"),
        ])
    }

    #[test]
    fn test_initial_values_skip_unsupported() {
        let actual = FieldValues::initial(&schema(), &InputRegistry::default());

        let expected = vec![("companyName", "Acme"), ("problem", "")];
        assert_eq!(actual.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_get_missing_is_empty() {
        let fixture = FieldValues::initial(&schema(), &InputRegistry::default());
        assert_eq!(fixture.get("logo"), "");
        assert_eq!(fixture.get("nope"), "");
    }

    #[test]
    fn test_set_existing() {
        let mut fixture = FieldValues::initial(&schema(), &InputRegistry::default());

        let applied = fixture.set("problem", "Too slow");

        assert_eq!(applied, true);
        assert_eq!(fixture.get("problem"), "Too slow");
    }

    #[test]
    fn test_set_unknown_is_noop() {
        let mut fixture = FieldValues::initial(&schema(), &InputRegistry::default());
        let before = fixture.clone();

        let applied = fixture.set("revenue", "1M");

        assert_eq!(applied, false);
        assert_eq!(fixture, before);
    }
}
