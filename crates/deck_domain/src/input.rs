use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::FieldType;

fn default_input_type() -> String {
    "text".to_string()
}

/// The kind of control a field type is rendered as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputControl {
    /// `<input type=...>`
    SingleLine {
        #[serde(default = "default_input_type")]
        input_type: String,
    },
    /// `<textarea>`
    MultiLine,
}

impl InputControl {
    pub fn single_line(input_type: impl ToString) -> Self {
        Self::SingleLine { input_type: input_type.to_string() }
    }
}

/// Maps field type names to input controls. Types with no entry are not
/// rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct InputRegistry {
    controls: HashMap<FieldType, InputControl>,
}

impl Default for InputRegistry {
    fn default() -> Self {
        Self::empty()
            .register("text", InputControl::single_line("text"))
            .register("textarea", InputControl::MultiLine)
    }
}

impl InputRegistry {
    pub fn empty() -> Self {
        Self { controls: HashMap::new() }
    }

    pub fn register(mut self, field_type: impl Into<FieldType>, control: InputControl) -> Self {
        self.controls.insert(field_type.into(), control);
        self
    }

    /// Adds every entry of `extra`, replacing existing registrations.
    pub fn extend(mut self, extra: impl IntoIterator<Item = (String, InputControl)>) -> Self {
        self.controls
            .extend(extra.into_iter().map(|(name, control)| (FieldType::new(name), control)));
        self
    }

    pub fn get(&self, field_type: &FieldType) -> Option<&InputControl> {
        self.controls.get(field_type)
    }

    pub fn supports(&self, field_type: &FieldType) -> bool {
        self.controls.contains_key(field_type)
    }
}
