use deck_domain::{FieldValues, FormSchema, InputRegistry};

/// The loaded schema together with the controls it is rendered with. Shared
/// read-only by every session.
#[derive(Debug, Clone, PartialEq)]
pub struct FormContext {
    pub schema: FormSchema,
    pub registry: InputRegistry,
}

impl FormContext {
    pub fn new(schema: FormSchema, registry: InputRegistry) -> Self {
        Self { schema, registry }
    }

    pub fn initial_values(&self) -> FieldValues {
        FieldValues::initial(&self.schema, &self.registry)
    }

    /// Names of the fields that have an input, in schema order.
    pub fn editable_names(&self) -> Vec<&str> {
        self.schema
            .form
            .iter()
            .filter(|field| self.registry.supports(&field.field_type))
            .map(|field| field.name.as_str())
            .collect()
    }
}
