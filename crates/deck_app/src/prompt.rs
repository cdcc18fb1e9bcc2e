use deck_domain::{ChatMessage, FieldValues, SUBTITLE_FIELD, TITLE_FIELD};

use crate::FormContext;

const FORMAT_INSTRUCTION: &str = r#"You only respond in JSON format: {"message": "", "changes": [{"field": "", "newValue": ""}]}. Field is one of: "#;
const SKIP_INSTRUCTION: &str = ". If no field needs to be updated skip field and newValue.";

/// Plain-text rendition of the form: title and subtitle lines, then
/// `Title: value. ` for every non-empty field.
pub fn summarize(form: &FormContext, values: &FieldValues) -> String {
    let mut summary = format!(
        "{}\n{}\n\n",
        values.get(TITLE_FIELD),
        values.get(SUBTITLE_FIELD)
    );

    for field in &form.schema.form {
        let value = values.get(&field.name);
        if value.is_empty() {
            continue;
        }
        summary.push_str(&format!("{}: {}. ", field.title, value));
    }

    summary
}

/// Builds the system message for a turn from the current form state.
pub fn system_message(persona: &str, form: &FormContext, values: &FieldValues) -> ChatMessage {
    ChatMessage::system(format!(
        "{persona}{}{FORMAT_INSTRUCTION}{}{SKIP_INSTRUCTION}",
        summarize(form, values),
        form.editable_names().join(",")
    ))
}
