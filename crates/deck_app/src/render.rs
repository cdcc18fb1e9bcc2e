use deck_domain::{
    FieldDefinition, FieldValues, InputControl, SUBTITLE_FIELD, TITLE_FIELD, Transcript,
    TranscriptEntry,
};
use deck_template::Element;
use tracing::debug;

use crate::FormContext;

/// Builds one labelled input per renderable field, in schema order, showing
/// the current values.
pub fn render_form(form: &FormContext, values: &FieldValues) -> Element {
    Element::new("form")
        .attr("id", "form-container")
        .attr("autocomplete", "off")
        .append(form.schema.form.iter().filter_map(|field| {
            match form.registry.get(&field.field_type) {
                Some(control) => Some(render_field(field, control, values.get(&field.name))),
                None => {
                    debug!(field = %field.name, field_type = %field.field_type, "Skipping field with unsupported type");
                    None
                }
            }
        }))
}

fn render_field(field: &FieldDefinition, control: &InputControl, value: &str) -> Element {
    let placeholder = field.placeholder.as_deref().filter(|text| !text.is_empty());

    let input = match control {
        InputControl::SingleLine { input_type } => Element::new("input")
            .attr("type", input_type)
            .attr("value", value),
        // The parser drops one newline right after `<textarea>`, so lead with
        // one to keep values that start with a newline intact.
        InputControl::MultiLine => {
            Element::new("textarea").attr("rows", 4).text(format!("\n{value}"))
        }
    }
    .attr("name", &field.name)
    .attr("id", &field.name)
    .class("form-control")
    .attr_if_some("placeholder", placeholder);

    Element::new("div.form-field")
        .append(Element::new("label").attr("for", &field.name).text(&field.title))
        .append(input)
}

/// Summary document: title and subtitle, then every field's title and
/// value in schema order.
pub fn render_preview(form: &FormContext, values: &FieldValues) -> Element {
    Element::new("div")
        .attr("id", "preview-container")
        .append(Element::new("h1").text(values.get(TITLE_FIELD)))
        .append(Element::new("h2").text(values.get(SUBTITLE_FIELD)))
        .append(Element::new("hr"))
        .append(form.schema.form.iter().flat_map(|field| {
            [
                Element::new("h3").text(format!("{}:", field.title)),
                Element::new("p").text(values.get(&field.name)),
            ]
        }))
}

pub fn render_transcript(transcript: &Transcript) -> Element {
    Element::new("div.chatbot-messages").append(transcript.entries().iter().map(render_entry))
}

fn render_entry(entry: &TranscriptEntry) -> Element {
    let (class, body) = match entry {
        TranscriptEntry::User { text } => ("chatbot-message-user", vec![Element::new("p").text(text)]),
        TranscriptEntry::Assistant { message, changes } => {
            let list = (!changes.is_empty()).then(|| {
                Element::new("ul.chatbot-changes").append(changes.iter().map(|change| {
                    Element::new("li")
                        .append(Element::new("b").text(&change.field))
                        .append(Element::span(format!(": {}", change.new_value)))
                }))
            });
            (
                "chatbot-message-chatbot",
                vec![Element::new("p").text(message)].into_iter().chain(list).collect(),
            )
        }
        TranscriptEntry::Error { detail } => (
            "chatbot-message-error",
            vec![Element::new("p").text(format!("ERROR: {detail}"))],
        ),
    };

    Element::new("div.chatbot-message")
        .class(class)
        .append(Element::new("div.chatbot-message-text").append(body))
}
