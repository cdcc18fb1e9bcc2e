use deck_app::{Session, render_form, render_preview, render_transcript};
use deck_template::{Element, Page};

const TITLE: &str = "Pitch Deck Builder";

/// The full document for one session: form, preview and chat panel. The
/// session id is carried on `<body>` for the page script.
pub fn render_page(session: &Session) -> String {
    let form = Element::new("section.panel.form-panel")
        .append(Element::new("h2").text("Details"))
        .append(render_form(session.form(), session.values()));

    let preview = Element::new("section.panel.preview-panel")
        .append(render_preview(session.form(), session.values()));

    let chat = Element::new("section.panel.chatbot")
        .attr("id", "chatbot")
        .append(Element::new("h2").text("Assistant"))
        .append(render_transcript(session.transcript()))
        .append(
            Element::new("form")
                .attr("id", "chat-form")
                .attr("autocomplete", "off")
                .append(
                    Element::new("input")
                        .attr("type", "text")
                        .attr("id", "chat-input")
                        .attr("name", "message")
                        .class("form-control")
                        .attr("placeholder", "Ask for a change..."),
                )
                .append(
                    Element::new("button")
                        .attr("type", "submit")
                        .attr("id", "chat-submit")
                        .text("Send"),
                ),
        );

    Page::new(TITLE)
        .head(Element::new("link").attr("rel", "stylesheet").attr("href", "/style.css"))
        .head(Element::new("script").attr("src", "/app.js").attr("defer", "defer"))
        .body_attr("data-session", session.id())
        .body(Element::new("main.layout").append([form, preview, chat]))
        .render()
}
