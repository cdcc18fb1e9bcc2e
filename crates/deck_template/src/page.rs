use crate::{CanAppend, Element};

/// A complete HTML document: doctype, head and body.
#[derive(Clone, Debug)]
pub struct Page {
    head: Element,
    body: Element,
}

impl Page {
    pub fn new(title: impl ToString) -> Self {
        let head = Element::new("head")
            .append(Element::new("meta").attr("charset", "utf-8"))
            .append(
                Element::new("meta")
                    .attr("name", "viewport")
                    .attr("content", "width=device-width, initial-scale=1"),
            )
            .append(Element::new("title").text(title));
        Self { head, body: Element::new("body") }
    }

    pub fn head(mut self, item: impl CanAppend) -> Self {
        self.head = self.head.append(item);
        self
    }

    pub fn body(mut self, item: impl CanAppend) -> Self {
        self.body = self.body.append(item);
        self
    }

    /// Sets an attribute on the `<body>` element.
    pub fn body_attr(mut self, key: impl ToString, value: impl ToString) -> Self {
        self.body = self.body.attr(key, value);
        self
    }

    pub fn render(&self) -> String {
        let html = Element::new("html")
            .attr("lang", "en")
            .append([self.head.clone(), self.body.clone()]);
        format!("<!DOCTYPE html>\n{}", html.render())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_page_render() {
        let fixture = Page::new("Deck <draft>")
            .body_attr("data-session", "abc")
            .body(Element::new("main").text("hi"));

        let actual = fixture.render();

        assert!(actual.starts_with("<!DOCTYPE html>\n<html lang=\"en\"><head>"));
        assert!(actual.contains("<title>Deck &lt;draft&gt;</title>"));
        assert!(actual.ends_with(r#"<body data-session="abc"><main>hi</main></body></html>"#));
    }

    #[test]
    fn test_page_head_items() {
        let fixture = Page::new("x").head(Element::new("script").attr("src", "/app.js"));
        let actual = fixture.render();
        let expected = r#"<title>x</title><script src="/app.js"></script></head>"#;
        assert_eq!(actual.contains(expected), true);
    }
}
