use std::fmt::Display;

/// Elements that never carry content or a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// An HTML element tree that escapes everything it is given.
///
/// Text set through [`Element::text`] and every attribute value are escaped
/// when the tree is rendered, so field values and model output can be placed
/// into markup without altering its structure.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attr: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: Option<String>,
}

impl Element {
    /// Creates an element, accepting CSS-style classes:
    /// `Element::new("div.form-field")` yields `<div class="form-field">`.
    pub fn new(name_with_classes: impl ToString) -> Self {
        let full_name = name_with_classes.to_string();
        let mut parts = full_name.split('.');

        let mut element = Element {
            name: parts.next().unwrap_or_default().to_string(),
            ..Default::default()
        };

        let classes = parts.collect::<Vec<_>>();
        if !classes.is_empty() {
            element.attr.push(("class".to_string(), classes.join(" ")));
        }

        element
    }

    pub fn span(text: impl ToString) -> Self {
        Element::new("span").text(text)
    }

    pub fn text(mut self, text: impl ToString) -> Self {
        self.text = Some(html_escape::encode_text(&text.to_string()).to_string());
        self
    }

    pub fn attr(mut self, key: impl ToString, value: impl ToString) -> Self {
        self.attr.push((key.to_string(), value.to_string()));
        self
    }

    /// Sets the attribute only when a value is present.
    pub fn attr_if_some(self, key: impl ToString, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.attr(key, value),
            None => self,
        }
    }

    /// Adds a class, joining it onto an existing `class` attribute.
    pub fn class(mut self, class_name: impl ToString) -> Self {
        let class_name = class_name.to_string();
        match self.attr.iter_mut().find(|(key, _)| key == "class") {
            Some((_, classes)) => {
                classes.push(' ');
                classes.push_str(&class_name);
            }
            None => self.attr.push(("class".to_string(), class_name)),
        }
        self
    }

    pub fn append(self, item: impl CanAppend) -> Self {
        item.append_to(self)
    }

    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str())
    }

    /// Looks up the first value of an attribute.
    pub fn get_attr(&self, key: &str) -> Option<&str> {
        self.attr
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Renders the tree as compact HTML with no whitespace between tags.
    pub fn render(&self) -> String {
        let mut html = String::new();
        self.render_into(&mut html);
        html
    }

    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (name, value) in &self.attr {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&html_escape::encode_double_quoted_attribute(value));
            out.push('"');
        }
        out.push('>');

        if self.is_void() {
            return;
        }

        out.push_str(self.text.as_deref().unwrap_or_default());
        self.children.iter().for_each(|child| child.render_into(out));

        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

pub trait CanAppend {
    fn append_to(self, element: Element) -> Element;
}

impl CanAppend for Element {
    fn append_to(self, mut element: Element) -> Element {
        element.children.push(self);
        element
    }
}

impl<T> CanAppend for T
where
    T: IntoIterator<Item = Element>,
{
    fn append_to(self, mut element: Element) -> Element {
        element.children.extend(self);
        element
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_element() {
        let actual = Element::new("div").render();
        let expected = "<div></div>";
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_element_with_attributes() {
        let actual = Element::new("label").attr("for", "tagline").render();
        let expected = r#"<label for="tagline"></label>"#;
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_element_with_children() {
        let actual = Element::new("div")
            .attr("id", "preview")
            .append([Element::new("h1").text("Acme"), Element::new("h2").text("Rockets")])
            .render();
        let expected = r#"<div id="preview"><h1>Acme</h1><h2>Rockets</h2></div>"#;
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_element_with_css_style_classes() {
        let actual = Element::new("div.form-field.wide").class("extra").render();
        let expected = r#"<div class="form-field wide extra"></div>"#;
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_void_element_has_no_closing_tag() {
        let actual = Element::new("input")
            .attr("type", "text")
            .attr("name", "companyName")
            .text("ignored")
            .render();
        let expected = r#"<input type="text" name="companyName">"#;
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_text_is_escaped() {
        let actual = Element::new("p").text("<script>alert('XSS')</script>").render();
        let expected = "<p>&lt;script&gt;alert('XSS')&lt;/script&gt;</p>";
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_attribute_value_is_escaped() {
        let actual = Element::new("input")
            .attr("value", r#""><img src=x onerror=alert(1)>"#)
            .render();
        assert!(actual.starts_with(r#"<input value="&quot;"#));
        assert!(!actual.contains(r#""><img"#));
        assert_eq!(actual.matches('"').count(), 2);
    }

    #[test]
    fn test_append_option() {
        let some = Element::new("div").append(Some(Element::new("hr"))).render();
        let none = Element::new("div").append(None::<Element>).render();
        assert_eq!(some, "<div><hr></div>");
        assert_eq!(none, "<div></div>");
    }

    #[test]
    fn test_append_iterator() {
        let actual = Element::new("ul")
            .append((0..3).map(|i| Element::new("li").text(i)))
            .render();
        let expected = "<ul><li>0</li><li>1</li><li>2</li></ul>";
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_attr_if_some() {
        let with = Element::new("input").attr_if_some("placeholder", Some("Acme Inc."));
        let without = Element::new("input").attr_if_some("placeholder", None::<String>);
        assert_eq!(with.get_attr("placeholder"), Some("Acme Inc."));
        assert_eq!(without.get_attr("placeholder"), None);
    }
}
