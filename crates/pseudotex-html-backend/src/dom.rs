//! Markup element tree and the builder the renderer writes into.

use std::fmt::Write;

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Plain text; escaped on serialization.
    Text(String),
    /// Markup produced by a math backend; written verbatim.
    Raw(String),
}

/// A materialized markup element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub class: Option<String>,
    pub style: Option<String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            class: None,
            style: None,
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class
            .as_deref()
            .map(|c| c.split_whitespace().any(|name| name == class))
            .unwrap_or(false)
    }

    /// All descendant elements (including self) carrying `class`, in document order.
    pub fn find_all_by_class<'a>(&'a self, class: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        if self.has_class(class) {
            found.push(self);
        }
        for child in &self.children {
            if let Node::Element(el) = child {
                el.collect_by_class(class, found);
            }
        }
    }

    /// Concatenated text content; raw math markup is included verbatim.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Element(el) => el.collect_text(out),
                Node::Text(text) | Node::Raw(text) => out.push_str(text),
            }
        }
    }

    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out.trim().to_string()
    }

    fn write_markup(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if let Some(class) = &self.class {
            let _ = write!(out, " class=\"{}\"", escape_html(class));
        }
        if let Some(style) = &self.style {
            let _ = write!(out, " style=\"{}\"", escape_html(style));
        }
        out.push('>');
        if is_void(&self.tag) {
            return;
        }
        if is_group(&self.tag) {
            out.push('\n');
        }
        for child in &self.children {
            match child {
                Node::Element(el) => el.write_markup(out),
                Node::Text(text) => out.push_str(&escape_html(text)),
                Node::Raw(html) => out.push_str(html),
            }
        }
        let _ = write!(out, "</{}>", self.tag);
        if is_group(&self.tag) || self.tag == "p" {
            out.push('\n');
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "br" | "hr" | "img")
}

fn is_group(tag: &str) -> bool {
    tag == "div"
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Stack-based builder: `begin` opens an element, `end` closes the innermost one.
#[derive(Debug)]
pub struct HtmlBuilder {
    stack: Vec<Element>,
}

impl Default for HtmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlBuilder {
    pub fn new() -> Self {
        Self {
            stack: vec![Element::new("#fragment")],
        }
    }

    pub fn begin(&mut self, tag: &str, class: Option<&str>, style: Option<String>) -> &mut Self {
        let mut el = Element::new(tag);
        el.class = class.map(str::to_string);
        el.style = style.filter(|s| !s.is_empty());
        self.stack.push(el);
        self
    }

    pub fn begin_div(&mut self, class: &str, style: Option<String>) -> &mut Self {
        self.begin("div", Some(class), style)
    }

    pub fn begin_p(&mut self, class: &str, style: Option<String>) -> &mut Self {
        self.begin("p", Some(class), style)
    }

    pub fn begin_span(&mut self, class: Option<&str>, style: Option<String>) -> &mut Self {
        self.begin("span", class, style)
    }

    /// Closes the innermost open element. The fragment root is never closed.
    pub fn end(&mut self) -> &mut Self {
        if self.stack.len() > 1 {
            if let Some(el) = self.stack.pop() {
                self.current().children.push(Node::Element(el));
            }
        }
        self
    }

    pub fn put_text(&mut self, text: &str) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        let current = self.current();
        if let Some(Node::Text(last)) = current.children.last_mut() {
            last.push_str(text);
        } else {
            current.children.push(Node::Text(text.to_string()));
        }
        self
    }

    pub fn put_raw(&mut self, html: impl Into<String>) -> &mut Self {
        self.current().children.push(Node::Raw(html.into()));
        self
    }

    pub fn put_element(&mut self, el: Element) -> &mut Self {
        self.current().children.push(Node::Element(el));
        self
    }

    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    fn current(&mut self) -> &mut Element {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Closes any open elements and returns the top-level nodes.
    pub fn finish(mut self) -> Vec<Node> {
        while self.stack.len() > 1 {
            self.end();
        }
        self.stack.pop().map(|root| root.children).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_nesting() {
        let mut html = HtmlBuilder::new();
        html.begin_div("ps-root", None)
            .begin_p("ps-line", None)
            .begin_span(Some("ps-keyword"), None)
            .put_text("if ")
            .end()
            .put_text("x < y")
            .end()
            .end();
        let nodes = html.finish();
        assert_eq!(nodes.len(), 1);
        let Node::Element(root) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(
            root.to_markup(),
            "<div class=\"ps-root\">\n<p class=\"ps-line\"><span class=\"ps-keyword\">if </span>x &lt; y</p>\n</div>"
        );
    }

    #[test]
    fn test_adjacent_text_merges() {
        let mut html = HtmlBuilder::new();
        html.begin_span(None, None).put_text("a").put_text(" ").put_text("b");
        let nodes = html.finish();
        let Node::Element(span) = &nodes[0] else {
            panic!("expected element");
        };
        assert_eq!(span.children, vec![Node::Text("a b".to_string())]);
    }

    #[test]
    fn test_raw_is_not_escaped() {
        let mut el = Element::new("span");
        el.children.push(Node::Raw("<b>x</b>".into()));
        el.children.push(Node::Text("<b>".into()));
        assert_eq!(el.to_markup(), "<span><b>x</b>&lt;b&gt;</span>");
    }

    #[test]
    fn test_empty_style_is_dropped() {
        let mut html = HtmlBuilder::new();
        html.begin_span(None, Some(String::new())).end();
        let nodes = html.finish();
        assert_eq!(nodes, vec![Node::Element(Element::new("span"))]);
    }

    #[test]
    fn test_find_all_by_class() {
        let mut root = Element::new("div").with_class("ps-root");
        root.append(Element::new("p").with_class("ps-line ps-code"));
        root.append(Element::new("p").with_class("ps-line"));
        assert_eq!(root.find_all_by_class("ps-line").len(), 2);
        assert_eq!(root.find_all_by_class("ps-code").len(), 1);
    }
}
