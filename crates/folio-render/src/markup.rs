//! Markup sinks shared by the live and static renderers.

use serde::Serialize;

/// Elements that never have children or a closing tag.
const VOID_TAGS: &[&str] = &["img", "br", "hr", "meta", "link", "input", "source"];

/// Escape text for HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Interaction attached to an element in the live preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Open the details overlay for the project at this index.
    OpenProject { index: usize },
    /// Close the details overlay.
    CloseOverlay,
}

impl Action {
    /// Data attributes the action is serialized to.
    fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            Action::OpenProject { index } => vec![
                ("data-action", "open-project".to_string()),
                ("data-project", index.to_string()),
            ],
            Action::CloseOverlay => vec![("data-action", "close-overlay".to_string())],
        }
    }
}

/// An element about to be emitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            action: None,
        }
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn on_click(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag)
    }

    fn write_open_tag(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        let action_attrs = self.action.map(|a| a.attributes()).unwrap_or_default();
        for (name, value) in self.attrs.iter().chain(action_attrs.iter()) {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        out.push('>');
    }
}

/// A sink for structured markup.
///
/// Calls must be balanced: every [`Markup::open`] is matched by a
/// [`Markup::close`]. Void elements go through [`Markup::void`].
pub trait Markup {
    fn open(&mut self, element: Element);

    fn close(&mut self);

    fn void(&mut self, element: Element);

    fn text(&mut self, text: &str);

    /// Convenience: an element whose only child is text.
    fn text_element(&mut self, element: Element, text: &str) {
        self.open(element);
        self.text(text);
        self.close();
    }
}

/// Writes HTML text directly.
#[derive(Debug, Default)]
pub struct HtmlWriter {
    out: String,
    stack: Vec<&'static str>,
}

impl HtmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        debug_assert!(self.stack.is_empty(), "unclosed elements: {:?}", self.stack);
        self.out
    }
}

impl Markup for HtmlWriter {
    fn open(&mut self, element: Element) {
        element.write_open_tag(&mut self.out);
        self.stack.push(element.tag);
    }

    fn close(&mut self) {
        if let Some(tag) = self.stack.pop() {
            self.out.push_str("</");
            self.out.push_str(tag);
            self.out.push('>');
        }
    }

    fn void(&mut self, element: Element) {
        element.write_open_tag(&mut self.out);
    }

    fn text(&mut self, text: &str) {
        self.out.push_str(&escape_html(text));
    }
}

/// A node in the live preview tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Element {
        element: Element,
        children: Vec<Node>,
        void: bool,
    },
    Text {
        text: String,
    },
}

impl Node {
    /// Feed this node back into any markup sink.
    pub fn replay<M: Markup>(&self, sink: &mut M) {
        match self {
            Node::Element {
                element,
                void: true,
                ..
            } => sink.void(element.clone()),
            Node::Element {
                element, children, ..
            } => {
                sink.open(element.clone());
                for child in children {
                    child.replay(sink);
                }
                sink.close();
            }
            Node::Text { text } => sink.text(text),
        }
    }

    pub fn to_html(&self) -> String {
        let mut writer = HtmlWriter::new();
        self.replay(&mut writer);
        writer.finish()
    }

    pub fn element(&self) -> Option<&Element> {
        match self {
            Node::Element { element, .. } => Some(element),
            Node::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element { children, .. } => children,
            Node::Text { .. } => &[],
        }
    }

    /// Depth-first search for elements matching `predicate`.
    pub fn find_all<'a>(&'a self, predicate: &dyn Fn(&Element) -> bool) -> Vec<&'a Node> {
        let mut found = Vec::new();
        self.collect(predicate, &mut found);
        found
    }

    fn collect<'a>(&'a self, predicate: &dyn Fn(&Element) -> bool, found: &mut Vec<&'a Node>) {
        if let Some(element) = self.element() {
            if predicate(element) {
                found.push(self);
            }
        }
        for child in self.children() {
            child.collect(predicate, found);
        }
    }

    /// Elements whose class list contains `class`.
    pub fn find_by_class<'a>(&'a self, class: &str) -> Vec<&'a Node> {
        self.find_all(&|e| {
            e.get_attr("class")
                .is_some_and(|c| c.split_whitespace().any(|c| c == class))
        })
    }

    /// Concatenated text content.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text { text } => text.clone(),
            Node::Element { children, .. } => children.iter().map(Node::text_content).collect(),
        }
    }
}

/// Builds a [`Node`] tree.
#[derive(Debug, Default)]
pub struct DomBuilder {
    roots: Vec<Node>,
    stack: Vec<(Element, Vec<Node>)>,
}

impl DomBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some((_, children)) => children.push(node),
            None => self.roots.push(node),
        }
    }

    /// Top-level nodes. Any still-open elements are closed first.
    pub fn finish(mut self) -> Vec<Node> {
        while !self.stack.is_empty() {
            self.close();
        }
        self.roots
    }
}

impl Markup for DomBuilder {
    fn open(&mut self, element: Element) {
        self.stack.push((element, Vec::new()));
    }

    fn close(&mut self) {
        if let Some((element, children)) = self.stack.pop() {
            self.push(Node::Element {
                element,
                children,
                void: false,
            });
        }
    }

    fn void(&mut self, element: Element) {
        self.push(Node::Element {
            element,
            children: Vec::new(),
            void: true,
        });
    }

    fn text(&mut self, text: &str) {
        self.push(Node::Text {
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample<M: Markup>(m: &mut M) {
        m.open(Element::new("section").class("section").id("about"));
        m.text_element(Element::new("h2"), "Tom & \"Jerry\"");
        m.void(Element::new("img").attr("src", "a.png").attr("alt", "<a>"));
        m.open(Element::new("button").on_click(Action::OpenProject { index: 2 }));
        m.text("Open");
        m.close();
        m.close();
    }

    #[test]
    fn writes_escaped_html() {
        let mut writer = HtmlWriter::new();
        sample(&mut writer);

        assert_eq!(
            writer.finish(),
            "<section class=\"section\" id=\"about\"><h2>Tom &amp; &quot;Jerry&quot;</h2>\
             <img src=\"a.png\" alt=\"&lt;a&gt;\">\
             <button data-action=\"open-project\" data-project=\"2\">Open</button></section>"
        );
    }

    #[test]
    fn dom_tree_serializes_like_writer() {
        let mut writer = HtmlWriter::new();
        sample(&mut writer);
        let mut builder = DomBuilder::new();
        sample(&mut builder);

        let nodes = builder.finish();

        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].to_html(), writer.finish());
    }

    #[test]
    fn finds_nodes_by_class() {
        let mut builder = DomBuilder::new();
        sample(&mut builder);
        let root = builder.finish().remove(0);

        assert_eq!(root.find_by_class("section").len(), 1);
        assert_eq!(root.text_content(), "Tom & \"Jerry\"Open");
        let buttons = root.find_all(&|e| e.action.is_some());
        assert_eq!(
            buttons[0].element().unwrap().action,
            Some(Action::OpenProject { index: 2 })
        );
    }

    #[test]
    fn builder_closes_dangling_elements() {
        let mut builder = DomBuilder::new();
        builder.open(Element::new("div"));
        builder.text("x");

        let nodes = builder.finish();

        assert_eq!(nodes[0].to_html(), "<div>x</div>");
    }
}
