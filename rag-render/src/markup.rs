//! Escaped markup tree.
//!
//! Backend text only ever enters a [`Markup`] as [`Node::Text`], and
//! [`Markup::to_html`] escapes every text node. Trusted markup (bold,
//! highlight, line breaks) exists only as nodes, so passage or answer content
//! can never inject tags.

/// One element of rendered content.
///
/// Invariant: `Text` never contains `'\n'`; newlines are `LineBreak` nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    LineBreak,
    Strong(Vec<Node>),
    Highlight(Vec<Node>),
}

/// An ordered list of nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(Vec<Node>);

impl Markup {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Plain text with newlines turned into line breaks.
    pub fn from_text(text: &str) -> Self {
        let mut out = Self::new();
        out.push_text(text);
        out
    }

    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, node: Node) {
        self.0.push(node);
    }

    /// Appends text, splitting on `'\n'`. Empty segments are skipped.
    pub fn push_text(&mut self, text: &str) {
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                self.0.push(Node::LineBreak);
            }
            if !line.is_empty() {
                self.0.push(Node::Text(line.to_string()));
            }
        }
    }

    /// HTML with all text escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_html(&self.0, &mut out);
        out
    }

    /// Text content with line breaks as `'\n'` and no markup.
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        write_plain(&self.0, &mut out);
        out
    }

    /// Text of every outermost highlight, in document order.
    pub fn highlighted(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_highlighted(&self.0, &mut out);
        out
    }
}

fn write_html(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(&escape_html(t)),
            Node::LineBreak => out.push_str("<br>"),
            Node::Strong(children) => {
                out.push_str("<strong>");
                write_html(children, out);
                out.push_str("</strong>");
            }
            Node::Highlight(children) => {
                out.push_str(r#"<span class="highlight">"#);
                write_html(children, out);
                out.push_str("</span>");
            }
        }
    }
}

fn write_plain(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::LineBreak => out.push('\n'),
            Node::Strong(children) | Node::Highlight(children) => write_plain(children, out),
        }
    }
}

fn collect_highlighted(nodes: &[Node], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Highlight(children) => {
                let mut s = String::new();
                write_plain(children, &mut s);
                out.push(s);
            }
            Node::Strong(children) => collect_highlighted(children, out),
            Node::Text(_) | Node::LineBreak => {}
        }
    }
}

/// Escapes text for HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
