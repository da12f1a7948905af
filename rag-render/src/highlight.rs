//! Query-term emphasis inside retrieved passages.

use regex::{Regex, RegexBuilder};
use tracing::{trace, warn};

use crate::markup::{Markup, Node};

/// Terms with this many characters or fewer are never highlighted.
pub const MIN_TERM_CHARS: usize = 2;

/// Compiled query terms, reusable across every passage of one result set.
#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    terms: Vec<Regex>,
}

impl Highlighter {
    /// Compiles each whitespace-separated term longer than [`MIN_TERM_CHARS`]
    /// as a literal, case-insensitive pattern. Query order is preserved.
    pub fn new(query: &str) -> Self {
        let mut terms = Vec::new();
        for term in query.split_whitespace() {
            if term.chars().count() <= MIN_TERM_CHARS {
                continue;
            }
            match RegexBuilder::new(&regex::escape(term))
                .case_insensitive(true)
                .build()
            {
                Ok(re) => terms.push(re),
                Err(e) => warn!(term, error = %e, "highlight term skipped"),
            }
        }
        trace!(count = terms.len(), "highlighter compiled");
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Passage as markup with every term occurrence wrapped.
    ///
    /// Terms apply one after another. A later term that matches inside an
    /// earlier highlight wraps again, producing nested highlights.
    pub fn apply(&self, text: &str) -> Markup {
        let mut nodes = Markup::from_text(text).into_nodes();
        for re in &self.terms {
            nodes = wrap_nodes(nodes, re);
        }
        Markup::from_nodes(nodes)
    }
}

/// One-shot form of [`Highlighter::apply`].
pub fn highlight(text: &str, query: &str) -> Markup {
    Highlighter::new(query).apply(text)
}

fn wrap_nodes(nodes: Vec<Node>, re: &Regex) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Text(text) => wrap_text(&text, re, &mut out),
            Node::Highlight(children) => out.push(Node::Highlight(wrap_nodes(children, re))),
            Node::Strong(children) => out.push(Node::Strong(wrap_nodes(children, re))),
            Node::LineBreak => out.push(Node::LineBreak),
        }
    }
    out
}

fn wrap_text(text: &str, re: &Regex, out: &mut Vec<Node>) {
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            out.push(Node::Text(text[last..m.start()].to_string()));
        }
        out.push(Node::Highlight(vec![Node::Text(m.as_str().to_string())]));
        last = m.end();
    }
    if last < text.len() {
        out.push(Node::Text(text[last..].to_string()));
    }
}
