//! Answer-area rendering.

use std::sync::LazyLock;

use regex::Regex;

use crate::fragment::DisplayFragment;
use crate::markup::{Markup, Node};

/// Shown when the backend returns no answer.
pub const NO_ANSWER_PLACEHOLDER: &str = "No relevant passages found.";

/// `**bold**` span, non-greedy. Applied per line, so spans never cross a newline.
static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));

/// Renders the answer text, or the placeholder when it is absent or blank.
pub fn render_answer(answer: Option<&str>) -> DisplayFragment {
    match answer {
        Some(text) if !text.trim().is_empty() => DisplayFragment::Answer(answer_markup(text)),
        _ => DisplayFragment::Placeholder(NO_ANSWER_PLACEHOLDER.to_string()),
    }
}

/// Renders a failure message for the answer area.
pub fn render_error(message: &str) -> DisplayFragment {
    DisplayFragment::Error(message.to_string())
}

fn answer_markup(text: &str) -> Markup {
    let mut out = Markup::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push(Node::LineBreak);
        }
        push_line(&mut out, line);
    }
    out
}

fn push_line(out: &mut Markup, line: &str) {
    let mut last = 0;
    for caps in BOLD.captures_iter(line) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_text(&line[last..whole.start()]);
        let mut strong = Markup::new();
        strong.push_text(inner.as_str());
        out.push(Node::Strong(strong.into_nodes()));
        last = whole.end();
    }
    out.push_text(&line[last..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(answer: Option<&str>) -> String {
        render_answer(answer).to_html()
    }

    #[test]
    fn absent_and_blank_are_the_same_placeholder() {
        let none = render_answer(None);
        assert_eq!(none, render_answer(Some("")));
        assert_eq!(none, render_answer(Some("   \n\t")));
        assert_eq!(
            none,
            DisplayFragment::Placeholder(NO_ANSWER_PLACEHOLDER.to_string())
        );
    }

    #[test]
    fn bold_spans_become_strong() {
        let frag = render_answer(Some("**Paris**"));
        let DisplayFragment::Answer(m) = &frag else {
            panic!("expected answer, got {frag:?}");
        };
        assert_eq!(m.nodes(), &[Node::Strong(vec![Node::Text("Paris".into())])]);
    }

    #[test]
    fn bold_is_non_greedy_and_single_line() {
        let frag = render_answer(Some("**a** and **b**\n**not\nbold**"));
        let DisplayFragment::Answer(m) = frag else {
            panic!("expected answer");
        };
        assert_eq!(
            m.to_html(),
            "<strong>a</strong> and <strong>b</strong><br>**not<br>bold**"
        );
    }

    #[test]
    fn answer_text_is_escaped() {
        let out = html(Some("**<img src=x onerror=alert(1)>** & more"));
        assert!(out.contains("<strong>&lt;img src=x onerror=alert(1)&gt;</strong> &amp; more"));
        assert!(!out.contains("<img"));
    }

    #[test]
    fn error_is_escaped_with_prefix() {
        let out = render_error("No documents <yet>").to_html();
        assert!(out.contains("Error: No documents &lt;yet&gt;"));
    }
}
