//! Display fragments produced by the renderers.

use crate::markup::{Markup, escape_html};
use crate::results::ResultCard;

/// One renderable unit of the answer or results area.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayFragment {
    /// Rendered answer text.
    Answer(Markup),
    /// Fixed text shown when there is nothing to display.
    Placeholder(String),
    /// Failure message for the answer area.
    Error(String),
    /// One ranked passage.
    Card(ResultCard),
}

impl DisplayFragment {
    pub fn to_html(&self) -> String {
        match self {
            DisplayFragment::Answer(m) => format!(
                r#"<div class="answer-box"><div class="answer-label">AI Response</div><div class="answer-body">{}</div></div>"#,
                m.to_html()
            ),
            DisplayFragment::Placeholder(text) => {
                format!(r#"<div class="placeholder">{}</div>"#, escape_html(text))
            }
            DisplayFragment::Error(message) => {
                format!(r#"<div class="error">Error: {}</div>"#, escape_html(message))
            }
            DisplayFragment::Card(card) => card.to_html(),
        }
    }

    /// Plain text with no markup.
    pub fn to_plain(&self) -> String {
        match self {
            DisplayFragment::Answer(m) => m.to_plain(),
            DisplayFragment::Placeholder(text) => text.clone(),
            DisplayFragment::Error(message) => format!("Error: {message}"),
            DisplayFragment::Card(card) => format!(
                "{} {} (chunk {}) {}\n{}",
                card.rank_label(),
                card.source,
                card.chunk_index,
                card.score,
                card.body.to_plain()
            ),
        }
    }
}

/// Concatenated HTML of a fragment sequence.
pub fn fragments_to_html(fragments: &[DisplayFragment]) -> String {
    fragments.iter().map(DisplayFragment::to_html).collect()
}
