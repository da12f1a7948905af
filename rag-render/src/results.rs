//! Ranked-results rendering and score formatting.

use std::fmt;
use std::str::FromStr;

use rag_gateway::ScoredChunk;
use thiserror::Error;
use tracing::debug;

use crate::fragment::DisplayFragment;
use crate::highlight::Highlighter;
use crate::markup::{Markup, escape_html};

/// Shown when the backend returns no passages.
pub const NO_RESULTS_PLACEHOLDER: &str = "No relevant chunks found.";
/// Source label used when a chunk carries none.
pub const DEFAULT_SOURCE: &str = "doc";
/// Chunk index used when a chunk carries none.
pub const DEFAULT_CHUNK_INDEX: u64 = 0;

/// How relevance scores are printed. Chosen once per session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScoreStyle {
    /// `0.92` as `92.0%`.
    #[default]
    Percent,
    /// `0.92` as `0.920`.
    Fraction,
}

impl ScoreStyle {
    pub fn format(self, score: f64) -> String {
        match self {
            ScoreStyle::Percent => format!("{:.1}%", score * 100.0),
            ScoreStyle::Fraction => format!("{score:.3}"),
        }
    }
}

impl fmt::Display for ScoreStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScoreStyle::Percent => "percent",
            ScoreStyle::Fraction => "fraction",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown score style `{0}` (expected `percent` or `fraction`)")]
pub struct ParseScoreStyleError(pub String);

impl FromStr for ScoreStyle {
    type Err = ParseScoreStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "percent" | "pct" | "%" => Ok(ScoreStyle::Percent),
            "fraction" | "raw" => Ok(ScoreStyle::Fraction),
            _ => Err(ParseScoreStyleError(s.to_string())),
        }
    }
}

/// Display data for one ranked passage.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    /// 1-based position in backend order.
    pub rank: usize,
    pub source: String,
    pub chunk_index: u64,
    /// Passage text with query terms highlighted.
    pub body: Markup,
    /// Score already formatted with the session's [`ScoreStyle`].
    pub score: String,
}

impl ResultCard {
    pub fn rank_label(&self) -> String {
        format!("#{}", self.rank)
    }

    pub fn to_html(&self) -> String {
        format!(
            concat!(
                r#"<div class="chunk-card">"#,
                r#"<div class="chunk-header">"#,
                r#"<span class="chunk-rank">{rank}</span> "#,
                r#"<span class="chunk-source">{source}</span> "#,
                r#"<span class="chunk-index">chunk {index}</span>"#,
                r#"<span class="chunk-score">{score}</span>"#,
                r#"</div>"#,
                r#"<div class="chunk-body">{body}</div>"#,
                r#"</div>"#
            ),
            rank = self.rank_label(),
            source = escape_html(&self.source),
            index = self.chunk_index,
            score = escape_html(&self.score),
            body = self.body.to_html(),
        )
    }
}

/// Cards for `results` in the order given, or a single placeholder when empty.
pub fn render_results(results: &[ScoredChunk], query: &str, style: ScoreStyle) -> Vec<DisplayFragment> {
    if results.is_empty() {
        return vec![DisplayFragment::Placeholder(NO_RESULTS_PLACEHOLDER.to_string())];
    }

    let highlighter = Highlighter::new(query);
    debug!(count = results.len(), %style, "rendering result cards");

    results
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            DisplayFragment::Card(ResultCard {
                rank: i + 1,
                source: chunk
                    .meta
                    .source
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
                chunk_index: chunk.meta.chunk_index.unwrap_or(DEFAULT_CHUNK_INDEX),
                body: highlighter.apply(&chunk.text),
                score: style.format(chunk.score),
            })
        })
        .collect()
}
