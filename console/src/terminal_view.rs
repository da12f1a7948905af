//! [`View`] that prints to a terminal (or any writer).
//!
//! Text mode styles answers and passage cards with ANSI colors when enabled.
//! HTML mode prints each fragment's escaped HTML instead. Status and notices
//! are plain lines in both modes.

use std::io::{self, IsTerminal, Write};

use colored::Colorize;
use interaction::{ChannelKind, Notice, NoticeLevel, StatusBadge, View};
use rag_render::{DisplayFragment, Markup, Node, ResultCard};
use tracing::{trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Styled text; `color` toggles ANSI escapes.
    Text { color: bool },
    Html,
}

/// Terminal rendering of the controller's display state.
pub struct TerminalView<W: Write> {
    out: W,
    mode: OutputMode,
    answer: Option<DisplayFragment>,
    results: Vec<DisplayFragment>,
    badge: Option<StatusBadge>,
    ingest_locked: bool,
    ingest_visible: bool,
}

impl TerminalView<io::Stdout> {
    /// Stdout view; colors only when stdout is a terminal.
    pub fn stdout(html: bool) -> Self {
        let mode = if html {
            OutputMode::Html
        } else {
            OutputMode::Text {
                color: io::stdout().is_terminal(),
            }
        };
        Self::new(io::stdout(), mode)
    }
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W, mode: OutputMode) -> Self {
        Self {
            out,
            mode,
            answer: None,
            results: Vec::new(),
            badge: None,
            ingest_locked: false,
            ingest_visible: true,
        }
    }

    pub fn answer(&self) -> Option<&DisplayFragment> {
        self.answer.as_ref()
    }

    pub fn results(&self) -> &[DisplayFragment] {
        &self.results
    }

    pub fn badge(&self) -> Option<&StatusBadge> {
        self.badge.as_ref()
    }

    /// Whether the ingestion controls accept a submission.
    pub fn ingest_enabled(&self) -> bool {
        self.ingest_visible && !self.ingest_locked
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints one line. Write failures are logged, not propagated.
    pub fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!(error = %e, "terminal write failed");
        }
    }

    fn color(&self) -> bool {
        matches!(self.mode, OutputMode::Text { color: true })
    }

    fn print_fragment(&mut self, fragment: &DisplayFragment) {
        let text = match self.mode {
            OutputMode::Html => fragment.to_html(),
            OutputMode::Text { color } => fragment_text(fragment, color),
        };
        self.line(&text);
    }

    fn print_badge(&mut self, badge: &StatusBadge) {
        let label = badge.label();
        let styled = if self.color() {
            match badge {
                StatusBadge::Ready { .. } => label.blue().bold().to_string(),
                StatusBadge::Empty => label.yellow().bold().to_string(),
                StatusBadge::Unreachable { .. } => label.red().bold().to_string(),
                StatusBadge::Checking => label.dimmed().to_string(),
            }
        } else {
            label
        };
        let line = match badge {
            StatusBadge::Unreachable { reason } => format!("[status] {styled}: {reason}"),
            _ => format!("[status] {styled}"),
        };
        self.line(&line);
    }
}

impl<W: Write> View for TerminalView<W> {
    fn show_answer(&mut self, answer: DisplayFragment) {
        self.print_fragment(&answer);
        self.answer = Some(answer);
    }

    fn show_results(&mut self, results: Vec<DisplayFragment>) {
        for fragment in &results {
            self.print_fragment(fragment);
        }
        self.results = results;
    }

    fn set_status(&mut self, badge: StatusBadge) {
        if badge == StatusBadge::Checking {
            trace!("status check started");
        } else {
            self.print_badge(&badge);
        }
        self.badge = Some(badge);
    }

    fn lock_ingest(&mut self, locked: bool) {
        if locked && !self.ingest_locked {
            self.line("Ingestion disabled: the database already holds data. Clear it to ingest again.");
        }
        self.ingest_locked = locked;
    }

    fn set_busy(&mut self, channel: ChannelKind, busy: bool) {
        if !busy {
            return;
        }
        let text = match channel {
            ChannelKind::Ask => "Thinking...",
            ChannelKind::Ingest => "Ingesting...",
            ChannelKind::Clear => "Clearing...",
            ChannelKind::Status => return,
        };
        let text = if self.color() {
            text.dimmed().to_string()
        } else {
            text.to_string()
        };
        self.line(&text);
    }

    fn show_ingest_form(&mut self, visible: bool) {
        if !visible && self.ingest_visible {
            self.line("Ingestion unavailable while the backend is offline.");
        }
        self.ingest_visible = visible;
    }

    fn reset_ingest_form(&mut self) {
        trace!("ingest form reset");
    }

    fn notify(&mut self, notice: Notice) {
        let text = match (notice.level, self.color()) {
            (NoticeLevel::Info, true) => notice.message.green().to_string(),
            (NoticeLevel::Error, true) => notice.message.red().to_string(),
            _ => notice.message,
        };
        self.line(&text);
    }

    fn clear_display(&mut self) {
        self.answer = None;
        self.results.clear();
    }
}

fn fragment_text(fragment: &DisplayFragment, color: bool) -> String {
    match fragment {
        DisplayFragment::Answer(m) if color => {
            format!("{}\n{}", "AI Response".bold().cyan(), markup_ansi(m))
        }
        DisplayFragment::Answer(m) => format!("AI Response\n{}", m.to_plain()),
        DisplayFragment::Placeholder(text) if color => text.dimmed().to_string(),
        DisplayFragment::Error(message) if color => format!("Error: {message}").red().to_string(),
        DisplayFragment::Card(card) => card_text(card, color),
        other => other.to_plain(),
    }
}

fn card_text(card: &ResultCard, color: bool) -> String {
    let header = format!(
        "{} {} · chunk {}",
        card.rank_label(),
        card.source,
        card.chunk_index
    );
    let body = if color {
        markup_ansi(&card.body)
    } else {
        card.body.to_plain()
    };
    let body = body
        .lines()
        .map(|l| format!("    {l}"))
        .collect::<Vec<_>>()
        .join("\n");

    if color {
        format!("{}  {}\n{body}", header.bold(), card.score.green())
    } else {
        format!("{header}  {}\n{body}", card.score)
    }
}

fn markup_ansi(markup: &Markup) -> String {
    let mut out = String::new();
    push_ansi(markup.nodes(), false, false, &mut out);
    out
}

fn push_ansi(nodes: &[Node], strong: bool, highlight: bool, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(t) => {
                let mut s = t.as_str().normal();
                if strong {
                    s = s.bold();
                }
                if highlight {
                    s = s.black().on_yellow();
                }
                out.push_str(&s.to_string());
            }
            Node::LineBreak => out.push('\n'),
            Node::Strong(children) => push_ansi(children, true, highlight, out),
            Node::Highlight(children) => push_ansi(children, strong, true, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_gateway::ScoredChunk;
    use rag_render::{ScoreStyle, render_answer, render_results};

    fn plain() -> TerminalView<Vec<u8>> {
        TerminalView::new(Vec::new(), OutputMode::Text { color: false })
    }

    fn output(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn text_mode_prints_answer_and_cards() {
        let mut view = plain();
        let chunk = ScoredChunk::new("Paris is the capital.\nOf France.", 0.92).with_source("doc1", 0);

        view.show_answer(render_answer(Some("**Paris**")));
        view.show_results(render_results(&[chunk], "capital", ScoreStyle::Percent));

        let out = output(view);
        assert!(out.contains("AI Response\nParis\n"));
        assert!(out.contains("#1 doc1 · chunk 0  92.0%\n    Paris is the capital.\n    Of France.\n"));
    }

    #[test]
    fn html_mode_prints_escaped_fragments() {
        let mut view = TerminalView::new(Vec::new(), OutputMode::Html);
        view.show_answer(render_answer(Some("<b>**x**</b>")));
        let out = output(view);
        assert!(out.contains("&lt;b&gt;<strong>x</strong>&lt;/b&gt;"));
    }

    #[test]
    fn gate_follows_lock_and_visibility() {
        let mut view = plain();
        assert!(view.ingest_enabled());

        view.lock_ingest(true);
        assert!(!view.ingest_enabled());
        view.lock_ingest(false);
        view.show_ingest_form(false);
        assert!(!view.ingest_enabled());
        view.show_ingest_form(true);
        assert!(view.ingest_enabled());
    }

    #[test]
    fn clear_display_drops_state_and_checking_is_silent() {
        let mut view = plain();
        view.show_answer(render_answer(None));
        view.show_results(render_results(&[], "", ScoreStyle::Percent));
        view.clear_display();
        view.set_status(StatusBadge::Checking);
        view.set_status(StatusBadge::Unreachable {
            reason: "connection failed".into(),
        });

        assert!(view.answer().is_none());
        assert!(view.results().is_empty());
        let out = output(view);
        assert!(out.contains("No relevant passages found.\n"));
        assert!(out.contains("No relevant chunks found.\n"));
        assert!(!out.contains("Checking"));
        assert!(out.ends_with("[status] Offline: connection failed\n"));
    }
}
