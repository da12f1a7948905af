//! Display capability the controller drives.

use std::fmt;

use rag_render::DisplayFragment;

use crate::channel::ChannelKind;

/// Confirmation text shown before a clear.
pub const CLEAR_PROMPT: &str = "Are you sure you want to clear the entire database?";

/// Backend availability indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusBadge {
    Checking,
    Ready { chunks: Option<u64> },
    Empty,
    Unreachable { reason: String },
}

impl StatusBadge {
    pub fn label(&self) -> String {
        match self {
            StatusBadge::Checking => "Checking…".to_string(),
            StatusBadge::Ready { chunks: Some(n) } => format!("Online (Data Ready, {n} chunks)"),
            StatusBadge::Ready { chunks: None } => "Online (Data Ready)".to_string(),
            StatusBadge::Empty => "Empty Database".to_string(),
            StatusBadge::Unreachable { .. } => "Offline".to_string(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, StatusBadge::Ready { .. })
    }
}

impl fmt::Display for StatusBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Short transient message (toast, alert, status line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything the controller may change on screen.
///
/// Implementations only draw. They never call back into the controller.
pub trait View {
    /// Replaces the answer area.
    fn show_answer(&mut self, answer: DisplayFragment);
    /// Replaces the results area.
    fn show_results(&mut self, results: Vec<DisplayFragment>);
    fn set_status(&mut self, badge: StatusBadge);
    /// `true` disables the ingestion controls.
    fn lock_ingest(&mut self, locked: bool);
    /// Busy indicator and submit control of one channel.
    fn set_busy(&mut self, channel: ChannelKind, busy: bool);
    fn show_ingest_form(&mut self, visible: bool);
    /// Empties the ingestion text and file fields.
    fn reset_ingest_form(&mut self);
    fn notify(&mut self, notice: Notice);
    /// Empties both the answer and results areas.
    fn clear_display(&mut self);
}
