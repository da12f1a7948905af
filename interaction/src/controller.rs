//! Request lifecycle orchestration.
//!
//! [`InteractionController`] owns one [`Channel`] per operation and the
//! [`View`]. Each public method runs one user action to completion and
//! reports what happened as an [`Outcome`].
//!
//! Concurrency model: the controller is driven from a single thread. Methods
//! take `&self` so several actions can be in flight at once (an ask while a
//! status poll runs). Interior state sits in `RefCell`s that are only
//! borrowed between suspension points, never across an `.await`.

use std::cell::{RefCell, RefMut};

use rag_gateway::{
    ErrorKind, GatewayError, IngestFile, IngestRequest, Question, RagBackend,
};
use rag_render::{ScoreStyle, render_answer, render_error, render_results};
use tracing::{debug, info, warn};

use crate::channel::{Channel, ChannelKind, RequestState};
use crate::view::{Notice, StatusBadge, View};

/// `top_k` sent with each ask unless configured otherwise.
pub const DEFAULT_TOP_K: u32 = 5;

/// Per-session rendering and request options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub top_k: u32,
    pub score_style: ScoreStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            score_style: ScoreStyle::default(),
        }
    }
}

/// User answer to the clear prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Granted,
    Declined,
}

/// Result of one controller action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The response was rendered.
    Applied,
    /// The request failed; the failure was rendered.
    Failed(ErrorKind),
    /// Input was invalid; nothing was sent.
    Rejected,
    /// The channel was busy; nothing was sent.
    Suppressed,
    /// A response arrived after being superseded; it was discarded.
    Stale,
    /// The user declined; nothing was sent.
    Cancelled,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

struct Channels {
    ask: Channel,
    ingest: Channel,
    clear: Channel,
    status: Channel,
}

impl Channels {
    fn new() -> Self {
        Self {
            ask: Channel::new(ChannelKind::Ask),
            ingest: Channel::new(ChannelKind::Ingest),
            clear: Channel::new(ChannelKind::Clear),
            status: Channel::new(ChannelKind::Status),
        }
    }

    fn get_mut(&mut self, kind: ChannelKind) -> &mut Channel {
        match kind {
            ChannelKind::Ask => &mut self.ask,
            ChannelKind::Ingest => &mut self.ingest,
            ChannelKind::Clear => &mut self.clear,
            ChannelKind::Status => &mut self.status,
        }
    }
}

/// State machine behind every user action.
pub struct InteractionController<B, V> {
    backend: B,
    view: RefCell<V>,
    channels: RefCell<Channels>,
    settings: Settings,
}

impl<B: RagBackend, V: View> InteractionController<B, V> {
    pub fn new(backend: B, view: V, settings: Settings) -> Self {
        Self {
            backend,
            view: RefCell::new(view),
            channels: RefCell::new(Channels::new()),
            settings,
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self, kind: ChannelKind) -> RequestState {
        self.channels.borrow_mut().get_mut(kind).state()
    }

    /// Runs `f` against the view. Must not be called from inside a view method.
    pub fn with_view<R>(&self, f: impl FnOnce(&mut V) -> R) -> R {
        f(&mut *self.view.borrow_mut())
    }

    fn view(&self) -> RefMut<'_, V> {
        self.view.borrow_mut()
    }

    fn channel(&self, kind: ChannelKind) -> RefMut<'_, Channel> {
        RefMut::map(self.channels.borrow_mut(), |c| c.get_mut(kind))
    }

    /// Asks a question and renders the answer and ranked passages.
    ///
    /// The previous answer and results are cleared as soon as the request
    /// starts. On failure the answer area shows the error and the results
    /// area stays empty.
    pub async fn ask(&self, raw: &str) -> Outcome {
        let question = match Question::parse(raw) {
            Ok(q) => q,
            Err(e) => {
                self.view().notify(Notice::error(e.to_string()));
                return Outcome::Rejected;
            }
        };

        let Some(token) = self.channel(ChannelKind::Ask).begin() else {
            debug!("ask suppressed: request already pending");
            return Outcome::Suppressed;
        };

        {
            let mut view = self.view();
            view.clear_display();
            view.set_busy(ChannelKind::Ask, true);
        }

        let top_k = self.settings.top_k;
        debug!(token = token.get(), top_k, "ask started");
        let result = self.backend.ask(&question, top_k).await;

        if !self.channel(ChannelKind::Ask).settle(token, result.is_ok()) {
            debug!(token = token.get(), "stale ask response discarded");
            return Outcome::Stale;
        }

        let mut view = self.view();
        view.set_busy(ChannelKind::Ask, false);
        match result {
            Ok(resp) => {
                info!(results = resp.results.len(), "ask completed");
                view.show_answer(render_answer(resp.answer.as_deref()));
                view.show_results(render_results(
                    &resp.results,
                    question.as_str(),
                    self.settings.score_style,
                ));
                Outcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "ask failed");
                view.show_answer(render_error(&e.user_message()));
                view.show_results(Vec::new());
                Outcome::Failed(e.kind())
            }
        }
    }

    /// Submits text and/or a file, then refreshes the status gate.
    pub async fn ingest(&self, text: Option<String>, file: Option<IngestFile>) -> Outcome {
        let request = match IngestRequest::new(text, file) {
            Ok(r) => r,
            Err(e) => {
                self.view().notify(Notice::error(e.to_string()));
                return Outcome::Rejected;
            }
        };

        let Some(token) = self.channel(ChannelKind::Ingest).begin() else {
            debug!("ingest suppressed: request already pending");
            return Outcome::Suppressed;
        };

        self.view().set_busy(ChannelKind::Ingest, true);
        debug!(
            token = token.get(),
            has_text = request.text().is_some(),
            file = request.file().map(|f| f.file_name.as_str()),
            "ingest started"
        );
        let result = self.backend.ingest(request).await;

        if !self.channel(ChannelKind::Ingest).settle(token, result.is_ok()) {
            debug!(token = token.get(), "stale ingest response discarded");
            return Outcome::Stale;
        }

        match result {
            Ok(resp) => {
                info!(chunks_added = resp.chunks_added, "ingest completed");
                {
                    let mut view = self.view();
                    view.set_busy(ChannelKind::Ingest, false);
                    view.reset_ingest_form();
                    view.notify(Notice::info(format!(
                        "Ingested {} chunks.",
                        resp.chunks_added
                    )));
                }
                self.refresh_status().await;
                Outcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "ingest failed");
                let mut view = self.view();
                view.set_busy(ChannelKind::Ingest, false);
                view.notify(Notice::error(e.user_message()));
                Outcome::Failed(e.kind())
            }
        }
    }

    /// Polls the backend and updates the badge and ingestion gate.
    ///
    /// A newer poll supersedes an older one still in flight. A failed poll
    /// shows the backend as unreachable, never as ready or empty.
    pub async fn refresh_status(&self) -> Outcome {
        let token = self.channel(ChannelKind::Status).begin_replacing();
        self.view().set_status(StatusBadge::Checking);

        let result = self.backend.status().await;

        if !self.channel(ChannelKind::Status).settle(token, result.is_ok()) {
            debug!(token = token.get(), "superseded status response discarded");
            return Outcome::Stale;
        }

        let mut view = self.view();
        match result {
            Ok(status) if status.ingested => {
                debug!(chunks = status.chunks, "backend ready");
                view.set_status(StatusBadge::Ready {
                    chunks: status.chunks,
                });
                view.lock_ingest(true);
                view.show_ingest_form(true);
                Outcome::Applied
            }
            Ok(_) => {
                debug!("backend empty");
                view.set_status(StatusBadge::Empty);
                view.lock_ingest(false);
                view.show_ingest_form(true);
                Outcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "status check failed");
                view.set_status(StatusBadge::Unreachable {
                    reason: e.user_message(),
                });
                view.show_ingest_form(false);
                Outcome::Failed(e.kind())
            }
        }
    }

    /// Deletes all backend data after confirmation.
    ///
    /// Any pending ask is abandoned so its answer is never displayed.
    pub async fn clear(&self, confirmation: Confirmation) -> Outcome {
        if confirmation == Confirmation::Declined {
            debug!("clear declined");
            return Outcome::Cancelled;
        }

        let Some(token) = self.channel(ChannelKind::Clear).begin() else {
            debug!("clear suppressed: request already pending");
            return Outcome::Suppressed;
        };

        self.abandon_ask();
        self.view().set_busy(ChannelKind::Clear, true);
        let result = self.backend.clear().await;

        if !self.channel(ChannelKind::Clear).settle(token, result.is_ok()) {
            return Outcome::Stale;
        }

        match result {
            Ok(()) => {
                info!("database cleared");
                self.abandon_ask();
                {
                    let mut view = self.view();
                    view.set_busy(ChannelKind::Clear, false);
                    view.clear_display();
                    view.notify(Notice::info("Database cleared."));
                }
                self.refresh_status().await;
                Outcome::Applied
            }
            Err(e) => {
                warn!(error = %e, "clear failed");
                let mut view = self.view();
                view.set_busy(ChannelKind::Clear, false);
                view.notify(Notice::error(clear_failure_message(&e)));
                Outcome::Failed(e.kind())
            }
        }
    }

    fn abandon_ask(&self) {
        if self.channel(ChannelKind::Ask).invalidate() {
            debug!("pending ask invalidated by clear");
            self.view().set_busy(ChannelKind::Ask, false);
        }
    }
}

fn clear_failure_message(err: &GatewayError) -> String {
    format!("Error clearing DB: {}", err.user_message())
}
