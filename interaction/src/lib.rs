//! Headless interaction layer: drives a [`RagBackend`](rag_gateway::RagBackend)
//! and renders into any [`View`].

pub mod channel;
pub mod controller;
pub mod view;

pub use channel::{Channel, ChannelKind, RequestState, RequestToken};
pub use controller::{Confirmation, DEFAULT_TOP_K, InteractionController, Outcome, Settings};
pub use view::{CLEAR_PROMPT, Notice, NoticeLevel, StatusBadge, View};
