//! HTTP gateway to a retrieval-augmented QA backend.
//!
//! One operation per backend action (ask, ingest, status, clear) behind the
//! [`RagBackend`] trait, one error taxonomy ([`GatewayError`]), and the wire
//! schema of every payload.

pub mod backend;
pub mod config;
pub mod error_handler;
pub mod services;
pub mod structs;
pub mod telemetry;

pub use backend::RagBackend;
pub use config::gateway_config::GatewayConfig;
pub use error_handler::{ErrorKind, GatewayError, ValidationError};
pub use services::backend_service::BackendService;
pub use structs::{
    ask_response::{AskResponse, ChunkMeta, ScoredChunk},
    ingest::{IngestFile, IngestRequest, IngestResponse},
    question::Question,
    status_response::StatusResponse,
};
