//! The seam between the interaction layer and the network.
//!
//! [`RagBackend`] has one method per backend action. The HTTP implementation
//! is [`BackendService`](crate::services::backend_service::BackendService);
//! tests and alternative hosts can provide their own.

use std::future::Future;

use crate::error_handler::Result;
use crate::structs::{
    ask_response::AskResponse,
    ingest::{IngestRequest, IngestResponse},
    question::Question,
    status_response::StatusResponse,
};

/// Backend actions with normalized results.
///
/// Futures are not required to be `Send`: the interaction layer drives them on
/// a single-threaded event loop.
pub trait RagBackend {
    /// Sends a question; returns the answer and ranked chunks.
    fn ask(&self, question: &Question, top_k: u32) -> impl Future<Output = Result<AskResponse>>;

    /// Submits text and/or a file for chunking and storage.
    fn ingest(&self, request: IngestRequest) -> impl Future<Output = Result<IngestResponse>>;

    /// Reads the ingestion state.
    fn status(&self) -> impl Future<Output = Result<StatusResponse>>;

    /// Deletes all stored data. Callers must have explicit user confirmation.
    fn clear(&self) -> impl Future<Output = Result<()>>;
}
