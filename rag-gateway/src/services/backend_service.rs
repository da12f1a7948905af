//! HTTP client for the QA backend.
//!
//! This module implements a thin client for the backend API:
//! - `POST   {base}{prefix}/chat`  : ask (multipart: `question`, `top_k`)
//! - `POST   {base}{prefix}/ingest`: ingest (multipart: `text` and/or `file`)
//! - `DELETE {base}{prefix}/ingest`: clear stored data
//! - `GET    {base}{prefix}/status`: ingestion status
//!
//! Every call goes through the same normalization:
//! no response → [`GatewayError::NetworkUnreachable`],
//! non-2xx → [`GatewayError::Backend`] with the body's `detail`,
//! 2xx with an undecodable body → [`GatewayError::MalformedResponse`].
//!
//! # Examples
//!
//! ```no_run
//! use rag_gateway::config::gateway_config::GatewayConfig;
//! use rag_gateway::services::backend_service::BackendService;
//! use rag_gateway::backend::RagBackend;
//! use rag_gateway::structs::question::Question;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let svc = BackendService::new(GatewayConfig::new("http://localhost:8000"))?;
//! let status = svc.status().await?;
//! if status.ingested {
//!     let resp = svc.ask(&Question::parse("Which courses are listed?")?, 5).await?;
//!     println!("{:?}", resp.answer);
//! }
//! # Ok(()) }
//! ```

use std::time::{Duration, Instant};

use reqwest::{
    Method, RequestBuilder, StatusCode,
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::{
    backend::RagBackend,
    config::gateway_config::{DEFAULT_TIMEOUT_SECS, GatewayConfig},
    error_handler::{GatewayError, Result, detail_from_body, make_snippet},
    structs::{
        ask_response::AskResponse,
        ingest::{IngestRequest, IngestResponse},
        question::Question,
        status_response::StatusResponse,
    },
};

/// Thin client for the QA backend.
///
/// Reuses one `reqwest::Client` with the configured timeout for all calls.
#[derive(Debug)]
pub struct BackendService {
    client: reqwest::Client,
    cfg: GatewayConfig,
    url_chat: String,
    url_ingest: String,
    url_status: String,
}

impl BackendService {
    /// Creates a new [`BackendService`] from the given config.
    ///
    /// # Errors
    /// - [`GatewayError::Config`] if `cfg.base_url` is not http/https
    /// - [`GatewayError::Client`] if the HTTP client cannot be built
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        cfg.validate()?;

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GatewayError::Client)?;

        let url_chat = cfg.endpoint("chat");
        let url_ingest = cfg.endpoint("ingest");
        let url_status = cfg.endpoint("status");

        info!(
            base_url = %cfg.base_url,
            api_prefix = %cfg.api_prefix,
            timeout_secs = timeout.as_secs(),
            "BackendService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_chat,
            url_ingest,
            url_status,
        })
    }

    /// The config this service was built from.
    pub fn config(&self) -> &GatewayConfig {
        &self.cfg
    }

    /// Sends a request and reads the whole body.
    ///
    /// Any failure before the body is fully read means no usable response was
    /// obtained and maps to [`GatewayError::NetworkUnreachable`].
    async fn execute(&self, method: Method, url: &str, req: RequestBuilder) -> Result<(StatusCode, String)> {
        let started = Instant::now();
        debug!("{} {}", method, url);

        let resp = req.send().await.map_err(|e| {
            warn!(%url, error = %e, latency_ms = started.elapsed().as_millis() as u64, "request failed without response");
            GatewayError::unreachable(url, &e)
        })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            warn!(%url, %status, error = %e, "response body could not be read");
            GatewayError::unreachable(url, &e)
        })?;

        debug!(
            %url,
            %status,
            bytes = body.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "{} {} completed",
            method,
            url
        );
        Ok((status, body))
    }

    /// Sends a request and decodes a JSON body of type `T`.
    async fn execute_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        req: RequestBuilder,
    ) -> Result<T> {
        let (status, body) = self.execute(method, url, req).await?;
        ensure_success(url, status, &body)?;
        decode_body(url, &body)
    }
}

impl RagBackend for BackendService {
    #[instrument(skip_all, fields(top_k = top_k))]
    async fn ask(&self, question: &Question, top_k: u32) -> Result<AskResponse> {
        let form = Form::new()
            .text("question", question.as_str().to_string())
            .text("top_k", top_k.to_string());

        let req = self.client.post(&self.url_chat).multipart(form);
        let resp: AskResponse = self.execute_json(Method::POST, &self.url_chat, req).await?;

        info!(results = resp.results.len(), has_answer = resp.answer.is_some(), "ask completed");
        Ok(resp)
    }

    #[instrument(skip_all, fields(has_text = request.text().is_some(), has_file = request.file().is_some()))]
    async fn ingest(&self, request: IngestRequest) -> Result<IngestResponse> {
        let (text, file) = request.into_parts();

        let mut form = Form::new();
        if let Some(text) = text {
            form = form.text("text", text);
        }
        if let Some(file) = file {
            let mut part = Part::bytes(file.bytes).file_name(file.file_name);
            if let Some(ct) = file.content_type.as_deref() {
                part = part.mime_str(ct).map_err(GatewayError::Client)?;
            }
            form = form.part("file", part);
        }

        let req = self.client.post(&self.url_ingest).multipart(form);
        let resp: IngestResponse = self.execute_json(Method::POST, &self.url_ingest, req).await?;

        info!(chunks_added = resp.chunks_added, "ingest completed");
        Ok(resp)
    }

    #[instrument(skip_all)]
    async fn status(&self) -> Result<StatusResponse> {
        let req = self.client.get(&self.url_status);
        let resp: StatusResponse = self.execute_json(Method::GET, &self.url_status, req).await?;

        debug!(ingested = resp.ingested, chunks = ?resp.chunks, "status completed");
        Ok(resp)
    }

    #[instrument(skip_all)]
    async fn clear(&self) -> Result<()> {
        let req = self.client.delete(&self.url_ingest);
        let (status, body) = self.execute(Method::DELETE, &self.url_ingest, req).await?;
        ensure_success(&self.url_ingest, status, &body)?;

        info!("clear completed");
        Ok(())
    }
}

/// Maps a non-2xx status to [`GatewayError::Backend`].
fn ensure_success(url: &str, status: StatusCode, body: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    let detail = detail_from_body(body);
    warn!(
        %url,
        %status,
        %detail,
        snippet = %make_snippet(body),
        "backend returned non-success status"
    );
    Err(GatewayError::Backend {
        status,
        url: url.to_string(),
        detail,
    })
}

/// Decodes a success body, keeping the raw text when it does not fit the schema.
fn decode_body<T: DeserializeOwned>(url: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        warn!(
            %url,
            error = %e,
            snippet = %make_snippet(body),
            "success response did not match the expected schema"
        );
        GatewayError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
            body: body.to_string(),
        }
    })
}
