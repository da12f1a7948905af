//! Unified error handling for `rag-gateway`.
//!
//! This module exposes a single top-level error type [`GatewayError`] for the whole
//! library and groups domain-specific errors in nested enums ([`ConfigError`],
//! [`ValidationError`]). Small helpers for reading/validating environment variables
//! are provided and return the unified [`Result<T>`] alias.
//!
//! The four request-facing variants form the client's error taxonomy:
//!
//! | Variant | Meaning |
//! |---------|---------|
//! | [`GatewayError::NetworkUnreachable`] | no response was obtained |
//! | [`GatewayError::Backend`] | response received with a non-success status |
//! | [`GatewayError::MalformedResponse`] | success status, body does not match the schema |
//! | [`GatewayError::Validation`] | rejected client-side, nothing was sent |
//!
//! Display messages carry the `[RAG Gateway]` prefix to simplify attribution in logs.
//! Messages meant for people are produced by [`GatewayError::user_message`].

use reqwest::StatusCode;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Generic message used when an error body carries no usable `detail`.
pub const GENERIC_DETAIL: &str = "Error";

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for the `rag-gateway` crate.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Input rejected before any network call was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The HTTP client or a request body could not be constructed.
    #[error("[RAG Gateway] HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    /// No response was obtained (connect failure, timeout, dropped connection).
    #[error("[RAG Gateway] backend unreachable at {url}: {reason}")]
    NetworkUnreachable {
        /// Request URL.
        url: String,
        /// Short transport-level reason.
        reason: String,
    },

    /// The backend answered with a non-successful HTTP status.
    #[error("[RAG Gateway] HTTP {status} from {url}: {detail}")]
    Backend {
        /// HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Backend-supplied `detail`, or [`GENERIC_DETAIL`].
        detail: String,
    },

    /// Success status, but the body is not JSON or does not match the schema.
    #[error("[RAG Gateway] malformed response from {url}: {reason}")]
    MalformedResponse {
        /// Request URL.
        url: String,
        /// Decoder message.
        reason: String,
        /// Raw body text as received.
        body: String,
    },
}

/// Coarse classification of a [`GatewayError`], stable across variants' payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NetworkUnreachable,
    Backend,
    MalformedResponse,
    Validation,
    Config,
}

impl GatewayError {
    /// Returns the taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Config(_) | GatewayError::Client(_) => ErrorKind::Config,
            GatewayError::Validation(_) => ErrorKind::Validation,
            GatewayError::NetworkUnreachable { .. } => ErrorKind::NetworkUnreachable,
            GatewayError::Backend { .. } => ErrorKind::Backend,
            GatewayError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
        }
    }

    /// Human-readable message for display surfaces.
    ///
    /// Backend details are passed through verbatim. Unreachable and malformed
    /// responses get fixed messages that are distinct from each other.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::NetworkUnreachable { reason, .. } => {
                format!("Network error: the backend could not be reached ({reason}).")
            }
            GatewayError::Backend { detail, .. } => detail.clone(),
            GatewayError::MalformedResponse { .. } => {
                "Backend returned an unexpected response (not the expected JSON).".to_string()
            }
            GatewayError::Validation(err) => err.to_string(),
            GatewayError::Config(_) | GatewayError::Client(_) => self.to_string(),
        }
    }

    /// Maps a transport error (no response obtained) to [`GatewayError::NetworkUnreachable`].
    pub(crate) fn unreachable(url: &str, err: &reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.to_string()
        };
        GatewayError::NetworkUnreachable {
            url: url.to_string(),
            reason,
        }
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/flag-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A number failed to parse (like limits, timeouts).
    #[error("[RAG Gateway] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `RAG_TOP_K`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u32`).
        reason: &'static str,
    },

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[RAG Gateway] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `RAG_API_BASE_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },
}

/* ------------------------------------------------------------------------- */
/* Validation errors                                                         */
/* ------------------------------------------------------------------------- */

/// Client-side input errors. Raised before any request leaves the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a question.")]
    EmptyQuestion,

    #[error("Select a file or paste text.")]
    EmptyIngest,
}

/* ------------------------------------------------------------------------- */
/* Env helpers (return unified `Result<T>`)                                  */
/* ------------------------------------------------------------------------- */

/// Reads an optional, non-empty environment variable.
pub fn env_opt(name: &'static str) -> Option<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

/// Parses an optional `u32` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`GatewayError::Config`] with [`ConfigError::InvalidNumber`] if the
/// variable is set but not a valid `u32`.
pub fn env_opt_u32(name: &'static str) -> Result<Option<u32>> {
    match env_opt(name) {
        Some(v) => v.parse::<u32>().map(Some).map_err(|_| {
            GatewayError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u32",
            })
        }),
        None => Ok(None),
    }
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`GatewayError::Config`] with [`ConfigError::InvalidNumber`] if the
/// variable is set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> Result<Option<u64>> {
    match env_opt(name) {
        Some(v) => v.parse::<u64>().map(Some).map_err(|_| {
            GatewayError::from(ConfigError::InvalidNumber {
                var: name,
                reason: "expected u64",
            })
        }),
        None => Ok(None),
    }
}

/* ------------------------------------------------------------------------- */
/* Validation helpers                                                        */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`GatewayError::Config`] with [`ConfigError::InvalidFormat`] when
/// the string does not start with a valid HTTP scheme.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

/* ------------------------------------------------------------------------- */
/* Body helpers                                                              */
/* ------------------------------------------------------------------------- */

/// Short single-line preview of a response body for logs.
pub fn make_snippet(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut snippet: String = flat.chars().take(240).collect();
    if flat.chars().count() > 240 {
        snippet.push('…');
    }
    snippet
}

/// Extracts the human-readable `detail` from an error body.
///
/// `{"detail": "text"}` yields the text. A structured detail (e.g. a list of
/// field errors) is returned as compact JSON. Anything else, including
/// non-JSON bodies, yields [`GENERIC_DETAIL`].
pub fn detail_from_body(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return GENERIC_DETAIL.to_string();
    };
    match value.get("detail") {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(serde_json::Value::Null) | None => GENERIC_DETAIL.to_string(),
        Some(serde_json::Value::String(_)) => GENERIC_DETAIL.to_string(),
        Some(other) => other.to_string(),
    }
}
