use crate::error_handler::{Result, validate_http_endpoint};

/// Default backend address used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default path prefix the backend mounts its endpoints under.
pub const DEFAULT_API_PREFIX: &str = "/api";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Where the backend lives and how long to wait for it.
///
/// # Fields
///
/// - `base_url`: scheme + host (+ port), e.g. `"http://localhost:8000"`.
/// - `api_prefix`: path prefix of the endpoints, e.g. `"/api"` or `""`.
/// - `timeout_secs`: optional request timeout; [`DEFAULT_TIMEOUT_SECS`] when `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_prefix: String,
    pub timeout_secs: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GatewayConfig {
    /// Builds a config for `base_url` with default prefix and timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Checks the base URL scheme.
    ///
    /// # Errors
    /// Returns a config error if `base_url` is not http/https.
    pub fn validate(&self) -> Result<()> {
        validate_http_endpoint("RAG_API_BASE_URL", self.base_url.trim())
    }

    /// Full URL of an endpoint, e.g. `endpoint("chat")` → `http://host/api/chat`.
    ///
    /// Slashes between base, prefix and path are normalized.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        let prefix = self.api_prefix.trim().trim_matches('/');
        let path = path.trim_start_matches('/');
        if prefix.is_empty() {
            format!("{base}/{path}")
        } else {
            format!("{base}/{prefix}/{path}")
        }
    }
}
