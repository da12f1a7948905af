//! Gateway config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `RAG_API_BASE_URL` = backend base address (default `http://localhost:8000`)
//! - `RAG_API_PREFIX`   = endpoint path prefix (default `/api`; set to `/` for none)
//! - `RAG_TIMEOUT_SECS` = request timeout in seconds (default 60)

use tracing::debug;

use crate::{
    config::gateway_config::{DEFAULT_API_PREFIX, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, GatewayConfig},
    error_handler::{Result, env_opt, env_opt_u64},
};

/// Constructs the gateway config strictly from environment, with defaults.
///
/// # Errors
///
/// - [`ConfigError::InvalidNumber`](crate::error_handler::ConfigError::InvalidNumber) if `RAG_TIMEOUT_SECS` is not a number
/// - [`ConfigError::InvalidFormat`](crate::error_handler::ConfigError::InvalidFormat) if `RAG_API_BASE_URL` has no http/https scheme
pub fn config_from_env() -> Result<GatewayConfig> {
    let base_url = env_opt("RAG_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let api_prefix = env_opt("RAG_API_PREFIX").unwrap_or_else(|| DEFAULT_API_PREFIX.to_string());
    let timeout_secs = env_opt_u64("RAG_TIMEOUT_SECS")?.or(Some(DEFAULT_TIMEOUT_SECS));

    let cfg = GatewayConfig {
        base_url,
        api_prefix,
        timeout_secs,
    };
    cfg.validate()?;

    debug!(
        base_url = %cfg.base_url,
        api_prefix = %cfg.api_prefix,
        timeout_secs = ?cfg.timeout_secs,
        "gateway config loaded from env"
    );
    Ok(cfg)
}
