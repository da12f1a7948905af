use serde::{Deserialize, Serialize};

/// Payload of `GET /status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub ingested: bool,

    #[serde(default)]
    pub chunks: Option<u64>,
}
