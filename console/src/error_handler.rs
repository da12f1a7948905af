use std::{io, path::PathBuf};

use rag_gateway::GatewayError;
use rag_render::ParseScoreStyleError;
use thiserror::Error;

/// Startup and I/O failures of the console front end.
///
/// Request failures are not errors here: the controller renders them and
/// reports an `Outcome`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("invalid value for {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("terminal i/o failed")]
    Io(#[from] io::Error),
}

impl From<ParseScoreStyleError> for AppError {
    fn from(err: ParseScoreStyleError) -> Self {
        AppError::InvalidSetting {
            name: "RAG_SCORE_STYLE",
            reason: err.to_string(),
        }
    }
}
