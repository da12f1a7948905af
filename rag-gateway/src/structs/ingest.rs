use serde::{Deserialize, Serialize};

use crate::error_handler::ValidationError;

/// A file picked for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// MIME type sent with the multipart part, if known.
    pub content_type: Option<String>,
}

impl IngestFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).map(str::to_string);
        Self {
            file_name,
            bytes,
            content_type,
        }
    }
}

/// Best-effort MIME type from a file extension.
fn content_type_for(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some("application/pdf"),
        "txt" | "text" | "log" => Some("text/plain"),
        "md" | "markdown" => Some("text/markdown"),
        "csv" => Some("text/csv"),
        "json" => Some("application/json"),
        "html" | "htm" => Some("text/html"),
        _ => None,
    }
}

/// Validated ingestion submission: at least one of text or file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestRequest {
    text: Option<String>,
    file: Option<IngestFile>,
}

impl IngestRequest {
    /// Builds a request from form values. Blank text counts as absent.
    ///
    /// # Errors
    /// Returns [`ValidationError::EmptyIngest`] when neither text nor file is present.
    pub fn new(text: Option<String>, file: Option<IngestFile>) -> Result<Self, ValidationError> {
        let text = text.filter(|t| !t.trim().is_empty());
        if text.is_none() && file.is_none() {
            return Err(ValidationError::EmptyIngest);
        }
        Ok(Self { text, file })
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn file(&self) -> Option<&IngestFile> {
        self.file.as_ref()
    }

    pub(crate) fn into_parts(self) -> (Option<String>, Option<IngestFile>) {
        (self.text, self.file)
    }
}

/// Payload of a successful `POST /ingest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestResponse {
    pub chunks_added: u64,
}
