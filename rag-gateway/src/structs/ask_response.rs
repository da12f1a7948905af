use serde::{Deserialize, Serialize};

/// Payload of a successful `POST /chat`.
///
/// `answer` may be absent or blank, which means the backend found nothing
/// relevant. `results` keeps the backend's ranking (descending relevance) and
/// is never re-sorted by the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub answer: Option<String>,

    #[serde(default)]
    pub results: Vec<ScoredChunk>,
}

/// One retrieved passage with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// Passage text as stored by the backend (untrusted).
    #[serde(default)]
    pub text: String,

    /// Relevance in `0.0..=1.0`.
    pub score: f64,

    #[serde(default)]
    pub meta: ChunkMeta,
}

/// Provenance of a chunk. Both fields are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub chunk_index: Option<u64>,
}

impl ScoredChunk {
    pub fn new(text: impl Into<String>, score: f64) -> Self {
        Self {
            text: text.into(),
            score,
            meta: ChunkMeta::default(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>, chunk_index: u64) -> Self {
        self.meta = ChunkMeta {
            source: Some(source.into()),
            chunk_index: Some(chunk_index),
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_payload_in_order() {
        let body = r#"{
            "answer": "**Paris**",
            "results": [
                {"text": "Paris is the capital.", "score": 0.92, "meta": {"source": "doc1", "chunk_index": 0}},
                {"text": "Lyon is a city.", "score": 0.41, "meta": {"source": "doc2", "chunk_index": 3}}
            ]
        }"#;
        let resp: AskResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.answer.as_deref(), Some("**Paris**"));
        assert_eq!(resp.results.len(), 2);
        assert_eq!(resp.results[1].meta.chunk_index, Some(3));
    }

    #[test]
    fn missing_optional_fields_default() {
        let resp: AskResponse = serde_json::from_str(r#"{"results":[{"score":0.5}]}"#).unwrap();
        assert_eq!(resp.answer, None);
        assert_eq!(resp.results[0].text, "");
        assert_eq!(resp.results[0].meta, ChunkMeta::default());

        let empty: AskResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.results.is_empty());
    }

    #[test]
    fn null_meta_fields_are_none() {
        let chunk: ScoredChunk =
            serde_json::from_str(r#"{"text":"t","score":0.1,"meta":{"source":null}}"#).unwrap();
        assert_eq!(chunk.meta.source, None);
    }

    #[test]
    fn score_is_required() {
        assert!(serde_json::from_str::<ScoredChunk>(r#"{"text":"t"}"#).is_err());
    }
}
