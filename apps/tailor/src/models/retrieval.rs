use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A unit of evidence returned by the retrieval collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalChunk {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub metadata: Value,
}

/// Retrieval output as seen by the evaluator and validator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalContext {
    #[serde(default)]
    pub chunks: Vec<RetrievalChunk>,
    /// Coverage figures computed upstream; passed through to validation metrics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Value>,
}

impl RetrievalContext {
    pub fn empty() -> Self {
        Self::default()
    }
}
