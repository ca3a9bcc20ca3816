use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provenance and labelling of a job posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub source: String,
    /// Fields this record does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A competency surfaced for the role by the generation collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competency {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(default)]
    pub evidence_indicators: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Canonical job-description record.
///
/// `requirements`, `responsibilities` and `skills` are required on input; a record
/// without them is rejected rather than scored. Unmodelled top-level fields
/// (benefits, salary, ...) land in `extra` and serialize back out unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescription {
    #[serde(default)]
    pub meta: JobMeta,
    #[serde(default)]
    pub summary: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub skills: Vec<String>,
    /// Extra ATS keywords supplied by upstream keyword extraction.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub competencies: Vec<Competency>,
    #[serde(default)]
    pub raw_text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
