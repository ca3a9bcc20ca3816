//! Evidence documents handed to the embedding collaborator.
//!
//! One document per job description, per base-resume role, per validated resume
//! and per extracted skill. Ids are `tenant#job#<kind>[#idx]` so re-indexing the
//! same job overwrites rather than duplicates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::parse::ParsedDocuments;
use crate::errors::AppError;

const DEFAULT_OUTCOME: &str = "interview";
const UNKNOWN_TITLE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingDocument {
    pub id: String,
    pub text: String,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddingBatch {
    pub document_count: usize,
    pub documents: Vec<EmbeddingDocument>,
}

impl EmbeddingBatch {
    fn new(documents: Vec<EmbeddingDocument>) -> Self {
        Self {
            document_count: documents.len(),
            documents,
        }
    }
}

struct DocumentIds<'a> {
    tenant_id: &'a str,
    job_id: &'a str,
}

impl DocumentIds<'_> {
    fn id(&self, suffix: &str) -> String {
        format!("{}#{}#{}", self.tenant_id, self.job_id, suffix)
    }

    fn document(&self, suffix: &str, text: String, kind: &str, fields: &[(&str, &str)]) -> EmbeddingDocument {
        let mut metadata = BTreeMap::from([
            ("tenantId".to_string(), self.tenant_id.to_string()),
            ("jobId".to_string(), self.job_id.to_string()),
            ("type".to_string(), kind.to_string()),
        ]);
        metadata.extend(fields.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        EmbeddingDocument {
            id: self.id(suffix),
            text,
            metadata,
        }
    }
}

/// Header line, then the non-empty items one per line; trimmed.
fn chunk_text<S: AsRef<str>>(header: &str, items: &[S]) -> String {
    let body = items
        .iter()
        .map(|item| item.as_ref())
        .filter(|item| !item.is_empty())
        .collect::<Vec<&str>>()
        .join("\n");
    format!("{header}\n{body}").trim().to_string()
}

/// Builds the evidence documents for one parse run.
///
/// Documents whose text comes out empty are dropped; a run with nothing left
/// to embed is a malformed-input error.
pub fn build_documents(
    tenant_id: &str,
    job_id: &str,
    parsed: &ParsedDocuments,
) -> Result<EmbeddingBatch, AppError> {
    let ids = DocumentIds { tenant_id, job_id };
    let job = &parsed.job_description;
    let mut documents = Vec::new();

    let job_items: Vec<&String> = job.requirements.iter().chain(&job.responsibilities).collect();
    let title = if job.meta.title.is_empty() {
        UNKNOWN_TITLE
    } else {
        job.meta.title.as_str()
    };
    documents.push(ids.document(
        "jd",
        chunk_text(&job.summary, &job_items),
        "job-description",
        &[("title", title)],
    ));

    for (idx, role) in parsed.base_resume.experience.iter().enumerate() {
        documents.push(ids.document(
            &format!("base#{idx}"),
            chunk_text(&role.title, &role.achievements),
            "base-experience",
            &[("role", role.title.as_str()), ("company", role.company.as_str())],
        ));
    }

    for (idx, resume) in parsed.validated_resumes.iter().enumerate() {
        let achievements: Vec<&str> = resume.bullets().collect();
        let fallback_key = format!("validated-{idx}");
        documents.push(ids.document(
            &format!("validated#{idx}"),
            chunk_text(&resume.summary, &achievements),
            "validated-resume",
            &[
                ("sourceKey", resume.meta.source_key.as_deref().unwrap_or(fallback_key.as_str())),
                ("outcome", resume.meta.outcome.as_deref().unwrap_or(DEFAULT_OUTCOME)),
            ],
        ));
    }

    for (idx, skill) in parsed.extracted_skills.iter().enumerate() {
        documents.push(ids.document(
            &format!("skill#{idx}"),
            skill.skill.clone(),
            "skill",
            &[("sources", skill.sources.join(",").as_str())],
        ));
    }

    let total = documents.len();
    documents.retain(|doc| !doc.text.is_empty());
    debug!("built {} evidence documents ({} empty dropped)", documents.len(), total - documents.len());

    if documents.is_empty() {
        return Err(AppError::MalformedInput(
            "No documents generated for embedding".into(),
        ));
    }
    Ok(EmbeddingBatch::new(documents))
}
