//! Parse stage: turns document pointers into canonical records.
//!
//! Flow:
//! 1. fetch text for every pointer through the `DocumentSource`
//! 2. normalize the job inline and each resume on a blocking worker
//! 3. optionally redact PII
//! 4. aggregate skills and build the style profile
//!
//! Resume normalization is CPU-bound and independent per document, so every
//! resume gets its own `spawn_blocking` task; handles are awaited in input
//! order, which keeps the output order equal to the request order.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::extraction::DocumentSource;
use super::redaction::PiiRedactor;
use crate::errors::{decode_record, AppError};
use crate::layout::build_style_profile;
use crate::models::document::{DocumentMetadata, DocumentPointer};
use crate::models::job::JobDescription;
use crate::models::resume::Resume;
use crate::models::style::{StyleMetadata, StyleProfile};
use crate::parsing::normalize::{normalize_job_description, normalize_resume};
use crate::parsing::skills::{extracted_skills, SkillRecord};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOptions {
    #[serde(default)]
    pub enable_pii_redaction: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    pub tenant_id: String,
    pub job_id: String,
    pub job_description: DocumentPointer,
    pub base_resume: DocumentPointer,
    #[serde(default)]
    pub validated_resumes: Vec<DocumentPointer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_guide: Option<DocumentPointer>,
    #[serde(default)]
    pub options: ParseOptions,
}

impl ParseRequest {
    /// Missing identifiers or documents are a malformed-input error.
    pub fn from_value(value: Value) -> Result<Self, AppError> {
        decode_record("parse request", value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleGuide {
    pub profile: StyleProfile,
    /// Object key of the style sample, or `inline`.
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocuments {
    pub job_description: JobDescription,
    pub base_resume: Resume,
    pub validated_resumes: Vec<Resume>,
    pub extracted_skills: Vec<SkillRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_guide: Option<StyleGuide>,
}

pub struct ParseStage {
    source: Arc<dyn DocumentSource>,
    redactor: PiiRedactor,
    redact_by_default: bool,
}

impl ParseStage {
    pub fn new(source: Arc<dyn DocumentSource>, redactor: PiiRedactor) -> Self {
        Self {
            source,
            redactor,
            redact_by_default: false,
        }
    }

    /// Redact every request, not only those that ask for it.
    pub fn with_default_redaction(mut self, enabled: bool) -> Self {
        self.redact_by_default = enabled;
        self
    }

    pub async fn run(&self, request: ParseRequest) -> Result<ParsedDocuments, AppError> {
        info!(
            "Parsing documents for tenant {} job {} ({} validated resumes)",
            request.tenant_id,
            request.job_id,
            request.validated_resumes.len()
        );

        let job_text = self.source.fetch_text(&request.job_description).await?;
        let job_meta: DocumentMetadata = request.job_description.metadata_as()?;
        let mut job_description = normalize_job_description(&job_text, &job_meta);

        let mut resumes = self
            .normalize_resumes(
                std::iter::once(&request.base_resume).chain(&request.validated_resumes),
            )
            .await?;

        if self.redact_by_default || request.options.enable_pii_redaction {
            info!("Redacting PII for job {}", request.job_id);
            job_description = self.redactor.redact_job(job_description).await?;
            let mut redacted = Vec::with_capacity(resumes.len());
            for resume in resumes {
                redacted.push(self.redactor.redact_resume(resume).await?);
            }
            resumes = redacted;
        }

        let mut resumes = resumes.into_iter();
        let base_resume = resumes.next().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!("base resume missing after normalization"))
        })?;
        let validated_resumes: Vec<Resume> = resumes.collect();

        let extracted_skills = extracted_skills(&job_description, &base_resume, &validated_resumes);
        let style_guide = match &request.style_guide {
            Some(pointer) => self.style_guide(pointer).await?,
            None => None,
        };

        info!(
            "Parsed job {}: {} skills extracted, style guide {}",
            request.job_id,
            extracted_skills.len(),
            if style_guide.is_some() { "applied" } else { "absent" }
        );

        Ok(ParsedDocuments {
            job_description,
            base_resume,
            validated_resumes,
            extracted_skills,
            style_guide,
        })
    }

    /// Fetches every resume, then normalizes them concurrently. Output order = input order.
    async fn normalize_resumes<'a, I>(&self, pointers: I) -> Result<Vec<Resume>, AppError>
    where
        I: IntoIterator<Item = &'a DocumentPointer>,
    {
        let mut handles = Vec::new();
        for pointer in pointers {
            let text = self.source.fetch_text(pointer).await?;
            let meta: DocumentMetadata = pointer.metadata_as()?;
            handles.push(tokio::task::spawn_blocking(move || {
                normalize_resume(&text, &meta)
            }));
        }

        let mut resumes = Vec::with_capacity(handles.len());
        for handle in handles {
            let resume = handle.await.map_err(|e| {
                AppError::Internal(anyhow::anyhow!("spawn_blocking failed in resume normalization: {e}"))
            })?;
            resumes.push(resume);
        }
        debug!("normalized {} resumes", resumes.len());
        Ok(resumes)
    }

    /// A metadata-only pointer yields a profile without a sample.
    async fn style_guide(&self, pointer: &DocumentPointer) -> Result<Option<StyleGuide>, AppError> {
        let has_sample = pointer.text.as_deref().is_some_and(|t| !t.is_empty())
            || pointer.s3_key.as_deref().is_some_and(|k| !k.is_empty());
        let sample = if has_sample {
            Some(self.source.fetch_text(pointer).await?)
        } else {
            None
        };
        let metadata: Option<StyleMetadata> = if pointer.metadata.is_empty() {
            None
        } else {
            Some(pointer.metadata_as()?)
        };

        let profile = build_style_profile(sample.as_deref(), metadata.as_ref());
        Ok(profile.map(|profile| StyleGuide {
            profile,
            source: pointer
                .s3_key
                .clone()
                .unwrap_or_else(|| "inline".to_string()),
        }))
    }
}
