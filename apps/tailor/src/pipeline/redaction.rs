//! PII redaction of normalized documents.
//!
//! `PiiDetector` is the seam to an entity-detection collaborator; the default
//! `PatternPiiDetector` uses the validator's email and phone patterns. Detected
//! spans are replaced with `[REDACTED]` in free-text fields only.

use std::ops::Range;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::errors::AppError;
use crate::models::job::JobDescription;
use crate::models::resume::Resume;
use crate::validation::patterns::find_pii;

pub const REDACTION_MARKER: &str = "[REDACTED]";

#[async_trait]
pub trait PiiDetector: Send + Sync {
    /// Byte ranges of PII entities in `text`, in any order.
    async fn detect(&self, text: &str) -> Result<Vec<Range<usize>>, AppError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PatternPiiDetector;

#[async_trait]
impl PiiDetector for PatternPiiDetector {
    async fn detect(&self, text: &str) -> Result<Vec<Range<usize>>, AppError> {
        let spans = find_pii(text);
        for span in &spans {
            debug!("detected {:?} at {:?}", span.kind, span.range);
        }
        Ok(spans.into_iter().map(|span| span.range).collect())
    }
}

#[derive(Clone)]
pub struct PiiRedactor {
    detector: Arc<dyn PiiDetector>,
}

impl Default for PiiRedactor {
    fn default() -> Self {
        Self::new(Arc::new(PatternPiiDetector))
    }
}

impl PiiRedactor {
    pub fn new(detector: Arc<dyn PiiDetector>) -> Self {
        Self { detector }
    }

    pub async fn redact_text(&self, text: &str) -> Result<String, AppError> {
        if text.is_empty() {
            return Ok(String::new());
        }
        let spans = self.detector.detect(text).await?;
        apply_redactions(text, spans)
    }

    async fn redact_all(&self, texts: &mut [String]) -> Result<(), AppError> {
        for text in texts.iter_mut() {
            *text = self.redact_text(text).await?;
        }
        Ok(())
    }

    /// Redacts summary, requirements and responsibilities.
    pub async fn redact_job(&self, mut job: JobDescription) -> Result<JobDescription, AppError> {
        job.summary = self.redact_text(&job.summary).await?;
        self.redact_all(&mut job.requirements).await?;
        self.redact_all(&mut job.responsibilities).await?;
        Ok(job)
    }

    /// Redacts summary, achievements and project descriptions.
    pub async fn redact_resume(&self, mut resume: Resume) -> Result<Resume, AppError> {
        resume.summary = self.redact_text(&resume.summary).await?;
        for role in &mut resume.experience {
            self.redact_all(&mut role.achievements).await?;
        }
        for project in &mut resume.projects {
            project.description = self.redact_text(&project.description).await?;
        }
        Ok(resume)
    }
}

/// Replaces each span with the marker. Overlapping spans merge into one marker;
/// spans outside the text or off a character boundary are an error.
pub fn apply_redactions(text: &str, mut spans: Vec<Range<usize>>) -> Result<String, AppError> {
    spans.sort_by_key(|span| (span.start, span.end));

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        if text.get(span.clone()).is_none() || span.start > span.end {
            return Err(AppError::Redaction(format!(
                "Entity span {}..{} is outside the text",
                span.start, span.end
            )));
        }
        if span.end <= cursor {
            continue;
        }
        if span.start >= cursor {
            out.push_str(&text[cursor..span.start]);
            out.push_str(REDACTION_MARKER);
        }
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    Ok(out)
}
