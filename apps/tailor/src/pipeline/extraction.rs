//! Document text sources.
//!
//! `DocumentSource` is the seam to the text-extraction collaborator. Inline text
//! on the pointer always wins; only pointers without text reach the backend.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::errors::AppError;
use crate::models::document::DocumentPointer;

const PLAIN_TEXT: &str = "plain-text";

#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Returns the extracted text for a pointer.
    async fn fetch_text(&self, pointer: &DocumentPointer) -> Result<String, AppError>;
}

enum Located<'a> {
    Inline(String),
    Key(&'a str),
}

/// Inline text if present, otherwise the key a backend has to load.
fn locate(pointer: &DocumentPointer) -> Result<Located<'_>, AppError> {
    if let Some(text) = pointer.text.as_deref().filter(|t| !t.is_empty()) {
        return Ok(Located::Inline(text.to_string()));
    }
    pointer
        .s3_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .map(Located::Key)
        .ok_or_else(|| {
            AppError::MalformedInput("Document pointer must include either text or s3Key".into())
        })
}

/// Accepts inline text only; object keys are an extraction error.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineDocumentSource;

#[async_trait]
impl DocumentSource for InlineDocumentSource {
    async fn fetch_text(&self, pointer: &DocumentPointer) -> Result<String, AppError> {
        match locate(pointer)? {
            Located::Inline(text) => Ok(text),
            Located::Key(key) => Err(AppError::Extraction(format!(
                "No document store configured to fetch {key}"
            ))),
        }
    }
}

/// Resolves object keys as relative paths under a local directory.
///
/// Only plain-text documents are readable; other types need an OCR backend.
#[derive(Debug, Clone)]
pub struct DirectoryDocumentSource {
    root: PathBuf,
}

impl DirectoryDocumentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, AppError> {
        let relative = Path::new(key);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(AppError::MalformedInput(format!(
                "Document key must be a relative path: {key}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl DocumentSource for DirectoryDocumentSource {
    async fn fetch_text(&self, pointer: &DocumentPointer) -> Result<String, AppError> {
        let key = match locate(pointer)? {
            Located::Inline(text) => return Ok(text),
            Located::Key(key) => key,
        };

        if let Some(kind) = pointer
            .document_type
            .as_deref()
            .filter(|t| !t.eq_ignore_ascii_case(PLAIN_TEXT))
        {
            return Err(AppError::Extraction(format!(
                "Unable to extract text from {key}: document type '{kind}' needs OCR"
            )));
        }

        let path = self.resolve(key)?;
        debug!("reading document {}", path.display());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AppError::Extraction(format!("Unable to read document {key}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(key: &str) -> DocumentPointer {
        DocumentPointer {
            s3_key: Some(key.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_inline_text_wins() {
        let pointer = DocumentPointer {
            s3_key: Some("ignored.txt".into()),
            text: Some("Data Scientist".into()),
            ..Default::default()
        };
        assert_eq!(
            InlineDocumentSource.fetch_text(&pointer).await.unwrap(),
            "Data Scientist"
        );
    }

    #[tokio::test]
    async fn test_pointer_without_text_or_key_is_malformed() {
        let err = InlineDocumentSource
            .fetch_text(&DocumentPointer::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedInput(_)));
    }

    #[tokio::test]
    async fn test_inline_source_rejects_keys() {
        let err = InlineDocumentSource
            .fetch_text(&keyed("tenant/jd.txt"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "EXTRACTION_ERROR");
    }

    #[tokio::test]
    async fn test_directory_source_reads_relative_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("tenant")).unwrap();
        std::fs::write(dir.path().join("tenant/jd.txt"), "Role: SRE").unwrap();

        let source = DirectoryDocumentSource::new(dir.path());
        assert_eq!(
            source.fetch_text(&keyed("tenant/jd.txt")).await.unwrap(),
            "Role: SRE"
        );

        let missing = source.fetch_text(&keyed("tenant/none.txt")).await.unwrap_err();
        assert!(matches!(missing, AppError::Extraction(_)));

        let escape = source.fetch_text(&keyed("../etc/passwd")).await.unwrap_err();
        assert!(matches!(escape, AppError::MalformedInput(_)));
    }

    #[tokio::test]
    async fn test_directory_source_needs_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectoryDocumentSource::new(dir.path());
        let pointer = DocumentPointer {
            document_type: Some("pdf".into()),
            ..keyed("resume.pdf")
        };
        let err = source.fetch_text(&pointer).await.unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }
}
