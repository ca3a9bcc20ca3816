use thiserror::Error;

/// Application-level error type.
///
/// Only malformed input and collaborator failures are errors. Degenerate data
/// (empty bullet lists, empty keyword sets) is scored with explicit fallbacks,
/// and validation findings are reported as issues, never as `AppError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Document extraction error: {0}")]
    Extraction(String),

    #[error("PII redaction error: {0}")]
    Redaction(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, mirrored in CLI error output.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MalformedInput(_) => "MALFORMED_INPUT",
            AppError::Extraction(_) => "EXTRACTION_ERROR",
            AppError::Redaction(_) => "REDACTION_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Decodes a JSON record, mapping schema violations (missing required fields,
/// wrong shapes) to `MalformedInput` so callers fail fast.
pub fn decode_record<T: serde::de::DeserializeOwned>(
    kind: &str,
    value: serde_json::Value,
) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|e| AppError::MalformedInput(format!("{kind} record is invalid: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Contact {
        #[allow(dead_code)]
        name: String,
    }

    #[test]
    fn test_decode_record_missing_field_is_malformed_input() {
        let err = decode_record::<Contact>("contact", json!({})).unwrap_err();
        assert_eq!(err.code(), "MALFORMED_INPUT");
        assert!(err.to_string().contains("contact record is invalid"));
    }

    #[test]
    fn test_decode_record_ok() {
        assert!(decode_record::<Contact>("contact", json!({"name": "x"})).is_ok());
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let io = AppError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.code(), "IO_ERROR");
        assert_eq!(AppError::Extraction("x".into()).code(), "EXTRACTION_ERROR");
        assert_eq!(AppError::Redaction("x".into()).code(), "REDACTION_ERROR");
    }
}
