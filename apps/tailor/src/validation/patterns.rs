//! PII patterns shared by the validator and the redaction stage.

use std::ops::Range;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

pub static EMAIL_PATTERN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap()
});

/// Optional country code, then 3-3-4 digits with optional spaces, dashes or parentheses.
pub static PHONE_PATTERN: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"\b(?:\+?\d{1,3})?[\s-]?\(?\d{3}\)?[\s-]?\d{3}[\s-]?\d{4}\b").unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PiiKind {
    Email,
    Phone,
}

/// A PII occurrence as a byte range into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PiiSpan {
    pub kind: PiiKind,
    pub range: Range<usize>,
}

pub fn contains_email(text: &str) -> bool {
    EMAIL_PATTERN.is_match(text)
}

pub fn contains_phone(text: &str) -> bool {
    PHONE_PATTERN.is_match(text)
}

/// All email and phone spans, sorted by start offset.
pub fn find_pii(text: &str) -> Vec<PiiSpan> {
    let emails = EMAIL_PATTERN.find_iter(text).map(|m| PiiSpan {
        kind: PiiKind::Email,
        range: m.range(),
    });
    // the optional separator group can pull in the space before the number
    let phones = PHONE_PATTERN.find_iter(text).map(|m| {
        let lead = m.as_str().len() - m.as_str().trim_start().len();
        PiiSpan {
            kind: PiiKind::Phone,
            range: m.start() + lead..m.end(),
        }
    });
    let mut spans: Vec<PiiSpan> = emails.chain(phones).collect();
    spans.sort_by_key(|span| (span.range.start, span.range.end));
    spans
}
