//! Resume Validator: schema, safety, PII and banned-claim rules over generated output.
//!
//! Every rule runs independently and all issues are collected. The resume is
//! inspected as raw JSON so that malformed generator output is reported rather
//! than rejected at decode time.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::patterns::{contains_email, contains_phone};
use crate::models::generation::{CoverLetter, GenerationOutput};
use crate::models::retrieval::RetrievalContext;

const REQUIRED_SECTIONS: [&str; 3] = ["summary", "experience", "skills"];
const MAX_BULLET_CHARS: usize = 500;
const MAX_COVER_LETTER_CHARS: usize = 4000;
const ISSUE_EXCERPT_CHARS: usize = 50;
const ALLOWED_TONES: [&str; 4] = ["professional", "enthusiastic", "formal", "friendly"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Passed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationMetrics {
    pub bullet_count: usize,
    pub skills_count: usize,
    /// Retrieval coverage figures, passed through unchanged (`{}` when absent).
    pub jd_coverage: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub status: ValidationStatus,
    pub issues: Vec<ValidationIssue>,
    pub metrics: ValidationMetrics,
}

/// Validates generation output against a fixed rule set and the configured
/// banned claims.
#[derive(Debug, Clone, Default)]
pub struct ResumeValidator {
    banned_claims: BTreeSet<String>,
}

impl ResumeValidator {
    pub fn new(banned_claims: BTreeSet<String>) -> Self {
        Self { banned_claims }
    }

    /// Runs every rule. `Passed` iff no issue was raised.
    pub fn validate(
        &self,
        generation: &GenerationOutput,
        retrieval: &RetrievalContext,
    ) -> ValidationReport {
        let resume = &generation.tailored_resume;

        let mut issues = self.validate_resume(resume);
        issues.extend(self.validate_change_log(&generation.change_log));
        if let Some(cover_letter) = &generation.cover_letter {
            issues.extend(self.validate_cover_letter(cover_letter));
        }
        issues.extend(self.detect_banned_claims(resume));

        let status = if issues.is_empty() {
            ValidationStatus::Passed
        } else {
            ValidationStatus::Failed
        };
        info!("validation {:?} with {} issue(s)", status, issues.len());

        ValidationReport {
            status,
            issues,
            metrics: self.compute_metrics(resume, retrieval),
        }
    }

    /// Structural and PII rules over the tailored resume.
    pub fn validate_resume(&self, resume: &Value) -> Vec<ValidationIssue> {
        let Some(body) = resume.as_object().filter(|o| !o.is_empty()) else {
            return vec![ValidationIssue::new(
                "EMPTY_RESUME",
                "Tailored resume payload missing or invalid",
            )];
        };

        let mut issues = Vec::new();

        for section in REQUIRED_SECTIONS {
            if !body.get(section).is_some_and(is_truthy) {
                issues.push(ValidationIssue::new(
                    "MISSING_SECTION",
                    format!("Required section '{section}' is missing"),
                ));
            }
        }

        for (idx, role) in array_field(body, "experience").iter().enumerate() {
            let achievements = role.get("achievements");
            if !achievements.is_some_and(is_truthy) {
                issues.push(ValidationIssue::new(
                    "EMPTY_ACHIEVEMENTS",
                    format!("Experience item {idx} missing achievements"),
                ));
            }
            let bullets = achievements.and_then(Value::as_array).into_iter().flatten();
            for bullet in bullets.filter_map(Value::as_str) {
                issues.extend(check_bullet(bullet));
            }
        }

        issues.extend(check_skills(body));

        let serialized = resume.to_string();
        if contains_email(&serialized) {
            issues.push(ValidationIssue::new(
                "PII_EMAIL",
                "Email detected in tailored resume",
            ));
        }
        if contains_phone(&serialized) {
            issues.push(ValidationIssue::new(
                "PII_PHONE",
                "Phone number detected in tailored resume",
            ));
        }

        issues
    }

    /// Each entry needs `type` and `detail` keys and a non-null `rationale`.
    pub fn validate_change_log(&self, change_log: &[Value]) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for (idx, entry) in change_log.iter().enumerate() {
            let has_key = |key: &str| entry.as_object().is_some_and(|o| o.contains_key(key));
            if !has_key("type") || !has_key("detail") {
                issues.push(ValidationIssue::new(
                    "CHANGE_LOG_FORMAT",
                    format!("Change log entry {idx} missing type/detail"),
                ));
            }
            if entry.get("rationale").map_or(true, Value::is_null) {
                issues.push(ValidationIssue::new(
                    "CHANGE_LOG_RATIONALE",
                    format!("Change log entry {idx} missing rationale"),
                ));
            }
        }
        issues
    }

    pub fn validate_cover_letter(&self, cover_letter: &CoverLetter) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if cover_letter.body.chars().count() > MAX_COVER_LETTER_CHARS {
            issues.push(ValidationIssue::new(
                "COVER_LENGTH",
                format!("Cover letter exceeds {MAX_COVER_LETTER_CHARS} characters"),
            ));
        }
        if let Some(tone) = cover_letter.tone.as_deref().filter(|t| !t.is_empty()) {
            if !ALLOWED_TONES.contains(&tone) {
                issues.push(ValidationIssue::new(
                    "COVER_TONE",
                    format!("Unsupported tone '{tone}'"),
                ));
            }
        }
        issues
    }

    /// One issue per configured claim found, case-insensitively, in the serialized resume.
    pub fn detect_banned_claims(&self, resume: &Value) -> Vec<ValidationIssue> {
        if self.banned_claims.is_empty() {
            return Vec::new();
        }
        let text = resume.to_string().to_lowercase();
        self.banned_claims
            .iter()
            .filter(|claim| text.contains(&claim.to_lowercase()))
            .map(|claim| {
                debug!("banned claim present: {claim}");
                ValidationIssue::new("BANNED_CLAIM", format!("Banned keyword present: {claim}"))
            })
            .collect()
    }

    pub fn compute_metrics(&self, resume: &Value, retrieval: &RetrievalContext) -> ValidationMetrics {
        let empty = Map::new();
        let body = resume.as_object().unwrap_or(&empty);
        let bullet_count: usize = array_field(body, "experience")
            .iter()
            .filter_map(|role| role.get("achievements").and_then(Value::as_array))
            .map(Vec::len)
            .sum();

        ValidationMetrics {
            bullet_count,
            skills_count: array_field(body, "skills").len(),
            jd_coverage: retrieval
                .coverage
                .clone()
                .unwrap_or_else(|| Value::Object(Map::new())),
        }
    }
}

fn check_bullet(bullet: &str) -> Vec<ValidationIssue> {
    let excerpt: String = bullet.chars().take(ISSUE_EXCERPT_CHARS).collect();
    let mut issues = Vec::new();
    if bullet.chars().count() > MAX_BULLET_CHARS {
        issues.push(ValidationIssue::new(
            "BULLET_TOO_LONG",
            format!("Achievement exceeds {MAX_BULLET_CHARS} characters: {excerpt}"),
        ));
    }
    if !bullet.chars().any(|c| c.is_ascii_digit()) {
        issues.push(ValidationIssue::new(
            "NO_METRIC",
            format!("Achievement lacks metric: {excerpt}"),
        ));
    }
    issues
}

/// `NO_SKILLS` when empty, else `DUPLICATE_SKILL` for exact (case-sensitive) repeats.
fn check_skills(body: &Map<String, Value>) -> Option<ValidationIssue> {
    if !body.get("skills").is_some_and(is_truthy) {
        return Some(ValidationIssue::new("NO_SKILLS", "Skills section is empty"));
    }

    let skills: Vec<&str> = array_field(body, "skills")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    let mut seen = BTreeSet::new();
    let duplicates: BTreeSet<String> = skills
        .iter()
        .filter(|skill| !seen.insert(**skill))
        .map(|skill| skill.to_lowercase())
        .collect();

    if duplicates.is_empty() {
        return None;
    }
    let listed: Vec<String> = duplicates.into_iter().collect();
    Some(ValidationIssue::new(
        "DUPLICATE_SKILL",
        format!("Duplicate skills detected: {}", listed.join(", ")),
    ))
}

fn array_field<'a>(body: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    body.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// JSON truthiness: null, false, zero and empty strings, arrays or objects are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
