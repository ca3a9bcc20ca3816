//! Evaluation Scorer: compares a tailored resume against the job and the evidence.
//!
//! # Metrics
//! - `jdCoverage`: share of job targets (requirements, responsibilities, skills,
//!   competency names and indicators) whose tokens all appear in the resume.
//! - `atsKeywordScore`: the same test over skills, keywords and competency
//!   indicators. Duplicates count separately.
//! - `hallucinations`: bullets whose first 80 characters appear in no evidence.
//! - `consistency`: share of bullets whose word count stays near the mean.
//! - `readabilityGradeLevel`: Flesch-Kincaid grade of summary and bullets.
//!
//! Missing lists keep the job's original order so reviewers can act on them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::readability::readability_grade;
use super::round_to;
use crate::models::job::JobDescription;
use crate::models::resume::Resume;
use crate::models::retrieval::RetrievalContext;
use crate::parsing::tokenizer::{is_covered, tokenize, tokenize_all, TokenSet};

const HALLUCINATION_PREFIX_CHARS: usize = 80;
const CONSISTENCY_SPREAD: f64 = 0.6;
const CONSISTENCY_MIN_ALLOWED: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub jd_coverage: f64,
    pub missing_coverage_targets: Vec<String>,
    pub ats_keyword_score: f64,
    pub missing_ats_keywords: Vec<String>,
    pub hallucinations: Vec<String>,
    pub consistency: f64,
    pub readability_grade_level: f64,
}

/// Runs every metric. Degenerate inputs fall back to fixed values; this never fails.
pub fn evaluate(
    job: &JobDescription,
    resume: &Resume,
    retrieval: &RetrievalContext,
) -> EvaluationResult {
    let (jd_coverage, missing_coverage_targets) = coverage_score(job, resume);
    let (ats_keyword_score, missing_ats_keywords) = ats_keyword_score(job, resume);

    let result = EvaluationResult {
        jd_coverage,
        missing_coverage_targets,
        ats_keyword_score,
        missing_ats_keywords,
        hallucinations: hallucination_flags(job, resume, retrieval),
        consistency: consistency_score(resume),
        readability_grade_level: resume_readability(resume),
    };

    debug!(
        "evaluation: coverage={} ats={} hallucinations={}/{}",
        result.jd_coverage,
        result.ats_keyword_score,
        result.hallucinations.len(),
        resume.bullet_count()
    );
    result
}

// ────────────────────────────────────────────────────────────────────────────
// Coverage and ATS keywords
// ────────────────────────────────────────────────────────────────────────────

/// Job statements the resume should address, in posting order.
fn coverage_targets(job: &JobDescription) -> Vec<&str> {
    let mut targets: Vec<&str> = job
        .requirements
        .iter()
        .chain(&job.responsibilities)
        .chain(&job.skills)
        .map(String::as_str)
        .collect();

    for competency in &job.competencies {
        if !competency.name.is_empty() {
            targets.push(&competency.name);
        }
        targets.extend(
            competency
                .evidence_indicators
                .iter()
                .filter(|i| !i.is_empty())
                .map(String::as_str),
        );
    }
    targets
}

/// Non-blank skills, keywords and competency indicators, duplicates included.
fn ats_keywords(job: &JobDescription) -> Vec<&str> {
    job.skills
        .iter()
        .chain(&job.keywords)
        .chain(job.competencies.iter().flat_map(|c| &c.evidence_indicators))
        .map(String::as_str)
        .filter(|k| !k.trim().is_empty())
        .collect()
}

/// Summary, bullets, skills and project text, tokenized together.
fn resume_tokens(resume: &Resume) -> TokenSet {
    let projects = resume
        .projects
        .iter()
        .flat_map(|p| [p.name.as_str(), p.description.as_str()]);

    tokenize_all(
        std::iter::once(resume.summary.as_str())
            .chain(resume.bullets())
            .chain(resume.skills.iter().map(String::as_str))
            .chain(projects),
    )
}

/// `(score, missing)` over `items`; an empty list scores 1.0.
fn covered_share(items: &[&str], tokens: &TokenSet) -> (f64, Vec<String>) {
    if items.is_empty() {
        return (1.0, Vec::new());
    }

    let missing: Vec<String> = items
        .iter()
        .filter(|item| !is_covered(&tokenize(item), tokens))
        .map(|item| item.to_string())
        .collect();
    let hits = items.len() - missing.len();

    (round_to(hits as f64 / items.len() as f64, 3), missing)
}

pub fn coverage_score(job: &JobDescription, resume: &Resume) -> (f64, Vec<String>) {
    covered_share(&coverage_targets(job), &resume_tokens(resume))
}

pub fn ats_keyword_score(job: &JobDescription, resume: &Resume) -> (f64, Vec<String>) {
    let mut tokens = resume_tokens(resume);
    tokens.extend(tokenize_all(resume.skills.iter().map(String::as_str)));
    covered_share(&ats_keywords(job), &tokens)
}

// ────────────────────────────────────────────────────────────────────────────
// Hallucinations
// ────────────────────────────────────────────────────────────────────────────

/// Bullets (verbatim) whose lowercased 80-char prefix is in no evidence string.
///
/// Evidence is every retrieval chunk plus the serialized job description.
pub fn hallucination_flags(
    job: &JobDescription,
    resume: &Resume,
    retrieval: &RetrievalContext,
) -> Vec<String> {
    let mut evidence: Vec<String> = retrieval
        .chunks
        .iter()
        .map(|chunk| chunk.text.to_lowercase())
        .collect();
    evidence.push(
        serde_json::to_string(job)
            .unwrap_or_default()
            .to_lowercase(),
    );

    resume
        .bullets()
        .filter(|bullet| {
            let prefix: String = bullet
                .to_lowercase()
                .chars()
                .take(HALLUCINATION_PREFIX_CHARS)
                .collect();
            !evidence.iter().any(|text| text.contains(&prefix))
        })
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Consistency and readability
// ────────────────────────────────────────────────────────────────────────────

/// 1.0 minus the share of bullets whose word count strays more than
/// `max(0.6 * mean, 3)` from the mean. No roles or no bullets scores 0.0.
pub fn consistency_score(resume: &Resume) -> f64 {
    if resume.experience.is_empty() {
        return 0.0;
    }
    let lengths: Vec<f64> = resume
        .bullets()
        .map(|b| b.split_whitespace().count() as f64)
        .collect();
    if lengths.is_empty() {
        debug!("consistency: no achievement bullets");
        return 0.0;
    }

    let total = lengths.len() as f64;
    let mean = lengths.iter().sum::<f64>() / total;
    let max_allowed = (mean * CONSISTENCY_SPREAD).max(CONSISTENCY_MIN_ALLOWED);
    let inconsistent = lengths
        .iter()
        .filter(|len| (*len - mean).abs() > max_allowed)
        .count() as f64;

    round_to((1.0 - inconsistent / total).max(0.0), 3)
}

fn resume_readability(resume: &Resume) -> f64 {
    let text = std::iter::once(resume.summary.as_str())
        .chain(resume.bullets())
        .collect::<Vec<_>>()
        .join(" ");
    readability_grade(&text)
}
