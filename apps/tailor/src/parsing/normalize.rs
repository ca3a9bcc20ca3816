//! Document Normalizer: raw extracted text + upload metadata → canonical records.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use tracing::debug;

use crate::models::document::{non_blank, DocumentMetadata};
use crate::models::job::{JobDescription, JobMeta};
use crate::models::resume::{Resume, ResumeMeta};
use crate::parsing::experience::{parse_experience, parse_projects, strip_bullet};
use crate::parsing::sections::{segment, Section};

const SUMMARY_MAX_CHARS: usize = 2000;

static ROLE_LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^role[:\-]\s*(.*)").unwrap());

static SKILL_WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z+#]{2,}").unwrap());

// ────────────────────────────────────────────────────────────────────────────
// Job descriptions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum JobSection {
    Summary,
    Responsibilities,
    Requirements,
    Skills,
}

/// Posting cues, matched by case-insensitive containment in table order.
const JOB_SECTION_CUES: &[(JobSection, &[&str])] = &[
    (JobSection::Responsibilities, &["responsibilit", "what you'll do"]),
    (
        JobSection::Requirements,
        &["requirement", "qualifications", "what you'll bring"],
    ),
    (JobSection::Skills, &["skill", "technolog", "tool"]),
];

fn detect_job_section(line: &str) -> Option<JobSection> {
    let lower = line.to_lowercase();
    JOB_SECTION_CUES
        .iter()
        .find(|(_, cues)| cues.iter().any(|cue| lower.contains(cue)))
        .map(|(section, _)| *section)
}

/// Normalizes a job posting. Empty skills fall back to capitalized tokens.
pub fn normalize_job_description(raw_text: &str, metadata: &DocumentMetadata) -> JobDescription {
    let lines: Vec<&str> = raw_text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let mut summary_lines = Vec::new();
    let mut requirements = Vec::new();
    let mut responsibilities = Vec::new();
    let mut skills = Vec::new();
    let mut current = JobSection::Summary;

    for &line in &lines {
        if let Some(section) = detect_job_section(line) {
            current = section;
            continue;
        }
        match current {
            JobSection::Summary => summary_lines.push(line),
            JobSection::Responsibilities => responsibilities.push(strip_bullet(line).to_string()),
            JobSection::Requirements => requirements.push(strip_bullet(line).to_string()),
            JobSection::Skills => skills.push(strip_bullet(line).to_string()),
        }
    }

    if skills.is_empty() {
        skills = derive_skills(&lines);
        debug!("job skills derived from text: {} candidates", skills.len());
    }

    let title = non_blank(&metadata.role)
        .map(str::to_string)
        .or_else(|| extract_role_line(&lines))
        .or_else(|| non_blank(&metadata.title).map(str::to_string))
        .unwrap_or_else(|| "Unknown Role".to_string());

    JobDescription {
        meta: JobMeta {
            title,
            industry: or_default(&metadata.industry, "Unknown"),
            location: or_default(&metadata.location, "Unknown"),
            source: or_default(&metadata.source, "upload"),
            extra: Default::default(),
        },
        summary: summary_lines
            .join(" ")
            .chars()
            .take(SUMMARY_MAX_CHARS)
            .collect(),
        requirements,
        responsibilities,
        skills,
        keywords: Vec::new(),
        competencies: Vec::new(),
        raw_text: raw_text.to_string(),
        extra: Default::default(),
    }
}

fn extract_role_line(lines: &[&str]) -> Option<String> {
    lines.iter().find_map(|line| {
        ROLE_LINE_PATTERN
            .captures(line)
            .map(|caps| caps[1].trim().to_string())
            .filter(|role| !role.is_empty())
    })
}

fn or_default(value: &Option<String>, fallback: &str) -> String {
    non_blank(value).unwrap_or(fallback).to_string()
}

/// Capitalized or all-caps tokens (`Python`, `AWS`, `C++`), deduplicated and sorted.
pub fn derive_skills<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut keywords = BTreeSet::new();
    for line in lines {
        for word in SKILL_WORD_PATTERN.find_iter(line.as_ref()) {
            let word = word.as_str();
            if looks_like_skill(word) {
                keywords.insert(word.to_string());
            }
        }
    }
    keywords.into_iter().collect()
}

fn looks_like_skill(word: &str) -> bool {
    let starts_upper = word.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    let mut letters = word.chars().filter(|c| c.is_ascii_alphabetic()).peekable();
    let all_upper = letters.peek().is_some() && letters.all(|c| c.is_ascii_uppercase());
    starts_upper || all_upper
}

// ────────────────────────────────────────────────────────────────────────────
// Resumes
// ────────────────────────────────────────────────────────────────────────────

/// Normalizes a resume: segment, then parse experience and projects.
pub fn normalize_resume(raw_text: &str, metadata: &DocumentMetadata) -> Resume {
    let segments = segment(raw_text);

    let experience = parse_experience(segments.lines(Section::Experience));
    let projects = parse_projects(segments.lines(Section::Projects));
    let skills: Vec<String> = segments
        .lines(Section::Skills)
        .iter()
        .map(|line| strip_bullet(line).to_string())
        .filter(|skill| !skill.is_empty())
        .collect();

    debug!(
        "normalized resume: {} roles, {} skills, {} projects",
        experience.len(),
        skills.len(),
        projects.len()
    );

    Resume {
        meta: ResumeMeta {
            source_key: metadata.source_key.clone(),
            role: metadata.role.clone(),
            industry: metadata.industry.clone(),
            outcome: metadata.outcome.clone(),
            updated_at: Some(
                metadata
                    .updated_at
                    .clone()
                    .unwrap_or_else(|| Utc::now().format("%Y-%m-%d").to_string()),
            ),
        },
        summary: segments.lines(Section::Summary).join(" ").trim().to_string(),
        experience,
        education: segments.lines(Section::Education).to_vec(),
        skills,
        projects,
        raw_text: raw_text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_sections_by_containment() {
        let job = normalize_job_description(
            "Data Scientist\nBuild the future of analytics.\nKey Responsibilities\nBuild models\n\
             Requirements\n- 3+ years Python\nSkills & Tools\nPython\nSQL",
            &DocumentMetadata::default(),
        );
        assert_eq!(job.summary, "Data Scientist Build the future of analytics.");
        assert_eq!(job.responsibilities, ["Build models"]);
        assert_eq!(job.requirements, ["3+ years Python"]);
        assert_eq!(job.skills, ["Python", "SQL"]);
        assert_eq!(job.meta.title, "Unknown Role");
        assert_eq!(job.meta.industry, "Unknown");
        assert_eq!(job.meta.source, "upload");
    }

    #[test]
    fn test_job_skills_fall_back_to_derived() {
        let job = normalize_job_description(
            "Data Scientist\nResponsibilities\nBuild models with AWS and C++",
            &DocumentMetadata::default(),
        );
        assert_eq!(
            job.skills,
            ["AWS", "Build", "C++", "Data", "Responsibilities", "Scientist"]
        );
    }

    #[test]
    fn test_job_title_precedence() {
        let text = "Role: Platform Engineer\nWe build things";
        let from_line = normalize_job_description(text, &DocumentMetadata::default());
        assert_eq!(from_line.meta.title, "Platform Engineer");

        let meta = DocumentMetadata {
            role: Some("SRE".into()),
            title: Some("Ignored".into()),
            ..Default::default()
        };
        assert_eq!(normalize_job_description(text, &meta).meta.title, "SRE");

        let meta = DocumentMetadata {
            title: Some("Analyst".into()),
            ..Default::default()
        };
        assert_eq!(
            normalize_job_description("No cues here", &meta).meta.title,
            "Analyst"
        );
    }

    #[test]
    fn test_job_summary_truncated() {
        let long = "a".repeat(2500);
        let job = normalize_job_description(&long, &DocumentMetadata::default());
        assert_eq!(job.summary.chars().count(), 2000);
    }

    #[test]
    fn test_derive_skills_rules() {
        let skills = derive_skills(&["using rust, Kafka and GRPC; e.g. k8s"]);
        assert_eq!(skills, ["GRPC", "Kafka"]);
    }

    #[test]
    fn test_normalize_resume_end_to_end() {
        let text = "Summary\nPlatform engineer with 8 years.\nExperience\n\
                    ML Engineer at Org - Jan 2020 - Present\n- Built pipelines\n\
                    Education\nBSc Physics\nSkills\n• Python\n• AWS\n\
                    Projects\nAtlas: search service";
        let meta = DocumentMetadata {
            source_key: Some("tenant/base".into()),
            updated_at: Some("2024-01-01".into()),
            ..Default::default()
        };
        let resume = normalize_resume(text, &meta);
        assert_eq!(resume.summary, "Platform engineer with 8 years.");
        assert_eq!(resume.experience.len(), 1);
        assert_eq!(resume.experience[0].company, "Org");
        assert_eq!(resume.experience[0].achievements, ["Built pipelines"]);
        assert_eq!(resume.education, ["BSc Physics"]);
        assert_eq!(resume.skills, ["Python", "AWS"]);
        assert_eq!(resume.projects[0].name, "Atlas");
        assert_eq!(resume.meta.source_key.as_deref(), Some("tenant/base"));
        assert_eq!(resume.meta.updated_at.as_deref(), Some("2024-01-01"));
        assert_eq!(resume.raw_text, text);
    }

    #[test]
    fn test_normalize_resume_defaults_updated_at_to_today() {
        let resume = normalize_resume("Summary", &DocumentMetadata::default());
        let updated = resume.meta.updated_at.unwrap();
        assert!(chrono::NaiveDate::parse_from_str(&updated, "%Y-%m-%d").is_ok());
        assert!(resume.experience.is_empty());
        assert!(resume.skills.is_empty());
    }
}
