//! Skill Aggregator: merges skills across documents with frequency and provenance.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::job::JobDescription;
use crate::models::resume::Resume;

/// A normalized skill, the documents it came from, and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub skill: String,
    /// Unique, sorted.
    pub sources: Vec<String>,
    pub frequency: u32,
}

/// One document's contribution to an aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillSource<'a> {
    pub source_id: String,
    pub skills: &'a [String],
}

impl<'a> SkillSource<'a> {
    pub fn new(source_id: impl Into<String>, skills: &'a [String]) -> Self {
        Self {
            source_id: source_id.into(),
            skills,
        }
    }
}

#[derive(Default)]
struct Tally {
    sources: BTreeSet<String>,
    frequency: u32,
}

/// Aggregates skills, sorted by descending frequency then skill name.
///
/// Repeats within one source still count towards `frequency`; `sources` is a set.
/// The output does not depend on the order of `documents`.
pub fn aggregate_skills(documents: &[SkillSource<'_>]) -> Vec<SkillRecord> {
    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();

    for document in documents {
        for skill in document.skills {
            let normalized = skill.trim().to_lowercase();
            if normalized.is_empty() {
                continue;
            }
            let tally = tallies.entry(normalized).or_default();
            tally.sources.insert(document.source_id.clone());
            tally.frequency += 1;
        }
    }

    let mut records: Vec<SkillRecord> = tallies
        .into_iter()
        .map(|(skill, tally)| SkillRecord {
            skill,
            sources: tally.sources.into_iter().collect(),
            frequency: tally.frequency,
        })
        .collect();

    records.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.skill.cmp(&b.skill))
    });
    records
}

/// Skills for a parse run: the job, the base resume, then each validated resume
/// labelled by its `meta.sourceKey` (or `validated-<index>`).
pub fn extracted_skills(
    job: &JobDescription,
    base_resume: &Resume,
    validated_resumes: &[Resume],
) -> Vec<SkillRecord> {
    let mut documents = vec![
        SkillSource::new("job", &job.skills),
        SkillSource::new("base", &base_resume.skills),
    ];
    documents.extend(validated_resumes.iter().enumerate().map(|(idx, resume)| {
        let source_id = resume
            .meta
            .source_key
            .clone()
            .unwrap_or_else(|| format!("validated-{idx}"));
        SkillSource::new(source_id, &resume.skills)
    }));
    aggregate_skills(&documents)
}
