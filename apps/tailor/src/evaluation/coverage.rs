//! Retrieval Coverage Scorer: how much of the job the retrieved evidence mentions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::round_to;
use crate::models::job::JobDescription;
use crate::models::retrieval::{RetrievalChunk, RetrievalContext};

/// Chunks kept when assembling a retrieval context.
pub const DEFAULT_CONTEXT_CHUNKS: usize = 20;

/// Per-category fraction of job items found in the evidence, plus their mean.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalCoverage {
    pub requirements: f64,
    pub responsibilities: f64,
    pub skills: f64,
    pub mean: f64,
}

/// Scores coverage by case-insensitive substring match against any chunk.
///
/// An empty category scores 1.0; an empty chunk list scores 0.0 everywhere.
pub fn score_retrieval_coverage(job: &JobDescription, chunks: &[RetrievalChunk]) -> RetrievalCoverage {
    if chunks.is_empty() {
        debug!("retrieval coverage: no chunks");
        return RetrievalCoverage::default();
    }

    let evidence: Vec<String> = chunks.iter().map(|c| c.text.to_lowercase()).collect();
    let requirements = category_score(&job.requirements, &evidence);
    let responsibilities = category_score(&job.responsibilities, &evidence);
    let skills = category_score(&job.skills, &evidence);

    RetrievalCoverage {
        requirements,
        responsibilities,
        skills,
        mean: round_to((requirements + responsibilities + skills) / 3.0, 3),
    }
}

fn category_score(items: &[String], evidence: &[String]) -> f64 {
    if items.is_empty() {
        return 1.0;
    }
    let matches = items
        .iter()
        .filter(|item| {
            let needle = item.to_lowercase();
            evidence.iter().any(|text| text.contains(&needle))
        })
        .count();
    round_to(matches as f64 / items.len() as f64, 3)
}

/// Dedupes search hits by text (best score wins), ranks them by score and keeps
/// the top `limit`, then attaches the coverage of the kept chunks.
/// Kept scores are reported at 4 decimal places.
pub fn assemble_context(
    job: &JobDescription,
    hits: Vec<RetrievalChunk>,
    limit: usize,
) -> RetrievalContext {
    let mut best: HashMap<String, RetrievalChunk> = HashMap::new();
    for hit in hits {
        let better = best
            .get(&hit.text)
            .map_or(true, |existing| existing.score < hit.score);
        if better {
            best.insert(hit.text.clone(), hit);
        }
    }

    let mut chunks: Vec<RetrievalChunk> = best.into_values().collect();
    chunks.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.text.cmp(&b.text))
    });
    chunks.truncate(limit);
    for chunk in &mut chunks {
        chunk.score = round_to(chunk.score, 4);
    }

    let coverage = score_retrieval_coverage(job, &chunks);
    RetrievalContext {
        coverage: serde_json::to_value(coverage).ok(),
        chunks,
    }
}
