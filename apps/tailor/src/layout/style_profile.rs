//! Style Profile Builder: infers layout conventions from a sample resume.
//!
//! Explicit metadata always wins over what the text suggests, except for the
//! section order, where the metadata order is merged ahead of the detected one.

use std::collections::HashSet;

use tracing::debug;

use crate::models::style::{BulletStyle, HeadingCase, LayoutDensity, StyleMetadata, StyleProfile};
use crate::parsing::sections::detect_header;

const DEFAULT_FONT_FAMILY: &str = "Calibri";
/// Half-points (11pt).
const DEFAULT_FONT_SIZE: u32 = 22;
/// Supplied sizes at or below this are read as points.
const POINT_SIZE_CEILING: f64 = 20.0;

const HEADING_MAX_CHARS: usize = 40;
const UPPER_HEADING_SHARE: f64 = 0.6;
const TITLE_HEADING_SHARE: f64 = 0.5;

const CONDENSED_ABOVE_LINES: usize = 120;
const SPACIOUS_BELOW_LINES: usize = 60;

/// What the sample text alone suggests.
#[derive(Debug, Clone, PartialEq)]
struct DetectedStyle {
    section_order: Vec<String>,
    heading_case: HeadingCase,
    bullet_style: BulletStyle,
    layout_density: LayoutDensity,
}

impl Default for DetectedStyle {
    fn default() -> Self {
        Self {
            section_order: Vec::new(),
            heading_case: HeadingCase::Sentence,
            bullet_style: BulletStyle::Bullet,
            layout_density: LayoutDensity::Balanced,
        }
    }
}

impl DetectedStyle {
    fn from_sample(sample: &str) -> Self {
        let lines: Vec<&str> = sample
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        Self {
            section_order: detect_section_order(&lines),
            heading_case: detect_heading_case(&lines),
            bullet_style: detect_bullet_style(&lines),
            layout_density: detect_density(lines.len()),
        }
    }
}

/// Builds a style profile from an optional sample and optional explicit overrides.
///
/// Returns `None` when neither is supplied; rendering then uses its own defaults.
pub fn build_style_profile(
    sample: Option<&str>,
    metadata: Option<&StyleMetadata>,
) -> Option<StyleProfile> {
    if sample.is_none() && metadata.is_none() {
        return None;
    }

    let detected = sample.map(DetectedStyle::from_sample).unwrap_or_default();
    let empty = StyleMetadata::default();
    let metadata = metadata.unwrap_or(&empty);

    let section_order = merge_section_order(
        metadata.section_order.as_deref().unwrap_or_default(),
        &detected.section_order,
    );

    let profile = StyleProfile {
        section_order,
        heading_case: metadata.heading_case.unwrap_or(detected.heading_case),
        bullet_style: metadata.bullet_style.unwrap_or(detected.bullet_style),
        font_family: metadata
            .font_family
            .clone()
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string()),
        font_size: metadata.font_size.map_or(DEFAULT_FONT_SIZE, to_half_points),
        layout_density: metadata.layout_density.unwrap_or(detected.layout_density),
        include_section_dividers: metadata.include_section_dividers,
        accent_color: metadata.accent_color.clone(),
    };

    debug!(
        "style profile: {:?} headings, {:?} bullets, {} ordered sections",
        profile.heading_case,
        profile.bullet_style,
        profile.section_order.len()
    );
    Some(profile)
}

/// Metadata order first, then detected order; first occurrence of a name wins.
fn merge_section_order(explicit: &[String], detected: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    explicit
        .iter()
        .chain(detected)
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

fn to_half_points(size: f64) -> u32 {
    if size <= POINT_SIZE_CEILING {
        (size * 2.0).round() as u32
    } else {
        size.round() as u32
    }
}

fn detect_section_order(lines: &[&str]) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    for section in lines.iter().filter_map(|line| detect_header(line)) {
        let name = section.as_str();
        if !order.iter().any(|seen| seen == name) {
            order.push(name.to_string());
        }
    }
    order
}

fn detect_bullet_style(lines: &[&str]) -> BulletStyle {
    lines
        .iter()
        .find_map(|line| line.chars().next().and_then(BulletStyle::from_glyph))
        .unwrap_or_default()
}

/// Every short line is a heading candidate, bullets included; the share of
/// all-caps and title-case candidates decides the profile.
fn detect_heading_case(lines: &[&str]) -> HeadingCase {
    let candidates: Vec<&str> = lines
        .iter()
        .copied()
        .filter(|line| line.chars().count() <= HEADING_MAX_CHARS)
        .collect();

    if candidates.is_empty() {
        return HeadingCase::Sentence;
    }

    let total = candidates.len() as f64;
    let upper = candidates.iter().filter(|line| is_upper_case(line)).count() as f64;
    let title = candidates
        .iter()
        .filter(|line| !is_upper_case(line) && is_title_case(line))
        .count() as f64;

    if upper / total >= UPPER_HEADING_SHARE {
        HeadingCase::Upper
    } else if title / total >= TITLE_HEADING_SHARE {
        HeadingCase::Title
    } else {
        HeadingCase::Sentence
    }
}

fn is_upper_case(line: &str) -> bool {
    let mut letters = line.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(char::is_uppercase)
}

/// Every word starts with a capital followed only by lower-case letters.
fn is_title_case(line: &str) -> bool {
    let mut previous_cased = false;
    let mut any_cased = false;
    for c in line.chars() {
        if c.is_uppercase() {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            any_cased = true;
        } else if c.is_lowercase() {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            any_cased = true;
        } else {
            previous_cased = false;
        }
    }
    any_cased
}

fn detect_density(line_count: usize) -> LayoutDensity {
    if line_count > CONDENSED_ABOVE_LINES {
        LayoutDensity::Condensed
    } else if line_count < SPACIOUS_BELOW_LINES {
        LayoutDensity::Spacious
    } else {
        LayoutDensity::Balanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPPER_SAMPLE: &str = "JANE DOE\n\
        SUMMARY\n\
        Platform engineer building data systems for analytics teams.\n\
        EXPERIENCE\n\
        - Built a streaming ingestion layer handling 2M events per day\n\
        SKILLS\n\
        - Rust\n\
        EDUCATION";

    #[test]
    fn test_none_without_sample_or_metadata() {
        assert_eq!(build_style_profile(None, None), None);
    }

    #[test]
    fn test_detects_from_upper_sample() {
        let profile = build_style_profile(Some(UPPER_SAMPLE), None).unwrap();
        assert_eq!(profile.heading_case, HeadingCase::Upper);
        assert_eq!(profile.bullet_style, BulletStyle::Dash);
        assert_eq!(
            profile.section_order,
            ["summary", "experience", "skills", "education"]
        );
        assert_eq!(profile.layout_density, LayoutDensity::Spacious);
        assert_eq!(profile.font_family, "Calibri");
        assert_eq!(profile.font_size, 22);
        assert_eq!(profile.include_section_dividers, None);
    }

    #[test]
    fn test_title_case_headings() {
        let sample = "Professional Summary\nWork Experience\nTechnical Skills\nbuilt things for people";
        let profile = build_style_profile(Some(sample), None).unwrap();
        assert_eq!(profile.heading_case, HeadingCase::Title);
        assert_eq!(profile.bullet_style, BulletStyle::Bullet);
    }

    #[test]
    fn test_short_bullets_count_as_heading_candidates() {
        // 2 of 4 short lines are upper case: below the 0.6 share
        let sample = "SUMMARY\nSKILLS\n- rust\n- go";
        assert_eq!(detect_heading_case(&sample.lines().collect::<Vec<_>>()), HeadingCase::Sentence);
    }

    #[test]
    fn test_sentence_case_fallback() {
        let sample = "Summary of work\nExperience in data\nSkills and tools";
        let profile = build_style_profile(Some(sample), None).unwrap();
        assert_eq!(profile.heading_case, HeadingCase::Sentence);
    }

    #[test]
    fn test_metadata_overrides_detected() {
        let metadata = StyleMetadata {
            heading_case: Some(HeadingCase::Title),
            bullet_style: Some(BulletStyle::Asterisk),
            layout_density: Some(LayoutDensity::Condensed),
            font_family: Some("Georgia".into()),
            include_section_dividers: Some(true),
            accent_color: Some("#1F4E79".into()),
            ..Default::default()
        };
        let profile = build_style_profile(Some(UPPER_SAMPLE), Some(&metadata)).unwrap();
        assert_eq!(profile.heading_case, HeadingCase::Title);
        assert_eq!(profile.bullet_style, BulletStyle::Asterisk);
        assert_eq!(profile.layout_density, LayoutDensity::Condensed);
        assert_eq!(profile.font_family, "Georgia");
        assert_eq!(profile.include_section_dividers, Some(true));
        assert_eq!(profile.accent_color.as_deref(), Some("#1F4E79"));
    }

    #[test]
    fn test_section_order_merged_metadata_first() {
        let metadata = StyleMetadata {
            section_order: Some(vec!["skills".into(), "summary".into(), "awards".into()]),
            ..Default::default()
        };
        let profile = build_style_profile(Some(UPPER_SAMPLE), Some(&metadata)).unwrap();
        assert_eq!(
            profile.section_order,
            ["skills", "summary", "awards", "experience", "education"]
        );
    }

    #[test]
    fn test_font_size_points_are_doubled() {
        let profile = |size| {
            let metadata = StyleMetadata {
                font_size: Some(size),
                ..Default::default()
            };
            build_style_profile(None, Some(&metadata)).unwrap().font_size
        };
        assert_eq!(profile(11.0), 22);
        assert_eq!(profile(10.5), 21);
        assert_eq!(profile(20.0), 40);
        assert_eq!(profile(24.0), 24);
    }

    #[test]
    fn test_metadata_only_uses_defaults() {
        let profile = build_style_profile(None, Some(&StyleMetadata::default())).unwrap();
        assert!(profile.section_order.is_empty());
        assert_eq!(profile.heading_case, HeadingCase::Sentence);
        assert_eq!(profile.layout_density, LayoutDensity::Balanced);
    }

    #[test]
    fn test_density_thresholds() {
        assert_eq!(detect_density(121), LayoutDensity::Condensed);
        assert_eq!(detect_density(120), LayoutDensity::Balanced);
        assert_eq!(detect_density(60), LayoutDensity::Balanced);
        assert_eq!(detect_density(59), LayoutDensity::Spacious);
    }

    #[test]
    fn test_case_classifiers() {
        assert!(is_upper_case("SKILLS & TOOLS"));
        assert!(!is_upper_case("2024"));
        assert!(is_title_case("Work Experience"));
        assert!(!is_title_case("Work experience"));
        assert!(!is_title_case("SKILLS"));
    }
}
