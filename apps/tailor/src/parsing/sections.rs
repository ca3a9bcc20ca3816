//! Section Segmenter: splits raw resume text into the five canonical sections.
//!
//! A single forward scan with one piece of state (the current section). Header
//! lines switch the state and are consumed; every other non-empty line lands in
//! the current section's bucket. Sections may recur; their lines concatenate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
}

/// Header cues per section, matched as case-insensitive line prefixes.
/// Checked in table order; the first hit wins.
const HEADER_KEYWORDS: &[(Section, &[&str])] = &[
    (
        Section::Summary,
        &["professional summary", "summary", "profile", "about"],
    ),
    (
        Section::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "employment",
            "work history",
        ],
    ),
    (Section::Education, &["education", "academic"]),
    (
        Section::Skills,
        &["skill", "technical skill", "core competenc", "competenc"],
    ),
    (
        Section::Projects,
        &["project", "selected project", "personal project"],
    ),
];

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Summary,
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Projects,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Section::Summary => "summary",
            Section::Experience => "experience",
            Section::Education => "education",
            Section::Skills => "skills",
            Section::Projects => "projects",
        }
    }

    pub fn from_name(name: &str) -> Option<Section> {
        let name = name.trim();
        Section::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(name))
    }
}

/// Returns the section a header line introduces, if it is one.
pub fn detect_header(line: &str) -> Option<Section> {
    let lower = line.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }
    HEADER_KEYWORDS
        .iter()
        .find(|(_, cues)| cues.iter().any(|cue| lower.starts_with(cue)))
        .map(|(section, _)| *section)
}

/// Lines of a document grouped by section. Every section is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segments {
    sections: BTreeMap<Section, Vec<String>>,
}

impl Segments {
    fn new() -> Self {
        Self {
            sections: Section::ALL.into_iter().map(|s| (s, Vec::new())).collect(),
        }
    }

    pub fn lines(&self, section: Section) -> &[String] {
        self.sections
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn push(&mut self, section: Section, line: &str) {
        self.sections
            .entry(section)
            .or_default()
            .push(line.to_string());
    }
}

/// Splits raw text into sections. Text before the first header is summary.
pub fn segment(raw_text: &str) -> Segments {
    let mut segments = Segments::new();
    let mut current = Section::Summary;

    for line in raw_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match detect_header(line) {
            Some(section) => current = section,
            None => segments.push(current, line),
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Jane Doe\n\
        Professional Summary\n\
        Platform engineer.\n\
        \n\
        EXPERIENCE\n\
        Engineer at Acme - Jan 2020 - Present\n\
        - Built systems\n\
        Education\n\
        BSc Computer Science\n\
        Skills:\n\
        Python\n\
        Projects\n\
        Atlas: search service";

    #[test]
    fn test_segments_all_five_sections() {
        let s = segment(SAMPLE);
        assert_eq!(s.lines(Section::Summary), ["Jane Doe", "Platform engineer."]);
        assert_eq!(
            s.lines(Section::Experience),
            ["Engineer at Acme - Jan 2020 - Present", "- Built systems"]
        );
        assert_eq!(s.lines(Section::Education), ["BSc Computer Science"]);
        assert_eq!(s.lines(Section::Skills), ["Python"]);
        assert_eq!(s.lines(Section::Projects), ["Atlas: search service"]);
    }

    #[test]
    fn test_header_lines_are_consumed() {
        let s = segment("Summary\nExperience\nSkills");
        for section in Section::ALL {
            assert!(s.lines(section).is_empty(), "{section:?} should be empty");
        }
    }

    #[test]
    fn test_recurring_section_concatenates() {
        let s = segment("Skills\nRust\nExperience\nRole\nSkills\nGo");
        assert_eq!(s.lines(Section::Skills), ["Rust", "Go"]);
    }

    #[test]
    fn test_initial_state_is_summary() {
        let s = segment("Hello there\n\n  \nGeneral line");
        assert_eq!(s.lines(Section::Summary), ["Hello there", "General line"]);
    }

    #[test]
    fn test_alternate_cues() {
        assert_eq!(detect_header("About Me"), Some(Section::Summary));
        assert_eq!(detect_header("Work History"), Some(Section::Experience));
        assert_eq!(detect_header("Technical Skills"), Some(Section::Skills));
        assert_eq!(detect_header("Core Competencies"), Some(Section::Skills));
        assert_eq!(detect_header("Selected Projects"), Some(Section::Projects));
        assert_eq!(detect_header("Built things"), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Section::from_name(" Skills "), Some(Section::Skills));
        assert_eq!(Section::from_name("awards"), None);
    }
}
