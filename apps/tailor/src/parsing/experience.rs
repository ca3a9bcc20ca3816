//! Experience/Project Parser: turns segmented section lines into structured records.
//!
//! Both parsers are finite-state scanners over the line sequence holding a
//! single accumulator: the role (or project) currently open, if any.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::resume::{ExperienceEntry, ProjectEntry};

static BULLET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[•\-\*]\s*(.*)$").unwrap());

/// `<Month Year> - <Month Year|Present>` with a hyphen or en-dash separator.
static DATE_RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\w+\s+\d{4})\s*[–\-]\s*(present|\w+\s+\d{4})").unwrap()
});

/// Characters that glue a date range onto the role heading, e.g. `Acme - Jan 2020`
/// or `Acme (Jan 2020 – Present)`.
const HEADING_SEPARATORS: &[char] = &['-', '–', '—', ',', '|', '(', ')', '·'];

/// Removes a leading bullet glyph from a list line; other lines pass through trimmed.
pub fn strip_bullet(line: &str) -> &str {
    BULLET_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map_or(line, |m| m.as_str())
        .trim()
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

enum RoleState {
    Idle,
    Open(ExperienceEntry),
}

impl RoleState {
    /// Appends to the open role; achievements before the first role are dropped.
    fn attach(&mut self, achievement: &str) {
        if let RoleState::Open(role) = self {
            role.achievements.push(achievement.to_string());
        }
    }

    /// Opens `next`, handing back the role it closes.
    fn open(&mut self, next: ExperienceEntry) -> Option<ExperienceEntry> {
        match std::mem::replace(self, RoleState::Open(next)) {
            RoleState::Open(closed) => Some(closed),
            RoleState::Idle => None,
        }
    }

    fn finish(self) -> Option<ExperienceEntry> {
        match self {
            RoleState::Open(role) => Some(role),
            RoleState::Idle => None,
        }
    }
}

/// Parses experience-section lines into roles.
///
/// A date-range line opens a role (closing the previous one); bullet lines and
/// plain lines become achievements of the open role.
pub fn parse_experience<S: AsRef<str>>(lines: &[S]) -> Vec<ExperienceEntry> {
    let mut roles = Vec::new();
    let mut state = RoleState::Idle;

    for line in lines.iter().map(AsRef::as_ref) {
        if let Some(bullet) = BULLET_PATTERN.captures(line) {
            state.attach(bullet.get(1).map_or("", |m| m.as_str()));
            continue;
        }

        match parse_role_heading(line) {
            Some(role) => {
                if let Some(closed) = state.open(role) {
                    roles.push(closed);
                }
            }
            None => state.attach(line.trim()),
        }
    }

    roles.extend(state.finish());
    roles
}

/// Builds an empty role from a heading line, or `None` if it carries no date range.
fn parse_role_heading(line: &str) -> Option<ExperienceEntry> {
    let caps = DATE_RANGE_PATTERN.captures(line)?;
    let range = caps.get(0)?;

    let before = line[..range.start()].trim_end_matches(|c: char| {
        c.is_whitespace() || HEADING_SEPARATORS.contains(&c)
    });
    let after = line[range.end()..].trim_start_matches(|c: char| {
        c.is_whitespace() || HEADING_SEPARATORS.contains(&c)
    });
    let heading = [before, after]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let (title, company) = split_title_company(&heading);

    Some(ExperienceEntry {
        title,
        company,
        start_date: caps[1].to_string(),
        end_date: caps[2].to_string(),
        achievements: Vec::new(),
    })
}

/// `title` is the text before the first " at ", `company` the text after the last.
/// Without an " at " both are the whole heading.
fn split_title_company(heading: &str) -> (String, String) {
    match (heading.find(" at "), heading.rfind(" at ")) {
        (Some(first), Some(last)) => (
            heading[..first].trim().to_string(),
            heading[last + " at ".len()..].trim().to_string(),
        ),
        _ => (heading.trim().to_string(), heading.trim().to_string()),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Projects
// ────────────────────────────────────────────────────────────────────────────

enum ProjectState {
    Idle,
    Open(ProjectEntry),
}

/// Parses project-section lines.
///
/// The first `name: description` line opens a project; once open it stays open
/// for the rest of the block and every later line extends its description.
/// Lines before the first colon line are dropped.
pub fn parse_projects<S: AsRef<str>>(lines: &[S]) -> Vec<ProjectEntry> {
    let mut state = ProjectState::Idle;

    for line in lines.iter().map(AsRef::as_ref) {
        state = match state {
            ProjectState::Idle => match line.split_once(':') {
                Some((name, description)) => ProjectState::Open(ProjectEntry {
                    name: name.trim().to_string(),
                    description: description.trim().to_string(),
                }),
                None => ProjectState::Idle,
            },
            ProjectState::Open(mut project) => {
                project.description = format!("{} {}", project.description, line.trim())
                    .trim()
                    .to_string();
                ProjectState::Open(project)
            }
        };
    }

    match state {
        ProjectState::Open(project) => vec![project],
        ProjectState::Idle => Vec::new(),
    }
}
