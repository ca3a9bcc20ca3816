//! Style-driven plain-text layout of a tailored resume.
//!
//! Applies a [`StyleProfile`] (section order, heading case, bullet glyph and
//! dividers) to a resume and its change log. Binary document formats are
//! produced elsewhere from the same line structure.

use serde_json::Value;

use crate::models::resume::{ExperienceEntry, Resume};
use crate::models::style::{BulletStyle, HeadingCase, StyleProfile};
use crate::parsing::sections::Section;

/// Section order used when the profile does not mention a section.
const DEFAULT_SECTION_ORDER: [Section; 5] = [
    Section::Summary,
    Section::Skills,
    Section::Experience,
    Section::Projects,
    Section::Education,
];

const DIVIDER_WIDTH: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutFormatter {
    heading_case: HeadingCase,
    bullet_style: BulletStyle,
    section_dividers: bool,
    section_order: Vec<Section>,
}

impl Default for LayoutFormatter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl LayoutFormatter {
    /// Without a profile, headings are title-cased and sections follow the default order.
    pub fn new(profile: Option<&StyleProfile>) -> Self {
        let Some(profile) = profile else {
            return Self {
                heading_case: HeadingCase::Title,
                bullet_style: BulletStyle::Bullet,
                section_dividers: false,
                section_order: DEFAULT_SECTION_ORDER.to_vec(),
            };
        };

        Self {
            heading_case: profile.heading_case,
            bullet_style: profile.bullet_style,
            section_dividers: profile.include_section_dividers.unwrap_or(false),
            section_order: resolve_section_order(&profile.section_order),
        }
    }

    /// Renders the resume followed by the change log, one line per output line.
    pub fn render(&self, resume: &Resume, change_log: &[Value]) -> String {
        let mut lines = vec![self.render_header(resume.meta.role.as_deref().unwrap_or(""))];

        for &section in &self.section_order {
            match section {
                Section::Summary => {
                    if !resume.summary.trim().is_empty() {
                        self.push_heading(&mut lines, "Summary");
                        lines.push(resume.summary.clone());
                    }
                }
                Section::Skills => self.push_bulleted(&mut lines, "Skills", &resume.skills),
                Section::Experience => {
                    if !resume.experience.is_empty() {
                        self.push_heading(&mut lines, "Experience");
                        for role in &resume.experience {
                            lines.push(self.format_experience_header(role));
                            lines.extend(role.achievements.iter().map(|a| self.bullet_line(a)));
                        }
                    }
                }
                Section::Projects => {
                    let projects: Vec<String> = resume
                        .projects
                        .iter()
                        .filter(|p| !p.name.is_empty() || !p.description.is_empty())
                        .map(|p| format!("{}: {}", p.name, p.description))
                        .collect();
                    self.push_bulleted(&mut lines, "Projects", &projects);
                }
                Section::Education => {
                    self.push_bulleted(&mut lines, "Education", &resume.education)
                }
            }
        }

        let changes: Vec<String> = change_log.iter().map(change_line).collect();
        self.push_bulleted(&mut lines, "Change Log", &changes);

        lines.join("\n")
    }

    pub fn render_header(&self, role: &str) -> String {
        let role = if role.trim().is_empty() { "Candidate" } else { role };
        match self.heading_case {
            HeadingCase::Upper => format!("TAILORED RESUME – {}", role.to_uppercase()),
            HeadingCase::Title => format!("Tailored Resume – {}", title_case(role)),
            HeadingCase::Sentence => format!("Tailored Resume – {role}"),
        }
    }

    pub fn section_heading(&self, name: &str) -> String {
        let name = name.trim().replace('_', " ");
        match self.heading_case {
            HeadingCase::Upper => name.to_uppercase(),
            HeadingCase::Title => title_case(&name),
            HeadingCase::Sentence => capitalize(&name),
        }
    }

    /// `Title – Company (Start – End)`; a missing end date reads `Present`.
    pub fn format_experience_header(&self, role: &ExperienceEntry) -> String {
        let mut header = role.title.clone();
        if !role.company.is_empty() {
            header.push_str(&format!(" – {}", role.company));
        }

        if !role.start_date.is_empty() || !role.end_date.is_empty() {
            let dash = match self.heading_case {
                HeadingCase::Upper => '-',
                _ => '–',
            };
            let end = if role.end_date.is_empty() {
                "Present"
            } else {
                role.end_date.as_str()
            };
            if role.start_date.is_empty() {
                header.push_str(&format!(" ({end})"));
            } else {
                header.push_str(&format!(" ({} {dash} {end})", role.start_date));
            }
        }

        header.trim().to_string()
    }

    pub fn bullet_line(&self, text: &str) -> String {
        format!("  {} {}", self.bullet_style.glyph(), text)
    }

    fn push_heading(&self, lines: &mut Vec<String>, name: &str) {
        lines.push(self.section_heading(name));
        if self.section_dividers {
            lines.push("―".repeat(DIVIDER_WIDTH));
        }
    }

    /// Heading plus one bullet per non-empty item; nothing when all items are empty.
    fn push_bulleted(&self, lines: &mut Vec<String>, name: &str, items: &[String]) {
        let items: Vec<&String> = items.iter().filter(|item| !item.is_empty()).collect();
        if items.is_empty() {
            return;
        }
        self.push_heading(lines, name);
        lines.extend(items.into_iter().map(|item| self.bullet_line(item)));
    }
}

/// Profile order first (unknown names ignored), then the remaining default sections.
fn resolve_section_order(preferred: &[String]) -> Vec<Section> {
    let mut order: Vec<Section> = Vec::new();
    let candidates = preferred
        .iter()
        .filter_map(|name| Section::from_name(name))
        .chain(DEFAULT_SECTION_ORDER);
    for section in candidates {
        if !order.contains(&section) {
            order.push(section);
        }
    }
    order
}

fn change_line(entry: &Value) -> String {
    let kind = entry.get("type").and_then(Value::as_str).unwrap_or("update");
    let detail = entry.get("detail").and_then(Value::as_str).unwrap_or("");
    format!("{kind}: {detail}")
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_alpha = true;
        } else {
            out.push(c);
            previous_alpha = false;
        }
    }
    out
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::ProjectEntry;
    use crate::models::style::LayoutDensity;
    use serde_json::json;

    fn profile(heading_case: HeadingCase, bullet_style: BulletStyle) -> StyleProfile {
        StyleProfile {
            section_order: vec!["experience".into(), "summary".into()],
            heading_case,
            bullet_style,
            font_family: "Calibri".into(),
            font_size: 22,
            layout_density: LayoutDensity::Balanced,
            include_section_dividers: None,
            accent_color: None,
        }
    }

    fn resume() -> Resume {
        Resume {
            summary: "Platform engineer.".into(),
            experience: vec![ExperienceEntry {
                title: "Engineer".into(),
                company: "Acme".into(),
                start_date: "Jan 2020".into(),
                end_date: String::new(),
                achievements: vec!["Cut latency 40%".into()],
            }],
            skills: vec!["Rust".into(), String::new()],
            projects: vec![ProjectEntry {
                name: "Atlas".into(),
                description: "search".into(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_default_layout() {
        let text = LayoutFormatter::default().render(&resume(), &[]);
        let expected = [
            "Tailored Resume – Candidate",
            "Summary",
            "Platform engineer.",
            "Skills",
            "  • Rust",
            "Experience",
            "Engineer – Acme (Jan 2020 – Present)",
            "  • Cut latency 40%",
            "Projects",
            "  • Atlas: search",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_profile_order_case_and_glyph() {
        let formatter = LayoutFormatter::new(Some(&profile(HeadingCase::Upper, BulletStyle::Dash)));
        assert_eq!(
            formatter.section_order,
            [
                Section::Experience,
                Section::Summary,
                Section::Skills,
                Section::Projects,
                Section::Education
            ]
        );
        let text = formatter.render(&resume(), &[]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "TAILORED RESUME – CANDIDATE");
        assert_eq!(lines[1], "EXPERIENCE");
        assert_eq!(lines[2], "Engineer – Acme (Jan 2020 - Present)");
        assert_eq!(lines[3], "  - Cut latency 40%");
        assert_eq!(lines[4], "SUMMARY");
    }

    #[test]
    fn test_dividers_and_change_log() {
        let mut style = profile(HeadingCase::Sentence, BulletStyle::Asterisk);
        style.include_section_dividers = Some(true);
        let formatter = LayoutFormatter::new(Some(&style));
        let change_log = [
            json!({"type": "bullet", "detail": "Quantified latency"}),
            json!({"detail": "Reordered skills"}),
        ];
        let text = formatter.render(&Resume::default(), &change_log);
        let divider = "―".repeat(20);
        let expected = [
            "Tailored Resume – Candidate",
            "Change log",
            divider.as_str(),
            "  * bullet: Quantified latency",
            "  * update: Reordered skills",
        ]
        .join("\n");
        assert_eq!(text, expected);
    }

    #[test]
    fn test_header_uses_role() {
        let mut r = Resume::default();
        r.meta.role = Some("data scientist".into());
        let text = LayoutFormatter::default().render(&r, &[]);
        assert_eq!(text, "Tailored Resume – Data Scientist");
    }

    #[test]
    fn test_experience_header_variants() {
        let formatter = LayoutFormatter::default();
        let role = |start: &str, end: &str, company: &str| ExperienceEntry {
            title: "Lead".into(),
            company: company.into(),
            start_date: start.into(),
            end_date: end.into(),
            achievements: Vec::new(),
        };
        assert_eq!(formatter.format_experience_header(&role("", "", "")), "Lead");
        assert_eq!(
            formatter.format_experience_header(&role("", "2021", "Initech")),
            "Lead – Initech (2021)"
        );
        assert_eq!(
            formatter.format_experience_header(&role("2019", "2021", "")),
            "Lead (2019 – 2021)"
        );
    }

    #[test]
    fn test_heading_casing() {
        assert_eq!(title_case("change log"), "Change Log");
        assert_eq!(capitalize("CHANGE LOG"), "Change log");
    }
}
