use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeMeta {
    #[serde(default)]
    pub source_key: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// One role on a resume. Owned by its parent `Resume`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Canonical resume record, produced by normalization or by the generation step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    #[serde(default)]
    pub meta: ResumeMeta,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<String>,
    pub skills: Vec<String>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub raw_text: String,
}

impl Resume {
    /// All achievement bullets across every role, in document order.
    pub fn bullets(&self) -> impl Iterator<Item = &str> {
        self.experience
            .iter()
            .flat_map(|role| role.achievements.iter().map(String::as_str))
    }

    pub fn bullet_count(&self) -> usize {
        self.experience.iter().map(|role| role.achievements.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::decode_record;
    use serde_json::json;

    #[test]
    fn test_bullets_flatten_in_order() {
        let resume = Resume {
            experience: vec![
                ExperienceEntry {
                    achievements: vec!["a".into(), "b".into()],
                    ..Default::default()
                },
                ExperienceEntry {
                    achievements: vec!["c".into()],
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(resume.bullets().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(resume.bullet_count(), 3);
    }

    #[test]
    fn test_generated_resume_shape_deserializes() {
        let resume: Resume = decode_record(
            "resume",
            json!({
                "summary": "Engineer",
                "experience": [{"title": "Engineer", "company": "X", "startDate": "2020",
                                "endDate": "Present", "achievements": ["Improved throughput by 20%"]}],
                "skills": ["Python"]
            }),
        )
        .unwrap();
        assert_eq!(resume.experience[0].end_date, "Present");
        assert!(resume.projects.is_empty());
        assert_eq!(resume.meta.source_key, None);
    }

    #[test]
    fn test_resume_without_experience_is_rejected() {
        assert!(decode_record::<Resume>("resume", json!({"summary": "", "skills": []})).is_err());
    }
}
