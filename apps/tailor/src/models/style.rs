use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingCase {
    Upper,
    Title,
    #[default]
    Sentence,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletStyle {
    #[default]
    Bullet,
    Dash,
    Asterisk,
}

impl BulletStyle {
    pub fn glyph(self) -> char {
        match self {
            BulletStyle::Bullet => '•',
            BulletStyle::Dash => '-',
            BulletStyle::Asterisk => '*',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '•' => Some(BulletStyle::Bullet),
            '-' => Some(BulletStyle::Dash),
            '*' => Some(BulletStyle::Asterisk),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDensity {
    Condensed,
    #[default]
    Balanced,
    Spacious,
}

/// Layout conventions applied when rendering a tailored resume.
///
/// `font_size` is in half-points (22 = 11pt).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleProfile {
    pub section_order: Vec<String>,
    pub heading_case: HeadingCase,
    pub bullet_style: BulletStyle,
    pub font_family: String,
    pub font_size: u32,
    pub layout_density: LayoutDensity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_section_dividers: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
}

/// Explicit style overrides supplied alongside a style sample.
/// Every field present here wins over the text-inferred value, except
/// `section_order`, which is merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleMetadata {
    #[serde(default)]
    pub section_order: Option<Vec<String>>,
    #[serde(default)]
    pub heading_case: Option<HeadingCase>,
    #[serde(default)]
    pub bullet_style: Option<BulletStyle>,
    #[serde(default)]
    pub font_family: Option<String>,
    /// Points when ≤ 20, half-points otherwise.
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub layout_density: Option<LayoutDensity>,
    #[serde(default)]
    pub include_section_dividers: Option<bool>,
    #[serde(default)]
    pub accent_color: Option<String>,
}
