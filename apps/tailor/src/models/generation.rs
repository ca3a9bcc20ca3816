use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverLetter {
    #[serde(default)]
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
}

/// Output of the (external) generation step.
///
/// The tailored resume and change log stay untyped JSON: the validator must
/// report on whatever the generator produced, including shapes a typed
/// `Resume` would refuse to decode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutput {
    #[serde(default)]
    pub tailored_resume: Value,
    #[serde(default)]
    pub change_log: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<CoverLetter>,
}
