use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Subject;

/// Body of `POST /api/generate-hint`.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct GenerateHintRequest {
    #[validate(
        required(message = "Missing required parameter: exercise"),
        length(min = 1, message = "Missing required parameter: exercise")
    )]
    pub exercise: Option<String>,

    #[validate(
        required(message = "Missing required parameter: answer"),
        length(min = 1, message = "Missing required parameter: answer")
    )]
    pub answer: Option<String>,

    /// Out-of-range grades are replaced by the configured default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintRequest {
    pub exercise: String,
    pub answer: String,
    pub grade: u8,
    /// `None` means the subject is sniffed from the exercise text.
    pub subject: Option<Subject>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintResult {
    pub hint: String,
}
