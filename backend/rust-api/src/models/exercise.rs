use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Difficulty, Subject};

/// Body of `POST /api/generate-exercise` as it arrives on the wire.
///
/// Every field is optional here so that a missing field is reported as a
/// validation error instead of a JSON rejection.
#[derive(Debug, Default, Deserialize, Serialize, Validate)]
pub struct GenerateExerciseRequest {
    #[validate(
        required(message = "Missing required parameter: subject"),
        length(min = 1, message = "Missing required parameter: subject")
    )]
    pub subject: Option<String>,

    #[validate(
        required(message = "Missing required parameter: difficulty"),
        length(min = 1, message = "Missing required parameter: difficulty")
    )]
    pub difficulty: Option<String>,

    #[validate(
        required(message = "Missing required parameter: grade"),
        range(min = 1, max = 12, message = "Grade must be between 1 and 12")
    )]
    pub grade: Option<u8>,
}

/// Validated exercise request passed to the exercise service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseRequest {
    pub subject: Subject,
    /// Subject name as the caller wrote it, used by the generic prompt.
    pub subject_name: String,
    pub difficulty: Difficulty,
    pub grade: u8,
}

impl ExerciseRequest {
    pub fn new(subject_name: impl Into<String>, difficulty: Difficulty, grade: u8) -> Self {
        let subject_name = subject_name.into();
        Self {
            subject: Subject::from_name(&subject_name),
            subject_name,
            difficulty,
            grade,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseResult {
    pub exercise: String,
    pub answer: String,
}

impl ExerciseResult {
    pub fn new(exercise: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            exercise: exercise.into(),
            answer: answer.into(),
        }
    }
}
