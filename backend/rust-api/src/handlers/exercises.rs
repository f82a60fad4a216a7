use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use validator::Validate;

use super::ApiError;
use crate::{
    extractors::AppJson,
    middlewares::trace::RequestTraceContext,
    models::{
        exercise::{ExerciseRequest, ExerciseResult, GenerateExerciseRequest},
        hint::{GenerateHintRequest, HintRequest, HintResult},
        Difficulty, Subject,
    },
    services::{exercise_service::ExerciseService, hint_service::HintService, AppState},
};

pub async fn generate_exercise(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<RequestTraceContext>,
    AppJson(req): AppJson<GenerateExerciseRequest>,
) -> Result<Json<ExerciseResult>, ApiError> {
    tracing::info!("API endpoint called: generate-exercise");

    let request = validate_exercise_request(req)?;

    let service = ExerciseService::from_state(&state);
    let result = service
        .generate_exercise(&request)
        .await
        .map_err(|e| ApiError::upstream(e, &trace))?;

    tracing::info!(
        "Exercise served: subject={}, source={}",
        request.subject,
        result.source.as_str()
    );
    Ok(Json(result.value))
}

pub async fn generate_hint(
    State(state): State<Arc<AppState>>,
    Extension(trace): Extension<RequestTraceContext>,
    AppJson(req): AppJson<GenerateHintRequest>,
) -> Result<Json<HintResult>, ApiError> {
    tracing::info!("API endpoint called: generate-hint");

    let request = validate_hint_request(req, state.config.generation.default_grade)?;

    let service = HintService::from_state(&state);
    let result = service
        .generate_hint(&request)
        .await
        .map_err(|e| ApiError::upstream(e, &trace))?;

    tracing::info!("Hint served: source={}", result.source.as_str());
    Ok(Json(result.value))
}

const VALID_GRADES: std::ops::RangeInclusive<u8> = 1..=12;

fn validate_exercise_request(req: GenerateExerciseRequest) -> Result<ExerciseRequest, ApiError> {
    if let Err(e) = req.validate() {
        tracing::info!("Rejected exercise request: {}", e);
        return Err(ApiError::bad_request(format!("Validation error: {}", e)));
    }

    // validate() guarantees all three are present.
    let (Some(subject), Some(difficulty), Some(grade)) = (req.subject, req.difficulty, req.grade)
    else {
        return Err(ApiError::bad_request("Missing required parameters"));
    };

    let difficulty = Difficulty::parse(&difficulty).ok_or_else(|| {
        ApiError::bad_request(format!(
            "Invalid difficulty: {} (expected easy, medium or hard)",
            difficulty
        ))
    })?;

    if subject.trim().is_empty() {
        return Err(ApiError::bad_request("Missing required parameter: subject"));
    }

    Ok(ExerciseRequest::new(subject.trim(), difficulty, grade))
}

fn validate_hint_request(
    req: GenerateHintRequest,
    default_grade: u8,
) -> Result<HintRequest, ApiError> {
    if let Err(e) = req.validate() {
        tracing::info!("Rejected hint request: {}", e);
        return Err(ApiError::bad_request(format!("Validation error: {}", e)));
    }

    let (Some(exercise), Some(answer)) = (req.exercise, req.answer) else {
        return Err(ApiError::bad_request("Missing required parameters"));
    };

    if exercise.trim().is_empty() || answer.trim().is_empty() {
        return Err(ApiError::bad_request("Missing required parameters"));
    }

    let subject = req
        .subject
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Subject::from_name);

    Ok(HintRequest {
        exercise,
        answer,
        grade: req
            .grade
            .filter(|grade| VALID_GRADES.contains(grade))
            .unwrap_or(default_grade),
        subject,
    })
}
