use anyhow::{anyhow, Context, Result};
use reqwest::Client;

use crate::models::{
    exercise::{ExerciseResult, GenerateExerciseRequest},
    hint::{GenerateHintRequest, HintResult},
    Difficulty, Subject,
};

/// HTTP client for the two generation endpoints.
pub struct PracticeClient {
    http_client: Client,
    base_url: String,
}

impl PracticeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn generate_exercise(
        &self,
        subject: Subject,
        difficulty: Difficulty,
        grade: u8,
    ) -> Result<ExerciseResult> {
        let body = GenerateExerciseRequest {
            subject: Some(subject.as_str().to_string()),
            difficulty: Some(difficulty.as_str().to_string()),
            grade: Some(grade),
        };
        let result: ExerciseResult = self.post("/api/generate-exercise", &body).await?;
        if result.exercise.is_empty() {
            return Err(anyhow!("Server returned an empty exercise"));
        }
        Ok(result)
    }

    pub async fn generate_hint(&self, body: &GenerateHintRequest) -> Result<HintResult> {
        self.post("/api/generate-hint", body).await
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to call {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!("{} returned error {}: {}", path, status, error_text));
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", path))
    }
}
