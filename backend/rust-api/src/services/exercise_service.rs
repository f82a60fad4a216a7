use std::sync::Arc;

use crate::metrics::{self, EXERCISES_GENERATED_TOTAL};
use crate::models::exercise::{ExerciseRequest, ExerciseResult};
use crate::services::{
    fallback::fallback_exercise,
    llm_client::{GenerationError, TextGenerator},
    prompts::{exercise_prompt, EXERCISE_SYSTEM_PROMPT},
    response_parser::parse_exercise,
    AppState, PipelineSettings, Sourced,
};

pub struct ExerciseService {
    generator: Arc<dyn TextGenerator>,
    settings: PipelineSettings,
}

impl ExerciseService {
    pub fn new(generator: Arc<dyn TextGenerator>, settings: PipelineSettings) -> Self {
        Self {
            generator,
            settings,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.generator.clone(),
            PipelineSettings::from_config(&state.config),
        )
    }

    /// Generates an exercise, falling back to canned content when the model
    /// output is unusable. Upstream failures fall back too unless
    /// `fallback_on_upstream_error` is off, in which case they are returned.
    pub async fn generate_exercise(
        &self,
        req: &ExerciseRequest,
    ) -> Result<Sourced<ExerciseResult>, GenerationError> {
        tracing::info!(
            "Generating exercise: subject={}, difficulty={}, grade={}",
            req.subject_name,
            req.difficulty,
            req.grade
        );

        let prompt = exercise_prompt(req);
        tracing::debug!("Exercise prompt: {}", prompt);

        let options = self.settings.options(EXERCISE_SYSTEM_PROMPT);
        let raw = metrics::track_llm_call(
            "exercise",
            self.generator.generate(&prompt, &options),
        )
        .await;

        let result = match raw {
            Ok(text) => {
                tracing::debug!("Exercise response content: {}", text);
                match parse_exercise(&text) {
                    Ok(exercise) => {
                        tracing::info!("Successfully generated exercise");
                        Sourced::generated(exercise)
                    }
                    Err(e) => {
                        tracing::warn!("Error parsing exercise response: {}", e);
                        self.fallback(req)
                    }
                }
            }
            Err(e) if self.settings.fallback_on_upstream_error => {
                tracing::error!("Text generation API failed for exercise: {}", e);
                self.fallback(req)
            }
            Err(e) => {
                tracing::error!("Text generation API failed for exercise: {}", e);
                return Err(e);
            }
        };

        EXERCISES_GENERATED_TOTAL
            .with_label_values(&[req.subject.as_str(), result.source.as_str()])
            .inc();

        Ok(result)
    }

    fn fallback(&self, req: &ExerciseRequest) -> Sourced<ExerciseResult> {
        let exercise = fallback_exercise(req.subject, req.difficulty);
        tracing::info!(
            "Falling back to canned exercise for subject={}, difficulty={}",
            req.subject,
            req.difficulty
        );
        Sourced::fallback(exercise)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentSource, Difficulty};
    use crate::services::llm_client::GenerationOptions;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Canned {
        reply: Result<&'static str, ()>,
        prompts: Mutex<Vec<(String, GenerationOptions)>>,
    }

    impl Canned {
        fn new(reply: Result<&'static str, ()>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(
            &self,
            prompt: &str,
            options: &GenerationOptions,
        ) -> Result<String, GenerationError> {
            self.prompts
                .lock()
                .unwrap()
                .push((prompt.to_string(), options.clone()));
            self.reply
                .map(str::to_string)
                .map_err(|_| GenerationError::MissingCredential)
        }

        fn model(&self) -> &str {
            "canned"
        }
    }

    fn settings(fallback_on_upstream_error: bool) -> PipelineSettings {
        PipelineSettings {
            max_tokens: 1000,
            temperature: 0.7,
            fallback_on_upstream_error,
        }
    }

    #[tokio::test]
    async fn returns_generated_exercise_when_model_answers_with_json() {
        let generator = Canned::new(Ok(
            "Here you go:\n{\"exercise\": \"What is 2 + 2?\", \"answer\": \"4\"}",
        ));
        let service = ExerciseService::new(generator.clone(), settings(true));

        let result = service
            .generate_exercise(&ExerciseRequest::new("math", Difficulty::Easy, 2))
            .await
            .unwrap();

        assert_eq!(result.source, ContentSource::Generated);
        assert_eq!(result.value, ExerciseResult::new("What is 2 + 2?", "4"));

        let calls = generator.prompts.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.system, EXERCISE_SYSTEM_PROMPT);
        assert_eq!(calls[0].1.max_tokens, 1000);
    }

    #[tokio::test]
    async fn garbage_output_falls_back_to_table() {
        let service = ExerciseService::new(Canned::new(Ok("no json, sorry")), settings(false));

        let result = service
            .generate_exercise(&ExerciseRequest::new("science", Difficulty::Easy, 2))
            .await
            .unwrap();

        assert_eq!(result.source, ContentSource::Fallback);
        assert_eq!(result.value.answer, "Earth");
    }

    #[tokio::test]
    async fn upstream_failure_falls_back_by_default() {
        let service = ExerciseService::new(Canned::new(Err(())), settings(true));

        let result = service
            .generate_exercise(&ExerciseRequest::new("math", Difficulty::Easy, 2))
            .await
            .unwrap();

        assert_eq!(result.source, ContentSource::Fallback);
        assert_eq!(result.value.answer, "8");
    }

    #[tokio::test]
    async fn upstream_failure_is_returned_when_fallback_disabled() {
        let service = ExerciseService::new(Canned::new(Err(())), settings(false));

        let err = service
            .generate_exercise(&ExerciseRequest::new("math", Difficulty::Easy, 2))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::MissingCredential));
    }
}
