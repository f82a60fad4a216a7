use std::sync::Arc;

use crate::metrics::{self, HINTS_GENERATED_TOTAL};
use crate::models::{
    hint::{HintRequest, HintResult},
    Subject,
};
use crate::services::{
    fallback::fallback_hint,
    llm_client::{GenerationError, TextGenerator},
    prompts::{hint_prompt, HINT_SYSTEM_PROMPT},
    response_parser::parse_hint,
    subject_inference::infer_subject,
    AppState, PipelineSettings, Sourced,
};

pub struct HintService {
    generator: Arc<dyn TextGenerator>,
    settings: PipelineSettings,
}

impl HintService {
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

    pub async fn generate_hint(
        &self,
        req: &HintRequest,
    ) -> Result<Sourced<HintResult>, GenerationError> {
        let subject = self.resolve_subject(req);
        tracing::info!(
            "Generating hint: subject={}, grade={}, exercise={:?}",
            subject,
            req.grade,
            req.exercise
        );

        let prompt = hint_prompt(req, subject);
        tracing::debug!("Hint prompt: {}", prompt);

        let options = self.settings.options(HINT_SYSTEM_PROMPT);
        let raw =
            metrics::track_llm_call("hint", self.generator.generate(&prompt, &options)).await;

        let result = match raw {
            Ok(text) => {
                tracing::debug!("Hint response content: {}", text);
                match parse_hint(&text) {
                    Ok(hint) => {
                        tracing::info!("Successfully generated hint");
                        Sourced::generated(HintResult { hint })
                    }
                    Err(e) => {
                        tracing::warn!("Error parsing hint response: {}", e);
                        Self::fallback(req)
                    }
                }
            }
            Err(e) if self.settings.fallback_on_upstream_error => {
                tracing::warn!("Text generation API failed for hint: {}", e);
                Self::fallback(req)
            }
            Err(e) => {
                tracing::error!("Text generation API failed for hint: {}", e);
                return Err(e);
            }
        };

        HINTS_GENERATED_TOTAL
            .with_label_values(&[subject.as_str(), result.source.as_str()])
            .inc();

        Ok(result)
    }

    fn resolve_subject(&self, req: &HintRequest) -> Subject {
        match req.subject {
            Some(subject) => subject,
            None => {
                let inferred = infer_subject(&req.exercise);
                tracing::debug!("Subject not supplied, inferred {}", inferred);
                inferred
            }
        }
    }

    fn fallback(req: &HintRequest) -> Sourced<HintResult> {
        tracing::debug!("Using fallback hint");
        Sourced::fallback(HintResult {
            hint: fallback_hint(&req.exercise),
        })
    }
}
