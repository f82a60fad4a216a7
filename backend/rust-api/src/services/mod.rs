use std::sync::Arc;

use crate::config::Config;
use crate::models::ContentSource;
use llm_client::{AnthropicClient, GenerationOptions, TextGenerator};

pub mod exercise_service;
pub mod fallback;
pub mod hint_service;
pub mod llm_client;
pub mod prompts;
pub mod response_parser;
pub mod subject_inference;

pub struct AppState {
    pub config: Config,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = AnthropicClient::new(&config.anthropic)?;
        tracing::info!(
            "Text generation client ready: model={}, base_url={}",
            config.anthropic.model,
            config.anthropic.base_url
        );
        Ok(Self::with_generator(config, Arc::new(client)))
    }

    /// Builds state around an arbitrary generator (used by tests).
    pub fn with_generator(config: Config, generator: Arc<dyn TextGenerator>) -> Self {
        Self { config, generator }
    }
}

/// Knobs shared by both pipelines, lifted out of `Config`.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    pub fallback_on_upstream_error: bool,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_tokens: config.anthropic.max_tokens,
            temperature: config.anthropic.temperature,
            fallback_on_upstream_error: config.generation.fallback_on_upstream_error,
        }
    }

    pub fn options(&self, system: &str) -> GenerationOptions {
        GenerationOptions {
            system: system.to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// A pipeline result together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sourced<T> {
    pub value: T,
    pub source: ContentSource,
}

impl<T> Sourced<T> {
    pub fn generated(value: T) -> Self {
        Self {
            value,
            source: ContentSource::Generated,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            source: ContentSource::Fallback,
        }
    }
}
