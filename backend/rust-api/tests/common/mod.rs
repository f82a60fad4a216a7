#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use kids_learning_api::{
    config::Config,
    create_router,
    services::{
        llm_client::{GenerationError, GenerationOptions, TextGenerator},
        AppState,
    },
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Scripted stand-in for the text generation API.
pub enum Reply {
    Text(&'static str),
    Fail,
}

pub struct StubGenerator {
    reply: Reply,
    pub prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Fail => Err(GenerationError::Status {
                status: reqwest::StatusCode::UNAUTHORIZED,
                body: "invalid x-api-key".to_string(),
            }),
        }
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

pub fn create_test_app(generator: Arc<StubGenerator>) -> Router {
    create_test_app_with(generator, Config::default())
}

pub fn create_test_app_with(generator: Arc<StubGenerator>, config: Config) -> Router {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let app_state = Arc::new(AppState::with_generator(config, generator));
    create_router(app_state)
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    read_json(response).await
}

pub async fn read_json(response: axum::response::Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}
