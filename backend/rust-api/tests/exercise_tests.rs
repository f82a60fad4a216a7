mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{post_json, read_json, Reply, StubGenerator};
use kids_learning_api::config::Config;
use serde_json::json;
use tower::ServiceExt;

const APPLES: &str =
    "If you have 5 apples and your friend gives you 3 more apples, how many apples do you have now?";

#[tokio::test]
async fn test_generated_exercise_is_returned() {
    let generator = StubGenerator::new(Reply::Text(
        "Sure! {\"exercise\": \"What is 4 + 5?\", \"answer\": \"9\"}",
    ));
    let app = common::create_test_app(generator.clone());

    let (status, json) = post_json(
        &app,
        "/api/generate-exercise",
        json!({ "subject": "math", "difficulty": "easy", "grade": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["exercise"], "What is 4 + 5?");
    assert_eq!(json["answer"], "9");

    let prompts = generator.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("grade 2"));
}

#[tokio::test]
async fn test_failing_upstream_yields_fixed_fallback() {
    let app = common::create_test_app(StubGenerator::new(Reply::Fail));

    let (status, json) = post_json(
        &app,
        "/api/generate-exercise",
        json!({ "subject": "math", "difficulty": "easy", "grade": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["exercise"], APPLES);
    assert_eq!(json["answer"], "8");
}

#[tokio::test]
async fn test_every_subject_and_difficulty_is_non_empty_despite_garbage() {
    for reply in [Reply::Fail, Reply::Text("I'd rather tell a story."), Reply::Text("{broken")] {
        let app = common::create_test_app(StubGenerator::new(reply));

        for subject in ["math", "english", "science"] {
            for difficulty in ["easy", "medium", "hard"] {
                let (status, json) = post_json(
                    &app,
                    "/api/generate-exercise",
                    json!({ "subject": subject, "difficulty": difficulty, "grade": 2 }),
                )
                .await;

                assert_eq!(status, StatusCode::OK, "{subject}/{difficulty}");
                assert!(!json["exercise"].as_str().unwrap().is_empty());
                assert!(!json["answer"].as_str().unwrap().is_empty());
            }
        }
    }
}

#[tokio::test]
async fn test_incomplete_json_falls_back() {
    let app = common::create_test_app(StubGenerator::new(Reply::Text(
        "{\"exercise\": \"Name a red fruit.\"}",
    )));

    let (status, json) = post_json(
        &app,
        "/api/generate-exercise",
        json!({ "subject": "science", "difficulty": "easy", "grade": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["exercise"], "Name the planet we live on.");
    assert_eq!(json["answer"], "Earth");
}

#[tokio::test]
async fn test_unknown_subject_uses_generic_template_and_fallback() {
    let generator = StubGenerator::new(Reply::Fail);
    let app = common::create_test_app(generator.clone());

    let (status, json) = post_json(
        &app,
        "/api/generate-exercise",
        json!({ "subject": "geography", "difficulty": "hard", "grade": 3 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["answer"], "solid, liquid, gas");
    assert!(generator.prompts.lock().unwrap()[0].contains("geography exercises"));
}

#[tokio::test]
async fn test_missing_parameters_are_rejected() {
    let app = common::create_test_app(StubGenerator::new(Reply::Fail));

    let bodies = [
        json!({ "difficulty": "easy", "grade": 2 }),
        json!({ "subject": "math", "grade": 2 }),
        json!({ "subject": "math", "difficulty": "easy" }),
        json!({ "subject": "", "difficulty": "easy", "grade": 2 }),
        json!({}),
    ];

    for body in bodies {
        let (status, json) = post_json(&app, "/api/generate-exercise", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(json["error"].is_string(), "{body}");
    }
}

#[tokio::test]
async fn test_invalid_difficulty_is_rejected() {
    let app = common::create_test_app(StubGenerator::new(Reply::Fail));

    let (status, json) = post_json(
        &app,
        "/api/generate-exercise",
        json!({ "subject": "math", "difficulty": "nightmare", "grade": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("difficulty"));
}

#[tokio::test]
async fn test_malformed_body_is_a_client_error() {
    let app = common::create_test_app(StubGenerator::new(Reply::Fail));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate-exercise")
                .header("content-type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    let (status, json) = read_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_non_post_method_is_not_allowed() {
    let app = common::create_test_app(StubGenerator::new(Reply::Fail));

    for method in ["GET", "PUT", "DELETE"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/api/generate-exercise")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let (status, json) = read_json(response).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(json["error"], "Method not allowed");
    }
}

#[tokio::test]
async fn test_upstream_error_surfaces_when_fallback_disabled() {
    let mut config = Config::default();
    config.generation.fallback_on_upstream_error = false;
    let app = common::create_test_app_with(StubGenerator::new(Reply::Fail), config);

    let (status, json) = post_json(
        &app,
        "/api/generate-exercise",
        json!({ "subject": "math", "difficulty": "easy", "grade": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Failed to call text generation API");
    assert_eq!(json["debug"]["status"], 401);
}

#[tokio::test]
async fn test_parse_error_still_falls_back_when_upstream_fallback_disabled() {
    let mut config = Config::default();
    config.generation.fallback_on_upstream_error = false;
    let app = common::create_test_app_with(StubGenerator::new(Reply::Text("nope")), config);

    let (status, json) = post_json(
        &app,
        "/api/generate-exercise",
        json!({ "subject": "english", "difficulty": "easy", "grade": 2 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["answer"], "cold");
}

#[tokio::test]
async fn test_upstream_error_carries_trace_id() {
    let mut config = Config::default();
    config.generation.fallback_on_upstream_error = false;
    let app = common::create_test_app_with(StubGenerator::new(Reply::Fail), config);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate-exercise")
                .header("content-type", "application/json")
                .header("x-trace-id", "trace-upstream-1")
                .body(Body::from(
                    json!({ "subject": "math", "difficulty": "easy", "grade": 2 }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-trace-id"], "trace-upstream-1");

    let (status, json) = read_json(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["debug"]["trace_id"], "trace-upstream-1");
}
