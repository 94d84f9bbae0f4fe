//! Shared test utilities and fixtures
//!
//! A wiremock server standing in for the predictor service, plus helpers to
//! point an [`App`] at it and inspect what it received.

#![allow(dead_code)]

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mindreader_config::{PredictorSection, resolve_predictor_config};
use mindreader_engine::{App, HttpPredictor, SessionToken, UiOptions};

pub const TEST_TOKEN: &str = "user_integration";

/// Start a mock server that simulates the predictor service
pub async fn start_predictor_mock() -> MockServer {
    MockServer::start().await
}

/// Mount a `/predict` response that always guesses `prediction`
pub async fn mount_prediction(server: &MockServer, prediction: i64) {
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "prediction": prediction,
            "confidence": "high"
        })))
        .mount(server)
        .await;
}

/// Mount a `/predict` response that answers `prediction` once, then falls through
pub async fn mount_prediction_once(server: &MockServer, prediction: i64) {
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "prediction": prediction })),
        )
        .up_to_n_times(1)
        .mount(server)
        .await;
}

/// Mount a successful `/learn` acknowledgement
pub async fn mount_learn_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/learn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "learned",
            "loss": 0.42
        })))
        .mount(server)
        .await;
}

/// Mount a bare status code on `endpoint`, `times` times (or forever with `None`)
pub async fn mount_status(server: &MockServer, endpoint: &str, status: u16, times: Option<u64>) {
    let mock = Mock::given(method("POST"))
        .and(path(endpoint))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream trouble"));
    let mock = match times {
        Some(n) => mock.up_to_n_times(n),
        None => mock,
    };
    mock.mount(server).await;
}

/// An app wired to `server` with a fixed session token.
pub fn app_for(server: &MockServer) -> App {
    let section = PredictorSection {
        base_url: Some(server.uri()),
        request_timeout_secs: Some(5),
        connect_timeout_secs: Some(2),
    };
    let config = resolve_predictor_config(Some(&section), None);
    assert_eq!(config.request_timeout, Duration::from_secs(5));
    let predictor = HttpPredictor::new(&config).expect("mock URL is valid");
    let label = predictor.base_url().to_string();
    App::with_predictor(
        predictor,
        SessionToken::from_string(TEST_TOKEN),
        label,
        UiOptions::default(),
    )
}

/// JSON bodies the server received on `endpoint`, oldest first.
pub async fn bodies(server: &MockServer, endpoint: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|req| req.url.path() == endpoint)
        .map(|req| serde_json::from_slice(&req.body).expect("request body is JSON"))
        .collect()
}
