//! Rounds that go wrong never touch the score

use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use mindreader_engine::{Action, InputSource, RoundPhase, Score, Submission};

use crate::common::{
    app_for, bodies, mount_learn_ok, mount_prediction, mount_status, start_predictor_mock,
};

fn action(v: u8) -> Action {
    Action::new(v).unwrap()
}

#[tokio::test]
async fn predict_failure_skips_learn_and_commits_nothing() {
    let server = start_predictor_mock().await;
    mount_status(&server, "/predict", 503, None).await;
    mount_learn_ok(&server).await;
    let mut app = app_for(&server);

    app.submit_action(action(3), InputSource::Keyboard);
    let event = app.next_round_event().await.unwrap();

    let Submission::Failed(err) = event.submission else {
        panic!("expected failure");
    };
    assert!(err.is_transport());

    let snapshot = app.snapshot();
    assert_eq!(snapshot.score, Score::default());
    assert!(snapshot.history.is_empty());
    assert_eq!(snapshot.phase, RoundPhase::Idle);
    assert!(snapshot.status.to_string().starts_with("Error:"));
    assert!(bodies(&server, "/learn").await.is_empty());
}

#[tokio::test]
async fn learn_failure_commits_nothing() {
    let server = start_predictor_mock().await;
    mount_prediction(&server, 2).await;
    mount_status(&server, "/learn", 500, None).await;
    let mut app = app_for(&server);

    app.submit_action(action(2), InputSource::Keyboard);
    let event = app.next_round_event().await.unwrap();

    assert!(matches!(event.submission, Submission::Failed(_)));
    let snapshot = app.snapshot();
    assert_eq!(snapshot.score, Score::default());
    assert!(snapshot.history.is_empty());
    assert!(snapshot.status.is_error());
    assert_eq!(app.rounds_played(), 0);
}

#[tokio::test]
async fn missing_prediction_field_is_a_protocol_error() {
    let server = start_predictor_mock().await;
    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "guess": 3 })))
        .mount(&server)
        .await;
    let mut app = app_for(&server);

    app.submit_action(action(3), InputSource::Keyboard);
    let event = app.next_round_event().await.unwrap();

    let Submission::Failed(err) = event.submission else {
        panic!("expected failure");
    };
    assert!(err.is_protocol());
    assert!(!err.is_transport());
}

#[tokio::test]
async fn next_round_after_a_failure_succeeds() {
    let server = start_predictor_mock().await;
    mount_status(&server, "/predict", 502, Some(1)).await;
    mount_prediction(&server, 6).await;
    mount_learn_ok(&server).await;
    let mut app = app_for(&server);

    app.submit_action(action(6), InputSource::Keyboard);
    let first = app.next_round_event().await.unwrap();
    assert!(matches!(first.submission, Submission::Failed(_)));

    assert!(app.submit_action(action(6), InputSource::Keyboard));
    let second = app.next_round_event().await.unwrap();
    assert!(matches!(second.submission, Submission::Completed(_)));
    assert_eq!(app.snapshot().score, Score { ai: 1, human: 0 });
    assert_eq!(bodies(&server, "/predict").await.len(), 2);
}

#[tokio::test]
async fn unreachable_predictor_fails_the_round() {
    let section = mindreader_config::PredictorSection {
        base_url: Some("http://127.0.0.1:1".to_string()),
        request_timeout_secs: Some(2),
        connect_timeout_secs: Some(1),
    };
    let config = mindreader_config::resolve_predictor_config(Some(&section), None);
    let predictor = mindreader_engine::HttpPredictor::new(&config).unwrap();
    let mut app = mindreader_engine::App::with_predictor(
        predictor,
        mindreader_engine::SessionToken::generate(),
        "http://127.0.0.1:1/",
        mindreader_engine::UiOptions::default(),
    );

    app.submit_action(action(1), InputSource::Pointer);
    let event = app.next_round_event().await.unwrap();

    let Submission::Failed(err) = event.submission else {
        panic!("expected failure");
    };
    assert!(err.is_transport());
    assert!(!app.is_busy());
}
