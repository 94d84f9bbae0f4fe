//! Config file drives the predictor client

use std::fs;
use std::time::Duration;

use mindreader_config::{MindReaderConfig, resolve_predictor_config};
use mindreader_engine::{Action, App, HttpPredictor, InputSource, SessionToken, Winner};

use crate::common::{mount_learn_ok, mount_prediction, start_predictor_mock};

#[tokio::test]
async fn app_built_from_config_file_talks_to_configured_url() {
    let server = start_predictor_mock().await;
    mount_prediction(&server, 8).await;
    mount_learn_ok(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        format!(
            "[predictor]\nbase_url = \"{}\"\nrequest_timeout_secs = 3\n\n[app]\nascii_only = true\n",
            server.uri()
        ),
    )
    .unwrap();

    let config = MindReaderConfig::load_from(&path).unwrap().unwrap();
    let predictor_config = resolve_predictor_config(config.predictor.as_ref(), None);
    assert_eq!(predictor_config.request_timeout, Duration::from_secs(3));

    let predictor = HttpPredictor::new(&predictor_config).unwrap();
    assert_eq!(predictor.base_url().as_str(), format!("{}/", server.uri()));

    let mut app = App::with_predictor(
        predictor,
        SessionToken::generate(),
        server.uri(),
        MindReaderConfig::ui_options(Some(&config)),
    );
    assert!(app.ui_options().ascii_only);
    assert!(app.session_token().as_str().starts_with("user_"));

    app.submit_action(Action::new(8).unwrap(), InputSource::Keyboard);
    let event = app.next_round_event().await.unwrap();
    assert_eq!(event.submission.round().unwrap().winner(), Winner::Ai);
}

#[test]
fn broken_config_file_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[predictor]\nrequest_timeout_secs = \"soon\"\n").unwrap();

    let err = MindReaderConfig::load_from(&path).unwrap_err();
    assert_eq!(err.path(), &path);
    assert!(err.to_string().contains("failed to parse config"));

    // Callers fall back to defaults.
    let fallback = resolve_predictor_config(None, None);
    assert_eq!(fallback, mindreader_predictor::PredictorConfig::default());
}
