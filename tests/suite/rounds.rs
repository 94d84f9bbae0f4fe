//! Full rounds against a mock predictor over real HTTP

use mindreader_engine::{
    Action, Confidence, HISTORY_CAPACITY, InputSource, Score, Status, Submission, Winner,
};

use crate::common::{
    TEST_TOKEN, app_for, bodies, mount_learn_ok, mount_prediction, mount_prediction_once,
    start_predictor_mock,
};

fn action(v: u8) -> Action {
    Action::new(v).unwrap()
}

#[tokio::test]
async fn matching_guess_is_an_ai_win() {
    let server = start_predictor_mock().await;
    mount_prediction(&server, 3).await;
    mount_learn_ok(&server).await;
    let mut app = app_for(&server);

    assert!(app.submit_action(action(3), InputSource::Keyboard));
    let event = app.next_round_event().await.unwrap();

    let round = event.submission.round().unwrap();
    assert_eq!(round.winner(), Winner::Ai);
    assert_eq!(round.confidence(), Some(&Confidence::High));

    let snapshot = app.snapshot();
    assert_eq!(snapshot.score, Score { ai: 1, human: 0 });
    assert_eq!(snapshot.status.to_string(), "AI WON! It predicted 3");
}

#[tokio::test]
async fn missed_guess_is_a_human_win() {
    let server = start_predictor_mock().await;
    mount_prediction(&server, 5).await;
    mount_learn_ok(&server).await;
    let mut app = app_for(&server);

    app.submit_action(action(2), InputSource::Pointer);
    app.next_round_event().await.unwrap();

    let snapshot = app.snapshot();
    assert_eq!(snapshot.score, Score { ai: 0, human: 1 });
    assert_eq!(snapshot.history[0].winner(), Winner::Human);
    assert!(matches!(
        snapshot.status,
        Status::Resolved {
            winner: Winner::Human,
            ..
        }
    ));
}

#[tokio::test]
async fn wire_bodies_carry_one_session_token() {
    let server = start_predictor_mock().await;
    mount_prediction(&server, 1).await;
    mount_learn_ok(&server).await;
    let mut app = app_for(&server);

    app.submit_action(action(7), InputSource::Keyboard);
    app.next_round_event().await.unwrap();

    let predicts = bodies(&server, "/predict").await;
    let learns = bodies(&server, "/learn").await;
    assert_eq!(predicts, vec![serde_json::json!({ "session_id": TEST_TOKEN })]);
    assert_eq!(
        learns,
        vec![serde_json::json!({ "session_id": TEST_TOKEN, "user_move": 7 })]
    );
}

#[tokio::test]
async fn every_action_moves_exactly_one_counter() {
    let server = start_predictor_mock().await;
    mount_prediction(&server, 4).await;
    mount_learn_ok(&server).await;
    let mut app = app_for(&server);

    for (i, a) in Action::ALL.into_iter().enumerate() {
        let before = app.snapshot().score;
        app.submit_action(a, InputSource::Keyboard);
        let event = app.next_round_event().await.unwrap();
        assert!(matches!(event.submission, Submission::Completed(_)));

        let after = app.snapshot();
        assert_eq!(after.score.total(), before.total() + 1);
        assert_eq!(after.history[0].human(), a);
        assert_eq!(after.history.len(), i + 1);
    }
    assert_eq!(app.snapshot().score, Score { ai: 1, human: 7 });
}

#[tokio::test]
async fn history_keeps_the_ten_newest_rounds() {
    let server = start_predictor_mock().await;
    for guess in 1..=11 {
        mount_prediction_once(&server, guess).await;
    }
    mount_learn_ok(&server).await;
    let mut app = app_for(&server);

    for _ in 0..11 {
        app.submit_action(action(8), InputSource::Keyboard);
        app.next_round_event().await.unwrap();
    }

    let history = app.snapshot().history;
    assert_eq!(history.len(), HISTORY_CAPACITY);
    let guesses: Vec<i64> = history.iter().map(|r| r.predicted().value()).collect();
    assert_eq!(guesses, (2..=11).rev().collect::<Vec<_>>());
    assert_eq!(app.rounds_played(), 11);
}

#[tokio::test]
async fn out_of_range_guess_still_completes() {
    let server = start_predictor_mock().await;
    mount_prediction(&server, 42).await;
    mount_learn_ok(&server).await;
    let mut app = app_for(&server);

    app.submit_action(action(1), InputSource::Keyboard);
    let event = app.next_round_event().await.unwrap();

    let round = event.submission.round().unwrap();
    assert_eq!(round.predicted().value(), 42);
    assert_eq!(round.winner(), Winner::Human);
    assert_eq!(bodies(&server, "/learn").await.len(), 1);
}
