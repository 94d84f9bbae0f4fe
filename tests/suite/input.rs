//! Keyboard and mouse feed the same round

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{Terminal, backend::TestBackend};

use mindreader_engine::{Action, InputSource};
use mindreader_tui::{KeypadLayout, apply_event, draw};

use crate::common::{app_for, bodies, mount_learn_ok, mount_prediction, start_predictor_mock};

#[tokio::test]
async fn digit_and_click_send_identical_requests() {
    let server = start_predictor_mock().await;
    mount_prediction(&server, 1).await;
    mount_learn_ok(&server).await;
    let mut app = app_for(&server);

    let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
    let mut keypad = KeypadLayout::default();
    terminal.draw(|frame| keypad = draw(frame, &app)).unwrap();

    let five = Action::new(5).unwrap();
    apply_event(
        &mut app,
        Event::Key(KeyEvent::new(KeyCode::Char('5'), KeyModifiers::NONE)),
        &keypad,
    );
    let by_key = app.next_round_event().await.unwrap();

    let button = keypad.button(five);
    apply_event(
        &mut app,
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: button.x + button.width / 2,
            row: button.y + 1,
            modifiers: KeyModifiers::NONE,
        }),
        &keypad,
    );
    let by_click = app.next_round_event().await.unwrap();

    assert_eq!(by_key.source, InputSource::Keyboard);
    assert_eq!(by_click.source, InputSource::Pointer);
    assert_eq!(by_key.action, by_click.action);
    assert_eq!(
        by_key.submission.round().unwrap(),
        by_click.submission.round().unwrap()
    );

    let learns = bodies(&server, "/learn").await;
    assert_eq!(learns.len(), 2);
    assert_eq!(learns[0], learns[1]);
}

#[tokio::test]
async fn presses_while_waiting_on_the_predictor_are_dropped() {
    let server = start_predictor_mock().await;
    wiremock::Mock::given(wiremock::matchers::method("POST"))
        .and(wiremock::matchers::path("/predict"))
        .respond_with(
            wiremock::ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "prediction": 2 }))
                .set_delay(std::time::Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_learn_ok(&server).await;
    let mut app = app_for(&server);
    let keypad = KeypadLayout::default();

    for ch in ['2', '3', '4'] {
        apply_event(
            &mut app,
            Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE)),
            &keypad,
        );
    }
    let event = app.next_round_event().await.unwrap();
    assert_eq!(event.action, Action::new(2).unwrap());

    assert_eq!(bodies(&server, "/predict").await.len(), 1);
    assert_eq!(app.snapshot().history.len(), 1);
}
