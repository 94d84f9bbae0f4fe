//! Input handling for the Mind Reader TUI.
//!
//! Keyboard digits and keypad clicks both end up in [`App::submit_action`];
//! nothing here knows about rounds beyond that call.

use anyhow::{Result, anyhow};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::debug;

use mindreader_engine::{Action, App, InputSource, Predictor};

use crate::keypad::KeypadLayout;

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 256; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the frame loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a thread parked on a full channel wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain pending terminal events. Returns `true` when the app should exit.
pub fn handle_events<P: Predictor + 'static>(
    app: &mut App<P>,
    input: &mut InputPump,
    keypad: &KeypadLayout,
) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, ev, keypad) {
            return Ok(true);
        }
        processed += 1;
    }
    Ok(app.should_quit())
}

/// Apply one terminal event. Returns `true` when the app should exit.
pub fn apply_event<P: Predictor + 'static>(
    app: &mut App<P>,
    ev: Event,
    keypad: &KeypadLayout,
) -> bool {
    match ev {
        Event::Key(key) => handle_key(app, key),
        Event::Mouse(mouse) => handle_mouse(app, mouse, keypad),
        _ => {}
    }
    app.should_quit()
}

fn handle_key<P: Predictor + 'static>(app: &mut App<P>, key: KeyEvent) {
    // Windows reports releases too; act on presses only.
    if key.kind != KeyEventKind::Press {
        return;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.request_quit(),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => app.request_quit(),
        KeyCode::Tab => app.request_toggle_screen_mode(),
        KeyCode::Char(ch) => {
            if let Some(action) = Action::from_digit(ch) {
                app.submit_action(action, InputSource::Keyboard);
            }
        }
        _ => {}
    }
}

fn handle_mouse<P: Predictor + 'static>(app: &mut App<P>, mouse: MouseEvent, keypad: &KeypadLayout) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    match keypad.hit(mouse.column, mouse.row) {
        Some(action) => {
            app.submit_action(action, InputSource::Pointer);
        }
        None => debug!(column = mouse.column, row = mouse.row, "Click outside keypad"),
    }
}
