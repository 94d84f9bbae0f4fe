//! Core engine for Mind Reader - state machine and orchestration.
//!
//! This crate contains the App state without TUI dependencies. The
//! [`RoundCoordinator`] owns the game state; [`App`] drives it from the frame
//! loop by spawning one task per admitted round and draining the results.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

mod coordinator;

pub use coordinator::{AdmittedRound, CoordinatorSnapshot, RoundCoordinator, Submission};

pub use mindreader_config::MindReaderConfig;
pub use mindreader_predictor::{
    self, HttpPredictor, Predictor, PredictorConfig, PredictorError,
};
pub use mindreader_types::{
    Action, Confidence, Guess, HISTORY_CAPACITY, Round, RoundPhase, Score, SessionToken, Status,
    Winner,
    ui::{InputSource, UiOptions},
};

const ROUND_EVENT_CHANNEL_CAPACITY: usize = 16;

/// How long the newest history row stays highlighted after a round resolves.
const RESULT_FLASH: Duration = Duration::from_millis(600);

/// Reported by a round task when its round is over.
#[derive(Debug)]
pub struct RoundEvent {
    pub action: Action,
    pub source: InputSource,
    pub submission: Submission,
}

/// Application state shared by the TUI and the frame loop.
pub struct App<P: Predictor + 'static = HttpPredictor> {
    coordinator: Arc<RoundCoordinator<P>>,
    round_tx: mpsc::Sender<RoundEvent>,
    round_rx: mpsc::Receiver<RoundEvent>,
    predictor_label: String,
    ui_options: UiOptions,
    should_quit: bool,
    /// Request to toggle between fullscreen and inline UI modes.
    toggle_screen_mode: bool,
    tick: usize,
    rounds_played: usize,
    /// Recently completed rounds with their 1-based number, oldest first.
    finished: VecDeque<(usize, Round)>,
    flash_until: Option<Instant>,
}

impl App<HttpPredictor> {
    /// Build the app against the configured HTTP predictor.
    pub fn new(config: Option<&MindReaderConfig>) -> anyhow::Result<Self> {
        let predictor_config = MindReaderConfig::predictor_config(config);
        let predictor = HttpPredictor::new(&predictor_config)?;
        let label = predictor.base_url().to_string();
        Ok(Self::with_predictor(
            predictor,
            SessionToken::generate(),
            label,
            MindReaderConfig::ui_options(config),
        ))
    }

    /// Best-effort liveness check in the background; never blocks play.
    pub fn spawn_probe(&self) -> tokio::task::JoinHandle<()> {
        let coordinator = Arc::clone(&self.coordinator);
        let url = self.predictor_label.clone();
        tokio::spawn(async move {
            match coordinator.predictor().probe().await {
                Ok(status) => tracing::info!(%status, %url, "Predictor online"),
                Err(e) => tracing::warn!(error = %e, %url, "Predictor probe failed"),
            }
        })
    }
}

impl<P: Predictor + 'static> App<P> {
    pub fn with_predictor(
        predictor: P,
        token: SessionToken,
        predictor_label: impl Into<String>,
        ui_options: UiOptions,
    ) -> Self {
        let (round_tx, round_rx) = mpsc::channel(ROUND_EVENT_CHANNEL_CAPACITY);
        Self {
            coordinator: Arc::new(RoundCoordinator::with_token(predictor, token)),
            round_tx,
            round_rx,
            predictor_label: predictor_label.into(),
            ui_options,
            should_quit: false,
            toggle_screen_mode: false,
            tick: 0,
            rounds_played: 0,
            finished: VecDeque::with_capacity(HISTORY_CAPACITY),
            flash_until: None,
        }
    }

    /// Single entry point for every input source.
    ///
    /// Returns `false` when a round is already in flight and the action was
    /// dropped. Must be called from within a tokio runtime.
    pub fn submit_action(&mut self, action: Action, source: InputSource) -> bool {
        let Some(admitted) = self.coordinator.try_begin(action) else {
            tracing::debug!(%action, source = source.as_str(), "Action dropped; round in flight");
            return false;
        };
        tracing::debug!(%action, source = source.as_str(), "Action accepted");

        let coordinator = Arc::clone(&self.coordinator);
        let tx = self.round_tx.clone();
        tokio::spawn(async move {
            let submission = coordinator.run(admitted).await;
            let _ = tx
                .send(RoundEvent {
                    action,
                    source,
                    submission,
                })
                .await;
        });
        true
    }

    /// Drain finished rounds. Call once per frame.
    pub fn process_round_events(&mut self) {
        while let Ok(event) = self.round_rx.try_recv() {
            self.note_round_event(&event);
        }
    }

    /// Wait for the next finished round. Used by callers without a frame loop.
    pub async fn next_round_event(&mut self) -> Option<RoundEvent> {
        let event = self.round_rx.recv().await?;
        self.note_round_event(&event);
        Some(event)
    }

    fn note_round_event(&mut self, event: &RoundEvent) {
        match &event.submission {
            Submission::Completed(round) => {
                self.rounds_played = self.rounds_played.saturating_add(1);
                if self.finished.len() == HISTORY_CAPACITY {
                    self.finished.pop_front();
                }
                self.finished.push_back((self.rounds_played, round.clone()));
                self.flash_until = Some(Instant::now() + RESULT_FLASH);
            }
            Submission::Failed(e) => {
                tracing::debug!(action = %event.action, error = %e, "Round task reported failure");
            }
            Submission::Ignored => {}
        }
    }

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.flash_until.is_some_and(|until| Instant::now() >= until) {
            self.flash_until = None;
        }
    }

    pub fn tick_count(&self) -> usize {
        self.tick
    }

    /// Whether the newest history row should be drawn highlighted.
    pub fn result_flash_active(&self) -> bool {
        self.flash_until.is_some()
    }

    pub fn coordinator(&self) -> &RoundCoordinator<P> {
        &self.coordinator
    }

    pub fn snapshot(&self) -> CoordinatorSnapshot {
        self.coordinator.snapshot()
    }

    pub fn is_busy(&self) -> bool {
        self.coordinator.phase().is_busy()
    }

    pub fn session_token(&self) -> &SessionToken {
        self.coordinator.token()
    }

    pub fn predictor_label(&self) -> &str {
        &self.predictor_label
    }

    pub fn rounds_played(&self) -> usize {
        self.rounds_played
    }

    /// Rounds reported back by their tasks, numbered in the order they
    /// finished. Only the most recent [`HISTORY_CAPACITY`] are kept.
    pub fn finished_rounds(&self) -> impl Iterator<Item = (usize, &Round)> {
        self.finished.iter().map(|(number, round)| (*number, round))
    }

    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn request_toggle_screen_mode(&mut self) {
        self.toggle_screen_mode = true;
    }

    /// Check if screen mode toggle was requested and clear the flag.
    pub fn take_toggle_screen_mode(&mut self) -> bool {
        std::mem::take(&mut self.toggle_screen_mode)
    }
}
