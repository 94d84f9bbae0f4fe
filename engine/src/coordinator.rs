//! Round coordination state machine.
//!
//! One round is `predict -> reconcile -> learn -> commit`. The predictor must
//! commit to its guess before it is told the true action, so the order never
//! changes. Score and history are only touched at the commit, which makes a
//! round that fails anywhere leave no trace beyond the status label.
//!
//! At most one round is in flight. Submissions that arrive while a round is
//! running are dropped, not queued.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mindreader_predictor::{Predictor, PredictorError};
use mindreader_types::{Action, History, Round, RoundPhase, Score, SessionToken, Status};

/// Result of handing an action to the coordinator.
#[derive(Debug)]
pub enum Submission {
    /// A round was already in flight; nothing happened.
    Ignored,
    Completed(Round),
    /// The round was abandoned; score and history are unchanged.
    Failed(PredictorError),
}

impl Submission {
    #[must_use]
    pub fn round(&self) -> Option<&Round> {
        match self {
            Submission::Completed(round) => Some(round),
            Submission::Ignored | Submission::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, Submission::Ignored)
    }
}

/// Everything the presentation layer reads, captured under one lock.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorSnapshot {
    pub phase: RoundPhase,
    pub status: Status,
    pub score: Score,
    /// Newest first.
    pub history: Vec<Round>,
}

#[derive(Debug, Default)]
struct RoundState {
    phase: RoundPhase,
    status: Status,
    score: Score,
    history: History,
}

impl RoundState {
    fn transition(&mut self, to: RoundPhase) {
        tracing::debug!(from = %self.phase, %to, "Round phase transition");
        self.phase = to;
    }

    fn abandon(&mut self, reason: String) {
        self.transition(RoundPhase::Failed);
        self.status = Status::Failed { reason };
        self.transition(RoundPhase::Idle);
    }
}

fn lock(state: &Mutex<RoundState>) -> MutexGuard<'_, RoundState> {
    // State is plain data updated in single assignments; a panic elsewhere
    // cannot leave it half-written.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Proof that the single-flight guard admitted an action.
///
/// Dropping it without running the round (e.g. the task driving it was
/// aborted) fails the round so the coordinator returns to `Idle`.
#[derive(Debug)]
pub struct AdmittedRound {
    action: Action,
    state: Arc<Mutex<RoundState>>,
    armed: bool,
}

impl AdmittedRound {
    #[must_use]
    pub fn action(&self) -> Action {
        self.action
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AdmittedRound {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!(action = %self.action, "Round abandoned before completion");
            lock(&self.state).abandon("round cancelled".to_string());
        }
    }
}

/// Owns the session token, score, history and status for one game session.
#[derive(Debug)]
pub struct RoundCoordinator<P> {
    predictor: P,
    token: SessionToken,
    state: Arc<Mutex<RoundState>>,
}

impl<P: Predictor> RoundCoordinator<P> {
    /// Start a session with a freshly generated token.
    pub fn new(predictor: P) -> Self {
        Self::with_token(predictor, SessionToken::generate())
    }

    pub fn with_token(predictor: P, token: SessionToken) -> Self {
        tracing::info!(session = %token, "Session started");
        Self {
            predictor,
            token,
            state: Arc::new(Mutex::new(RoundState::default())),
        }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    pub fn phase(&self) -> RoundPhase {
        lock(&self.state).phase
    }

    pub fn status(&self) -> Status {
        lock(&self.state).status.clone()
    }

    pub fn score(&self) -> Score {
        lock(&self.state).score
    }

    /// Newest-first copy of the round history.
    pub fn history(&self) -> Vec<Round> {
        lock(&self.state).history.snapshot()
    }

    pub fn snapshot(&self) -> CoordinatorSnapshot {
        let state = lock(&self.state);
        CoordinatorSnapshot {
            phase: state.phase,
            status: state.status.clone(),
            score: state.score,
            history: state.history.snapshot(),
        }
    }

    /// Play one full round for `action`.
    ///
    /// Returns [`Submission::Ignored`] without side effects if a round is
    /// already in flight.
    pub async fn submit_action(&self, action: Action) -> Submission {
        match self.try_begin(action) {
            Some(admitted) => self.run(admitted).await,
            None => Submission::Ignored,
        }
    }

    /// Synchronous half of [`submit_action`](Self::submit_action): the
    /// single-flight check and the move to `AwaitingPrediction`.
    ///
    /// Lets a caller reserve the round before handing the rest to a spawned
    /// task, so submission order is decided here and not by the scheduler.
    pub fn try_begin(&self, action: Action) -> Option<AdmittedRound> {
        let mut state = lock(&self.state);
        if !state.phase.is_idle() {
            tracing::debug!(%action, phase = %state.phase, "Round in flight; ignoring action");
            return None;
        }
        state.transition(RoundPhase::AwaitingPrediction);
        state.status = Status::Querying;
        Some(AdmittedRound {
            action,
            state: Arc::clone(&self.state),
            armed: true,
        })
    }

    /// Drive an admitted round to `Resolved` or `Failed`.
    ///
    /// A round admitted by a different coordinator is not run; dropping its
    /// guard fails it on the coordinator that admitted it.
    pub async fn run(&self, admitted: AdmittedRound) -> Submission {
        if !Arc::ptr_eq(&admitted.state, &self.state) {
            tracing::warn!(action = %admitted.action, "Round admitted by another coordinator");
            return Submission::Ignored;
        }
        let action = admitted.action;

        let prediction = match self.predictor.predict(&self.token).await {
            Ok(prediction) => prediction,
            Err(err) => return self.fail(admitted, err),
        };

        let pending = {
            let mut state = lock(&self.state);
            state.transition(RoundPhase::Reconciling);
            let round = Round::new(action, prediction.guess, prediction.confidence);
            state.transition(RoundPhase::AwaitingLearnAck);
            round
        };

        match self.predictor.learn(&self.token, action).await {
            Ok(ack) => {
                tracing::debug!(status = ?ack.status, loss = ?ack.loss, "Predictor learned");
                self.commit(admitted, pending)
            }
            Err(err) => self.fail(admitted, err),
        }
    }

    fn commit(&self, admitted: AdmittedRound, round: Round) -> Submission {
        {
            let mut state = lock(&self.state);
            state.transition(RoundPhase::Resolved);
            state.score.record(round.winner());
            state.history.append(round.clone());
            state.status = Status::Resolved {
                winner: round.winner(),
                predicted: round.predicted(),
            };
            tracing::info!(
                human = %round.human(),
                predicted = %round.predicted(),
                winner = ?round.winner(),
                ai = state.score.ai,
                you = state.score.human,
                "Round resolved"
            );
            state.transition(RoundPhase::Idle);
        }
        admitted.disarm();
        Submission::Completed(round)
    }

    fn fail(&self, admitted: AdmittedRound, err: PredictorError) -> Submission {
        tracing::warn!(action = %admitted.action, error = %err, "Round failed");
        lock(&self.state).abandon(err.short_reason());
        admitted.disarm();
        Submission::Failed(err)
    }
}
