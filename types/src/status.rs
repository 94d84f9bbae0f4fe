//! Round phase and the status label shown to the player.

use std::fmt;

use crate::{Guess, Winner};

/// Where the round coordinator is in its cycle.
///
/// `Resolved` and `Failed` are bookkeeping states: the coordinator passes
/// through them and settles back in `Idle` before the next action is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RoundPhase {
    #[default]
    Idle,
    AwaitingPrediction,
    Reconciling,
    AwaitingLearnAck,
    Resolved,
    Failed,
}

impl RoundPhase {
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, RoundPhase::Idle)
    }

    /// A round is in flight between acceptance and resolution.
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(
            self,
            RoundPhase::AwaitingPrediction | RoundPhase::Reconciling | RoundPhase::AwaitingLearnAck
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RoundPhase::Idle => "idle",
            RoundPhase::AwaitingPrediction => "awaiting_prediction",
            RoundPhase::Reconciling => "reconciling",
            RoundPhase::AwaitingLearnAck => "awaiting_learn_ack",
            RoundPhase::Resolved => "resolved",
            RoundPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for RoundPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable label for the most recent phase transition.
///
/// The label of a finished round stays up until the next action starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Waiting,
    Querying,
    Resolved { winner: Winner, predicted: Guess },
    Failed { reason: String },
}

impl Status {
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Status::Failed { .. })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Waiting => f.write_str("AI is waiting..."),
            Status::Querying => f.write_str("Reading mind..."),
            Status::Resolved {
                winner: Winner::Ai,
                predicted,
            } => write!(f, "AI WON! It predicted {predicted}"),
            Status::Resolved {
                winner: Winner::Human,
                predicted,
            } => write!(f, "YOU WON! AI guessed {predicted}"),
            Status::Failed { reason } => {
                write!(f, "Error: is the predictor running? ({reason})")
            }
        }
    }
}
