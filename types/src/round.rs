//! Round outcomes and the scoreboard.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Action;

/// The predictor's guess for a round.
///
/// Kept as the raw integer the predictor sent: a value outside the keypad is
/// still a valid guess, it just never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guess(i64);

impl Guess {
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Exact integer equality against the human's pick.
    #[must_use]
    pub fn matches(self, action: Action) -> bool {
        self.0 == i64::from(action.value())
    }

    /// Whether the guess names a keypad symbol at all.
    #[must_use]
    pub fn as_action(self) -> Option<Action> {
        Action::try_from(self.0).ok()
    }
}

impl From<Action> for Guess {
    fn from(action: Action) -> Self {
        Self(i64::from(action.value()))
    }
}

impl fmt::Display for Guess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Self-reported certainty attached to a prediction. Display only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Confidence {
    Low,
    High,
    Other(String),
}

impl From<String> for Confidence {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Other(value),
        }
    }
}

impl From<Confidence> for String {
    fn from(value: Confidence) -> Self {
        match value {
            Confidence::Low => "Low".to_string(),
            Confidence::High => "High".to_string(),
            Confidence::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Low => f.write_str("Low"),
            Confidence::High => f.write_str("High"),
            Confidence::Other(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    Ai,
    Human,
}

impl Winner {
    /// AI wins on an exact match, the human wins otherwise. There is no draw.
    #[must_use]
    pub fn decide(human: Action, predicted: Guess) -> Self {
        if predicted.matches(human) {
            Winner::Ai
        } else {
            Winner::Human
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Winner::Ai => "AI Won",
            Winner::Human => "You Won",
        }
    }
}

/// One completed predict -> compare -> learn cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    human: Action,
    predicted: Guess,
    winner: Winner,
    confidence: Option<Confidence>,
}

impl Round {
    /// Build a round, deciding the winner from the two picks.
    #[must_use]
    pub fn new(human: Action, predicted: Guess, confidence: Option<Confidence>) -> Self {
        Self {
            human,
            predicted,
            winner: Winner::decide(human, predicted),
            confidence,
        }
    }

    #[must_use]
    pub fn human(&self) -> Action {
        self.human
    }

    #[must_use]
    pub fn predicted(&self) -> Guess {
        self.predicted
    }

    #[must_use]
    pub fn winner(&self) -> Winner {
        self.winner
    }

    #[must_use]
    pub fn confidence(&self) -> Option<&Confidence> {
        self.confidence.as_ref()
    }
}

/// Running totals. Exactly one counter moves per completed round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub ai: u32,
    pub human: u32,
}

impl Score {
    pub fn record(&mut self, winner: Winner) {
        match winner {
            Winner::Ai => self.ai = self.ai.saturating_add(1),
            Winner::Human => self.human = self.human.saturating_add(1),
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.ai.saturating_add(self.human)
    }

    /// Share of rounds the predictor got right, `None` before the first round.
    #[must_use]
    pub fn ai_hit_rate(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(f64::from(self.ai) / f64::from(total)),
        }
    }
}
