//! Core domain types for Mind Reader.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod history;
mod round;
mod session;
mod status;
pub mod ui;

pub use history::{HISTORY_CAPACITY, History};
pub use round::{Confidence, Guess, Round, Score, Winner};
pub use session::SessionToken;
pub use status::{RoundPhase, Status};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Action
// ============================================================================

/// Lowest symbol on the keypad.
pub const MIN_ACTION: u8 = 1;
/// Highest symbol on the keypad.
pub const MAX_ACTION: u8 = 8;

/// One human pick: an integer in `1..=8`.
///
/// The only way to build one is through a validating constructor, so holding an
/// `Action` proves the value is on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Action(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("action must be between {MIN_ACTION} and {MAX_ACTION}, got {0}")]
pub struct ActionRangeError(pub i64);

impl Action {
    /// Every action in keypad order.
    pub const ALL: [Action; 8] = [
        Action(1),
        Action(2),
        Action(3),
        Action(4),
        Action(5),
        Action(6),
        Action(7),
        Action(8),
    ];

    pub fn new(value: u8) -> Result<Self, ActionRangeError> {
        if (MIN_ACTION..=MAX_ACTION).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ActionRangeError(i64::from(value)))
        }
    }

    /// Map a keyboard character to an action (`'1'..='8'`).
    #[must_use]
    pub fn from_digit(ch: char) -> Option<Self> {
        let digit = ch.to_digit(10)?;
        Self::new(u8::try_from(digit).ok()?).ok()
    }

    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Zero-based position on the keypad.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - MIN_ACTION) as usize
    }
}

impl TryFrom<u8> for Action {
    type Error = ActionRangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for Action {
    type Error = ActionRangeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(|v| Self::new(v).ok())
            .ok_or(ActionRangeError(value))
    }
}

impl From<Action> for u8 {
    fn from(value: Action) -> Self {
        value.0
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
