//! Predictor client for Mind Reader.
//!
//! # Architecture
//!
//! The remote predictor is reachable through two operations:
//!
//! - `predict` - ask for the guess of the next action in a session
//! - `learn` - report the action the human actually picked
//!
//! [`Predictor`] is the seam the round coordinator depends on. [`HttpPredictor`]
//! is the production implementation speaking the JSON HTTP API described in
//! [`wire`]; tests substitute scripted implementations.
//!
//! # Error Handling
//!
//! Every failure is a [`PredictorError`]. Network problems and non-2xx statuses
//! are transport-class; a 2xx response without a usable `prediction` is a
//! protocol error. Nothing here retries: a failed call is reported once and the
//! caller decides what happens to the round.

mod error;
mod http;
pub mod wire;

use std::future::Future;
use std::time::Duration;

pub use error::{Endpoint, PredictorError};
pub use http::HttpPredictor;

pub use mindreader_types;
use mindreader_types::{Action, Confidence, Guess, SessionToken};

/// Public predictor deployment used when nothing is configured.
pub const DEFAULT_PREDICTOR_URL: &str = "https://mind-reader-ai.onrender.com";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Where and how to reach the predictor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictorConfig {
    pub base_url: String,
    /// Whole-request deadline; expiry surfaces as a transport error.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PREDICTOR_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

/// The predictor's answer to `predict`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prediction {
    pub guess: Guess,
    pub confidence: Option<Confidence>,
}

impl Prediction {
    #[must_use]
    pub fn new(guess: Guess) -> Self {
        Self {
            guess,
            confidence: None,
        }
    }
}

/// What the predictor said after `learn`, kept for logging only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LearnAck {
    pub status: Option<String>,
    pub loss: Option<f64>,
}

/// Remote predictor operations.
///
/// Both calls take the session token by reference; implementations must send
/// it unchanged so the predictor can correlate learning state.
pub trait Predictor: Send + Sync {
    fn predict(
        &self,
        token: &SessionToken,
    ) -> impl Future<Output = Result<Prediction, PredictorError>> + Send;

    fn learn(
        &self,
        token: &SessionToken,
        action: Action,
    ) -> impl Future<Output = Result<LearnAck, PredictorError>> + Send;
}

impl<P: Predictor> Predictor for std::sync::Arc<P> {
    fn predict(
        &self,
        token: &SessionToken,
    ) -> impl Future<Output = Result<Prediction, PredictorError>> + Send {
        (**self).predict(token)
    }

    fn learn(
        &self,
        token: &SessionToken,
        action: Action,
    ) -> impl Future<Output = Result<LearnAck, PredictorError>> + Send {
        (**self).learn(token, action)
    }
}
