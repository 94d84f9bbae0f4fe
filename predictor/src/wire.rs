//! Typed request/response bodies for the predictor HTTP API.
//!
//! Parse errors happen at the serde boundary, not scattered through the client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `POST /predict`
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub session_id: &'a str,
}

/// `POST /learn`
#[derive(Debug, Serialize)]
pub struct LearnRequest<'a> {
    pub session_id: &'a str,
    pub user_move: u8,
}

#[derive(Debug, Deserialize)]
pub struct PredictResponse {
    pub prediction: i64,
    /// Kept loose: a confidence of the wrong shape is dropped, not fatal.
    #[serde(default)]
    pub confidence: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LearnResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub loss: Option<f64>,
}

/// `GET /`
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
