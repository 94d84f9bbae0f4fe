//! reqwest-backed predictor client.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;

use mindreader_types::{Action, Confidence, Guess, SessionToken};

use crate::wire::{HealthResponse, LearnRequest, LearnResponse, PredictRequest, PredictResponse};
use crate::{Endpoint, LearnAck, Prediction, Predictor, PredictorConfig, PredictorError};

const TCP_KEEPALIVE_SECS: u64 = 60;

// One session talks to one host; a couple of idle connections is plenty.
const POOL_MAX_IDLE_PER_HOST: usize = 4;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_BODY_BYTES: usize = 32 * 1024;

const USER_AGENT: &str = concat!("mindreader/", env!("CARGO_PKG_VERSION"));

/// Predictor reached over its JSON HTTP API.
#[derive(Debug, Clone)]
pub struct HttpPredictor {
    client: Client,
    base: Url,
    predict_url: Url,
    learn_url: Url,
    health_url: Url,
}

impl HttpPredictor {
    pub fn new(config: &PredictorConfig) -> Result<Self, PredictorError> {
        let base = parse_base_url(&config.base_url)?;
        let client = base_client_builder(config)
            .build()
            .map_err(|e| PredictorError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            predict_url: endpoint_url(&base, Endpoint::Predict)?,
            learn_url: endpoint_url(&base, Endpoint::Learn)?,
            health_url: endpoint_url(&base, Endpoint::Health)?,
            base,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET /` liveness check. Returns the predictor's self-reported status.
    pub async fn probe(&self) -> Result<String, PredictorError> {
        let endpoint = Endpoint::Health;
        let response = self
            .client
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(|e| PredictorError::transport(endpoint, e))?;
        let response = check_status(endpoint, response).await?;
        let body = read_success_body(endpoint, response).await?;
        let health: HealthResponse = serde_json::from_slice(&body)
            .map_err(|e| PredictorError::protocol(endpoint, e.to_string()))?;
        Ok(health.status)
    }

    async fn post_json<B>(
        &self,
        endpoint: Endpoint,
        url: &Url,
        body: &B,
    ) -> Result<Response, PredictorError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| PredictorError::transport(endpoint, e))?;
        check_status(endpoint, response).await
    }
}

impl Predictor for HttpPredictor {
    async fn predict(&self, token: &SessionToken) -> Result<Prediction, PredictorError> {
        let endpoint = Endpoint::Predict;
        let request = PredictRequest {
            session_id: token.as_str(),
        };
        let response = self.post_json(endpoint, &self.predict_url, &request).await?;
        let body = read_success_body(endpoint, response).await?;
        let parsed: PredictResponse = serde_json::from_slice(&body)
            .map_err(|e| PredictorError::protocol(endpoint, e.to_string()))?;

        let confidence = match parsed.confidence {
            Some(serde_json::Value::String(raw)) => Some(Confidence::from(raw)),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => {
                tracing::debug!(%other, "Ignoring non-string prediction confidence");
                None
            }
        };

        Ok(Prediction {
            guess: Guess::new(parsed.prediction),
            confidence,
        })
    }

    async fn learn(&self, token: &SessionToken, action: Action) -> Result<LearnAck, PredictorError> {
        let request = LearnRequest {
            session_id: token.as_str(),
            user_move: action.value(),
        };
        let response = self
            .post_json(Endpoint::Learn, &self.learn_url, &request)
            .await?;

        // Anything 2xx is an acknowledgement; the body is informational, so an
        // oversized or broken one still counts as learned.
        let (body, truncated) = read_capped_body(Endpoint::Learn, response)
            .await
            .unwrap_or_default();
        if truncated {
            tracing::debug!("Ignoring oversized /learn body");
        }
        let parsed: LearnResponse = serde_json::from_slice(&body).unwrap_or_default();
        Ok(LearnAck {
            status: parsed.status,
            loss: parsed.loss,
        })
    }
}

fn base_client_builder(config: &PredictorConfig) -> reqwest::ClientBuilder {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(config.connect_timeout)
        .timeout(config.request_timeout)
        .redirect(reqwest::redirect::Policy::none())
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
}

/// Normalize the configured base so endpoint paths join beneath it.
fn parse_base_url(raw: &str) -> Result<Url, PredictorError> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed)
        .map_err(|e| PredictorError::Config(format!("invalid predictor URL {trimmed:?}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(PredictorError::Config(format!(
            "predictor URL must be http or https, got {:?}",
            url.scheme()
        )));
    }
    if url.cannot_be_a_base() {
        return Err(PredictorError::Config(format!(
            "predictor URL {trimmed:?} cannot be used as a base"
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn endpoint_url(base: &Url, endpoint: Endpoint) -> Result<Url, PredictorError> {
    base.join(endpoint.path())
        .map_err(|e| PredictorError::Config(format!("cannot build {endpoint} URL: {e}")))
}

/// Turn a non-2xx response into [`PredictorError::Status`].
async fn check_status(endpoint: Endpoint, response: Response) -> Result<Response, PredictorError> {
    let status = response.status();
    tracing::debug!(%endpoint, %status, "Predictor response");

    if !status.is_success() {
        let (body, truncated) = read_capped_body(endpoint, response)
            .await
            .unwrap_or_default();
        let mut text = String::from_utf8_lossy(&body).into_owned();
        if truncated {
            text.push_str("...(truncated)");
        }
        return Err(PredictorError::Status {
            endpoint,
            status,
            body: text,
        });
    }
    Ok(response)
}

/// Read a body the caller must parse; oversized bodies are a protocol error.
async fn read_success_body(
    endpoint: Endpoint,
    response: Response,
) -> Result<Vec<u8>, PredictorError> {
    let (body, truncated) = read_capped_body(endpoint, response).await?;
    if truncated {
        return Err(PredictorError::protocol(
            endpoint,
            format!("response exceeded {MAX_BODY_BYTES} bytes"),
        ));
    }
    Ok(body)
}

async fn read_capped_body(
    endpoint: Endpoint,
    mut response: Response,
) -> Result<(Vec<u8>, bool), PredictorError> {
    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| PredictorError::transport(endpoint, e))?
    {
        body.extend_from_slice(&chunk);
        if body.len() > MAX_BODY_BYTES {
            body.truncate(MAX_BODY_BYTES);
            return Ok((body, true));
        }
    }
    Ok((body, false))
}
