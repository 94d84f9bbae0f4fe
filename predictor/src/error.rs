use std::error::Error as StdError;
use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// Which remote operation an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Predict,
    Learn,
    Health,
}

impl Endpoint {
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Endpoint::Predict => "predict",
            Endpoint::Learn => "learn",
            Endpoint::Health => "",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

#[derive(Debug, Error)]
pub enum PredictorError {
    /// Connection refused, DNS failure, timeout, broken body.
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    /// The predictor answered with a non-2xx status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: StatusCode,
        body: String,
    },
    /// The predictor answered 2xx but the body had the wrong shape.
    #[error("{endpoint} response malformed: {detail}")]
    Protocol { endpoint: Endpoint, detail: String },
    #[error("invalid predictor configuration: {0}")]
    Config(String),
}

impl PredictorError {
    pub fn transport(endpoint: Endpoint, source: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Transport {
            endpoint,
            source: source.into(),
        }
    }

    pub fn protocol(endpoint: Endpoint, detail: impl Into<String>) -> Self {
        Self::Protocol {
            endpoint,
            detail: detail.into(),
        }
    }

    /// Network-level failure, including non-2xx responses.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }

    #[must_use]
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol { .. })
    }

    #[must_use]
    pub fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::Protocol { endpoint, .. } => Some(*endpoint),
            Self::Config(_) => None,
        }
    }

    /// One-line reason suitable for the status bar.
    #[must_use]
    pub fn short_reason(&self) -> String {
        match self {
            Self::Transport { endpoint, source } => {
                if is_timeout(source.as_ref()) {
                    format!("{endpoint} timed out")
                } else {
                    format!("{endpoint} unreachable")
                }
            }
            Self::Status {
                endpoint, status, ..
            } => format!("{endpoint} returned HTTP {}", status.as_u16()),
            Self::Protocol { endpoint, .. } => format!("{endpoint} sent a malformed response"),
            Self::Config(_) => "predictor misconfigured".to_string(),
        }
    }
}

fn is_timeout(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(req) = e.downcast_ref::<reqwest::Error>()
            && req.is_timeout()
        {
            return true;
        }
        if let Some(io) = e.downcast_ref::<std::io::Error>()
            && io.kind() == std::io::ErrorKind::TimedOut
        {
            return true;
        }
        current = e.source();
    }
    false
}
