use std::fmt;

use uuid::Uuid;

const TOKEN_PREFIX: &str = "user_";

/// Opaque identifier correlating this client's rounds with the predictor's
/// per-session learned state.
///
/// Generated once per process and never mutated; every `predict`/`learn` call
/// in the session carries the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("{TOKEN_PREFIX}{}", Uuid::new_v4().simple()))
    }

    #[must_use]
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
