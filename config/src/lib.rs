//! Configuration for Mind Reader.
//!
//! Read from `~/.mindreader/config.toml`. Every section and field is optional;
//! a missing file means defaults. String values may reference environment
//! variables as `${NAME}`.
//!
//! ```toml
//! [predictor]
//! base_url = "https://mind-reader-ai.onrender.com"
//! request_timeout_secs = 30
//! connect_timeout_secs = 10
//!
//! [app]
//! tui = "full"
//! ascii_only = false
//! high_contrast = false
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

use mindreader_predictor::PredictorConfig;
use mindreader_types::ui::UiOptions;

/// Overrides `[predictor] base_url`.
pub const PREDICTOR_URL_ENV: &str = "MINDREADER_PREDICTOR_URL";
/// Fallback for `[app] tui` when the file does not set it.
pub const TUI_MODE_ENV: &str = "MINDREADER_TUI";

const CONFIG_DIR: &str = ".mindreader";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
pub struct MindReaderConfig {
    pub app: Option<AppConfig>,
    pub predictor: Option<PredictorSection>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// "full" or "inline".
    pub tui: Option<String>,
    /// Use ASCII-only glyphs for icons and spinners.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PredictorSection {
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
}

pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl MindReaderConfig {
    /// Load from the default location. `Ok(None)` when there is no file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Predictor settings from the file, with `MINDREADER_PREDICTOR_URL` on top.
    #[must_use]
    pub fn predictor_config(config: Option<&Self>) -> PredictorConfig {
        let env_url = env::var(PREDICTOR_URL_ENV).ok();
        resolve_predictor_config(config.and_then(|c| c.predictor.as_ref()), env_url.as_deref())
    }

    #[must_use]
    pub fn ui_options(config: Option<&Self>) -> UiOptions {
        config
            .and_then(|c| c.app.as_ref())
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
            })
            .unwrap_or_default()
    }

    /// Raw TUI mode string: file first, then `MINDREADER_TUI`.
    #[must_use]
    pub fn tui_mode(config: Option<&Self>) -> Option<String> {
        config
            .and_then(|c| c.app.as_ref())
            .and_then(|app| app.tui.clone())
            .or_else(|| env::var(TUI_MODE_ENV).ok())
    }
}

/// Merge the `[predictor]` section and an optional URL override onto defaults.
#[must_use]
pub fn resolve_predictor_config(
    section: Option<&PredictorSection>,
    env_url: Option<&str>,
) -> PredictorConfig {
    let mut resolved = PredictorConfig::default();

    let file_url = section
        .and_then(|s| s.base_url.as_deref())
        .map(expand_env_vars);
    let url = env_url
        .map(str::to_string)
        .or(file_url)
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());
    if let Some(url) = url {
        resolved.base_url = url;
    }

    if let Some(secs) = section.and_then(|s| s.request_timeout_secs) {
        match positive_secs(secs) {
            Some(timeout) => resolved.request_timeout = timeout,
            None => tracing::warn!("Ignoring request_timeout_secs = 0; using default"),
        }
    }
    if let Some(secs) = section.and_then(|s| s.connect_timeout_secs) {
        match positive_secs(secs) {
            Some(timeout) => resolved.connect_timeout = timeout,
            None => tracing::warn!("Ignoring connect_timeout_secs = 0; using default"),
        }
    }

    resolved
}

fn positive_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

/// `~/.mindreader`, also home to the log directory.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR))
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join(CONFIG_FILE))
}
