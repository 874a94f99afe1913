//! Process configuration loaded from the environment.
//!
//! `.env` files are honored through `dotenvy` by the binary before
//! [`Config::from_env`] is called. The API credential is required; everything
//! else has a default.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::groq::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT, SUPPORTED_MODELS};

pub const API_KEY_VAR: &str = "GROQ_API_KEY";
pub const BASE_URL_VAR: &str = "GROQ_BASE_URL";
pub const TIMEOUT_VAR: &str = "GROQ_TIMEOUT_SECS";
pub const MODEL_VAR: &str = "GROQ_MODEL";

/// Errors raised while loading configuration. All of them are fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("GROQ_API_KEY is not set; add it to your environment or a .env file")]
    MissingApiKey,

    #[error("GROQ_TIMEOUT_SECS must be a positive whole number of seconds, got '{0}'")]
    InvalidTimeout(String),

    #[error("unsupported model '{0}'; expected one of: {models}", models = SUPPORTED_MODELS.join(", "))]
    UnsupportedModel(String),
}

/// Validated runtime configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    api_key: String,
    base_url: String,
    timeout: Duration,
    default_model: String,
}

impl Config {
    /// Loads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(API_KEY_VAR).ok_or(ConfigError::MissingApiKey)?;

        let base_url = get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match get(TIMEOUT_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => DEFAULT_TIMEOUT,
        };

        let default_model = match get(MODEL_VAR) {
            Some(model) => validate_model(&model)?,
            None => DEFAULT_MODEL.to_string(),
        };

        Ok(Self {
            api_key,
            base_url,
            timeout,
            default_model,
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("default_model", &self.default_model)
            .finish()
    }
}

/// Checks that `model` is one of [`SUPPORTED_MODELS`].
pub fn validate_model(model: &str) -> Result<String, ConfigError> {
    if SUPPORTED_MODELS.contains(&model) {
        Ok(model.to_string())
    } else {
        Err(ConfigError::UnsupportedModel(model.to_string()))
    }
}
