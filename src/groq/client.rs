/// Groq chat-completions client implementation.
///
/// This module provides `GroqClient` for making synchronous requests to Groq's
/// OpenAI-compatible API, along with the `ModelClient` seam used by the
/// answerer and the `ProviderError` taxonomy.
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// Default API root for Groq's OpenAI-compatible endpoints.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Models offered by the pickers. The client itself accepts any identifier.
pub const SUPPORTED_MODELS: [&str; 4] = [
    "llama3-8b-8192",
    "llama3-70b-8192",
    "mixtral-8x7b-32768",
    "gemma2-9b-it",
];

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = SUPPORTED_MODELS[0];

/// Errors that can occur when calling the completion API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Connection failures, DNS resolution, TLS errors, etc.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// The API rejected the credential (HTTP 401/403)
    #[error("Authentication failed: {message}")]
    Unauthorized { message: String },

    /// The account hit a rate limit or quota (HTTP 429)
    #[error("Rate limit exceeded: {message}")]
    RateLimited { message: String },

    /// Any other non-success HTTP status
    #[error("HTTP error: status {status}: {message}")]
    Http { status: u16, message: String },

    /// The API answered but the body was not a usable completion
    #[error("API error: {message}")]
    Api { message: String },

    /// Invalid base URL configuration
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ProviderError {
    fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }

    fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { message },
            429 => Self::RateLimited { message },
            _ => Self::Http { status, message },
        }
    }
}

/// Sampling parameters sent with each completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParams {
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Seam between the answerer and the hosted model.
///
/// Implemented by `GroqClient` and by mocks in tests.
pub trait ModelClient: Send + Sync {
    /// Sends `prompt` as a single user message and returns the completion text.
    ///
    /// Failures are returned as-is; implementations must not retry.
    fn complete(
        &self,
        model: &str,
        prompt: &str,
        sampling: SamplingParams,
    ) -> Result<String, ProviderError>;
}

/// Builder for constructing `GroqClient` instances.
///
/// # Examples
///
/// ```
/// use pdfqa::groq::GroqClientBuilder;
///
/// let client = GroqClientBuilder::new()
///     .api_key("gsk_test")
///     .base_url("http://localhost:8080/v1")
///     .build()
///     .expect("Failed to create client");
/// assert_eq!(client.base_url(), "http://localhost:8080/v1");
/// ```
#[derive(Debug, Default)]
pub struct GroqClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl GroqClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a builder preloaded from validated configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .api_key(config.api_key())
            .base_url(config.base_url())
            .timeout(config.timeout())
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API root (e.g., "https://api.groq.com/openai/v1").
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the total request timeout. Expiry surfaces as `ProviderError::Timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the `GroqClient`.
    ///
    /// Missing values fall back to an empty key, `DEFAULT_BASE_URL` and
    /// `DEFAULT_TIMEOUT`. A trailing `/` on the base URL is dropped.
    pub fn build(self) -> Result<GroqClient, ProviderError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        reqwest::Url::parse(&base_url)
            .map_err(|e| ProviderError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5).min(timeout))
            .build()
            .map_err(ProviderError::Network)?;

        Ok(GroqClient {
            client,
            api_key: self.api_key.unwrap_or_default(),
            base_url,
            timeout,
        })
    }
}

/// Synchronous client for Groq's chat-completions API.
///
/// Construct it with `GroqClientBuilder`.
pub struct GroqClient {
    client: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl GroqClient {
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Lists model identifiers available to the configured credential.
    pub fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .map_err(ProviderError::from_transport)?;

        let json = read_json(response)?;

        let mut models: Vec<String> = json
            .get("data")
            .and_then(|d| d.as_array())
            .map(|data| {
                data.iter()
                    .filter_map(|m| m.get("id").and_then(|id| id.as_str()))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        models.sort();
        Ok(models)
    }

    fn complete_internal(
        &self,
        model: &str,
        prompt: &str,
        sampling: SamplingParams,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request_body = completion_request_body(model, prompt, sampling);

        debug!(
            model,
            temperature = sampling.temperature,
            max_tokens = sampling.max_tokens,
            prompt_chars = prompt.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .map_err(ProviderError::from_transport)?;

        let json = read_json(response)?;
        extract_completion_text(&json)
    }
}

impl ModelClient for GroqClient {
    fn complete(
        &self,
        model: &str,
        prompt: &str,
        sampling: SamplingParams,
    ) -> Result<String, ProviderError> {
        self.complete_internal(model, prompt, sampling)
            .inspect_err(|e| warn!(model, error = %e, "completion request failed"))
    }
}

/// Builds the JSON body for a chat-completions request.
fn completion_request_body(model: &str, prompt: &str, sampling: SamplingParams) -> serde_json::Value {
    serde_json::json!({
        "model": model,
        "messages": [
            { "role": "user", "content": prompt }
        ],
        "temperature": sampling.temperature,
        "max_tokens": sampling.max_tokens,
        "stream": false
    })
}

/// Checks the status and decodes the body, mapping failures to `ProviderError`.
fn read_json(response: reqwest::blocking::Response) -> Result<serde_json::Value, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ProviderError::from_status(
            status.as_u16(),
            error_message_from_body(&body),
        ));
    }

    response.json().map_err(ProviderError::from_transport)
}

/// Pulls `error.message` out of an OpenAI-style error body, falling back to the raw body.
fn error_message_from_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

/// Extracts `choices[0].message.content` from a completion response.
fn extract_completion_text(json: &serde_json::Value) -> Result<String, ProviderError> {
    json.get("choices")
        .and_then(|c| c.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(str::to_string)
        .ok_or_else(|| ProviderError::Api {
            message: "Missing 'choices[0].message.content' in API response".to_string(),
        })
}
