/// Groq completion API client module.
///
/// Provides a blocking HTTP client for Groq's OpenAI-compatible
/// chat-completions endpoint, the `ModelClient` trait used to swap it out,
/// and the `ProviderError` type.
mod client;

pub use client::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT, GroqClient, GroqClientBuilder, ModelClient,
    ProviderError, SUPPORTED_MODELS, SamplingParams,
};
