//! Generative AI client error types.

use thiserror::Error;

/// Errors that can occur when talking to the generative AI provider.
#[derive(Debug, Error)]
pub enum GenAiError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the provider.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The API key was rejected.
    #[error("authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    /// The provider returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },

    /// Failed to parse a provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// No API key configured.
    #[error("generative AI is not configured: set GEMINI_API_KEY or genai.api_key")]
    NotConfigured,

    /// The response carried no usable candidate.
    #[error("empty response: {0}")]
    EmptyResponse(String),
}

impl GenAiError {
    /// Whether a later attempt could plausibly succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            Self::Auth { .. } | Self::Parse(_) | Self::NotConfigured | Self::EmptyResponse(_) => {
                false
            }
        }
    }
}
