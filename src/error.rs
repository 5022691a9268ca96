//! Error Handling Module
//!
//! Typed error taxonomy for the video generation library, together with the
//! retryability predicate the client's retry loop consults.
//!
//! # Example
//!
//! ```rust
//! use vidmai::error::VideoError;
//!
//! let error = VideoError::api("kling", 429, "too many requests");
//! assert!(error.is_retryable());
//! ```

use thiserror::Error;

/// Main error type for the video generation library
#[derive(Error, Debug, Clone)]
pub enum VideoError {
    /// Request failed local validation before any network call
    #[error("validation error for field '{field}': {message}")]
    ValidationError { field: String, message: String },

    /// The vendor API rejected the call with a non-zero status code
    #[error("[{provider}] API error {code}: {message}")]
    ApiError {
        code: i32,
        message: String,
        provider: String,
    },

    /// HTTP transport failure (connect, TLS, broken body, ...)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Rate limit exceeded
    #[error("rate limit exceeded: {0}")]
    RateLimitError(String),

    /// Client-level timeout elapsed
    #[error("request timed out: {0}")]
    TimeoutError(String),

    /// Credential handling or request signing failed
    #[error("authentication failed: {0}")]
    AuthenticationError(String),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    ConfigurationError(String),

    /// The requested provider is not known to the factory
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// JSON encoding or decoding failure
    #[error("JSON error: {0}")]
    JsonError(String),

    /// The provider exists but does not implement this operation yet
    #[error("not implemented: {0}")]
    NotImplemented(String),

    /// The caller's cancellation token fired
    #[error("operation cancelled")]
    Cancelled,

    /// Internal library error
    #[error("internal error: {0}")]
    InternalError(String),
}

impl VideoError {
    /// Create a validation error for a specific request field
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an API error tagged with the provider name
    pub fn api(provider: impl Into<String>, code: i32, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            provider: provider.into(),
        }
    }

    /// Check if this is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }

    /// Check if re-issuing the same call is expected to plausibly succeed.
    ///
    /// API errors are retryable on server overload (5xx) and rate limiting
    /// (429); transport failures, timeouts, and rate-limit sentinels are
    /// retryable unconditionally. Everything local (validation, signing,
    /// configuration, JSON) would fail the same way again and is not retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::ApiError { code, .. } => *code >= 500 || *code == 429,
            Self::HttpError(_) | Self::RateLimitError(_) | Self::TimeoutError(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for VideoError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for VideoError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}
