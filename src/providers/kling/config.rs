//! Kling Configuration
//!
//! Parses the client-facing [`ProviderConfig`] into the split-key form the
//! Kling adapter needs. The composite API key is split exactly once, at
//! construction.

use std::time::Duration;

use crate::error::VideoError;
use crate::types::ProviderConfig;

/// Kling API configuration with the composite key already split
#[derive(Debug, Clone)]
pub struct KlingConfig {
    /// Access key, also the `iss` claim of every bearer token
    pub access_key: String,
    /// Secret key used to sign bearer tokens
    pub secret_key: String,
    /// Base URL for the Kling API
    pub base_url: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl KlingConfig {
    /// Default base URL for the Kling API
    pub const DEFAULT_BASE_URL: &'static str = "https://api.klingai.com";

    /// Default HTTP timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Build from a [`ProviderConfig`].
    ///
    /// The API key must be `"access_key,secret_key"`, exactly two non-empty
    /// comma-separated parts. A separate `secret_key` field, when set, takes
    /// the place of the second part.
    pub fn from_provider_config(config: &ProviderConfig) -> Result<Self, VideoError> {
        let (access_key, secret_key) = match &config.secret_key {
            Some(secret) => (config.api_key.trim().to_string(), secret.trim().to_string()),
            None => split_composite_key(&config.api_key)?,
        };

        if access_key.is_empty() || secret_key.is_empty() {
            return Err(VideoError::ConfigurationError(
                "Kling access key and secret key cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            access_key,
            secret_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            timeout: config.timeout.unwrap_or(Self::DEFAULT_TIMEOUT),
        })
    }
}

/// Split a composite `"access_key,secret_key"` API key.
pub(crate) fn split_composite_key(api_key: &str) -> Result<(String, String), VideoError> {
    let parts: Vec<&str> = api_key.split(',').collect();
    if parts.len() != 2 {
        return Err(VideoError::ConfigurationError(
            "invalid API key format for Kling, expected 'access_key,secret_key'".to_string(),
        ));
    }
    Ok((parts[0].trim().to_string(), parts[1].trim().to_string()))
}
