//! Kling Provider Client
//!
//! `VideoProvider` implementation for the Kling video generation API.

use async_trait::async_trait;

use super::auth::create_bearer_token;
use super::config::KlingConfig;
use super::types::{
    KlingEnvelope, KlingOptions, KlingSubmitData, KlingTaskData, KlingVideoRequest, KLING_MODELS,
    PROVIDER_NAME,
};
use crate::error::VideoError;
use crate::provider::VideoProvider;
use crate::types::{
    GenerationRequest, GenerationResponse, ProviderConfig, TaskResult, TaskStatus,
};

const USER_AGENT: &str = concat!("vidmai/", env!("CARGO_PKG_VERSION"));

/// Kling video generation provider
pub struct KlingProvider {
    config: KlingConfig,
    http_client: reqwest::Client,
}

impl KlingProvider {
    /// Create a Kling provider from a client-facing provider configuration.
    ///
    /// Fails with [`VideoError::ConfigurationError`] when the composite API
    /// key does not split into exactly two non-empty parts.
    pub fn new(provider_config: ProviderConfig) -> Result<Self, VideoError> {
        let config = KlingConfig::from_provider_config(&provider_config)?;
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VideoError::HttpError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Create a provider from an already-parsed Kling configuration.
    pub fn from_config(config: KlingConfig) -> Result<Self, VideoError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VideoError::HttpError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn submit_url(&self) -> String {
        format!(
            "{}/api/open/v1/video/generation",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn task_url(&self, task_id: &str) -> String {
        format!(
            "{}/api/open/v1/video/generation/{}",
            self.config.base_url.trim_end_matches('/'),
            task_id
        )
    }

    fn bearer_token(&self) -> Result<String, VideoError> {
        create_bearer_token(&self.config.access_key, &self.config.secret_key)
    }

    /// Unwrap a Kling envelope, mapping a non-zero vendor code to a tagged
    /// API error.
    fn unwrap_envelope<T>(&self, envelope: KlingEnvelope<T>) -> Result<T, VideoError> {
        if envelope.code != 0 {
            return Err(VideoError::api(
                PROVIDER_NAME,
                envelope.code,
                envelope.message,
            ));
        }
        envelope.data.ok_or_else(|| {
            VideoError::JsonError("Kling response envelope is missing the data field".to_string())
        })
    }
}

#[async_trait]
impl VideoProvider for KlingProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn supported_models(&self) -> Vec<String> {
        KLING_MODELS.iter().map(|m| (*m).to_string()).collect()
    }

    fn validate_request(&self, request: &GenerationRequest) -> Result<(), VideoError> {
        if let Some(model) = &request.model {
            if !KLING_MODELS.contains(&model.as_str()) {
                return Err(VideoError::validation(
                    "model",
                    format!("unsupported model: {model}"),
                ));
            }
        }

        if request.duration != 5.0 && request.duration != 10.0 {
            return Err(VideoError::validation(
                "duration",
                "Kling only supports 5s or 10s duration",
            ));
        }

        Ok(())
    }

    async fn create_generation(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, VideoError> {
        let options = KlingOptions::from_request(request)?;
        let kling_request = KlingVideoRequest::from_canonical(request, &options);
        let token = self.bearer_token()?;

        tracing::debug!(
            model = %kling_request.model,
            mode = %kling_request.mode,
            "submitting Kling generation task"
        );

        let response = self
            .http_client
            .post(self.submit_url())
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .header("User-Agent", USER_AGENT)
            .json(&kling_request)
            .send()
            .await?;

        let envelope: KlingEnvelope<KlingSubmitData> = response
            .json()
            .await
            .map_err(|e| VideoError::JsonError(format!("failed to decode Kling response: {e}")))?;
        let data = self.unwrap_envelope(envelope)?;

        Ok(GenerationResponse {
            task_id: data.task_id,
            status: TaskStatus::Queued,
        })
    }

    async fn get_generation(&self, task_id: &str) -> Result<TaskResult, VideoError> {
        let token = self.bearer_token()?;

        tracing::debug!(task_id, "fetching Kling task state");

        let response = self
            .http_client
            .get(self.task_url(task_id))
            .bearer_auth(token)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let envelope: KlingEnvelope<KlingTaskData> = response
            .json()
            .await
            .map_err(|e| VideoError::JsonError(format!("failed to decode Kling response: {e}")))?;
        let data = self.unwrap_envelope(envelope)?;

        Ok(data.into_task_result())
    }
}
