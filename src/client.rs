//! Video Client
//!
//! Public entry point. Validates requests, wraps provider calls in the
//! configured timeout and retry policy, and implements the polling loop for
//! task completion.

use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::error::VideoError;
use crate::provider::{create_provider, VideoProvider};
use crate::retry::RetryPolicy;
use crate::types::{
    ClientConfig, GenerationRequest, GenerationResponse, ProviderConfig, ProviderType, TaskResult,
};

/// Default interval between completion polls
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Unified video generation client
///
/// Holds an immutable provider adapter; safe to share across concurrent
/// calls. The configured timeout bounds each individual create/get call
/// (including its retries), not a whole [`wait_for_completion`] sequence.
///
/// [`wait_for_completion`]: VideoClient::wait_for_completion
///
/// # Example
///
/// ```rust,no_run
/// use vidmai::prelude::*;
///
/// # async fn run() -> Result<(), VideoError> {
/// let client = VideoClient::new(ProviderType::Kling, ProviderConfig::new("ak,sk"))?;
/// let request = GenerationRequest::new(5.0, 1920, 1080).with_prompt("A red panda surfing");
/// let submitted = client.create_generation(&request).await?;
/// let result = client
///     .wait_for_completion(&submitted.task_id, std::time::Duration::from_secs(5))
///     .await?;
/// println!("video at {:?}", result.url);
/// # Ok(())
/// # }
/// ```
pub struct VideoClient {
    provider: Arc<dyn VideoProvider>,
    config: ClientConfig,
}

impl VideoClient {
    /// Create a client for a provider type with default client configuration.
    pub fn new(
        provider_type: ProviderType,
        provider_config: ProviderConfig,
    ) -> Result<Self, VideoError> {
        Self::with_config(provider_type, provider_config, ClientConfig::default())
    }

    /// Create a client with explicit timeout/retry configuration.
    pub fn with_config(
        provider_type: ProviderType,
        provider_config: ProviderConfig,
        config: ClientConfig,
    ) -> Result<Self, VideoError> {
        let provider = create_provider(provider_type, provider_config)?;
        Ok(Self { provider, config })
    }

    /// Create a client around a custom provider implementation.
    pub fn from_provider(provider: Arc<dyn VideoProvider>, config: ClientConfig) -> Self {
        Self { provider, config }
    }

    /// Name of the underlying provider
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Models supported by the underlying provider
    pub fn supported_models(&self) -> Vec<String> {
        self.provider.supported_models()
    }

    /// Submit a video generation task.
    ///
    /// Validates the request locally and against the provider before any
    /// network call, then runs the provider call under the configured
    /// timeout and retry policy.
    pub async fn create_generation(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, VideoError> {
        self.validate_request(request)?;

        let cancel = CancellationToken::new();
        self.with_timeout(
            self.retry_policy()
                .execute(&cancel, || self.provider.create_generation(request)),
        )
        .await
    }

    /// Fetch the current state of a generation task.
    pub async fn get_generation(&self, task_id: &str) -> Result<TaskResult, VideoError> {
        if task_id.is_empty() {
            return Err(VideoError::validation("task_id", "task ID cannot be empty"));
        }

        let cancel = CancellationToken::new();
        self.with_timeout(
            self.retry_policy()
                .execute(&cancel, || self.provider.get_generation(task_id)),
        )
        .await
    }

    /// Poll a task until it reaches a terminal status.
    ///
    /// Equivalent to [`wait_for_completion_with_cancel`] with a token that
    /// never fires; the only bound is the task reaching `Succeeded` or
    /// `Failed`. Callers wanting an overall deadline should wrap the future
    /// in [`tokio::time::timeout`] or use the cancellable variant.
    ///
    /// [`wait_for_completion_with_cancel`]: VideoClient::wait_for_completion_with_cancel
    pub async fn wait_for_completion(
        &self,
        task_id: &str,
        poll_interval: Duration,
    ) -> Result<TaskResult, VideoError> {
        self.wait_for_completion_with_cancel(task_id, poll_interval, &CancellationToken::new())
            .await
    }

    /// Poll a task until it completes or the cancellation token fires.
    ///
    /// A zero interval defaults to five seconds. The first poll happens one
    /// interval after the call; each poll is an individual [`get_generation`]
    /// with its own timeout and retries. A cancelled token returns
    /// [`VideoError::Cancelled`] immediately, even before the first poll.
    ///
    /// There is deliberately no overall deadline here: if the vendor never
    /// reports a terminal status the loop polls until cancelled.
    ///
    /// [`get_generation`]: VideoClient::get_generation
    pub async fn wait_for_completion_with_cancel(
        &self,
        task_id: &str,
        poll_interval: Duration,
        cancel: &CancellationToken,
    ) -> Result<TaskResult, VideoError> {
        let poll_interval = if poll_interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            poll_interval
        };

        if cancel.is_cancelled() {
            return Err(VideoError::Cancelled);
        }

        let mut ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + poll_interval,
            poll_interval,
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Err(VideoError::Cancelled),
                _ = ticker.tick() => {}
            }

            let result = self.get_generation(task_id).await?;
            tracing::debug!(task_id, status = %result.status, "polled task state");

            if result.is_complete() {
                return Ok(result);
            }
        }
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.config.max_retries, self.config.retry_delay)
    }

    /// Bound a whole retry sequence by the configured timeout.
    async fn with_timeout<T>(
        &self,
        fut: impl std::future::Future<Output = Result<T, VideoError>>,
    ) -> Result<T, VideoError> {
        match tokio::time::timeout(self.config.timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(VideoError::TimeoutError(format!(
                "call exceeded the configured {:?} timeout",
                self.config.timeout
            ))),
        }
    }

    /// Pre-flight validation, enforced before any network call.
    fn validate_request(&self, request: &GenerationRequest) -> Result<(), VideoError> {
        let has_prompt = request.prompt.as_deref().is_some_and(|p| !p.is_empty());
        let has_image = request.image.as_deref().is_some_and(|i| !i.is_empty());
        if !has_prompt && !has_image {
            return Err(VideoError::validation(
                "prompt/image",
                "at least one of prompt or image must be provided",
            ));
        }

        if request.duration <= 0.0 {
            return Err(VideoError::validation("duration", "duration must be positive"));
        }

        if request.width == 0 {
            return Err(VideoError::validation("width", "width must be positive"));
        }

        if request.height == 0 {
            return Err(VideoError::validation("height", "height must be positive"));
        }

        self.provider.validate_request(request)
    }
}
