//! Video Generation Types
//!
//! Canonical, vendor-neutral data shapes the client and callers operate on.
//! Provider adapters translate between these and vendor wire formats.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::error::VideoError;

/// Status of a video generation task
///
/// The canonical vocabulary is closed: adapters map unknown vendor status
/// strings to `Queued` rather than surfacing them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Queued,
    Processing,
    Succeeded,
    Failed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Processing => write!(f, "processing"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Format of the returned video payload
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ResponseFormat {
    #[serde(rename = "url")]
    Url,
    #[serde(rename = "b64_json")]
    B64Json,
}

/// Requested quality level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Low,
    Standard,
    High,
}

/// Video generation request
///
/// Vendor-neutral request shape. Provider-specific knobs go through the
/// typed `provider_options` extension point (e.g. [`KlingOptions`]) rather
/// than an untyped metadata map.
///
/// [`KlingOptions`]: crate::providers::kling::KlingOptions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Text description of the desired video
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,

    /// Seed image (URL or base64) for image-to-video generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Free-form style hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Video duration in seconds
    pub duration: f64,

    /// Frames per second
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,

    /// Video width in pixels
    pub width: u32,

    /// Video height in pixels
    pub height: u32,

    /// Desired response payload format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,

    /// Desired quality level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_level: Option<QualityLevel>,

    /// Seed for reproducibility
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// Model name; validated against the provider's supported models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Provider-specific options, deserialized by the selected adapter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_options: Option<serde_json::Value>,
}

impl GenerationRequest {
    /// Create a request with the required dimensional fields
    pub fn new(duration: f64, width: u32, height: u32) -> Self {
        Self {
            prompt: None,
            image: None,
            style: None,
            duration,
            fps: None,
            width,
            height,
            response_format: None,
            quality_level: None,
            seed: None,
            model: None,
            provider_options: None,
        }
    }

    /// Set the text prompt
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// Set the seed image for image-to-video generation
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the style hint
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Set frames per second
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }

    /// Set the response payload format
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    /// Set the quality level
    pub fn with_quality(mut self, quality: QualityLevel) -> Self {
        self.quality_level = Some(quality);
        self
    }

    /// Set the generation seed
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Attach typed provider-specific options
    ///
    /// Serialization failures are deferred: the adapter reports them when it
    /// tries to read the options back.
    pub fn with_provider_options<T: Serialize>(mut self, options: &T) -> Self {
        self.provider_options = serde_json::to_value(options).ok();
        self
    }
}

/// Response from creating a generation task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Opaque vendor-assigned task identifier, used for status polling
    pub task_id: String,
    /// Initial task status (always `Queued` in practice)
    pub status: TaskStatus,
}

/// Result snapshot of a video generation task
///
/// Task state lives entirely in the remote vendor system; each poll returns
/// a fresh snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    /// Task identifier
    pub task_id: String,

    /// Current task status
    pub status: TaskStatus,

    /// Video URL (populated when the task succeeded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Container format of the result, e.g. "mp4"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Metadata actually achieved by the generation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<VideoMetadata>,

    /// Failure details (populated when the task failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<TaskError>,
}

impl TaskResult {
    /// Check if the task reached a terminal status
    pub fn is_complete(&self) -> bool {
        matches!(self.status, TaskStatus::Succeeded | TaskStatus::Failed)
    }

    /// Check if the task succeeded
    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Succeeded
    }

    /// Check if the task failed
    pub fn is_failed(&self) -> bool {
        self.status == TaskStatus::Failed
    }

    /// Check if the task is still in progress
    pub fn is_in_progress(&self) -> bool {
        matches!(self.status, TaskStatus::Queued | TaskStatus::Processing)
    }
}

/// Metadata describing a generated video
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Failure details reported by the vendor for a failed task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskError {
    pub code: i32,
    pub message: String,
}

/// Configuration for a specific provider
///
/// Supplied once at client construction and read-only thereafter.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL override; each adapter carries its own default
    pub base_url: Option<String>,
    /// Vendor API key (Kling expects the composite "access_key,secret_key")
    pub api_key: String,
    /// Separate secret key for vendors that use one
    pub secret_key: Option<String>,
    /// Per-request HTTP timeout override
    pub timeout: Option<Duration>,
    /// Free-form extra options
    pub extra: HashMap<String, String>,
}

impl ProviderConfig {
    /// Create a configuration with just an API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: None,
            api_key: api_key.into(),
            secret_key: None,
            timeout: None,
            extra: HashMap::new(),
        }
    }

    /// Override the provider's base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the secret key
    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set the HTTP timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Configuration for the client's timeout, retry, and backoff behavior
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Deadline for each create/get call, covering all retry attempts
    pub timeout: Duration,
    /// Additional attempts after the first failure
    pub max_retries: u32,
    /// Fixed delay between attempts
    pub retry_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Supported video generation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderType {
    Kling,
    Jimeng,
    Vidu,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kling => write!(f, "kling"),
            Self::Jimeng => write!(f, "jimeng"),
            Self::Vidu => write!(f, "vidu"),
        }
    }
}

impl FromStr for ProviderType {
    type Err = VideoError;

    /// Parse a provider id. Unknown names are a hard configuration error,
    /// never silently mapped to a default provider.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kling" => Ok(Self::Kling),
            "jimeng" => Ok(Self::Jimeng),
            "vidu" => Ok(Self::Vidu),
            other => Err(VideoError::UnsupportedProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder_sets_fields() {
        let req = GenerationRequest::new(5.0, 1920, 1080)
            .with_prompt("A cat playing piano")
            .with_model("kling-v2-master")
            .with_seed(42)
            .with_quality(QualityLevel::High);

        assert_eq!(req.prompt.as_deref(), Some("A cat playing piano"));
        assert_eq!(req.model.as_deref(), Some("kling-v2-master"));
        assert_eq!(req.seed, Some(42));
        assert_eq!(req.quality_level, Some(QualityLevel::High));
        assert_eq!(req.duration, 5.0);
        assert_eq!((req.width, req.height), (1920, 1080));
    }

    #[test]
    fn request_serialization_omits_unset_fields() {
        let req = GenerationRequest::new(5.0, 1024, 1024).with_prompt("sunset");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["prompt"], "sunset");
        assert!(value.get("image").is_none());
        assert!(value.get("model").is_none());
        assert!(value.get("provider_options").is_none());
    }

    #[test]
    fn task_result_status_checks() {
        let mut result = TaskResult {
            task_id: "123".to_string(),
            status: TaskStatus::Processing,
            url: None,
            format: None,
            metadata: None,
            error: None,
        };

        assert!(result.is_in_progress());
        assert!(!result.is_complete());

        result.status = TaskStatus::Succeeded;
        assert!(result.is_complete());
        assert!(result.is_success());
        assert!(!result.is_failed());

        result.status = TaskStatus::Failed;
        assert!(result.is_complete());
        assert!(result.is_failed());
    }

    #[test]
    fn task_status_wire_names_are_lowercase() {
        assert_eq!(
            serde_json::to_value(TaskStatus::Succeeded).unwrap(),
            serde_json::json!("succeeded")
        );
        assert_eq!(
            serde_json::to_value(ResponseFormat::B64Json).unwrap(),
            serde_json::json!("b64_json")
        );
    }

    #[test]
    fn client_config_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay, Duration::from_secs(1));
    }

    #[test]
    fn provider_type_parsing_rejects_unknown_names() {
        assert_eq!("kling".parse::<ProviderType>().unwrap(), ProviderType::Kling);
        assert_eq!("Vidu".parse::<ProviderType>().unwrap(), ProviderType::Vidu);
        assert!(matches!(
            "runway".parse::<ProviderType>(),
            Err(VideoError::UnsupportedProvider(name)) if name == "runway"
        ));
    }
}
