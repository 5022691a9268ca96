//! Kling Wire Types
//!
//! Request/response shapes for the Kling API and the pure mapping functions
//! between them and the canonical data model.

use serde::{Deserialize, Serialize};

use crate::error::VideoError;
use crate::types::{GenerationRequest, TaskResult, TaskStatus, VideoMetadata};

/// Provider id used for error tagging
pub(crate) const PROVIDER_NAME: &str = "kling";

/// Models accepted by the Kling API
pub(crate) const KLING_MODELS: &[&str] = &["kling-v1", "kling-v1-6", "kling-v2-master"];

/// Model applied when the request leaves it unset
pub(crate) const DEFAULT_MODEL: &str = "kling-v2-master";

/// Kling generation mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum KlingMode {
    /// Standard generation
    Std,
    /// Professional generation
    Pro,
    /// Image-to-video
    Img2video,
    /// Text-to-video
    Txt2video,
}

impl KlingMode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Std => "std",
            Self::Pro => "pro",
            Self::Img2video => "img2video",
            Self::Txt2video => "txt2video",
        }
    }
}

/// Typed Kling-specific request options
///
/// Attach via [`GenerationRequest::with_provider_options`]; the adapter
/// merges them into the vendor request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KlingOptions {
    /// Generation mode; derived from the presence of an image when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<KlingMode>,
    /// Prompt adherence, 0.0 to 1.0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<f64>,
    /// Camera movement preset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_control: Option<String>,
}

impl KlingOptions {
    /// Read the options back out of a canonical request.
    ///
    /// Options that fail to deserialize are a validation error: the caller
    /// attached something that is not Kling options.
    pub(crate) fn from_request(request: &GenerationRequest) -> Result<Self, VideoError> {
        match &request.provider_options {
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                VideoError::validation("provider_options", format!("invalid Kling options: {e}"))
            }),
            None => Ok(Self::default()),
        }
    }
}

/// Kling generation request wire shape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct KlingVideoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub mode: String,
    pub duration: String,
    pub aspect_ratio: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera_control: Option<String>,
}

impl KlingVideoRequest {
    /// Map a canonical request to the Kling wire shape.
    ///
    /// Validation has already run: duration is 5.0 or 10.0 and the model, if
    /// set, is supported.
    pub(crate) fn from_canonical(
        request: &GenerationRequest,
        options: &KlingOptions,
    ) -> Self {
        let mode = match options.mode {
            Some(mode) => mode.as_str().to_string(),
            None if request.image.is_some() => "img2video".to_string(),
            None => "txt2video".to_string(),
        };

        Self {
            prompt: request.prompt.clone(),
            image: request.image.clone(),
            mode,
            duration: duration_string(request.duration).to_string(),
            aspect_ratio: aspect_ratio(request.width, request.height).to_string(),
            model: request
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            cfg_scale: options.cfg_scale,
            camera_control: options.camera_control.clone(),
        }
    }
}

/// Kling only accepts the enumerated strings "5" and "10".
pub(crate) fn duration_string(duration: f64) -> &'static str {
    if duration == 10.0 { "10" } else { "5" }
}

/// Bucket a pixel size into one of Kling's three aspect ratios.
pub(crate) fn aspect_ratio(width: u32, height: u32) -> &'static str {
    let ratio = f64::from(width) / f64::from(height);
    if ratio > 1.5 {
        "16:9"
    } else if ratio < 0.7 {
        "9:16"
    } else {
        "1:1"
    }
}

/// Map a Kling task status string to the canonical vocabulary.
///
/// Unrecognized strings map to `Queued`: a permissive fallback so a new
/// vendor-side state keeps the task pollable instead of failing the call.
pub(crate) fn map_status(status: &str) -> TaskStatus {
    match status {
        "submitted" | "queued" => TaskStatus::Queued,
        "processing" => TaskStatus::Processing,
        "succeed" => TaskStatus::Succeeded,
        "failed" => TaskStatus::Failed,
        _ => TaskStatus::Queued,
    }
}

/// Generic Kling response envelope; `code == 0` is success
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct KlingEnvelope<T> {
    pub code: i32,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Payload of a successful task submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct KlingSubmitData {
    pub task_id: String,
}

/// Payload of a task status query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct KlingTaskData {
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_result: Option<KlingTaskResultData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct KlingTaskResultData {
    #[serde(default)]
    pub videos: Vec<KlingVideo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct KlingVideo {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub duration: String,
}

impl KlingTaskData {
    /// Map a Kling task payload to a canonical [`TaskResult`].
    ///
    /// Takes the first result video when present. An unparsable duration
    /// string degrades to an unset metadata field instead of failing the
    /// whole call.
    pub(crate) fn into_task_result(self) -> TaskResult {
        let mut result = TaskResult {
            task_id: self.id,
            status: map_status(&self.status),
            url: None,
            format: None,
            metadata: None,
            error: None,
        };

        if let Some(video) = self
            .task_result
            .as_ref()
            .and_then(|tr| tr.videos.first())
        {
            result.url = Some(video.url.clone());
            result.format = Some("mp4".to_string());
            if let Ok(duration) = video.duration.parse::<f64>() {
                result.metadata = Some(VideoMetadata {
                    duration: Some(duration),
                    format: Some("mp4".to_string()),
                    ..Default::default()
                });
            }
        }

        result
    }
}
