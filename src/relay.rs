//! Task Relay Binding
//!
//! A phase-by-phase integration surface for relay/proxy deployments that
//! orchestrate each HTTP phase themselves (URL, headers, body, response
//! parsing) instead of delegating a whole call. This is a thin binding over
//! the Kling module's request building, signing, and response mapping rather
//! than a parallel adapter hierarchy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::VideoError;
use crate::providers::kling::{
    aspect_ratio, create_bearer_token, duration_string, split_composite_key, KlingEnvelope,
    KlingSubmitData, KlingTaskData, KlingVideoRequest, KLING_MODELS, PROVIDER_NAME,
};
use crate::types::TaskResult;

/// Default base URL for the relay-style Kling surface
const DEFAULT_RELAY_BASE_URL: &str = "https://api.klingai.com";
/// Model applied when a relay submission leaves the model unset
const RELAY_DEFAULT_MODEL: &str = "kling-v1";
/// Default prompt adherence for relay submissions
const RELAY_DEFAULT_CFG_SCALE: f64 = 0.5;

const USER_AGENT: &str = concat!("vidmai/", env!("CARGO_PKG_VERSION"));

/// Connection information supplied by the relay host
#[derive(Debug, Clone)]
pub struct RelayContext {
    /// Base URL override; empty means the vendor's official endpoint
    pub base_url: Option<String>,
    /// Composite API key in the vendor's expected format
    pub api_key: String,
}

/// Inbound relay submission, parsed from an externally-defined JSON body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaySubmitRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Generation mode, "std" or "pro"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Pixel size as "WIDTHxHEIGHT"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Duration in whole seconds. The relay surface does not validate this:
    /// Kling only accepts 5 or 10, and any other value submits as 5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

/// A submitted relay task: the vendor task id plus the raw response body
/// for pass-through to the relay's caller.
#[derive(Debug, Clone)]
pub struct RelayTaskHandle {
    pub task_id: String,
    pub raw_response: Vec<u8>,
}

/// Error surfaced to a relay host, distinguishing local failures from
/// vendor-side rejections whose code/message must be preserved.
#[derive(Debug, Clone, thiserror::Error)]
#[error("relay error ({code}): {message}")]
pub struct RelayError {
    /// HTTP status the relay should answer with
    pub status_code: u16,
    /// Machine-readable error code
    pub code: String,
    pub message: String,
    /// True when the failure happened locally rather than at the vendor
    pub local: bool,
}

impl RelayError {
    fn local(status_code: u16, code: &str, message: impl Into<String>) -> Self {
        Self {
            status_code,
            code: code.to_string(),
            message: message.into(),
            local: true,
        }
    }

    fn upstream(status_code: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status_code,
            code: code.into(),
            message: message.into(),
            local: false,
        }
    }
}

/// Generic relay response envelope used by non-vendor-native upstreams
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GenericEnvelope {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<String>,
}

impl GenericEnvelope {
    fn is_success(&self) -> bool {
        self.code == "success"
    }
}

/// Phase-by-phase relay contract
///
/// `submit` and `fetch_task` compose the phase methods for hosts that want
/// the whole flow; hosts that sign or transport requests upstream call the
/// individual phases instead.
#[async_trait]
pub trait TaskRelay: Send + Sync {
    /// Channel identifier for routing and logging
    fn channel_name(&self) -> &'static str;

    /// Models accepted on this channel
    fn model_list(&self) -> Vec<String>;

    /// Validate and decode an inbound submission body
    fn parse_submit(&self, body: &[u8], action: &str) -> Result<RelaySubmitRequest, RelayError>;

    /// Submission endpoint URL
    fn request_url(&self) -> String;

    /// Headers for the outbound call, including the signed bearer token
    fn request_headers(&self) -> Result<Vec<(String, String)>, RelayError>;

    /// Vendor wire body for a parsed submission
    fn request_body(&self, request: &RelaySubmitRequest) -> Result<Vec<u8>, RelayError>;

    /// Decode a submission response into a task handle
    fn parse_submit_response(
        &self,
        status: u16,
        body: &[u8],
    ) -> Result<RelayTaskHandle, RelayError>;

    /// Full submission flow: parse, build, send, decode
    async fn submit(&self, body: &[u8], action: &str) -> Result<RelayTaskHandle, RelayError>;

    /// Fetch a task's state through the relay surface
    async fn fetch_task(&self, task_id: &str) -> Result<TaskResult, VideoError>;
}

/// Relay binding for the Kling channel
pub struct KlingRelay {
    access_key: String,
    secret_key: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl KlingRelay {
    /// Create a relay binding from the host-supplied context.
    ///
    /// The composite key is split here, once; a malformed key is rejected at
    /// construction instead of surfacing on the first signed call.
    pub fn new(context: &RelayContext) -> Result<Self, VideoError> {
        let (access_key, secret_key) = split_composite_key(&context.api_key)?;
        if access_key.is_empty() || secret_key.is_empty() {
            return Err(VideoError::ConfigurationError(
                "Kling access key and secret key cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            access_key,
            secret_key,
            base_url: context
                .base_url
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_RELAY_BASE_URL.to_string()),
            http_client: reqwest::Client::new(),
        })
    }

    fn bearer_token(&self) -> Result<String, RelayError> {
        // Signing failure is fatal; falling back to the raw key would leak
        // an unsigned credential as a bearer token.
        create_bearer_token(&self.access_key, &self.secret_key)
            .map_err(|e| RelayError::local(500, "sign_token_failed", e.to_string()))
    }

    fn task_url(&self, task_id: &str) -> String {
        format!(
            "{}/v1/videos/image2video/{}",
            self.base_url.trim_end_matches('/'),
            task_id
        )
    }
}

#[async_trait]
impl TaskRelay for KlingRelay {
    fn channel_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn model_list(&self) -> Vec<String> {
        KLING_MODELS.iter().map(|m| (*m).to_string()).collect()
    }

    fn parse_submit(&self, body: &[u8], action: &str) -> Result<RelaySubmitRequest, RelayError> {
        if !action.eq_ignore_ascii_case("generate") {
            return Err(RelayError::local(
                400,
                "invalid_request",
                format!("unsupported action: {action}"),
            ));
        }

        let mut request: RelaySubmitRequest = serde_json::from_slice(body).map_err(|e| {
            RelayError::local(400, "invalid_request", format!("failed to parse request: {e}"))
        })?;

        if request.prompt.is_empty() {
            return Err(RelayError::local(400, "invalid_request", "prompt is required"));
        }

        match &request.model {
            Some(model) if !KLING_MODELS.contains(&model.as_str()) => {
                return Err(RelayError::local(
                    400,
                    "invalid_request",
                    format!("unsupported model: {model}"),
                ));
            }
            Some(_) => {}
            None => request.model = Some(RELAY_DEFAULT_MODEL.to_string()),
        }

        Ok(request)
    }

    fn request_url(&self) -> String {
        format!(
            "{}/v1/videos/image2video",
            self.base_url.trim_end_matches('/')
        )
    }

    fn request_headers(&self) -> Result<Vec<(String, String)>, RelayError> {
        let token = self.bearer_token()?;
        Ok(vec![
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept".to_string(), "application/json".to_string()),
            ("Authorization".to_string(), format!("Bearer {token}")),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
        ])
    }

    fn request_body(&self, request: &RelaySubmitRequest) -> Result<Vec<u8>, RelayError> {
        // Mode precedence: explicit field, then metadata passthrough, then "std".
        let mode = request
            .mode
            .clone()
            .or_else(|| {
                request
                    .metadata
                    .as_ref()
                    .and_then(|m| m.get("mode"))
                    .and_then(|v| v.as_str().map(str::to_string))
            })
            .unwrap_or_else(|| "std".to_string());

        let (width, height) = parse_size(request.size.as_deref());

        let wire = KlingVideoRequest {
            prompt: Some(request.prompt.clone()),
            image: request.image.clone(),
            mode,
            duration: duration_string(f64::from(request.duration.unwrap_or(5))).to_string(),
            aspect_ratio: aspect_ratio(width, height).to_string(),
            model: request
                .model
                .clone()
                .unwrap_or_else(|| RELAY_DEFAULT_MODEL.to_string()),
            cfg_scale: Some(RELAY_DEFAULT_CFG_SCALE),
            camera_control: None,
        };

        serde_json::to_vec(&wire)
            .map_err(|e| RelayError::local(500, "build_body_failed", e.to_string()))
    }

    fn parse_submit_response(
        &self,
        status: u16,
        body: &[u8],
    ) -> Result<RelayTaskHandle, RelayError> {
        // Vendor-native envelope first.
        if let Ok(envelope) = serde_json::from_slice::<KlingEnvelope<KlingSubmitData>>(body) {
            if envelope.code == 0 {
                if let Some(data) = envelope.data {
                    return Ok(RelayTaskHandle {
                        task_id: data.task_id,
                        raw_response: body.to_vec(),
                    });
                }
            } else {
                return Err(RelayError::upstream(
                    status,
                    format!("kling_error_{}", envelope.code),
                    envelope.message,
                ));
            }
        }

        // Generic {code, message, data} envelope fallback.
        let generic: GenericEnvelope = serde_json::from_slice(body).map_err(|e| {
            tracing::warn!(error = %e, "failed to decode relay submit response");
            RelayError::local(
                500,
                "unmarshal_response_body_failed",
                format!("{e}, body: {}", String::from_utf8_lossy(body)),
            )
        })?;

        if !generic.is_success() {
            return Err(RelayError::upstream(status, generic.code, generic.message));
        }

        Ok(RelayTaskHandle {
            task_id: generic.data.unwrap_or_default(),
            raw_response: body.to_vec(),
        })
    }

    async fn submit(&self, body: &[u8], action: &str) -> Result<RelayTaskHandle, RelayError> {
        let request = self.parse_submit(body, action)?;
        let url = self.request_url();
        let headers = self.request_headers()?;
        let wire_body = self.request_body(&request)?;

        let mut builder = self.http_client.post(url).body(wire_body);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RelayError::local(500, "request_failed", e.to_string()))?;

        let status = response.status().as_u16();
        let response_body = response
            .bytes()
            .await
            .map_err(|e| RelayError::local(500, "read_response_body_failed", e.to_string()))?;

        self.parse_submit_response(status, &response_body)
    }

    async fn fetch_task(&self, task_id: &str) -> Result<TaskResult, VideoError> {
        let token = create_bearer_token(&self.access_key, &self.secret_key)?;

        let response = self
            .http_client
            .get(self.task_url(task_id))
            .bearer_auth(token)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let envelope: KlingEnvelope<KlingTaskData> = response
            .json()
            .await
            .map_err(|e| VideoError::JsonError(format!("failed to decode Kling response: {e}")))?;

        if envelope.code != 0 {
            return Err(VideoError::api(
                PROVIDER_NAME,
                envelope.code,
                envelope.message,
            ));
        }

        let data = envelope.data.ok_or_else(|| {
            VideoError::JsonError("Kling response envelope is missing the data field".to_string())
        })?;

        Ok(data.into_task_result())
    }
}

/// Parse a "WIDTHxHEIGHT" size string; unknown shapes bucket as square.
fn parse_size(size: Option<&str>) -> (u32, u32) {
    size.and_then(|s| {
        let (w, h) = s.split_once('x')?;
        Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
    })
    .unwrap_or((1024, 1024))
}
