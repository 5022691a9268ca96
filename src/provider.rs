//! Provider Abstraction
//!
//! The capability trait every video generation vendor adapter implements,
//! plus the factory that maps a [`ProviderType`] and configuration to a
//! concrete adapter instance.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::VideoError;
use crate::providers::jimeng::JimengProvider;
use crate::providers::kling::KlingProvider;
use crate::providers::vidu::ViduProvider;
use crate::types::{
    GenerationRequest, GenerationResponse, ProviderConfig, ProviderType, TaskResult,
};

/// Capability trait for video generation providers
///
/// Adapters are immutable after construction and safe to share across
/// concurrent calls.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Canonical provider id used for logging and error tagging
    fn name(&self) -> &'static str;

    /// Submit a video generation task
    async fn create_generation(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, VideoError>;

    /// Fetch the current state of a generation task
    async fn get_generation(&self, task_id: &str) -> Result<TaskResult, VideoError>;

    /// Static list of supported model names
    fn supported_models(&self) -> Vec<String>;

    /// Check vendor-specific request constraints (model, duration, ...)
    fn validate_request(&self, request: &GenerationRequest) -> Result<(), VideoError>;
}

/// Create a provider adapter for the given provider type.
///
/// The match is closed over [`ProviderType`]; unknown provider *names* are
/// already rejected when parsing the type, so a configuration typo can never
/// silently fall back to a default vendor.
pub fn create_provider(
    provider_type: ProviderType,
    config: ProviderConfig,
) -> Result<Arc<dyn VideoProvider>, VideoError> {
    match provider_type {
        ProviderType::Kling => Ok(Arc::new(KlingProvider::new(config)?)),
        ProviderType::Jimeng => Ok(Arc::new(JimengProvider::new(config))),
        ProviderType::Vidu => Ok(Arc::new(ViduProvider::new(config))),
    }
}
