//! Vidu Provider (placeholder)
//!
//! Same contract as the other placeholders: introspection answers locally,
//! task operations fail with [`VideoError::NotImplemented`].

use async_trait::async_trait;

use crate::error::VideoError;
use crate::provider::VideoProvider;
use crate::types::{GenerationRequest, GenerationResponse, ProviderConfig, TaskResult};

/// Placeholder adapter for the Vidu video generation API
pub struct ViduProvider {
    #[allow(dead_code)]
    config: ProviderConfig,
}

impl ViduProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    fn not_implemented() -> VideoError {
        VideoError::NotImplemented("Vidu provider is not yet implemented".to_string())
    }
}

#[async_trait]
impl VideoProvider for ViduProvider {
    fn name(&self) -> &'static str {
        "vidu"
    }

    fn supported_models(&self) -> Vec<String> {
        Vec::new()
    }

    fn validate_request(&self, _request: &GenerationRequest) -> Result<(), VideoError> {
        Err(Self::not_implemented())
    }

    async fn create_generation(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GenerationResponse, VideoError> {
        Err(Self::not_implemented())
    }

    async fn get_generation(&self, _task_id: &str) -> Result<TaskResult, VideoError> {
        Err(Self::not_implemented())
    }
}
