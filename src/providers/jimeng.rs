//! Jimeng Provider (placeholder)
//!
//! Reserves the provider id and configuration plumbing for the Jimeng video
//! generation API. Introspection answers locally; every task operation fails
//! with [`VideoError::NotImplemented`] until the adapter lands.

use async_trait::async_trait;

use crate::error::VideoError;
use crate::provider::VideoProvider;
use crate::types::{GenerationRequest, GenerationResponse, ProviderConfig, TaskResult};

/// Placeholder adapter for the Jimeng video generation API
pub struct JimengProvider {
    #[allow(dead_code)]
    config: ProviderConfig,
}

impl JimengProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    fn not_implemented() -> VideoError {
        VideoError::NotImplemented("Jimeng provider is not yet implemented".to_string())
    }
}

#[async_trait]
impl VideoProvider for JimengProvider {
    fn name(&self) -> &'static str {
        "jimeng"
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
