//! # vidmai
//!
//! A unified video generation interface library for Rust. One request and
//! result shape across vendors, asynchronous task submission, and polling
//! for completion, with timeout, retry, and cancellation handled by the
//! client.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use vidmai::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), VideoError> {
//!     let client = VideoClient::new(
//!         ProviderType::Kling,
//!         ProviderConfig::new("access_key,secret_key"),
//!     )?;
//!
//!     let request = GenerationRequest::new(5.0, 1920, 1080)
//!         .with_prompt("A red panda surfing at golden hour");
//!
//!     let submitted = client.create_generation(&request).await?;
//!     let result = client
//!         .wait_for_completion(&submitted.task_id, Duration::from_secs(5))
//!         .await?;
//!
//!     if result.is_success() {
//!         println!("video ready: {:?}", result.url);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - canonical request/response/task data model
//! - [`error`] - error taxonomy and retryability
//! - [`provider`] - the `VideoProvider` capability trait and factory
//! - [`providers`] - vendor adapters (Kling implemented; Jimeng and Vidu
//!   placeholders)
//! - [`client`] - validation, timeout/retry, and completion polling
//! - [`relay`] - phase-by-phase binding for relay/proxy deployments
//! - [`retry`] - the fixed-delay retry policy the client uses

pub mod client;
pub mod error;
pub mod provider;
pub mod providers;
pub mod relay;
pub mod retry;
pub mod types;

pub use client::VideoClient;
pub use error::VideoError;
pub use provider::{create_provider, VideoProvider};
pub use types::{
    ClientConfig, GenerationRequest, GenerationResponse, ProviderConfig, ProviderType,
    QualityLevel, ResponseFormat, TaskError, TaskResult, TaskStatus, VideoMetadata,
};

/// Convenience re-exports for the common path
pub mod prelude {
    pub use crate::client::VideoClient;
    pub use crate::error::VideoError;
    pub use crate::provider::VideoProvider;
    pub use crate::providers::kling::{KlingMode, KlingOptions};
    pub use crate::types::{
        ClientConfig, GenerationRequest, GenerationResponse, ProviderConfig, ProviderType,
        QualityLevel, ResponseFormat, TaskResult, TaskStatus,
    };
    pub use tokio_util::sync::CancellationToken;
}
