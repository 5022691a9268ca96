//! Kling Provider Module
//!
//! Adapter for the Kling video generation API.
//!
//! Kling tracks generations as asynchronous tasks behind a
//! `{code, message, data}` envelope and authenticates every call with a
//! short-lived HS256 bearer token derived from a composite
//! `"access_key,secret_key"` API key.
//!
//! # Architecture
//! - `config.rs` - configuration and composite key parsing
//! - `auth.rs` - bearer token construction
//! - `types.rs` - wire types and canonical mapping (status, aspect ratio)
//! - `client.rs` - [`KlingProvider`], the `VideoProvider` implementation

mod auth;
mod client;
mod config;
mod types;

pub use client::KlingProvider;
pub use config::KlingConfig;
pub use types::{KlingMode, KlingOptions};

pub(crate) use auth::create_bearer_token;
pub(crate) use config::split_composite_key;
pub(crate) use types::{
    aspect_ratio, duration_string, KlingEnvelope, KlingSubmitData, KlingTaskData,
    KlingVideoRequest, KLING_MODELS, PROVIDER_NAME,
};
