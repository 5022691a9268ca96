//! Provider Implementations
//!
//! One module per vendor. Kling is fully implemented; Jimeng and Vidu are
//! placeholders that answer introspection locally and fail all task
//! operations with [`VideoError::NotImplemented`].
//!
//! [`VideoError::NotImplemented`]: crate::error::VideoError::NotImplemented

pub mod jimeng;
pub mod kling;
pub mod vidu;
