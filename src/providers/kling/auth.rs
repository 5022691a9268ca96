//! Kling Bearer Token Construction
//!
//! Every outbound call is signed with a short-lived HS256 JWT: issuer is the
//! access key, not-before is backdated a few seconds against clock skew, and
//! expiry is thirty minutes out. Signing failure aborts the call; there is no
//! fallback to sending the raw key as a bearer credential.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::VideoError;

/// Token lifetime in seconds (30 minutes)
const TOKEN_TTL_SECS: i64 = 1800;
/// Backdate of the not-before claim in seconds
const TOKEN_NBF_SKEW_SECS: i64 = 5;

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct BearerClaims {
    pub iss: String,
    pub exp: i64,
    pub nbf: i64,
}

/// Create a signed bearer token for the given key pair.
pub(crate) fn create_bearer_token(
    access_key: &str,
    secret_key: &str,
) -> Result<String, VideoError> {
    if access_key.is_empty() || secret_key.is_empty() {
        return Err(VideoError::AuthenticationError(
            "access key and secret key are required".to_string(),
        ));
    }

    let now = chrono::Utc::now().timestamp();
    let claims = BearerClaims {
        iss: access_key.to_string(),
        exp: now + TOKEN_TTL_SECS,
        nbf: now - TOKEN_NBF_SKEW_SECS,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret_key.as_bytes()),
    )
    .map_err(|e| VideoError::AuthenticationError(format!("failed to sign bearer token: {e}")))
}
