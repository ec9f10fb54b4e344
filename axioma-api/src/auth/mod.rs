//! Identity token verification and request authentication.
//!
//! Requests carry a Firebase ID token as `Authorization: Bearer <token>`. The
//! middleware verifies it, resolves the local user and stores an
//! [`AuthenticatedRequest`] in the request extensions.
mod middleware;
mod verifier;

pub use middleware::{bearer_token, optional_auth, require_auth, AuthenticatedRequest};
pub use verifier::{FirebaseTokenVerifier, IdentityVerifier, GOOGLE_JWKS_URL};

use axioma_engine::EngineError;
use thiserror::Error;

/// Errors raised while authenticating a request.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The signing keys could not be fetched.
    #[error("Key fetch error: {0}")]
    KeyFetch(String),

    #[error("User resolution error: {0}")]
    UserResolution(#[from] EngineError),
}

impl AuthError {
    /// Create an invalid token error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }
}
