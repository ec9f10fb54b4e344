//! Authentication middleware.
//!
//! [`require_auth`] rejects requests without a valid bearer token. [`optional_auth`]
//! lets requests without an `Authorization` header through unauthenticated, but still
//! rejects a header carrying an invalid token.
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use axioma_shared::{IdentityClaims, User};
use tracing::warn;

use crate::auth::AuthError;
use crate::server::error::ApiError;
use crate::server::state::AppState;

/// The verified identity and local user of a request.
#[derive(Debug, Clone)]
pub struct AuthenticatedRequest {
    pub claims: IdentityClaims,
    pub user: User,
}

/// Extracts the bearer token from the `Authorization` header.
///
/// # Returns
///
/// * `Ok(None)` - If the header is absent
/// * `Ok(Some(token))` - If the header has the form `Bearer <token>`
/// * `Err(AuthError::InvalidToken)` - If the header is present but malformed
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AuthError::invalid("Authorization header is not valid UTF-8"))?;

    let mut parts = value.splitn(2, ' ');
    match (parts.next(), parts.next().map(str::trim)) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(Some(token))
        }
        _ => Err(AuthError::invalid("Expected a bearer token")),
    }
}

async fn authenticate(state: &AppState, token: &str) -> Result<AuthenticatedRequest, AuthError> {
    let claims = state.verifier.verify(token).await?;
    let user = state.engines.users.get_or_create_user(&claims).await?;
    Ok(AuthenticatedRequest { claims, user })
}

/// Requires a valid bearer token and stores the [`AuthenticatedRequest`] in the
/// request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())?
        .map(str::to_string)
        .ok_or(AuthError::MissingToken)
        .inspect_err(|_| warn!(path = %request.uri().path(), "Request without bearer token"))?;

    let auth = authenticate(&state, &token).await.inspect_err(|e| {
        warn!(error = %e, path = %request.uri().path(), "Authentication failed");
    })?;

    request.extensions_mut().insert(auth);
    Ok(next.run(request).await)
}

/// Authenticates the request when it carries an `Authorization` header.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = bearer_token(request.headers())?.map(str::to_string) else {
        return Ok(next.run(request).await);
    };

    let auth = authenticate(&state, &token).await.inspect_err(|e| {
        warn!(error = %e, path = %request.uri().path(), "Authentication failed");
    })?;

    request.extensions_mut().insert(auth);
    Ok(next.run(request).await)
}
