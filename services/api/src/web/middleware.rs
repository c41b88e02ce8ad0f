//! services/api/src/web/middleware.rs
//!
//! Session resolution: authentication middleware for protected routes and a
//! tolerant resolver for endpoints that allow anonymous reads.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::error::ApiError;
use crate::web::state::AppState;
use intake_core::ports::PortError;

/// The resolved user identity, inserted into request extensions by
/// `require_auth` for handlers to consume.
#[derive(Debug, Clone)]
pub struct Identity(pub String);

/// Extracts the opaque session token from the request's cookie header.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())?
        .split(';')
        .find_map(|c| c.trim().strip_prefix("session="))
}

/// Resolves the request's identity, tolerating anonymous callers.
///
/// Used by read endpoints where the original behavior returns an empty
/// result instead of an error.
pub async fn resolve_identity(state: &AppState, headers: &HeaderMap) -> Option<String> {
    let token = session_token(headers)?;
    state.sessions.resolve_session(token).await.ok()
}

/// Middleware that validates the session cookie and extracts the identity.
///
/// If valid, inserts the identity into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // 1. Extract the session token from the cookie header
    let token = session_token(req.headers())
        .ok_or(ApiError::Port(PortError::Unauthorized))?
        .to_string();

    // 2. Resolve the session to an identity
    let identity = state.sessions.resolve_session(&token).await.map_err(|e| {
        debug!("Failed to resolve session: {:?}", e);
        ApiError::Port(PortError::Unauthorized)
    })?;

    // 3. Insert the identity into request extensions
    req.extensions_mut().insert(Identity(identity));

    // 4. Continue to the handler
    Ok(next.run(req).await)
}
