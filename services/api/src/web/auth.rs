//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for the demo login and logout.
//!
//! The application accepts a single hardcoded demo credential; real
//! credential security is out of scope. What matters is the session token
//! the login issues, since every per-user store is keyed by the identity
//! it resolves to.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::middleware::session_token;
use crate::web::state::AppState;
use intake_core::ports::PortError;

/// How long a login session stays valid.
const SESSION_DAYS: i64 = 30;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub email: String,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/login - Login with the demo account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Check the credentials against the configured demo account
    if req.email != state.config.demo_email || req.password != state.config.demo_password {
        return Err(ApiError::Port(PortError::Unauthorized));
    }

    // 2. Create a session with an opaque token and an expiration
    let expires_at = Utc::now() + Duration::days(SESSION_DAYS);
    let token = state.sessions.create_session(&req.email, expires_at).await?;
    info!("Demo login for {}", req.email);

    // 3. Create the session cookie
    let cookie = format!(
        "session={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        token,
        Duration::days(SESSION_DAYS).num_seconds()
    );

    // 4. Return the response with the cookie
    let response = AuthResponse { email: req.email };
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// POST /auth/logout - Logout and invalidate the session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Extract the session token from the cookie
    let token = session_token(&headers).ok_or(ApiError::Port(PortError::Unauthorized))?;

    // 2. Delete the session
    state.sessions.delete_session(token).await?;

    // 3. Clear the cookie
    let cookie = "session=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0";
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie.to_string())]))
}
