//! Bearer token authentication middleware

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Authenticated caller identity attached to the request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Validate the bearer token and attach [`AuthUser`] to the request.
/// Anonymous callers are rejected with 401; used by the profile routes.
pub async fn require_user(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = resolve_user(&state, &req).ok_or(ApiError::Unauthorized)?;
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

/// Same check as [`require_user`], but the message routes reject
/// anonymous callers with 403.
pub async fn require_user_or_forbidden(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let user = resolve_user(&state, &req).ok_or(ApiError::Forbidden)?;
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

fn resolve_user(state: &AppState, req: &Request<Body>) -> Option<AuthUser> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    let token = auth_header.strip_prefix("Bearer ")?;

    let claims = state.jwt_service.validate_token(token).ok()?;

    Some(AuthUser {
        id: claims.sub,
        email: claims.email,
    })
}
