use axum::{
    body::Body,
    extract::{FromRequest, FromRequestParts},
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use shared_models::auth::{CurrentUser, Role};
use shared_models::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Reads the caller identity forwarded by the authentication gateway.
/// The role defaults to `user` when the header is absent.
pub fn identity_from_headers(headers: &HeaderMap) -> Result<CurrentUser, AppError> {
    let id = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| AppError::Auth("Missing caller identity".to_string()))?
        .to_str()
        .map_err(|_| AppError::Auth("Invalid caller identity header".to_string()))?;

    let id = Uuid::parse_str(id.trim())
        .map_err(|_| AppError::Auth("Caller identity must be a UUID".to_string()))?;

    let role = match headers.get(USER_ROLE_HEADER) {
        Some(value) => value
            .to_str()
            .map_err(|_| AppError::Auth("Invalid role header".to_string()))?
            .parse::<Role>()
            .map_err(AppError::Auth)?,
        None => Role::User,
    };

    Ok(CurrentUser::new(id, role))
}

/// JSON body whose rejections render as `AppError::ValidationError`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Path parameters whose rejections render as `AppError::NotFound`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Query parameters whose rejections render as `AppError::ValidationError`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

// Middleware for authenticated routes
pub async fn identity_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user = identity_from_headers(request.headers())?;
    debug!("Request authenticated for {} ({})", user.id, user.role);

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
