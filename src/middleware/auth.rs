use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

pub use crate::auth::AuthUser;

/// JWT authentication middleware that verifies the bearer token and injects
/// the caller as an `AuthUser` request extension.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // A header that is not visible ASCII is treated the same as a missing one
    let header = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());

    let auth_user = state.tokens.verify(header).map_err(|e| {
        tracing::warn!(path = %request.uri().path(), reason = %e, "Rejected bearer token");
        ApiError::from(e)
    })?;

    tracing::debug!(identity = %auth_user.identity, "Authenticated request");
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
