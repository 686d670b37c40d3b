use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{Credentials, Session};
use crate::state::AppState;

fn credentials(payload: Result<Json<Credentials>, JsonRejection>) -> Result<Credentials, ApiError> {
    payload
        .map(|Json(credentials)| credentials)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// POST /api/my/admin/signup - Create an owner account and return a token
///
/// ```json
/// { "email": "owner@example.com", "password": "at least 8 chars" }
/// ```
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Session> {
    let session = state.admins.signup(credentials(payload)?).await?;
    Ok(ApiResponse::created(session))
}

/// POST /api/my/admin/login - Exchange email and password for a token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<Session> {
    let session = state.admins.login(credentials(payload)?).await?;
    Ok(ApiResponse::success(session))
}
