use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::{Extension, State};

use crate::database::models::Restaurant;
use crate::handlers::form::read_restaurant_form;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// POST /api/my/restro/manage - Create the caller's restaurant (multipart, image required)
pub async fn post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Restaurant> {
    let (image, form) = read_restaurant_form(multipart).await?;
    let created = state
        .manager
        .create_my_restaurant(&auth_user.identity, image, form)
        .await?;
    Ok(ApiResponse::created(created))
}

/// GET /api/my/restro/manage - The caller's restaurant
pub async fn get(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Restaurant> {
    let restaurant = state.manager.get_my_restaurant(&auth_user.identity).await?;
    Ok(ApiResponse::success(restaurant))
}

/// PUT /api/my/restro/manage - Partial update; only supplied fields change
pub async fn put(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Restaurant> {
    let (image, form) = read_restaurant_form(multipart).await?;
    let updated = state
        .manager
        .update_my_restaurant(&auth_user.identity, image, form)
        .await?;
    Ok(ApiResponse::success(updated))
}
