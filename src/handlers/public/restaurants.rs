use axum::extract::{Path, State};

use crate::database::models::Restaurant;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/restro/discrip/:restaurantId - One restaurant by id
pub async fn get(
    State(state): State<AppState>,
    Path(restaurant_id): Path<String>,
) -> ApiResult<Restaurant> {
    let restaurant = state.search.get_restaurant(&restaurant_id).await?;
    Ok(ApiResponse::success(restaurant))
}

/// GET /api/restro - Every restaurant in insertion order
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Restaurant>> {
    let restaurants = state.search.get_all_restaurants().await?;
    Ok(ApiResponse::success(restaurants))
}

/// GET /api/restro/search/:city - Case-insensitive city substring search
pub async fn search(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> ApiResult<Vec<Restaurant>> {
    let restaurants = state.search.search_restaurants(&city).await?;
    Ok(ApiResponse::success(restaurants))
}
