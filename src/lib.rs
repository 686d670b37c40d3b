pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod types;
pub mod upload;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Build the full application router over the given state.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(admin_routes())
        .merge(restaurant_routes())
        // Protected
        .merge(manage_routes(state.clone()))
        // Global middleware
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config.security.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn admin_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::public;

    Router::new()
        .route("/api/my/admin/signup", post(public::admin_signup))
        .route("/api/my/admin/login", post(public::admin_login))
}

fn restaurant_routes() -> Router<AppState> {
    use handlers::public;

    Router::new()
        .route("/api/restro", get(public::restaurant_list))
        .route("/api/restro/", get(public::restaurant_list))
        .route("/api/restro/discrip/:restaurant_id", get(public::restaurant_get))
        .route("/api/restro/search/:city", get(public::restaurant_search))
}

fn manage_routes(state: AppState) -> Router<AppState> {
    use handlers::protected;

    Router::new()
        .route(
            "/api/my/restro/manage",
            get(protected::manage_get)
                .post(protected::manage_post)
                .put(protected::manage_put),
        )
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Restro API",
            "version": version,
            "description": "Restaurant listing backend built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "admin": "/api/my/admin/signup, /api/my/admin/login (public - token acquisition)",
                "restaurants": "/api/restro, /api/restro/discrip/:restaurantId, /api/restro/search/:city (public)",
                "manage": "/api/my/restro/manage (protected - GET, POST, PUT)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.restaurants().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
