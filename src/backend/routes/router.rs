/**
 * Router Configuration
 *
 * Combines the API routes into a single Axum router and applies the tower
 * layers every request passes through.
 *
 * # Layers
 *
 * - `TraceLayer` - one tracing span per request
 * - `CookieManagerLayer` - makes `Cookies` available to extractors and
 *   handlers
 *
 * Unknown routes fall through to a JSON 404.
 */

use axum::{http::StatusCode, response::Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Not found",
            "status": 404
        })),
    )
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_api_routes(Router::new());

    router
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new()),
        )
        .with_state(app_state)
}
