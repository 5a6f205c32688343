//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                      - Health check
//!
//! # Editor (HTML)
//! GET  /volume-discount/{function_id}/{id}          - Editor page ("new" for a new discount)
//! POST /volume-discount/{function_id}/{id}          - Save, then redirect to the store's discounts
//!
//! # Loader / action (JSON)
//! GET  /api/volume-discount/{function_id}/{id}      - {"discount": record | null}
//! POST /api/volume-discount/{function_id}           - Form payload in, {"errors": [...]} out
//! ```

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

pub mod volume_discount;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/volume-discount/{function_id}/{id}",
            get(volume_discount::edit).post(volume_discount::submit),
        )
        .route(
            "/api/volume-discount/{function_id}/{id}",
            get(volume_discount::show),
        )
        .route(
            "/api/volume-discount/{function_id}",
            post(volume_discount::action),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Shopify.
async fn health() -> &'static str {
    "ok"
}
