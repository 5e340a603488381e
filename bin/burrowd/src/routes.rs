//! Route registration — collects module routes + system endpoints.

use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use burrow_core::Module;

/// Build the complete router with all routes.
///
/// Module routes are already `Router<()>` (they call `.with_state()`
/// internally); each is mounted under `/{module_name}`.
pub fn build_router(modules: Vec<&dyn Module>) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    for module in modules {
        app = app.nest(&format!("/{}", module.name()), module.routes());
    }

    app
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "burrowd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
