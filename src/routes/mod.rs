//! Rutas HTTP
//!
//! Monta los routers de pricing y RFP sobre el estado compartido.

pub mod pricing_routes;
pub mod rfp_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_for;
use crate::state::AppState;

/// Construir la aplicación completa
pub fn create_app(state: AppState) -> Router {
    let cors = cors_for(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/pricing", pricing_routes::create_pricing_router())
        .nest("/api/rfp", rfp_routes::create_rfp_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
