//! HTTP routes
//!
//! - `GET /` - upload form
//! - `POST /analyze` - classify the reviews in an uploaded CSV/XLSX file
//! - `GET /api/health` - health check

pub mod analyze;
pub mod health;
pub mod ui;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::apply_cors;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins = state.config.server.cors_allowed_origins.clone();

    let router = Router::new()
        .merge(analyze::router(state.clone()))
        .merge(health::router(state))
        .merge(ui::router())
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &origins)
}
