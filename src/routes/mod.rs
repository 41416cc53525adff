// HTTP routes

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::registry::MetricsRegistry;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) registry: Arc<MetricsRegistry>,
}

pub fn app(registry: Arc<MetricsRegistry>) -> Router {
    let state = AppState { registry };
    Router::new()
        .route("/", get(|| async { "hostmon: host telemetry agent" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/metrics", get(http::metrics_handler)) // GET /metrics
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
