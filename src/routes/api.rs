use crate::handlers::{diagnostics, health_check, ready_check};
use crate::session::SessionBroker;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Create API routes
pub fn create_api_routes(broker: Arc<SessionBroker>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/v1/diagnostics", get(diagnostics))
        .with_state(broker)
}
