pub mod config;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod session;
pub mod websocket;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::{routing::get, Router};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;
use session::SessionBroker;

/// Assemble the full application router: REST API, Swagger UI and the
/// WebSocket endpoint, all sharing one session broker.
pub fn app(broker: Arc<SessionBroker>, config: &Config) -> Router {
    // Create API routes
    let api_routes = routes::create_api_routes(broker.clone());

    // WebSocket endpoint for the shared document session
    let ws_routes = Router::new()
        .route("/ws", get(websocket::handler::websocket_handler))
        .with_state(broker);

    // Combine all routes
    let mut app_routes = Router::new()
        // Mount API routes
        .nest("/api", api_routes)
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .merge(ws_routes)
        // Add tracing layer
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(config) {
        app_routes = app_routes.layer(cors);
    }

    app_routes
}

/// CORS layer from the configured origin list, if any. `*` allows any
/// origin; otherwise the value is a comma-separated origin list.
fn cors_layer(config: &Config) -> Option<CorsLayer> {
    let origins = config.cors_origins.as_deref()?;
    let layer = if origins.trim() == "*" {
        CorsLayer::new().allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .split(',')
            .filter_map(|origin| origin.trim().parse().ok())
            .collect();
        CorsLayer::new().allow_origin(AllowOrigin::list(parsed))
    };
    Some(layer.allow_methods(Any).allow_headers(Any))
}
