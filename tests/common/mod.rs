//! Shared utilities for integration tests.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use sticky_session::config::{parse_config, ObservabilityConfig};
use sticky_session::observability::logging::init_logging;
use sticky_session::BackendManager;

pub const B1: &str = "http://127.0.0.1:3001/";
pub const B2: &str = "http://127.0.0.1:3002/";

/// Install a test subscriber once; later calls are no-ops.
pub fn init_test_logging() {
    let config = ObservabilityConfig {
        log_level: "sticky_session=debug".into(),
        json_logs: false,
    };
    let _ = init_logging(&config);
}

/// Backend manager for a two-backend "web" group with the given sticky section.
pub fn manager(sticky_section: &str) -> Arc<BackendManager> {
    let toml = format!(
        r#"
        [[backends]]
        name = "b1"
        group = "web"
        url = "{B1}"

        [[backends]]
        name = "b2"
        group = "web"
        url = "{B2}"

        {sticky_section}
        "#
    );
    let config = parse_config(&toml).unwrap();
    Arc::new(BackendManager::from_config(&config).unwrap())
}

/// Router whose handler answers with the selected backend's name.
pub fn app(manager: Arc<BackendManager>) -> Router {
    Router::new()
        .route("/", any(route_handler))
        .route("/{*path}", any(route_handler))
        .with_state(manager)
}

async fn route_handler(State(manager): State<Arc<BackendManager>>, request: Request<Body>) -> Response {
    let Some(selection) = manager.select("web", &request) else {
        return (StatusCode::SERVICE_UNAVAILABLE, "No healthy backends").into_response();
    };

    let mut response = selection.backend().name.clone().into_response();
    manager.stick(&selection, &mut response);
    response
}
