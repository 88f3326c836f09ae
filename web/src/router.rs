//! Route table and middleware stack.

use crate::error::AppError;
use crate::handlers::{health, tasks};
use crate::middleware::{api_key_layer, correlation_id_layer};
use crate::state::AppState;
use axum::{
    http::{header, HeaderName, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Headers browsers may send cross-origin
const ALLOWED_HEADERS: [HeaderName; 5] = [
    header::CONTENT_TYPE,
    HeaderName::from_static("x-amz-date"),
    header::AUTHORIZATION,
    HeaderName::from_static("x-api-key"),
    HeaderName::from_static("x-amz-security-token"),
];

/// CORS policy: any origin, the task methods, the gateway-style headers.
#[must_use]
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(ALLOWED_HEADERS)
}

/// Build the full application router.
///
/// ```text
/// GET    /todos              list
/// POST   /todos              create
/// DELETE /todos              clear completed
/// PUT    /todos/:id/toggle   toggle
/// DELETE /todos/:id          delete
/// GET    /health             liveness
/// GET    /health/ready       readiness
/// GET    /metrics            Prometheus
/// OPTIONS *                  200, empty
/// ```
pub fn router(state: AppState) -> Router {
    let todos = Router::new()
        .route(
            "/todos",
            get(tasks::list_tasks)
                .post(tasks::create_task)
                .delete(tasks::clear_completed)
                .options(preflight),
        )
        .route("/todos/:id/toggle", put(tasks::toggle_task).options(preflight))
        .route(
            "/todos/:id",
            axum::routing::delete(tasks::delete_task).options(preflight),
        )
        .route_layer(api_key_layer(state.api_key.clone()));

    Router::new()
        .merge(todos)
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness))
        .route("/metrics", get(health::metrics))
        .fallback(fallback)
        .with_state(state)
        .layer(correlation_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

/// Preflight without CORS request headers still succeeds
#[allow(clippy::unused_async)]
async fn preflight() -> StatusCode {
    StatusCode::OK
}

#[allow(clippy::unused_async)]
async fn fallback(method: Method, uri: Uri) -> Response {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    AppError::no_route(uri.path()).into_response()
}
