//! HTTP API for the browser client.
//!
//! Every data-access and aggregation operation the pages need is exposed
//! here; the pages themselves stay thin callers. Filter query parameters
//! use `all` (or an empty value) as the no-filter sentinel.

pub mod clients;
pub mod metrics;
pub mod projects;
pub mod tasks;
pub mod time;
pub mod users;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde_json::json;
use taskmaster_core::{Backend, Error};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub type ApiResult<T> = Result<T, ApiError>;

/// Transport-level error: the core taxonomy mapped onto status codes.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Invalid(String),
    Unavailable(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound { .. } => Self::NotFound(err.to_string()),
            Error::Invalid(message) => Self::Invalid(message),
            Error::Unavailable(message) => Self::Unavailable(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::Invalid(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            Self::Unavailable(message) => (StatusCode::BAD_GATEWAY, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Map the `all`/empty sentinel to "no filter".
pub(crate) fn sentinel(value: Option<&str>) -> Option<&str> {
    match value.map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(concrete) => Some(concrete),
    }
}

pub(crate) fn validated(check: Result<(), String>) -> Result<(), ApiError> {
    check.map_err(ApiError::Invalid)
}

async fn health() -> &'static str {
    "ok"
}

pub fn create_router(backend: Backend) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tasks", get(tasks::list).post(tasks::create))
        .route("/api/tasks/bulk/status", axum::routing::post(tasks::bulk_status))
        .route(
            "/api/tasks/{id}",
            get(tasks::get_by_id).patch(tasks::update).delete(tasks::remove),
        )
        .route("/api/tasks/{id}/status", axum::routing::post(tasks::set_status))
        .route(
            "/api/tasks/{id}/time",
            get(tasks::list_time).post(tasks::add_time),
        )
        .route("/api/projects", get(projects::list).post(projects::create))
        .route(
            "/api/projects/{id}",
            get(projects::get_by_id)
                .patch(projects::update)
                .delete(projects::remove),
        )
        .route("/api/projects/{id}/tasks", get(projects::tasks))
        .route("/api/projects/{id}/progress", get(projects::progress))
        .route("/api/clients", get(clients::list).post(clients::create))
        .route(
            "/api/clients/{id}",
            get(clients::get_by_id)
                .patch(clients::update)
                .delete(clients::remove),
        )
        .route("/api/users", get(users::list))
        .route("/api/users/{id}", get(users::get_by_id))
        .route("/api/time", get(time::list))
        .route("/api/time/{id}", patch(time::update).delete(time::remove))
        .route("/api/metrics/summary", get(metrics::summary))
        .route("/api/metrics/productivity", get(metrics::productivity))
        .route("/api/metrics/projects", get(metrics::project_rankings))
        .route("/api/calendar/week", get(metrics::week))
        .route("/api/calendar/{year}/{month}", get(metrics::month))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(backend)
}
