use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde_json::json;

use super::domain::ProfileSubmission;
use super::repository::{NotificationDispatcher, ProfileStore};
use super::service::{PassRequest, QualificationService, QualificationServiceError};
use crate::workflows::discovery::NoticeSource;

/// Router builder exposing discovery and qualification endpoints.
pub fn qualification_router<S, P, D>(service: Arc<QualificationService<S, P, D>>) -> Router
where
    S: NoticeSource + 'static,
    P: ProfileStore + 'static,
    D: NotificationDispatcher + 'static,
{
    Router::new()
        .route("/api/v1/tenders", get(tenders_handler::<S, P, D>))
        .route(
            "/api/v1/qualification/evaluate",
            post(evaluate_handler::<S, P, D>),
        )
        .route("/api/v1/qualification/runs", post(run_handler::<S, P, D>))
        .with_state(service)
}

pub(crate) async fn tenders_handler<S, P, D>(
    State(service): State<Arc<QualificationService<S, P, D>>>,
) -> Response
where
    S: NoticeSource + 'static,
    P: ProfileStore + 'static,
    D: NotificationDispatcher + 'static,
{
    let report = service.discover(Utc::now()).await;
    (StatusCode::OK, axum::Json(report)).into_response()
}

pub(crate) async fn evaluate_handler<S, P, D>(
    State(service): State<Arc<QualificationService<S, P, D>>>,
    axum::Json(submission): axum::Json<ProfileSubmission>,
) -> Response
where
    S: NoticeSource + 'static,
    P: ProfileStore + 'static,
    D: NotificationDispatcher + 'static,
{
    match service.evaluate(submission, Utc::now()).await {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn run_handler<S, P, D>(
    State(service): State<Arc<QualificationService<S, P, D>>>,
    axum::Json(request): axum::Json<PassRequest>,
) -> Response
where
    S: NoticeSource + 'static,
    P: ProfileStore + 'static,
    D: NotificationDispatcher + 'static,
{
    match service.run_pass(&request, Utc::now()).await {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: QualificationServiceError) -> Response {
    let status = match &error {
        QualificationServiceError::Profile(_) => StatusCode::UNPROCESSABLE_ENTITY,
        QualificationServiceError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
