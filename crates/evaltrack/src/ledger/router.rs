use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::directory::domain::EmployeeId;
use crate::directory::repository::EmployeeRepository;
use crate::registry::repository::DepartmentRepository;
use crate::sync::MirrorPublisher;

use super::domain::{EvaluationId, ScoreDraft};
use super::repository::EvaluationRepository;
use super::service::{EvaluationError, EvaluationService};

/// Router builder exposing ledger writes and the per-employee history.
pub fn evaluation_router<V, E, D, M>(service: Arc<EvaluationService<V, E, D, M>>) -> Router
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
    M: MirrorPublisher + 'static,
{
    Router::new()
        .route("/api/v1/evaluations", post(create_handler::<V, E, D, M>))
        .route(
            "/api/v1/evaluations/:evaluation_id",
            put(update_handler::<V, E, D, M>).delete(delete_handler::<V, E, D, M>),
        )
        .route(
            "/api/v1/employees/:employee_id/evaluations",
            get(history_handler::<V, E, D, M>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateEvaluationRequest {
    pub(crate) employee_id: EmployeeId,
    pub(crate) evaluation_month: u8,
    pub(crate) evaluation_year: i32,
    #[serde(default)]
    pub(crate) scores: Vec<ScoreDraft>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateEvaluationRequest {
    #[serde(default)]
    pub(crate) scores: Option<Vec<ScoreDraft>>,
}

impl IntoResponse for EvaluationError {
    fn into_response(self) -> Response {
        let status = match &self {
            EvaluationError::InvalidMonth(_) | EvaluationError::IncompleteScore => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            EvaluationError::EmployeeNotFound(_)
            | EvaluationError::CriteriaNotFound(_)
            | EvaluationError::NotFound(_) => StatusCode::NOT_FOUND,
            EvaluationError::DuplicatePeriod { .. }
            | EvaluationError::CriteriaDepartmentMismatch { .. } => StatusCode::CONFLICT,
            EvaluationError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub(crate) async fn create_handler<V, E, D, M>(
    State(service): State<Arc<EvaluationService<V, E, D, M>>>,
    Json(request): Json<CreateEvaluationRequest>,
) -> Result<Response, EvaluationError>
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
    M: MirrorPublisher + 'static,
{
    let view = service.create(
        request.employee_id,
        request.evaluation_month,
        request.evaluation_year,
        request.scores,
    )?;
    Ok((StatusCode::CREATED, Json(view)).into_response())
}

pub(crate) async fn update_handler<V, E, D, M>(
    State(service): State<Arc<EvaluationService<V, E, D, M>>>,
    Path(evaluation_id): Path<i64>,
    Json(request): Json<UpdateEvaluationRequest>,
) -> Result<Response, EvaluationError>
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
    M: MirrorPublisher + 'static,
{
    let view = service.update(EvaluationId(evaluation_id), request.scores)?;
    Ok(Json(view).into_response())
}

pub(crate) async fn delete_handler<V, E, D, M>(
    State(service): State<Arc<EvaluationService<V, E, D, M>>>,
    Path(evaluation_id): Path<i64>,
) -> Result<Response, EvaluationError>
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
    M: MirrorPublisher + 'static,
{
    service.delete(EvaluationId(evaluation_id))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub(crate) async fn history_handler<V, E, D, M>(
    State(service): State<Arc<EvaluationService<V, E, D, M>>>,
    Path(employee_id): Path<i64>,
) -> Result<Response, EvaluationError>
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
    M: MirrorPublisher + 'static,
{
    let views = service.history(EmployeeId(employee_id))?;
    Ok(Json(views).into_response())
}
