use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::ledger::repository::EvaluationRepository;
use crate::registry::repository::DepartmentRepository;
use crate::sync::MirrorPublisher;

use super::domain::{EmployeeDraft, EmployeeId, EmployeePatch};
use super::repository::EmployeeRepository;
use super::service::{EmployeeError, EmployeeService};

/// Router builder exposing the employee directory endpoints.
pub fn employee_router<E, D, V, M>(service: Arc<EmployeeService<E, D, V, M>>) -> Router
where
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
    V: EvaluationRepository + 'static,
    M: MirrorPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/employees",
            get(list_handler::<E, D, V, M>).post(create_handler::<E, D, V, M>),
        )
        .route(
            "/api/v1/employees/:employee_id",
            get(get_handler::<E, D, V, M>)
                .put(update_handler::<E, D, V, M>)
                .delete(delete_handler::<E, D, V, M>),
        )
        .with_state(service)
}

impl IntoResponse for EmployeeError {
    fn into_response(self) -> Response {
        let status = match &self {
            EmployeeError::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EmployeeError::DuplicateNumber(_) => StatusCode::CONFLICT,
            EmployeeError::DepartmentNotFound(_) | EmployeeError::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            EmployeeError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub(crate) async fn list_handler<E, D, V, M>(
    State(service): State<Arc<EmployeeService<E, D, V, M>>>,
) -> Result<Response, EmployeeError>
where
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
    V: EvaluationRepository + 'static,
    M: MirrorPublisher + 'static,
{
    let views = service.list()?;
    Ok(Json(views).into_response())
}

pub(crate) async fn create_handler<E, D, V, M>(
    State(service): State<Arc<EmployeeService<E, D, V, M>>>,
    Json(draft): Json<EmployeeDraft>,
) -> Result<Response, EmployeeError>
where
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
    V: EvaluationRepository + 'static,
    M: MirrorPublisher + 'static,
{
    let view = service.create(draft)?;
    Ok((StatusCode::CREATED, Json(view)).into_response())
}

pub(crate) async fn get_handler<E, D, V, M>(
    State(service): State<Arc<EmployeeService<E, D, V, M>>>,
    Path(employee_id): Path<i64>,
) -> Result<Response, EmployeeError>
where
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
    V: EvaluationRepository + 'static,
    M: MirrorPublisher + 'static,
{
    let view = service.get(EmployeeId(employee_id))?;
    Ok(Json(view).into_response())
}

pub(crate) async fn update_handler<E, D, V, M>(
    State(service): State<Arc<EmployeeService<E, D, V, M>>>,
    Path(employee_id): Path<i64>,
    Json(patch): Json<EmployeePatch>,
) -> Result<Response, EmployeeError>
where
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
    V: EvaluationRepository + 'static,
    M: MirrorPublisher + 'static,
{
    let view = service.update(EmployeeId(employee_id), patch)?;
    Ok(Json(view).into_response())
}

pub(crate) async fn delete_handler<E, D, V, M>(
    State(service): State<Arc<EmployeeService<E, D, V, M>>>,
    Path(employee_id): Path<i64>,
) -> Result<Response, EmployeeError>
where
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
    V: EvaluationRepository + 'static,
    M: MirrorPublisher + 'static,
{
    service.delete(EmployeeId(employee_id))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
