use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::directory::repository::EmployeeRepository;

use super::domain::{CriteriaDraft, CriteriaView, DepartmentId};
use super::service::{DepartmentError, DepartmentService, SeedOutcome};

/// Router builder exposing department registration and criteria lookup.
pub fn department_router<D, E>(service: Arc<DepartmentService<D, E>>) -> Router
where
    D: super::repository::DepartmentRepository + 'static,
    E: EmployeeRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/departments",
            get(list_handler::<D, E>).post(create_handler::<D, E>),
        )
        .route(
            "/api/v1/departments/:department_id",
            get(get_handler::<D, E>)
                .put(update_handler::<D, E>)
                .delete(delete_handler::<D, E>),
        )
        .route(
            "/api/v1/departments/:department_id/criteria",
            get(criteria_handler::<D, E>),
        )
        .route("/api/v1/departments/seed", post(seed_handler::<D, E>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct DepartmentRequest {
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) criteria: Vec<CriteriaDraft>,
}

impl IntoResponse for DepartmentError {
    fn into_response(self) -> Response {
        let status = match &self {
            DepartmentError::NameRequired
            | DepartmentError::CriteriaRequired
            | DepartmentError::InvalidMaxScore(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DepartmentError::DuplicateName(_) | DepartmentError::HasEmployees { .. } => {
                StatusCode::CONFLICT
            }
            DepartmentError::NotFound(_) => StatusCode::NOT_FOUND,
            DepartmentError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub(crate) async fn list_handler<D, E>(
    State(service): State<Arc<DepartmentService<D, E>>>,
) -> Result<Response, DepartmentError>
where
    D: super::repository::DepartmentRepository + 'static,
    E: EmployeeRepository + 'static,
{
    let departments = service.list()?;
    let views: Vec<_> = departments.iter().map(|record| record.to_view()).collect();
    Ok(Json(views).into_response())
}

pub(crate) async fn create_handler<D, E>(
    State(service): State<Arc<DepartmentService<D, E>>>,
    Json(request): Json<DepartmentRequest>,
) -> Result<Response, DepartmentError>
where
    D: super::repository::DepartmentRepository + 'static,
    E: EmployeeRepository + 'static,
{
    let record = service.create(&request.name, request.criteria)?;
    Ok((StatusCode::CREATED, Json(record.to_detail_view())).into_response())
}

pub(crate) async fn get_handler<D, E>(
    State(service): State<Arc<DepartmentService<D, E>>>,
    Path(department_id): Path<i64>,
) -> Result<Response, DepartmentError>
where
    D: super::repository::DepartmentRepository + 'static,
    E: EmployeeRepository + 'static,
{
    let record = service.get(DepartmentId(department_id))?;
    Ok(Json(record.to_detail_view()).into_response())
}

pub(crate) async fn update_handler<D, E>(
    State(service): State<Arc<DepartmentService<D, E>>>,
    Path(department_id): Path<i64>,
    Json(request): Json<DepartmentRequest>,
) -> Result<Response, DepartmentError>
where
    D: super::repository::DepartmentRepository + 'static,
    E: EmployeeRepository + 'static,
{
    let record = service.update(DepartmentId(department_id), &request.name, request.criteria)?;
    Ok(Json(record.to_detail_view()).into_response())
}

pub(crate) async fn delete_handler<D, E>(
    State(service): State<Arc<DepartmentService<D, E>>>,
    Path(department_id): Path<i64>,
) -> Result<Response, DepartmentError>
where
    D: super::repository::DepartmentRepository + 'static,
    E: EmployeeRepository + 'static,
{
    service.delete(DepartmentId(department_id))?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

pub(crate) async fn criteria_handler<D, E>(
    State(service): State<Arc<DepartmentService<D, E>>>,
    Path(department_id): Path<i64>,
) -> Result<Response, DepartmentError>
where
    D: super::repository::DepartmentRepository + 'static,
    E: EmployeeRepository + 'static,
{
    let criteria = service.criteria(DepartmentId(department_id))?;
    let views: Vec<CriteriaView> = criteria.iter().map(|entry| entry.to_view()).collect();
    Ok(Json(views).into_response())
}

pub(crate) async fn seed_handler<D, E>(
    State(service): State<Arc<DepartmentService<D, E>>>,
) -> Result<Response, DepartmentError>
where
    D: super::repository::DepartmentRepository + 'static,
    E: EmployeeRepository + 'static,
{
    let outcome = service.seed_defaults()?;
    let status = match outcome {
        SeedOutcome::Seeded => "seeded",
        SeedOutcome::AlreadyPresent => "already_present",
    };
    Ok(Json(json!({ "status": status })).into_response())
}
