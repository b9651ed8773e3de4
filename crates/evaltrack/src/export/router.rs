use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::directory::domain::EmployeeId;
use crate::directory::repository::EmployeeRepository;
use crate::ledger::repository::EvaluationRepository;
use crate::registry::repository::DepartmentRepository;

use super::service::{ExportError, ExportService};

/// Router builder exposing the export tables as JSON and CSV.
pub fn export_router<V, E, D>(service: Arc<ExportService<V, E, D>>) -> Router
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
{
    Router::new()
        .route("/api/v1/export/summary", get(summary_handler::<V, E, D>))
        .route(
            "/api/v1/export/summary.csv",
            get(summary_csv_handler::<V, E, D>),
        )
        .route(
            "/api/v1/export/employees/:employee_id",
            get(sheet_handler::<V, E, D>),
        )
        .route(
            "/api/v1/export/employees/:employee_id/csv",
            get(sheet_csv_handler::<V, E, D>),
        )
        .with_state(service)
}

impl IntoResponse for ExportError {
    fn into_response(self) -> Response {
        let status = match &self {
            ExportError::NoEmployees => StatusCode::UNPROCESSABLE_ENTITY,
            ExportError::EmployeeNotFound(_) => StatusCode::NOT_FOUND,
            ExportError::Csv(_) | ExportError::Utf8(_) | ExportError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

fn csv_response(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response()
}

pub(crate) async fn summary_handler<V, E, D>(
    State(service): State<Arc<ExportService<V, E, D>>>,
) -> Result<Response, ExportError>
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
{
    let rows = service.summary()?;
    Ok(Json(rows).into_response())
}

pub(crate) async fn summary_csv_handler<V, E, D>(
    State(service): State<Arc<ExportService<V, E, D>>>,
) -> Result<Response, ExportError>
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
{
    let body = service.summary_csv()?;
    Ok(csv_response(body))
}

pub(crate) async fn sheet_handler<V, E, D>(
    State(service): State<Arc<ExportService<V, E, D>>>,
    Path(employee_id): Path<i64>,
) -> Result<Response, ExportError>
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
{
    let sheet = service.sheet(EmployeeId(employee_id))?;
    Ok(Json(sheet).into_response())
}

pub(crate) async fn sheet_csv_handler<V, E, D>(
    State(service): State<Arc<ExportService<V, E, D>>>,
    Path(employee_id): Path<i64>,
) -> Result<Response, ExportError>
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
{
    let body = service.sheet_csv(EmployeeId(employee_id))?;
    Ok(csv_response(body))
}
