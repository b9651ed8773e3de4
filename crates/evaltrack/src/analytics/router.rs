use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::directory::domain::EmployeeId;
use crate::directory::repository::EmployeeRepository;
use crate::ledger::repository::EvaluationRepository;
use crate::registry::domain::DepartmentId;
use crate::registry::repository::DepartmentRepository;

use super::service::{ReportingError, ReportingService};

/// Router builder exposing the chart and completion read models.
pub fn reporting_router<V, E, D>(service: Arc<ReportingService<V, E, D>>) -> Router
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/employees/:employee_id/evaluations/chart",
            get(chart_handler::<V, E, D>),
        )
        .route(
            "/api/v1/departments/:department_id/completion",
            get(completion_handler::<V, E, D>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartQuery {
    pub(crate) year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionQuery {
    pub(crate) month: u8,
    pub(crate) year: i32,
}

impl IntoResponse for ReportingError {
    fn into_response(self) -> Response {
        let status = match &self {
            ReportingError::InvalidMonth(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ReportingError::EmployeeNotFound(_) | ReportingError::DepartmentNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            ReportingError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub(crate) async fn chart_handler<V, E, D>(
    State(service): State<Arc<ReportingService<V, E, D>>>,
    Path(employee_id): Path<i64>,
    Query(query): Query<ChartQuery>,
) -> Result<Response, ReportingError>
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
{
    let year = query.year.unwrap_or_else(|| Utc::now().year());
    let data = service.chart_data(EmployeeId(employee_id), year)?;
    Ok(Json(data).into_response())
}

pub(crate) async fn completion_handler<V, E, D>(
    State(service): State<Arc<ReportingService<V, E, D>>>,
    Path(department_id): Path<i64>,
    Query(query): Query<CompletionQuery>,
) -> Result<Response, ReportingError>
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
{
    let report = service.completion(DepartmentId(department_id), query.month, query.year)?;
    Ok(Json(report).into_response())
}
