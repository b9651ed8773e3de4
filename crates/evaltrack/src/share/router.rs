use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::directory::domain::EmployeeId;
use crate::directory::repository::EmployeeRepository;
use crate::ledger::repository::EvaluationRepository;
use crate::registry::repository::DepartmentRepository;

use super::domain::{ShareToken, ShareTokenStore};
use super::service::{ShareError, ShareService};

/// Router builder exposing share-link issuance and resolution.
pub fn share_router<S, V, E, D>(service: Arc<ShareService<S, V, E, D>>) -> Router
where
    S: ShareTokenStore + 'static,
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/share/employees/:employee_id",
            post(issue_employee_handler::<S, V, E, D>),
        )
        .route("/api/v1/share/public", post(issue_public_handler::<S, V, E, D>))
        .route("/api/v1/share/:token", get(resolve_handler::<S, V, E, D>))
        .with_state(service)
}

impl IntoResponse for ShareError {
    fn into_response(self) -> Response {
        let status = match &self {
            ShareError::EmployeeNotFound(_) | ShareError::UnknownToken => StatusCode::NOT_FOUND,
            ShareError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub(crate) async fn issue_employee_handler<S, V, E, D>(
    State(service): State<Arc<ShareService<S, V, E, D>>>,
    Path(employee_id): Path<i64>,
) -> Result<Response, ShareError>
where
    S: ShareTokenStore + 'static,
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
{
    let token = service.issue_employee_link(EmployeeId(employee_id))?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "share_token": token.0 })),
    )
        .into_response())
}

pub(crate) async fn issue_public_handler<S, V, E, D>(
    State(service): State<Arc<ShareService<S, V, E, D>>>,
) -> Result<Response, ShareError>
where
    S: ShareTokenStore + 'static,
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
{
    let token = service.issue_public_link()?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "share_token": token.0 })),
    )
        .into_response())
}

pub(crate) async fn resolve_handler<S, V, E, D>(
    State(service): State<Arc<ShareService<S, V, E, D>>>,
    Path(token): Path<String>,
) -> Result<Response, ShareError>
where
    S: ShareTokenStore + 'static,
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
{
    let payload = service.resolve(&ShareToken(token))?;
    Ok(Json(payload).into_response())
}
