use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;

use evaltrack::analytics::reporting_router;
use evaltrack::directory::employee_router;
use evaltrack::export::export_router;
use evaltrack::ledger::evaluation_router;
use evaltrack::registry::department_router;
use evaltrack::share::share_router;
use evaltrack::sync::{sync_router, FileSettingsStore, SyncSettingsHandle};

use crate::infra::{AppState, Services};

/// Combine every feature router with the operational endpoints.
pub(crate) fn application_routes(
    services: &Services,
    settings: Arc<SyncSettingsHandle<FileSettingsStore>>,
) -> axum::Router {
    axum::Router::new()
        .merge(department_router(services.registry.clone()))
        .merge(employee_router(services.directory.clone()))
        .merge(evaluation_router(services.ledger.clone()))
        .merge(reporting_router(services.reporting.clone()))
        .merge(export_router(services.export.clone()))
        .merge(share_router(services.share.clone()))
        .merge(sync_router(settings))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
