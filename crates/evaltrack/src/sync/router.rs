use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::settings::{SettingsError, SettingsStore, SyncSettingsHandle};

/// Router builder exposing the spreadsheet-sync settings.
pub fn sync_router<S>(handle: Arc<SyncSettingsHandle<S>>) -> Router
where
    S: SettingsStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/sync/settings",
            get(get_handler::<S>).put(update_handler::<S>),
        )
        .with_state(handle)
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateSettingsRequest {
    pub(crate) spreadsheet_url: Option<String>,
    pub(crate) api_key: Option<String>,
    #[serde(default = "default_auto_sync")]
    pub(crate) auto_sync: bool,
}

fn default_auto_sync() -> bool {
    true
}

impl IntoResponse for SettingsError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub(crate) async fn get_handler<S>(
    State(handle): State<Arc<SyncSettingsHandle<S>>>,
) -> Response
where
    S: SettingsStore + 'static,
{
    Json(handle.get()).into_response()
}

pub(crate) async fn update_handler<S>(
    State(handle): State<Arc<SyncSettingsHandle<S>>>,
    Json(request): Json<UpdateSettingsRequest>,
) -> Result<Response, SettingsError>
where
    S: SettingsStore + 'static,
{
    let settings = handle.update(request.spreadsheet_url, request.api_key, request.auto_sync)?;
    Ok(Json(settings).into_response())
}
