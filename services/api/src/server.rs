use crate::cli::ServeArgs;
use crate::infra::{build_services, AppState, Store};
use crate::routes::application_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use evaltrack::config::AppConfig;
use evaltrack::error::AppError;
use evaltrack::sync::{FileSettingsStore, SyncSettingsHandle};
use evaltrack::telemetry;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(Store::default());
    let services = build_services(store);

    let settings_store = FileSettingsStore::new(&config.sync.settings_path);
    let settings = Arc::new(
        SyncSettingsHandle::load(settings_store).map_err(AppError::domain)?,
    );

    let app = application_routes(&services, settings)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "evaluation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
