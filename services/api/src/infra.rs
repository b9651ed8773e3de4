use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use evaltrack::analytics::ReportingService;
use evaltrack::directory::EmployeeService;
use evaltrack::export::ExportService;
use evaltrack::ledger::EvaluationService;
use evaltrack::registry::DepartmentService;
use evaltrack::share::ShareService;
use evaltrack::storage::InMemoryStore;
use evaltrack::sync::{MirrorError, MirrorEvent, MirrorPublisher};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mirror stand-in: the spreadsheet integration is simulated, so events are
/// only traced.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct LoggingMirror;

impl MirrorPublisher for LoggingMirror {
    fn publish(&self, event: MirrorEvent) -> Result<(), MirrorError> {
        tracing::debug!(?event, "spreadsheet mirror event");
        Ok(())
    }
}

pub(crate) type Store = InMemoryStore;
pub(crate) type Registry = DepartmentService<Store, Store>;
pub(crate) type Directory = EmployeeService<Store, Store, Store, LoggingMirror>;
pub(crate) type Ledger = EvaluationService<Store, Store, Store, LoggingMirror>;
pub(crate) type Reporting = ReportingService<Store, Store, Store>;
pub(crate) type Export = ExportService<Store, Store, Store>;
pub(crate) type Share = ShareService<Store, Store, Store, Store>;

pub(crate) struct Services {
    pub(crate) registry: Arc<Registry>,
    pub(crate) directory: Arc<Directory>,
    pub(crate) ledger: Arc<Ledger>,
    pub(crate) reporting: Arc<Reporting>,
    pub(crate) export: Arc<Export>,
    pub(crate) share: Arc<Share>,
}

/// Wire every service onto one shared store.
pub(crate) fn build_services(store: Arc<Store>) -> Services {
    let mirror = Arc::new(LoggingMirror);

    Services {
        registry: Arc::new(DepartmentService::new(store.clone(), store.clone())),
        directory: Arc::new(EmployeeService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            mirror.clone(),
        )),
        ledger: Arc::new(EvaluationService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            mirror,
        )),
        reporting: Arc::new(ReportingService::new(
            store.clone(),
            store.clone(),
            store.clone(),
        )),
        export: Arc::new(ExportService::new(
            store.clone(),
            store.clone(),
            store.clone(),
        )),
        share: Arc::new(ShareService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
        )),
    }
}
