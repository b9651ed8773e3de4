use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::directory::domain::{EmployeeDraft, EmployeeView};
use crate::directory::service::EmployeeService;
use crate::ledger::domain::ScoreDraft;
use crate::ledger::router::evaluation_router;
use crate::ledger::service::EvaluationService;
use crate::registry::domain::{Criteria, CriteriaDraft, DepartmentRecord};
use crate::registry::service::DepartmentService;
use crate::storage::InMemoryStore;
use crate::sync::NullMirror;

pub(super) type Service =
    EvaluationService<InMemoryStore, InMemoryStore, InMemoryStore, NullMirror>;

pub(super) struct Fixture {
    pub(super) store: Arc<InMemoryStore>,
    pub(super) service: Service,
    pub(super) department: DepartmentRecord,
    pub(super) employee: EmployeeView,
}

/// Department with two criteria plus one employee assigned to it.
pub(super) fn fixture() -> Fixture {
    fixture_with_criteria(&["Code quality", "Problem solving"])
}

pub(super) fn fixture_with_criteria(criteria_names: &[&str]) -> Fixture {
    let store = Arc::new(InMemoryStore::default());

    let registry = DepartmentService::new(store.clone(), store.clone());
    let department = registry
        .create(
            "Technology",
            criteria_names
                .iter()
                .map(|name| CriteriaDraft::named(name))
                .collect(),
        )
        .expect("department created");

    let directory = EmployeeService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(NullMirror),
    );
    let employee = directory
        .create(EmployeeDraft {
            employee_number: "EMP-001".to_string(),
            full_name: "Sami Hart".to_string(),
            job_title: "Engineer".to_string(),
            department_id: department.department.id,
        })
        .expect("employee created");

    let service = EvaluationService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(NullMirror),
    );

    Fixture {
        store,
        service,
        department,
        employee,
    }
}

pub(super) fn drafts(criteria: &[Criteria], value: f64) -> Vec<ScoreDraft> {
    criteria
        .iter()
        .map(|entry| ScoreDraft::new(entry.id, value))
        .collect()
}

pub(super) fn router_for(fixture: &Fixture) -> axum::Router {
    let service = EvaluationService::new(
        fixture.store.clone(),
        fixture.store.clone(),
        fixture.store.clone(),
        Arc::new(NullMirror),
    );
    evaluation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
