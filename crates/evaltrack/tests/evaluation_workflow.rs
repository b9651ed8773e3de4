//! Integration scenarios for the evaluation service.
//!
//! Exercises the public service facades and HTTP routers end to end: seeding,
//! hiring, recording evaluations, aggregation, export shaping, and share
//! links, without reaching into private modules.

mod common {
    use std::sync::Arc;

    use evaltrack::directory::{EmployeeDraft, EmployeeService, EmployeeView};
    use evaltrack::ledger::{EvaluationService, ScoreDraft};
    use evaltrack::registry::{Criteria, CriteriaDraft, DepartmentRecord, DepartmentService};
    use evaltrack::storage::InMemoryStore;
    use evaltrack::sync::NullMirror;

    pub type Registry = DepartmentService<InMemoryStore, InMemoryStore>;
    pub type Directory = EmployeeService<InMemoryStore, InMemoryStore, InMemoryStore, NullMirror>;
    pub type Ledger = EvaluationService<InMemoryStore, InMemoryStore, InMemoryStore, NullMirror>;

    pub struct World {
        pub store: Arc<InMemoryStore>,
        pub registry: Registry,
        pub directory: Directory,
        pub ledger: Ledger,
    }

    pub fn world() -> World {
        let store = Arc::new(InMemoryStore::default());
        World {
            registry: DepartmentService::new(store.clone(), store.clone()),
            directory: EmployeeService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                Arc::new(NullMirror),
            ),
            ledger: EvaluationService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                Arc::new(NullMirror),
            ),
            store,
        }
    }

    pub fn department(world: &World, name: &str, criteria: &[&str]) -> DepartmentRecord {
        world
            .registry
            .create(
                name,
                criteria.iter().map(|entry| CriteriaDraft::named(entry)).collect(),
            )
            .expect("department created")
    }

    pub fn hire(world: &World, number: &str, record: &DepartmentRecord) -> EmployeeView {
        world
            .directory
            .create(EmployeeDraft {
                employee_number: number.to_string(),
                full_name: format!("Employee {number}"),
                job_title: "Specialist".to_string(),
                department_id: record.department.id,
            })
            .expect("employee created")
    }

    pub fn uniform_scores(criteria: &[Criteria], value: f64) -> Vec<ScoreDraft> {
        criteria
            .iter()
            .map(|entry| ScoreDraft::new(entry.id, value))
            .collect()
    }
}

mod registry {
    use super::common::*;
    use evaltrack::registry::{CriteriaDraft, DepartmentError, SeedOutcome};

    #[test]
    fn seeded_departments_match_the_fixed_sets() {
        let world = world();
        assert_eq!(
            world.registry.seed_defaults().expect("seed"),
            SeedOutcome::Seeded
        );
        assert_eq!(
            world.registry.seed_defaults().expect("idempotent"),
            SeedOutcome::AlreadyPresent
        );

        let departments = world.registry.list().expect("list");
        let shape: Vec<(String, usize)> = departments
            .iter()
            .map(|record| (record.department.name.clone(), record.criteria_count()))
            .collect();
        assert_eq!(
            shape,
            vec![
                ("Human Resources".to_string(), 5),
                ("Sales".to_string(), 8),
                ("Technology".to_string(), 8),
                ("Finance".to_string(), 5),
            ]
        );
    }

    #[test]
    fn department_delete_is_gated_on_employees() {
        let world = world();
        let record = department(&world, "Technology", &["Code quality"]);
        let employee = hire(&world, "EMP-001", &record);

        let blocked = world.registry.delete(record.department.id);
        assert!(matches!(
            blocked,
            Err(DepartmentError::HasEmployees { count: 1 })
        ));

        world.directory.delete(employee.id).expect("employee removed");
        world
            .registry
            .delete(record.department.id)
            .expect("delete succeeds once unreferenced");
    }

    #[test]
    fn duplicate_names_are_rejected_across_create_and_update() {
        let world = world();
        department(&world, "Technology", &["Code quality"]);
        let sales = department(&world, "Sales", &["Customer service"]);

        let result = world
            .registry
            .update(
                sales.department.id,
                "Technology",
                vec![CriteriaDraft::named("Customer service")],
            );
        assert!(matches!(result, Err(DepartmentError::DuplicateName(_))));
    }
}

mod ledger {
    use super::common::*;
    use evaltrack::analytics;
    use evaltrack::ledger::{EvaluationError, EvaluationPeriod, EvaluationRepository, ScoreDraft};

    #[test]
    fn round_trip_scores_total_nine_average_four_point_five() {
        let world = world();
        let record = department(&world, "Technology", &["Code quality", "Problem solving"]);
        let employee = hire(&world, "EMP-001", &record);

        let view = world
            .ledger
            .create(
                employee.id,
                3,
                2024,
                vec![
                    ScoreDraft::new(record.criteria[0].id, 4.0),
                    ScoreDraft::new(record.criteria[1].id, 5.0),
                ],
            )
            .expect("evaluation recorded");

        let stored = world
            .store
            .fetch(view.id)
            .expect("fetch")
            .expect("record present");
        assert_eq!(analytics::total_score(&stored), 9.0);
        assert_eq!(analytics::average_score(&stored), 4.5);
    }

    #[test]
    fn seeded_technology_scenario() {
        let world = world();
        world.registry.seed_defaults().expect("seed");
        let technology = world
            .registry
            .list()
            .expect("list")
            .into_iter()
            .find(|record| record.department.name == "Technology")
            .expect("technology present");
        assert_eq!(technology.criteria_count(), 8);

        let employee = hire(&world, "E1", &technology);
        let view = world
            .ledger
            .create(
                employee.id,
                3,
                2024,
                uniform_scores(&technology.criteria, 5.0),
            )
            .expect("evaluation recorded");

        let stored = world
            .store
            .fetch(view.id)
            .expect("fetch")
            .expect("record present");
        assert_eq!(analytics::total_score(&stored), 40.0);
        assert_eq!(analytics::average_score(&stored), 5.0);

        let second = world.ledger.create(
            employee.id,
            3,
            2024,
            uniform_scores(&technology.criteria, 5.0),
        );
        assert!(matches!(
            second,
            Err(EvaluationError::DuplicatePeriod { .. })
        ));
    }

    #[test]
    fn employee_delete_cascades_to_evaluations() {
        let world = world();
        let record = department(&world, "Technology", &["Code quality"]);
        let employee = hire(&world, "EMP-001", &record);

        world
            .ledger
            .create(employee.id, 1, 2024, uniform_scores(&record.criteria, 4.0))
            .expect("first period");
        world
            .ledger
            .create(employee.id, 2, 2024, uniform_scores(&record.criteria, 5.0))
            .expect("second period");

        world.directory.delete(employee.id).expect("employee removed");

        for month in [1, 2] {
            let period = EvaluationPeriod::new(month, 2024).expect("valid period");
            assert!(world
                .store
                .find(employee.id, period)
                .expect("find")
                .is_none());
        }
    }

    #[test]
    fn foreign_criteria_leave_no_partial_rows() {
        let world = world();
        let technology = department(&world, "Technology", &["Code quality"]);
        let sales = department(&world, "Sales", &["Customer service"]);
        let employee = hire(&world, "EMP-001", &technology);

        let result = world.ledger.create(
            employee.id,
            3,
            2024,
            vec![ScoreDraft::new(sales.criteria[0].id, 5.0)],
        );
        assert!(matches!(
            result,
            Err(EvaluationError::CriteriaDepartmentMismatch { .. })
        ));
        assert!(world
            .store
            .list_for_employee(employee.id)
            .expect("history")
            .is_empty());
    }
}

mod analytics {
    use super::common::*;
    use evaltrack::analytics::ReportingService;
    use evaltrack::ledger::ScoreDraft;

    #[test]
    fn chart_series_lists_only_recorded_months_in_order() {
        let world = world();
        let record = department(&world, "Technology", &["Code quality", "Problem solving"]);
        let employee = hire(&world, "EMP-001", &record);

        world
            .ledger
            .create(
                employee.id,
                3,
                2024,
                vec![ScoreDraft::new(record.criteria[0].id, 5.0)],
            )
            .expect("march");
        world
            .ledger
            .create(
                employee.id,
                1,
                2024,
                vec![
                    ScoreDraft::new(record.criteria[0].id, 4.0),
                    ScoreDraft::new(record.criteria[1].id, 2.0),
                ],
            )
            .expect("january");

        let reporting = ReportingService::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
        );
        let chart = reporting
            .chart_data(employee.id, 2024)
            .expect("chart data");

        assert_eq!(chart.series.months, vec!["January", "March"]);
        assert_eq!(chart.series.total_scores, vec![6.0, 5.0]);
        assert_eq!(chart.series.average_scores, vec![3.0, 5.0]);
        let code_quality = chart
            .series
            .criteria_series
            .iter()
            .find(|series| series.criteria_name == "Code quality")
            .expect("series present");
        assert_eq!(code_quality.scores, vec![4.0, 5.0]);
    }

    #[test]
    fn completion_reports_live_counts() {
        let world = world();
        let record = department(&world, "Technology", &["Code quality"]);
        let evaluated = hire(&world, "EMP-001", &record);
        let pending = hire(&world, "EMP-002", &record);

        world
            .ledger
            .create(
                evaluated.id,
                3,
                2024,
                vec![ScoreDraft::new(record.criteria[0].id, 4.0)],
            )
            .expect("evaluation recorded");

        let reporting = ReportingService::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
        );
        let report = reporting
            .completion(record.department.id, 3, 2024)
            .expect("completion");

        assert_eq!(report.stats.total_employees, 2);
        assert_eq!(report.stats.completed, 1);
        assert_eq!(report.stats.pending, 1);
        let pending_entry = report
            .stats
            .employees
            .iter()
            .find(|entry| entry.employee_id == pending.id)
            .expect("entry present");
        assert!(!pending_entry.evaluated);
    }
}

mod export {
    use super::common::*;
    use evaltrack::export::{ExportService, NO_EVALUATIONS};
    use evaltrack::ledger::ScoreDraft;
    use evaltrack::registry::CriteriaDraft;

    fn export_service(world: &World) -> ExportService<
        evaltrack::storage::InMemoryStore,
        evaltrack::storage::InMemoryStore,
        evaltrack::storage::InMemoryStore,
    > {
        ExportService::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
        )
    }

    #[test]
    fn sheet_uses_current_criteria_and_defaults_missing_scores() {
        let world = world();
        let record = department(&world, "Technology", &["Code quality"]);
        let employee = hire(&world, "EMP-001", &record);

        world
            .ledger
            .create(
                employee.id,
                1,
                2024,
                vec![ScoreDraft::new(record.criteria[0].id, 4.0)],
            )
            .expect("evaluation recorded");

        // Redefine the criteria set after the evaluation was recorded.
        let expanded = world
            .registry
            .update(
                record.department.id,
                "Technology",
                vec![
                    CriteriaDraft::named("Code quality"),
                    CriteriaDraft::named("Problem solving"),
                ],
            )
            .expect("criteria redefined");
        assert_eq!(expanded.criteria_count(), 2);

        let sheet = export_service(&world)
            .sheet(employee.id)
            .expect("sheet built");

        assert_eq!(
            sheet.columns,
            vec!["Month", "Year", "Code quality", "Problem solving", "Average"]
        );
        // The old score rows reference replaced criteria ids, so every
        // current column reads 0 and the average follows the current count.
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0].scores, vec![0.0, 0.0]);
        assert_eq!(sheet.rows[0].average, 0.0);
    }

    #[test]
    fn summary_carries_counts_and_no_evaluation_marker() {
        let world = world();
        let record = department(&world, "Technology", &["Code quality"]);
        let active = hire(&world, "EMP-001", &record);
        let _idle = hire(&world, "EMP-002", &record);

        world
            .ledger
            .create(
                active.id,
                1,
                2024,
                vec![ScoreDraft::new(record.criteria[0].id, 4.0)],
            )
            .expect("evaluation recorded");

        let service = export_service(&world);
        let rows = service.summary().expect("summary");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].evaluation_count, 1);
        assert_eq!(rows[0].overall_average, Some(4.0));
        assert_eq!(rows[1].evaluation_count, 0);
        assert_eq!(rows[1].overall_average, None);

        let rendered = service.summary_csv().expect("csv");
        assert!(rendered.contains(NO_EVALUATIONS));
    }
}

mod share {
    use super::common::*;
    use evaltrack::ledger::ScoreDraft;
    use evaltrack::share::{SharePayload, ShareService, ShareToken};

    #[test]
    fn employee_link_resolves_to_history() {
        let world = world();
        let record = department(&world, "Technology", &["Code quality"]);
        let employee = hire(&world, "EMP-001", &record);
        world
            .ledger
            .create(
                employee.id,
                1,
                2024,
                vec![ScoreDraft::new(record.criteria[0].id, 4.0)],
            )
            .expect("evaluation recorded");

        let service = ShareService::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
        );

        let token = service
            .issue_employee_link(employee.id)
            .expect("token issued");
        match service.resolve(&token).expect("resolves") {
            SharePayload::Employee {
                employee: view,
                evaluations,
                overall_average,
            } => {
                assert_eq!(view.id, employee.id);
                assert_eq!(evaluations.len(), 1);
                assert_eq!(overall_average, Some(4.0));
            }
            other => panic!("expected employee payload, got {other:?}"),
        }

        let unknown = service.resolve(&ShareToken("not-a-token".to_string()));
        assert!(unknown.is_err());
    }
}

mod routing {
    use super::common::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use evaltrack::directory::employee_router;
    use evaltrack::registry::department_router;

    fn registry_router(world: &World) -> axum::Router {
        department_router(Arc::new(evaltrack::registry::DepartmentService::new(
            world.store.clone(),
            world.store.clone(),
        )))
    }

    fn directory_router(world: &World) -> axum::Router {
        employee_router(Arc::new(evaltrack::directory::EmployeeService::new(
            world.store.clone(),
            world.store.clone(),
            world.store.clone(),
            Arc::new(evaltrack::sync::NullMirror),
        )))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        serde_json::from_slice(&body).expect("json")
    }

    #[tokio::test]
    async fn department_create_returns_canonical_fields() {
        let world = world();
        let router = registry_router(&world);

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/departments")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "name": "Technology",
                            "criteria": [
                                { "name": "Code quality" },
                                { "name": "" },
                                { "name": "Problem solving", "max_score": 5 },
                            ],
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::CREATED);
        let payload = body_json(response).await;
        assert_eq!(payload.get("name"), Some(&json!("Technology")));
        // Blank-named criteria are dropped and the derived count follows.
        assert_eq!(payload.get("criteria_count"), Some(&json!(2)));
        let criteria = payload
            .get("criteria")
            .and_then(Value::as_array)
            .expect("criteria array");
        assert_eq!(criteria.len(), 2);
        assert!(criteria[0].get("criteria_name").is_some());
        assert_eq!(criteria[0].get("max_score"), Some(&json!(5)));
    }

    #[tokio::test]
    async fn duplicate_department_maps_to_conflict() {
        let world = world();
        department(&world, "Technology", &["Code quality"]);
        let router = registry_router(&world);

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/departments")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "name": "Technology",
                            "criteria": [{ "name": "Anything" }],
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn employee_routes_cover_create_get_and_missing() {
        let world = world();
        let record = department(&world, "Technology", &["Code quality"]);
        let router = directory_router(&world);

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/employees")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({
                            "employee_number": "EMP-001",
                            "full_name": "Sami Hart",
                            "job_title": "Engineer",
                            "department_id": record.department.id,
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::CREATED);
        let payload = body_json(response).await;
        assert_eq!(payload.get("department_name"), Some(&json!("Technology")));
        let id = payload.get("id").and_then(Value::as_i64).expect("id");

        let fetched = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/api/v1/employees/{id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(fetched.status(), StatusCode::OK);

        let missing = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/employees/9999")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
