use std::sync::Arc;

use chrono::{Datelike, Utc};
use clap::Args;

use evaltrack::directory::{EmployeeDraft, EmployeeView};
use evaltrack::error::AppError;
use evaltrack::ledger::ScoreDraft;
use evaltrack::registry::DepartmentRecord;

use crate::infra::{build_services, Services, Store};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation year used for the demo records (defaults to the current year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let year = args.year.unwrap_or_else(|| Utc::now().year());

    let store = Arc::new(Store::default());
    let services = build_services(store);

    services
        .registry
        .seed_defaults()
        .map_err(AppError::domain)?;

    let technology = department_named(&services, "Technology")?;
    println!(
        "Seeded {} departments; using '{}' with {} criteria",
        services.registry.list().map_err(AppError::domain)?.len(),
        technology.department.name,
        technology.criteria_count()
    );

    let first = hire(&services, "EMP-001", "Sami Hart", &technology)?;
    let second = hire(&services, "EMP-002", "Noor Vale", &technology)?;

    // Two cycles for the first employee, one for the second, so both the
    // chart and the completion report have something to say.
    record_cycle(&services, &first, 1, year, 4.0)?;
    record_cycle(&services, &first, 3, year, 5.0)?;
    record_cycle(&services, &second, 1, year, 3.0)?;

    let chart = services
        .reporting
        .chart_data(first.id, year)
        .map_err(AppError::domain)?;
    println!(
        "\nChart for {} ({year}): months {:?}, totals {:?}",
        chart.employee.full_name, chart.series.months, chart.series.total_scores
    );

    let completion = services
        .reporting
        .completion(technology.department.id, 3, year)
        .map_err(AppError::domain)?;
    println!(
        "Completion for {} in 3/{year}: {}/{} evaluated",
        technology.department.name, completion.stats.completed, completion.stats.total_employees
    );

    let token = services
        .share
        .issue_employee_link(first.id)
        .map_err(AppError::domain)?;
    println!("Share link token for {}: {}", first.full_name, token.0);

    println!("\nPer-employee sheet:");
    print!(
        "{}",
        services
            .export
            .sheet_csv(first.id)
            .map_err(AppError::domain)?
    );

    println!("\nCross-employee summary:");
    print!(
        "{}",
        services.export.summary_csv().map_err(AppError::domain)?
    );

    Ok(())
}

fn department_named(services: &Services, name: &str) -> Result<DepartmentRecord, AppError> {
    services
        .registry
        .list()
        .map_err(AppError::domain)?
        .into_iter()
        .find(|record| record.department.name == name)
        .ok_or_else(|| {
            AppError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("seeded department '{name}' missing"),
            ))
        })
}

fn hire(
    services: &Services,
    number: &str,
    full_name: &str,
    department: &DepartmentRecord,
) -> Result<EmployeeView, AppError> {
    services
        .directory
        .create(EmployeeDraft {
            employee_number: number.to_string(),
            full_name: full_name.to_string(),
            job_title: "Engineer".to_string(),
            department_id: department.department.id,
        })
        .map_err(AppError::domain)
}

fn record_cycle(
    services: &Services,
    employee: &EmployeeView,
    month: u8,
    year: i32,
    value: f64,
) -> Result<(), AppError> {
    let criteria = services
        .registry
        .criteria(employee.department_id)
        .map_err(AppError::domain)?;
    let drafts: Vec<ScoreDraft> = criteria
        .iter()
        .map(|entry| ScoreDraft::new(entry.id, value))
        .collect();

    services
        .ledger
        .create(employee.id, month, year, drafts)
        .map_err(AppError::domain)?;
    Ok(())
}
