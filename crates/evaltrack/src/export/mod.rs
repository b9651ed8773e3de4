//! Export projector: flat tabular shapes handed to an external document
//! generator. Column order is deterministic: identity columns first, the
//! department's criteria in registry order, then the computed average.

pub mod router;
pub mod service;

use std::collections::HashMap;
use std::io::Write;

use serde::Serialize;

use crate::analytics;
use crate::directory::domain::EmployeeView;
use crate::ledger::domain::EvaluationRecord;
use crate::registry::domain::{Criteria, CriteriaId};

pub use router::export_router;
pub use service::{ExportError, ExportService};

/// Marker written in place of an average for employees without evaluations.
pub const NO_EVALUATIONS: &str = "no evaluations";

/// Fixed heading set of the cross-employee summary table.
pub const SUMMARY_COLUMNS: [&str; 6] = [
    "Full name",
    "Employee number",
    "Job title",
    "Department",
    "Evaluations",
    "Overall average",
];

/// One evaluation row of an employee sheet; `scores` aligns with the sheet's
/// criteria columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetRow {
    pub month: &'static str,
    pub year: i32,
    pub scores: Vec<f64>,
    pub average: f64,
}

/// Per-employee flat table: one row per recorded period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeSheet {
    pub employee: EmployeeView,
    pub columns: Vec<String>,
    pub rows: Vec<SheetRow>,
}

/// Cross-employee summary line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub full_name: String,
    pub employee_number: String,
    pub job_title: String,
    pub department_name: Option<String>,
    pub evaluation_count: usize,
    pub overall_average: Option<f64>,
}

/// Project one employee's history onto the department's current criteria.
///
/// A criterion added after an evaluation was recorded shows as 0 for that
/// row, and the trailing average divides by the current criteria count.
/// `records` must be ordered oldest first.
pub fn employee_sheet(
    employee: EmployeeView,
    criteria: &[Criteria],
    records: &[EvaluationRecord],
) -> EmployeeSheet {
    let mut columns = Vec::with_capacity(criteria.len() + 3);
    columns.push("Month".to_string());
    columns.push("Year".to_string());
    columns.extend(criteria.iter().map(|entry| entry.name.clone()));
    columns.push("Average".to_string());

    let rows = records
        .iter()
        .map(|record| {
            let by_criteria: HashMap<CriteriaId, f64> = record
                .scores
                .iter()
                .map(|score| (score.criteria_id, score.score))
                .collect();

            let scores: Vec<f64> = criteria
                .iter()
                .map(|entry| by_criteria.get(&entry.id).copied().unwrap_or(0.0))
                .collect();
            let total: f64 = scores.iter().sum();
            let average = if criteria.is_empty() {
                0.0
            } else {
                total / criteria.len() as f64
            };

            SheetRow {
                month: record.evaluation.period.month_label(),
                year: record.evaluation.period.year,
                scores,
                average,
            }
        })
        .collect();

    EmployeeSheet {
        employee,
        columns,
        rows,
    }
}

/// Summary line for one employee across all recorded evaluations.
pub fn summary_row(employee: &EmployeeView, records: &[EvaluationRecord]) -> SummaryRow {
    SummaryRow {
        full_name: employee.full_name.clone(),
        employee_number: employee.employee_number.clone(),
        job_title: employee.job_title.clone(),
        department_name: employee.department_name.clone(),
        evaluation_count: records.len(),
        overall_average: analytics::overall_average(records),
    }
}

/// Render an employee sheet as CSV.
pub fn write_sheet_csv<W: Write>(sheet: &EmployeeSheet, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&sheet.columns)?;

    for row in &sheet.rows {
        let mut record = Vec::with_capacity(sheet.columns.len());
        record.push(row.month.to_string());
        record.push(row.year.to_string());
        record.extend(row.scores.iter().map(|score| score.to_string()));
        record.push(format!("{:.2}", row.average));
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Render the cross-employee summary as CSV.
pub fn write_summary_csv<W: Write>(rows: &[SummaryRow], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(SUMMARY_COLUMNS)?;

    for row in rows {
        let evaluation_count = row.evaluation_count.to_string();
        let overall_average = row
            .overall_average
            .map(|average| format!("{average:.2}"))
            .unwrap_or_else(|| NO_EVALUATIONS.to_string());
        csv_writer.write_record([
            row.full_name.as_str(),
            row.employee_number.as_str(),
            row.job_title.as_str(),
            row.department_name.as_deref().unwrap_or(""),
            evaluation_count.as_str(),
            overall_average.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
