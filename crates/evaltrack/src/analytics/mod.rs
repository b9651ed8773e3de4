//! Aggregation engine: derived totals and averages, never stored as primary
//! data. Everything in this module root is a pure function over ledger
//! records; fetching lives in [`service`].

pub mod router;
pub mod service;

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::directory::domain::{Employee, EmployeeId};
use crate::ledger::domain::EvaluationRecord;
use crate::registry::domain::{CriteriaId, DepartmentId};

pub use router::reporting_router;
pub use service::{ReportingError, ReportingService};

/// Sum of an evaluation's raw scores.
pub fn total_score(record: &EvaluationRecord) -> f64 {
    record.scores.iter().map(|score| score.score).sum()
}

/// Mean score of one evaluation; 0 when it holds no scores.
pub fn average_score(record: &EvaluationRecord) -> f64 {
    if record.scores.is_empty() {
        return 0.0;
    }
    total_score(record) / record.scores.len() as f64
}

/// Mean of per-evaluation averages; `None` when the employee has none.
pub fn overall_average(records: &[EvaluationRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let sum: f64 = records.iter().map(average_score).sum();
    Some(sum / records.len() as f64)
}

/// One criterion's score sequence across a year of evaluations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriteriaSeries {
    pub criteria_id: CriteriaId,
    pub criteria_name: String,
    pub scores: Vec<f64>,
}

/// Month-by-month chart payload for one employee and year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub year: i32,
    pub months: Vec<&'static str>,
    pub total_scores: Vec<f64>,
    pub average_scores: Vec<f64>,
    pub criteria_series: Vec<CriteriaSeries>,
}

/// Build the chart payload from one year of records, month ascending.
///
/// Series are keyed by criteria id; `names` only supplies display labels, so
/// same-named criteria from different departments can never collide.
pub fn chart_series(
    year: i32,
    records: &[EvaluationRecord],
    names: &HashMap<CriteriaId, String>,
) -> ChartSeries {
    let mut months = Vec::with_capacity(records.len());
    let mut total_scores = Vec::with_capacity(records.len());
    let mut average_scores = Vec::with_capacity(records.len());
    let mut per_criteria: BTreeMap<CriteriaId, Vec<f64>> = BTreeMap::new();

    for record in records {
        months.push(record.evaluation.period.month_label());
        total_scores.push(total_score(record));
        average_scores.push(average_score(record));

        for score in &record.scores {
            per_criteria
                .entry(score.criteria_id)
                .or_default()
                .push(score.score);
        }
    }

    let criteria_series = per_criteria
        .into_iter()
        .map(|(criteria_id, scores)| CriteriaSeries {
            criteria_id,
            criteria_name: names
                .get(&criteria_id)
                .cloned()
                .unwrap_or_else(|| format!("criteria-{criteria_id}")),
            scores,
        })
        .collect();

    ChartSeries {
        year,
        months,
        total_scores,
        average_scores,
        criteria_series,
    }
}

/// Per-employee completion flag within one department and period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeCompletion {
    pub employee_id: EmployeeId,
    pub employee_number: String,
    pub full_name: String,
    pub evaluated: bool,
}

/// Evaluated-versus-pending split for a department in one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionStats {
    pub department_id: DepartmentId,
    pub total_employees: usize,
    pub completed: usize,
    pub pending: usize,
    pub employees: Vec<EmployeeCompletion>,
}

/// Split a department's employees by whether they hold an evaluation for the
/// period; `evaluated` carries the ids that do.
pub fn completion(
    department_id: DepartmentId,
    employees: &[Employee],
    evaluated: &HashSet<EmployeeId>,
) -> CompletionStats {
    let entries: Vec<EmployeeCompletion> = employees
        .iter()
        .map(|employee| EmployeeCompletion {
            employee_id: employee.id,
            employee_number: employee.employee_number.clone(),
            full_name: employee.full_name.clone(),
            evaluated: evaluated.contains(&employee.id),
        })
        .collect();

    let completed = entries.iter().filter(|entry| entry.evaluated).count();
    CompletionStats {
        department_id,
        total_employees: entries.len(),
        completed,
        pending: entries.len() - completed,
        employees: entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::ledger::domain::{
        EvaluationId, EvaluationPeriod, MonthlyEvaluation, Score, ScoreId,
    };

    fn record(id: i64, month: u8, scores: &[(i64, f64)]) -> EvaluationRecord {
        EvaluationRecord {
            evaluation: MonthlyEvaluation {
                id: EvaluationId(id),
                employee_id: EmployeeId(1),
                period: EvaluationPeriod::new(month, 2024).expect("valid period"),
                created_at: Utc::now(),
            },
            scores: scores
                .iter()
                .enumerate()
                .map(|(offset, (criteria_id, value))| Score {
                    id: ScoreId(id * 100 + offset as i64),
                    evaluation_id: EvaluationId(id),
                    criteria_id: CriteriaId(*criteria_id),
                    score: *value,
                })
                .collect(),
        }
    }

    #[test]
    fn average_of_empty_evaluation_is_zero() {
        let empty = record(1, 1, &[]);
        assert_eq!(average_score(&empty), 0.0);
        assert_eq!(total_score(&empty), 0.0);
    }

    #[test]
    fn totals_and_averages_follow_raw_scores() {
        let evaluation = record(1, 1, &[(1, 4.0), (2, 5.0)]);
        assert_eq!(total_score(&evaluation), 9.0);
        assert_eq!(average_score(&evaluation), 4.5);
    }

    #[test]
    fn overall_average_is_mean_of_evaluation_averages() {
        let records = vec![record(1, 1, &[(1, 4.0), (2, 5.0)]), record(2, 2, &[(1, 3.0)])];
        let overall = overall_average(&records).expect("some evaluations");
        assert!((overall - 3.75).abs() < f64::EPSILON);
        assert_eq!(overall_average(&[]), None);
    }

    #[test]
    fn chart_series_skips_months_without_evaluations() {
        let records = vec![
            record(1, 1, &[(1, 4.0), (2, 2.0)]),
            record(2, 3, &[(1, 5.0)]),
        ];
        let names = HashMap::from([
            (CriteriaId(1), "Code quality".to_string()),
            (CriteriaId(2), "Problem solving".to_string()),
        ]);

        let series = chart_series(2024, &records, &names);

        assert_eq!(series.months, vec!["January", "March"]);
        assert_eq!(series.total_scores, vec![6.0, 5.0]);
        assert_eq!(series.average_scores, vec![3.0, 5.0]);
        assert_eq!(series.criteria_series.len(), 2);
        assert_eq!(series.criteria_series[0].criteria_name, "Code quality");
        assert_eq!(series.criteria_series[0].scores, vec![4.0, 5.0]);
        assert_eq!(series.criteria_series[1].scores, vec![2.0]);
    }

    #[test]
    fn chart_series_labels_unresolvable_criteria_by_id() {
        let records = vec![record(1, 2, &[(9, 1.0)])];
        let series = chart_series(2024, &records, &HashMap::new());
        assert_eq!(series.criteria_series[0].criteria_name, "criteria-9");
    }

    #[test]
    fn completion_splits_evaluated_and_pending() {
        let employees = vec![
            Employee {
                id: EmployeeId(1),
                employee_number: "EMP-001".to_string(),
                full_name: "Sami Hart".to_string(),
                job_title: "Engineer".to_string(),
                department_id: DepartmentId(1),
                created_at: Utc::now(),
            },
            Employee {
                id: EmployeeId(2),
                employee_number: "EMP-002".to_string(),
                full_name: "Noor Vale".to_string(),
                job_title: "Engineer".to_string(),
                department_id: DepartmentId(1),
                created_at: Utc::now(),
            },
        ];
        let evaluated = HashSet::from([EmployeeId(2)]);

        let stats = completion(DepartmentId(1), &employees, &evaluated);

        assert_eq!(stats.total_employees, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 1);
        assert!(!stats.employees[0].evaluated);
        assert!(stats.employees[1].evaluated);
    }
}
