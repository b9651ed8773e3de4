use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use crate::directory::domain::{EmployeeId, EmployeeView};
use crate::directory::repository::EmployeeRepository;
use crate::ledger::domain::EvaluationPeriod;
use crate::ledger::repository::EvaluationRepository;
use crate::registry::domain::{CriteriaId, DepartmentId};
use crate::registry::repository::DepartmentRepository;
use crate::storage::RepositoryError;

use super::{chart_series, completion, ChartSeries, CompletionStats};

/// Read-side service feeding the chart and completion endpoints.
pub struct ReportingService<V, E, D> {
    evaluations: Arc<V>,
    employees: Arc<E>,
    departments: Arc<D>,
}

/// Error raised by the reporting service.
#[derive(Debug, thiserror::Error)]
pub enum ReportingError {
    #[error("evaluation month must be between 1 and 12, got {0}")]
    InvalidMonth(u8),
    #[error("employee {0} not found")]
    EmployeeNotFound(EmployeeId),
    #[error("department {0} not found")]
    DepartmentNotFound(DepartmentId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Chart payload together with the employee it describes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub employee: EmployeeView,
    #[serde(flatten)]
    pub series: ChartSeries,
}

/// Completion payload stamped with the requested period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionReport {
    pub month: u8,
    pub year: i32,
    #[serde(flatten)]
    pub stats: CompletionStats,
}

impl<V, E, D> ReportingService<V, E, D>
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
{
    pub fn new(evaluations: Arc<V>, employees: Arc<E>, departments: Arc<D>) -> Self {
        Self {
            evaluations,
            employees,
            departments,
        }
    }

    /// One employee's chart data for a year.
    pub fn chart_data(
        &self,
        employee_id: EmployeeId,
        year: i32,
    ) -> Result<ChartData, ReportingError> {
        let employee = self
            .employees
            .fetch(employee_id)?
            .ok_or(ReportingError::EmployeeNotFound(employee_id))?;

        let records = self
            .evaluations
            .list_for_employee_in_year(employee_id, year)?;

        // Display names for every criteria id the records mention, falling
        // back to individual lookups for criteria outside the employee's
        // current department.
        let mut names: HashMap<CriteriaId, String> = self
            .departments
            .criteria_for(employee.department_id)?
            .into_iter()
            .map(|criteria| (criteria.id, criteria.name))
            .collect();
        for record in &records {
            for score in &record.scores {
                if !names.contains_key(&score.criteria_id) {
                    if let Some(criteria) = self.departments.fetch_criteria(score.criteria_id)? {
                        names.insert(criteria.id, criteria.name);
                    }
                }
            }
        }

        let series = chart_series(year, &records, &names);
        let department_name = self
            .departments
            .fetch(employee.department_id)?
            .map(|record| record.department.name);

        Ok(ChartData {
            employee: employee.to_view(department_name),
            series,
        })
    }

    /// Evaluated-versus-pending split for one department and period.
    pub fn completion(
        &self,
        department_id: DepartmentId,
        month: u8,
        year: i32,
    ) -> Result<CompletionReport, ReportingError> {
        let period =
            EvaluationPeriod::new(month, year).ok_or(ReportingError::InvalidMonth(month))?;

        if self.departments.fetch(department_id)?.is_none() {
            return Err(ReportingError::DepartmentNotFound(department_id));
        }

        let employees = self.employees.list_in_department(department_id)?;
        let mut evaluated = HashSet::new();
        for employee in &employees {
            if self.evaluations.find(employee.id, period)?.is_some() {
                evaluated.insert(employee.id);
            }
        }

        Ok(CompletionReport {
            month,
            year,
            stats: completion(department_id, &employees, &evaluated),
        })
    }
}
