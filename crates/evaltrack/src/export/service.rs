use std::sync::Arc;

use crate::directory::domain::{Employee, EmployeeId, EmployeeView};
use crate::directory::repository::EmployeeRepository;
use crate::ledger::repository::EvaluationRepository;
use crate::registry::repository::DepartmentRepository;
use crate::storage::RepositoryError;

use super::{employee_sheet, summary_row, write_sheet_csv, write_summary_csv};
use super::{EmployeeSheet, SummaryRow};

/// Read-side service assembling export tables from the ledger.
pub struct ExportService<V, E, D> {
    evaluations: Arc<V>,
    employees: Arc<E>,
    departments: Arc<D>,
}

/// Error raised by the export service.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("employee {0} not found")]
    EmployeeNotFound(EmployeeId),
    #[error("there are no employees to export")]
    NoEmployees,
    #[error("failed to render csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("export produced invalid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl<V, E, D> ExportService<V, E, D>
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

    /// Flat per-period table for one employee, oldest period first.
    pub fn sheet(&self, employee_id: EmployeeId) -> Result<EmployeeSheet, ExportError> {
        let employee = self
            .employees
            .fetch(employee_id)?
            .ok_or(ExportError::EmployeeNotFound(employee_id))?;

        let criteria = self.departments.criteria_for(employee.department_id)?;
        let mut records = self.evaluations.list_for_employee(employee_id)?;
        records.reverse();

        let view = self.view(&employee)?;
        Ok(employee_sheet(view, &criteria, &records))
    }

    /// One summary line per employee; fails when the directory is empty.
    pub fn summary(&self) -> Result<Vec<SummaryRow>, ExportError> {
        let employees = self.employees.list()?;
        if employees.is_empty() {
            return Err(ExportError::NoEmployees);
        }

        let mut rows = Vec::with_capacity(employees.len());
        for employee in &employees {
            let records = self.evaluations.list_for_employee(employee.id)?;
            let view = self.view(employee)?;
            rows.push(summary_row(&view, &records));
        }
        Ok(rows)
    }

    pub fn sheet_csv(&self, employee_id: EmployeeId) -> Result<String, ExportError> {
        let sheet = self.sheet(employee_id)?;
        let mut buffer = Vec::new();
        write_sheet_csv(&sheet, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    pub fn summary_csv(&self) -> Result<String, ExportError> {
        let rows = self.summary()?;
        let mut buffer = Vec::new();
        write_summary_csv(&rows, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    fn view(&self, employee: &Employee) -> Result<EmployeeView, ExportError> {
        let department_name = self
            .departments
            .fetch(employee.department_id)?
            .map(|record| record.department.name);
        Ok(employee.to_view(department_name))
    }
}
