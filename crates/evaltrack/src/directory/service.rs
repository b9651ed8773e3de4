use std::sync::Arc;

use crate::ledger::repository::EvaluationRepository;
use crate::registry::domain::DepartmentId;
use crate::registry::repository::DepartmentRepository;
use crate::storage::RepositoryError;
use crate::sync::{publish_best_effort, MirrorEvent, MirrorPublisher};

use super::domain::{Employee, EmployeeDraft, EmployeeId, EmployeePatch, EmployeeView, FieldPatch};
use super::repository::EmployeeRepository;

/// Service owning hire registration, partial updates, and cascade removal.
pub struct EmployeeService<E, D, V, M> {
    employees: Arc<E>,
    departments: Arc<D>,
    evaluations: Arc<V>,
    mirror: Arc<M>,
}

/// Error raised by the employee service.
#[derive(Debug, thiserror::Error)]
pub enum EmployeeError {
    #[error("field '{0}' is required")]
    MissingField(&'static str),
    #[error("employee number '{0}' is already in use")]
    DuplicateNumber(String),
    #[error("department {0} not found")]
    DepartmentNotFound(DepartmentId),
    #[error("employee {0} not found")]
    NotFound(EmployeeId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl<E, D, V, M> EmployeeService<E, D, V, M>
where
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
    V: EvaluationRepository + 'static,
    M: MirrorPublisher + 'static,
{
    pub fn new(employees: Arc<E>, departments: Arc<D>, evaluations: Arc<V>, mirror: Arc<M>) -> Self {
        Self {
            employees,
            departments,
            evaluations,
            mirror,
        }
    }

    /// Register a new hire.
    pub fn create(&self, draft: EmployeeDraft) -> Result<EmployeeView, EmployeeError> {
        let employee_number = required(&draft.employee_number, "employee_number")?;
        let full_name = required(&draft.full_name, "full_name")?;
        let job_title = required(&draft.job_title, "job_title")?;

        if self.employees.find_by_number(&employee_number)?.is_some() {
            return Err(EmployeeError::DuplicateNumber(employee_number));
        }

        if self.departments.fetch(draft.department_id)?.is_none() {
            return Err(EmployeeError::DepartmentNotFound(draft.department_id));
        }

        let draft = EmployeeDraft {
            employee_number,
            full_name,
            job_title,
            department_id: draft.department_id,
        };
        let number = draft.employee_number.clone();
        let employee = self.employees.insert(draft).map_err(|err| match err {
            RepositoryError::Conflict => EmployeeError::DuplicateNumber(number),
            other => EmployeeError::Repository(other),
        })?;

        let view = self.view(&employee)?;
        publish_best_effort(self.mirror.as_ref(), MirrorEvent::EmployeeUpserted(view.clone()));
        Ok(view)
    }

    /// Apply a partial update; untouched fields keep their stored values.
    pub fn update(&self, id: EmployeeId, patch: EmployeePatch) -> Result<EmployeeView, EmployeeError> {
        let mut employee = self.fetch(id)?;

        if let FieldPatch::Set(number) = patch.employee_number {
            let number = required(&number, "employee_number")?;
            if let Some(existing) = self.employees.find_by_number(&number)? {
                if existing.id != id {
                    return Err(EmployeeError::DuplicateNumber(number));
                }
            }
            employee.employee_number = number;
        }

        if let FieldPatch::Set(full_name) = patch.full_name {
            employee.full_name = required(&full_name, "full_name")?;
        }

        if let FieldPatch::Set(job_title) = patch.job_title {
            employee.job_title = required(&job_title, "job_title")?;
        }

        if let FieldPatch::Set(department_id) = patch.department_id {
            if self.departments.fetch(department_id)?.is_none() {
                return Err(EmployeeError::DepartmentNotFound(department_id));
            }
            employee.department_id = department_id;
        }

        self.employees.update(employee.clone())?;

        let view = self.view(&employee)?;
        publish_best_effort(self.mirror.as_ref(), MirrorEvent::EmployeeUpserted(view.clone()));
        Ok(view)
    }

    /// Remove an employee together with every evaluation the employee owns.
    pub fn delete(&self, id: EmployeeId) -> Result<(), EmployeeError> {
        self.fetch(id)?;
        self.evaluations.delete_for_employee(id)?;
        self.employees.delete(id)?;
        publish_best_effort(self.mirror.as_ref(), MirrorEvent::EmployeeRemoved(id));
        Ok(())
    }

    pub fn get(&self, id: EmployeeId) -> Result<EmployeeView, EmployeeError> {
        let employee = self.fetch(id)?;
        self.view(&employee)
    }

    pub fn list(&self) -> Result<Vec<EmployeeView>, EmployeeError> {
        let employees = self.employees.list()?;
        employees
            .iter()
            .map(|employee| self.view(employee))
            .collect()
    }

    fn fetch(&self, id: EmployeeId) -> Result<Employee, EmployeeError> {
        self.employees.fetch(id)?.ok_or(EmployeeError::NotFound(id))
    }

    fn view(&self, employee: &Employee) -> Result<EmployeeView, EmployeeError> {
        let department_name = self
            .departments
            .fetch(employee.department_id)?
            .map(|record| record.department.name);
        Ok(employee.to_view(department_name))
    }
}

fn required(value: &str, field: &'static str) -> Result<String, EmployeeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EmployeeError::MissingField(field));
    }
    Ok(trimmed.to_string())
}
