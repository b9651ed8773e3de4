use crate::registry::domain::DepartmentId;
use crate::storage::RepositoryError;

use super::domain::{Employee, EmployeeDraft, EmployeeId};

/// Storage abstraction for the employee directory.
pub trait EmployeeRepository: Send + Sync {
    /// Insert a new employee, assigning its id and `created_at`.
    /// Fails with `Conflict` when the employee number is taken.
    fn insert(&self, draft: EmployeeDraft) -> Result<Employee, RepositoryError>;

    /// Persist the full record for an existing employee.
    fn update(&self, employee: Employee) -> Result<(), RepositoryError>;

    fn delete(&self, id: EmployeeId) -> Result<(), RepositoryError>;

    fn fetch(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError>;

    fn find_by_number(&self, employee_number: &str) -> Result<Option<Employee>, RepositoryError>;

    fn list(&self) -> Result<Vec<Employee>, RepositoryError>;

    fn list_in_department(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<Employee>, RepositoryError>;

    fn count_in_department(&self, department_id: DepartmentId) -> Result<usize, RepositoryError>;
}
