use crate::storage::RepositoryError;

use super::domain::{Criteria, CriteriaDraft, CriteriaId, Department, DepartmentId, DepartmentRecord};

/// Storage abstraction for departments and their criteria sets.
///
/// Multi-row operations are atomic: either every row write lands or the store
/// is left unchanged. Implementations must serialize criteria redefinition
/// against evaluation writes that reference the same department's criteria.
pub trait DepartmentRepository: Send + Sync {
    /// Insert a department plus one criteria row per draft.
    /// Fails with `Conflict` when the name is already taken.
    fn insert(
        &self,
        name: &str,
        criteria: &[CriteriaDraft],
    ) -> Result<DepartmentRecord, RepositoryError>;

    /// Rename a department and replace its entire criteria set
    /// (delete-all-then-recreate, not a diff).
    fn replace(
        &self,
        id: DepartmentId,
        name: &str,
        criteria: &[CriteriaDraft],
    ) -> Result<DepartmentRecord, RepositoryError>;

    /// Delete the department and its criteria rows.
    fn delete(&self, id: DepartmentId) -> Result<(), RepositoryError>;

    fn fetch(&self, id: DepartmentId) -> Result<Option<DepartmentRecord>, RepositoryError>;

    fn find_by_name(&self, name: &str) -> Result<Option<Department>, RepositoryError>;

    fn list(&self) -> Result<Vec<DepartmentRecord>, RepositoryError>;

    /// Criteria for one department in registry order.
    fn criteria_for(&self, id: DepartmentId) -> Result<Vec<Criteria>, RepositoryError>;

    fn fetch_criteria(&self, id: CriteriaId) -> Result<Option<Criteria>, RepositoryError>;

    fn count(&self) -> Result<usize, RepositoryError>;
}
