use crate::directory::domain::EmployeeId;
use crate::storage::RepositoryError;

use super::domain::{EvaluationId, EvaluationPeriod, EvaluationRecord, ScoreInput};

/// Storage abstraction for the evaluation ledger.
///
/// Every mutation is atomic: the evaluation row and its score rows land
/// together or not at all. The (employee, period) uniqueness constraint is
/// enforced here as the last line of defense against concurrent writers.
pub trait EvaluationRepository: Send + Sync {
    /// Insert an evaluation plus one score row per entry.
    /// Fails with `Conflict` when the employee already has an evaluation for
    /// the period.
    fn insert(
        &self,
        employee_id: EmployeeId,
        period: EvaluationPeriod,
        scores: &[ScoreInput],
    ) -> Result<EvaluationRecord, RepositoryError>;

    /// Replace the full score set of an existing evaluation.
    fn replace_scores(
        &self,
        id: EvaluationId,
        scores: &[ScoreInput],
    ) -> Result<EvaluationRecord, RepositoryError>;

    /// Delete the evaluation and every score row it owns.
    fn delete(&self, id: EvaluationId) -> Result<(), RepositoryError>;

    fn fetch(&self, id: EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError>;

    fn find(
        &self,
        employee_id: EmployeeId,
        period: EvaluationPeriod,
    ) -> Result<Option<EvaluationRecord>, RepositoryError>;

    /// Evaluation history, newest period first.
    fn list_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError>;

    /// One year of evaluations, month ascending.
    fn list_for_employee_in_year(
        &self,
        employee_id: EmployeeId,
        year: i32,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError>;

    /// Cascade helper used when an employee is removed.
    fn delete_for_employee(&self, employee_id: EmployeeId) -> Result<(), RepositoryError>;
}
