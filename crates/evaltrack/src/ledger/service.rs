use std::sync::Arc;

use crate::directory::domain::EmployeeId;
use crate::directory::repository::EmployeeRepository;
use crate::registry::domain::{CriteriaId, DepartmentId};
use crate::registry::repository::DepartmentRepository;
use crate::storage::RepositoryError;
use crate::sync::{publish_best_effort, MirrorEvent, MirrorPublisher};

use super::domain::{
    EvaluationId, EvaluationPeriod, EvaluationRecord, EvaluationView, ScoreDraft, ScoreInput,
    ScoreView,
};
use super::repository::EvaluationRepository;

/// Service composing the directory, registry, and ledger at write time.
pub struct EvaluationService<V, E, D, M> {
    evaluations: Arc<V>,
    employees: Arc<E>,
    departments: Arc<D>,
    mirror: Arc<M>,
}

/// Error raised by the evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error("evaluation month must be between 1 and 12, got {0}")]
    InvalidMonth(u8),
    #[error("score entry is missing criteria or score data")]
    IncompleteScore,
    #[error("employee {0} not found")]
    EmployeeNotFound(EmployeeId),
    #[error("criteria {0} not found")]
    CriteriaNotFound(CriteriaId),
    #[error("criteria {criteria} does not belong to department {department}")]
    CriteriaDepartmentMismatch {
        criteria: CriteriaId,
        department: DepartmentId,
    },
    #[error("employee {employee} already has an evaluation for {period}")]
    DuplicatePeriod {
        employee: EmployeeId,
        period: EvaluationPeriod,
    },
    #[error("evaluation {0} not found")]
    NotFound(EvaluationId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl<V, E, D, M> EvaluationService<V, E, D, M>
where
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
    M: MirrorPublisher + 'static,
{
    pub fn new(evaluations: Arc<V>, employees: Arc<E>, departments: Arc<D>, mirror: Arc<M>) -> Self {
        Self {
            evaluations,
            employees,
            departments,
            mirror,
        }
    }

    /// Record an evaluation for one employee and period.
    ///
    /// Every precondition is checked before any write; the evaluation row and
    /// its scores then land in one atomic repository call.
    pub fn create(
        &self,
        employee_id: EmployeeId,
        month: u8,
        year: i32,
        drafts: Vec<ScoreDraft>,
    ) -> Result<EvaluationView, EvaluationError> {
        let period =
            EvaluationPeriod::new(month, year).ok_or(EvaluationError::InvalidMonth(month))?;

        let employee = self
            .employees
            .fetch(employee_id)?
            .ok_or(EvaluationError::EmployeeNotFound(employee_id))?;

        if self.evaluations.find(employee_id, period)?.is_some() {
            return Err(EvaluationError::DuplicatePeriod {
                employee: employee_id,
                period,
            });
        }

        let validated = self.validate_scores(&drafts, employee.department_id)?;

        let record = self
            .evaluations
            .insert(employee_id, period, &validated)
            .map_err(|err| match err {
                RepositoryError::Conflict => EvaluationError::DuplicatePeriod {
                    employee: employee_id,
                    period,
                },
                other => EvaluationError::Repository(other),
            })?;

        let view = build_view(self.departments.as_ref(), &record)?;
        publish_best_effort(
            self.mirror.as_ref(),
            MirrorEvent::EvaluationRecorded(view.clone()),
        );
        Ok(view)
    }

    /// Replace an evaluation's score set, re-running the creation-time
    /// validation against the employee's current department.
    pub fn update(
        &self,
        id: EvaluationId,
        drafts: Option<Vec<ScoreDraft>>,
    ) -> Result<EvaluationView, EvaluationError> {
        let record = self
            .evaluations
            .fetch(id)?
            .ok_or(EvaluationError::NotFound(id))?;

        let record = match drafts {
            Some(drafts) => {
                let employee_id = record.evaluation.employee_id;
                let employee = self
                    .employees
                    .fetch(employee_id)?
                    .ok_or(EvaluationError::EmployeeNotFound(employee_id))?;
                let validated = self.validate_scores(&drafts, employee.department_id)?;
                self.evaluations.replace_scores(id, &validated)?
            }
            None => record,
        };

        let view = build_view(self.departments.as_ref(), &record)?;
        publish_best_effort(
            self.mirror.as_ref(),
            MirrorEvent::EvaluationRecorded(view.clone()),
        );
        Ok(view)
    }

    /// Delete an evaluation; its scores go with it.
    pub fn delete(&self, id: EvaluationId) -> Result<(), EvaluationError> {
        if self.evaluations.fetch(id)?.is_none() {
            return Err(EvaluationError::NotFound(id));
        }
        self.evaluations.delete(id)?;
        publish_best_effort(self.mirror.as_ref(), MirrorEvent::EvaluationRemoved(id));
        Ok(())
    }

    /// Evaluation history for one employee, newest period first.
    pub fn history(&self, employee_id: EmployeeId) -> Result<Vec<EvaluationView>, EvaluationError> {
        if self.employees.fetch(employee_id)?.is_none() {
            return Err(EvaluationError::EmployeeNotFound(employee_id));
        }

        let records = self.evaluations.list_for_employee(employee_id)?;
        records
            .iter()
            .map(|record| {
                build_view(self.departments.as_ref(), record).map_err(EvaluationError::from)
            })
            .collect()
    }

    fn validate_scores(
        &self,
        drafts: &[ScoreDraft],
        department_id: DepartmentId,
    ) -> Result<Vec<ScoreInput>, EvaluationError> {
        let mut validated = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let (Some(criteria_id), Some(score)) = (draft.criteria_id, draft.score) else {
                return Err(EvaluationError::IncompleteScore);
            };

            let criteria = self
                .departments
                .fetch_criteria(criteria_id)?
                .ok_or(EvaluationError::CriteriaNotFound(criteria_id))?;

            if criteria.department_id != department_id {
                return Err(EvaluationError::CriteriaDepartmentMismatch {
                    criteria: criteria_id,
                    department: department_id,
                });
            }

            validated.push(ScoreInput { criteria_id, score });
        }
        Ok(validated)
    }
}

/// Assemble the canonical view, resolving criterion names for display.
pub(crate) fn build_view<D>(
    departments: &D,
    record: &EvaluationRecord,
) -> Result<EvaluationView, RepositoryError>
where
    D: DepartmentRepository + ?Sized,
{
    let mut scores = Vec::with_capacity(record.scores.len());
    for score in &record.scores {
        let criteria = departments.fetch_criteria(score.criteria_id)?;
        scores.push(ScoreView {
            id: score.id,
            evaluation_id: score.evaluation_id,
            criteria_id: score.criteria_id,
            criteria_name: criteria.as_ref().map(|entry| entry.name.clone()),
            score: score.score,
            max_score: criteria.as_ref().map(|entry| entry.max_score),
        });
    }

    Ok(EvaluationView {
        id: record.evaluation.id,
        employee_id: record.evaluation.employee_id,
        evaluation_month: record.evaluation.period.month,
        evaluation_year: record.evaluation.period.year,
        created_at: record.evaluation.created_at,
        scores,
    })
}
