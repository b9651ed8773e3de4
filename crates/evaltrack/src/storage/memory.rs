use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::directory::domain::{Employee, EmployeeDraft, EmployeeId};
use crate::directory::repository::EmployeeRepository;
use crate::ledger::domain::{
    EvaluationId, EvaluationPeriod, EvaluationRecord, MonthlyEvaluation, Score, ScoreId,
    ScoreInput,
};
use crate::ledger::repository::EvaluationRepository;
use crate::registry::domain::{
    Criteria, CriteriaDraft, CriteriaId, Department, DepartmentId, DepartmentRecord,
};
use crate::registry::repository::DepartmentRepository;
use crate::share::domain::{ShareScope, ShareToken, ShareTokenStore};

use super::RepositoryError;

/// Reference storage adapter backing every repository trait.
///
/// One mutex guards the whole dataset, so each repository call is atomic and
/// criteria redefinition serializes against evaluation writes referencing the
/// same department.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    departments: HashMap<i64, Department>,
    criteria: HashMap<i64, Criteria>,
    employees: HashMap<i64, Employee>,
    evaluations: HashMap<i64, MonthlyEvaluation>,
    scores: HashMap<i64, Score>,
    shares: HashMap<String, ShareScope>,
    department_seq: i64,
    criteria_seq: i64,
    employee_seq: i64,
    evaluation_seq: i64,
    score_seq: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("store mutex poisoned")
    }
}

fn criteria_of(inner: &Inner, department_id: DepartmentId) -> Vec<Criteria> {
    let mut rows: Vec<Criteria> = inner
        .criteria
        .values()
        .filter(|row| row.department_id == department_id)
        .cloned()
        .collect();
    rows.sort_by_key(|row| row.id);
    rows
}

fn scores_of(inner: &Inner, evaluation_id: EvaluationId) -> Vec<Score> {
    let mut rows: Vec<Score> = inner
        .scores
        .values()
        .filter(|row| row.evaluation_id == evaluation_id)
        .cloned()
        .collect();
    rows.sort_by_key(|row| row.id);
    rows
}

fn record_of(inner: &Inner, evaluation: MonthlyEvaluation) -> EvaluationRecord {
    let scores = scores_of(inner, evaluation.id);
    EvaluationRecord { evaluation, scores }
}

impl DepartmentRepository for InMemoryStore {
    fn insert(
        &self,
        name: &str,
        criteria: &[CriteriaDraft],
    ) -> Result<DepartmentRecord, RepositoryError> {
        let mut inner = self.lock();
        if inner.departments.values().any(|row| row.name == name) {
            return Err(RepositoryError::Conflict);
        }

        let id = DepartmentId(next(&mut inner.department_seq));
        let department = Department {
            id,
            name: name.to_string(),
        };
        inner.departments.insert(id.0, department.clone());

        let mut rows = Vec::with_capacity(criteria.len());
        for draft in criteria {
            let criteria_id = CriteriaId(next(&mut inner.criteria_seq));
            let row = Criteria {
                id: criteria_id,
                department_id: id,
                name: draft.name.clone(),
                max_score: draft.max_score,
            };
            inner.criteria.insert(criteria_id.0, row.clone());
            rows.push(row);
        }

        Ok(DepartmentRecord {
            department,
            criteria: rows,
        })
    }

    fn replace(
        &self,
        id: DepartmentId,
        name: &str,
        criteria: &[CriteriaDraft],
    ) -> Result<DepartmentRecord, RepositoryError> {
        let mut inner = self.lock();
        if !inner.departments.contains_key(&id.0) {
            return Err(RepositoryError::NotFound);
        }
        if inner
            .departments
            .values()
            .any(|row| row.name == name && row.id != id)
        {
            return Err(RepositoryError::Conflict);
        }

        inner.criteria.retain(|_, row| row.department_id != id);

        let department = Department {
            id,
            name: name.to_string(),
        };
        inner.departments.insert(id.0, department.clone());

        let mut rows = Vec::with_capacity(criteria.len());
        for draft in criteria {
            let criteria_id = CriteriaId(next(&mut inner.criteria_seq));
            let row = Criteria {
                id: criteria_id,
                department_id: id,
                name: draft.name.clone(),
                max_score: draft.max_score,
            };
            inner.criteria.insert(criteria_id.0, row.clone());
            rows.push(row);
        }

        Ok(DepartmentRecord {
            department,
            criteria: rows,
        })
    }

    fn delete(&self, id: DepartmentId) -> Result<(), RepositoryError> {
        let mut inner = self.lock();
        inner
            .departments
            .remove(&id.0)
            .ok_or(RepositoryError::NotFound)?;
        inner.criteria.retain(|_, row| row.department_id != id);
        Ok(())
    }

    fn fetch(&self, id: DepartmentId) -> Result<Option<DepartmentRecord>, RepositoryError> {
        let inner = self.lock();
        Ok(inner.departments.get(&id.0).map(|department| {
            DepartmentRecord {
                department: department.clone(),
                criteria: criteria_of(&inner, id),
            }
        }))
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Department>, RepositoryError> {
        let inner = self.lock();
        Ok(inner
            .departments
            .values()
            .find(|row| row.name == name)
            .cloned())
    }

    fn list(&self) -> Result<Vec<DepartmentRecord>, RepositoryError> {
        let inner = self.lock();
        let mut departments: Vec<Department> = inner.departments.values().cloned().collect();
        departments.sort_by_key(|row| row.id);
        Ok(departments
            .into_iter()
            .map(|department| {
                let criteria = criteria_of(&inner, department.id);
                DepartmentRecord {
                    department,
                    criteria,
                }
            })
            .collect())
    }

    fn criteria_for(&self, id: DepartmentId) -> Result<Vec<Criteria>, RepositoryError> {
        let inner = self.lock();
        Ok(criteria_of(&inner, id))
    }

    fn fetch_criteria(&self, id: CriteriaId) -> Result<Option<Criteria>, RepositoryError> {
        let inner = self.lock();
        Ok(inner.criteria.get(&id.0).cloned())
    }

    fn count(&self) -> Result<usize, RepositoryError> {
        let inner = self.lock();
        Ok(inner.departments.len())
    }
}

impl EmployeeRepository for InMemoryStore {
    fn insert(&self, draft: EmployeeDraft) -> Result<Employee, RepositoryError> {
        let mut inner = self.lock();
        if inner
            .employees
            .values()
            .any(|row| row.employee_number == draft.employee_number)
        {
            return Err(RepositoryError::Conflict);
        }

        let id = EmployeeId(next(&mut inner.employee_seq));
        let employee = Employee {
            id,
            employee_number: draft.employee_number,
            full_name: draft.full_name,
            job_title: draft.job_title,
            department_id: draft.department_id,
            created_at: Utc::now(),
        };
        inner.employees.insert(id.0, employee.clone());
        Ok(employee)
    }

    fn update(&self, employee: Employee) -> Result<(), RepositoryError> {
        let mut inner = self.lock();
        if !inner.employees.contains_key(&employee.id.0) {
            return Err(RepositoryError::NotFound);
        }
        inner.employees.insert(employee.id.0, employee);
        Ok(())
    }

    fn delete(&self, id: EmployeeId) -> Result<(), RepositoryError> {
        let mut inner = self.lock();
        inner
            .employees
            .remove(&id.0)
            .ok_or(RepositoryError::NotFound)?;
        Ok(())
    }

    fn fetch(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        let inner = self.lock();
        Ok(inner.employees.get(&id.0).cloned())
    }

    fn find_by_number(&self, employee_number: &str) -> Result<Option<Employee>, RepositoryError> {
        let inner = self.lock();
        Ok(inner
            .employees
            .values()
            .find(|row| row.employee_number == employee_number)
            .cloned())
    }

    fn list(&self) -> Result<Vec<Employee>, RepositoryError> {
        let inner = self.lock();
        let mut rows: Vec<Employee> = inner.employees.values().cloned().collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    fn list_in_department(
        &self,
        department_id: DepartmentId,
    ) -> Result<Vec<Employee>, RepositoryError> {
        let inner = self.lock();
        let mut rows: Vec<Employee> = inner
            .employees
            .values()
            .filter(|row| row.department_id == department_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    fn count_in_department(&self, department_id: DepartmentId) -> Result<usize, RepositoryError> {
        let inner = self.lock();
        Ok(inner
            .employees
            .values()
            .filter(|row| row.department_id == department_id)
            .count())
    }
}

impl EvaluationRepository for InMemoryStore {
    fn insert(
        &self,
        employee_id: EmployeeId,
        period: EvaluationPeriod,
        scores: &[ScoreInput],
    ) -> Result<EvaluationRecord, RepositoryError> {
        let mut inner = self.lock();
        if inner
            .evaluations
            .values()
            .any(|row| row.employee_id == employee_id && row.period == period)
        {
            return Err(RepositoryError::Conflict);
        }

        let id = EvaluationId(next(&mut inner.evaluation_seq));
        let evaluation = MonthlyEvaluation {
            id,
            employee_id,
            period,
            created_at: Utc::now(),
        };
        inner.evaluations.insert(id.0, evaluation.clone());

        let mut rows = Vec::with_capacity(scores.len());
        for input in scores {
            let score_id = ScoreId(next(&mut inner.score_seq));
            let row = Score {
                id: score_id,
                evaluation_id: id,
                criteria_id: input.criteria_id,
                score: input.score,
            };
            inner.scores.insert(score_id.0, row.clone());
            rows.push(row);
        }

        Ok(EvaluationRecord {
            evaluation,
            scores: rows,
        })
    }

    fn replace_scores(
        &self,
        id: EvaluationId,
        scores: &[ScoreInput],
    ) -> Result<EvaluationRecord, RepositoryError> {
        let mut inner = self.lock();
        let evaluation = inner
            .evaluations
            .get(&id.0)
            .cloned()
            .ok_or(RepositoryError::NotFound)?;

        inner.scores.retain(|_, row| row.evaluation_id != id);

        let mut rows = Vec::with_capacity(scores.len());
        for input in scores {
            let score_id = ScoreId(next(&mut inner.score_seq));
            let row = Score {
                id: score_id,
                evaluation_id: id,
                criteria_id: input.criteria_id,
                score: input.score,
            };
            inner.scores.insert(score_id.0, row.clone());
            rows.push(row);
        }

        Ok(EvaluationRecord {
            evaluation,
            scores: rows,
        })
    }

    fn delete(&self, id: EvaluationId) -> Result<(), RepositoryError> {
        let mut inner = self.lock();
        inner
            .evaluations
            .remove(&id.0)
            .ok_or(RepositoryError::NotFound)?;
        inner.scores.retain(|_, row| row.evaluation_id != id);
        Ok(())
    }

    fn fetch(&self, id: EvaluationId) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let inner = self.lock();
        Ok(inner
            .evaluations
            .get(&id.0)
            .cloned()
            .map(|evaluation| record_of(&inner, evaluation)))
    }

    fn find(
        &self,
        employee_id: EmployeeId,
        period: EvaluationPeriod,
    ) -> Result<Option<EvaluationRecord>, RepositoryError> {
        let inner = self.lock();
        Ok(inner
            .evaluations
            .values()
            .find(|row| row.employee_id == employee_id && row.period == period)
            .cloned()
            .map(|evaluation| record_of(&inner, evaluation)))
    }

    fn list_for_employee(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        let inner = self.lock();
        let mut evaluations: Vec<MonthlyEvaluation> = inner
            .evaluations
            .values()
            .filter(|row| row.employee_id == employee_id)
            .cloned()
            .collect();
        evaluations.sort_by(|a, b| b.period.cmp(&a.period));
        Ok(evaluations
            .into_iter()
            .map(|evaluation| record_of(&inner, evaluation))
            .collect())
    }

    fn list_for_employee_in_year(
        &self,
        employee_id: EmployeeId,
        year: i32,
    ) -> Result<Vec<EvaluationRecord>, RepositoryError> {
        let inner = self.lock();
        let mut evaluations: Vec<MonthlyEvaluation> = inner
            .evaluations
            .values()
            .filter(|row| row.employee_id == employee_id && row.period.year == year)
            .cloned()
            .collect();
        evaluations.sort_by_key(|row| row.period);
        Ok(evaluations
            .into_iter()
            .map(|evaluation| record_of(&inner, evaluation))
            .collect())
    }

    fn delete_for_employee(&self, employee_id: EmployeeId) -> Result<(), RepositoryError> {
        let mut inner = self.lock();
        let evaluation_ids: Vec<EvaluationId> = inner
            .evaluations
            .values()
            .filter(|row| row.employee_id == employee_id)
            .map(|row| row.id)
            .collect();
        inner
            .evaluations
            .retain(|_, row| row.employee_id != employee_id);
        inner
            .scores
            .retain(|_, row| !evaluation_ids.contains(&row.evaluation_id));
        Ok(())
    }
}

impl ShareTokenStore for InMemoryStore {
    fn insert(&self, token: ShareToken, scope: ShareScope) -> Result<(), RepositoryError> {
        let mut inner = self.lock();
        if inner.shares.contains_key(&token.0) {
            return Err(RepositoryError::Conflict);
        }
        inner.shares.insert(token.0, scope);
        Ok(())
    }

    fn resolve(&self, token: &ShareToken) -> Result<Option<ShareScope>, RepositoryError> {
        let inner = self.lock();
        Ok(inner.shares.get(&token.0).copied())
    }
}
