use std::sync::Arc;

use crate::directory::repository::EmployeeRepository;
use crate::storage::RepositoryError;

use super::domain::{Criteria, CriteriaDraft, DepartmentId, DepartmentRecord};
use super::repository::DepartmentRepository;

/// Service owning department registration and criteria redefinition.
pub struct DepartmentService<D, E> {
    departments: Arc<D>,
    employees: Arc<E>,
}

/// Error raised by the department service.
#[derive(Debug, thiserror::Error)]
pub enum DepartmentError {
    #[error("department name is required")]
    NameRequired,
    #[error("at least one named criterion is required")]
    CriteriaRequired,
    #[error("criterion '{0}' must have a max score greater than zero")]
    InvalidMaxScore(String),
    #[error("department name '{0}' is already in use")]
    DuplicateName(String),
    #[error("department {0} not found")]
    NotFound(DepartmentId),
    #[error("department still has {count} employee(s) assigned")]
    HasEmployees { count: usize },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of the idempotent default-department seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded,
    AlreadyPresent,
}

/// Fixed departments installed on first boot, each criterion capped at 5.
const SEED_DEPARTMENTS: &[(&str, &[&str])] = &[
    (
        "Human Resources",
        &[
            "Attendance and discipline",
            "Work quality",
            "Team collaboration",
            "Initiative and creativity",
            "Punctuality",
        ],
    ),
    (
        "Sales",
        &[
            "Sales target achievement",
            "Customer service",
            "Attendance and discipline",
            "Team collaboration",
            "Initiative and creativity",
            "Communication skills",
            "Time management",
            "Professional development",
        ],
    ),
    (
        "Technology",
        &[
            "Technical proficiency",
            "Problem solving",
            "Code quality",
            "Attendance and discipline",
            "Team collaboration",
            "Continuous learning",
            "Innovation",
            "Project management",
        ],
    ),
    (
        "Finance",
        &[
            "Financial data accuracy",
            "Punctuality",
            "Attendance and discipline",
            "Team collaboration",
            "Financial analysis",
        ],
    ),
];

impl<D, E> DepartmentService<D, E>
where
    D: DepartmentRepository + 'static,
    E: EmployeeRepository + 'static,
{
    pub fn new(departments: Arc<D>, employees: Arc<E>) -> Self {
        Self {
            departments,
            employees,
        }
    }

    /// Register a department with its criteria set.
    pub fn create(
        &self,
        name: &str,
        drafts: Vec<CriteriaDraft>,
    ) -> Result<DepartmentRecord, DepartmentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DepartmentError::NameRequired);
        }

        let retained = retain_named(drafts)?;
        if retained.is_empty() {
            return Err(DepartmentError::CriteriaRequired);
        }

        if self.departments.find_by_name(name)?.is_some() {
            return Err(DepartmentError::DuplicateName(name.to_string()));
        }

        self.departments
            .insert(name, &retained)
            .map_err(|err| match err {
                RepositoryError::Conflict => DepartmentError::DuplicateName(name.to_string()),
                other => DepartmentError::Repository(other),
            })
    }

    /// Rename a department and redefine its criteria set wholesale.
    pub fn update(
        &self,
        id: DepartmentId,
        name: &str,
        drafts: Vec<CriteriaDraft>,
    ) -> Result<DepartmentRecord, DepartmentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DepartmentError::NameRequired);
        }

        let retained = retain_named(drafts)?;
        if retained.is_empty() {
            return Err(DepartmentError::CriteriaRequired);
        }

        if self.departments.fetch(id)?.is_none() {
            return Err(DepartmentError::NotFound(id));
        }

        if let Some(existing) = self.departments.find_by_name(name)? {
            if existing.id != id {
                return Err(DepartmentError::DuplicateName(name.to_string()));
            }
        }

        self.departments
            .replace(id, name, &retained)
            .map_err(|err| match err {
                RepositoryError::Conflict => DepartmentError::DuplicateName(name.to_string()),
                RepositoryError::NotFound => DepartmentError::NotFound(id),
                other => DepartmentError::Repository(other),
            })
    }

    /// Delete a department; refused while employees still reference it.
    pub fn delete(&self, id: DepartmentId) -> Result<(), DepartmentError> {
        if self.departments.fetch(id)?.is_none() {
            return Err(DepartmentError::NotFound(id));
        }

        let count = self.employees.count_in_department(id)?;
        if count > 0 {
            return Err(DepartmentError::HasEmployees { count });
        }

        self.departments.delete(id)?;
        Ok(())
    }

    pub fn get(&self, id: DepartmentId) -> Result<DepartmentRecord, DepartmentError> {
        self.departments
            .fetch(id)?
            .ok_or(DepartmentError::NotFound(id))
    }

    pub fn list(&self) -> Result<Vec<DepartmentRecord>, DepartmentError> {
        Ok(self.departments.list()?)
    }

    pub fn criteria(&self, id: DepartmentId) -> Result<Vec<Criteria>, DepartmentError> {
        if self.departments.fetch(id)?.is_none() {
            return Err(DepartmentError::NotFound(id));
        }
        Ok(self.departments.criteria_for(id)?)
    }

    /// Install the default departments once; a no-op when any department exists.
    pub fn seed_defaults(&self) -> Result<SeedOutcome, DepartmentError> {
        if self.departments.count()? > 0 {
            return Ok(SeedOutcome::AlreadyPresent);
        }

        for (name, criteria_names) in SEED_DEPARTMENTS {
            let drafts: Vec<CriteriaDraft> = criteria_names
                .iter()
                .map(|criteria_name| CriteriaDraft::named(criteria_name))
                .collect();
            self.departments.insert(name, &drafts)?;
        }

        Ok(SeedOutcome::Seeded)
    }
}

/// Drop drafts with blank names, trim the rest, and reject non-positive caps.
fn retain_named(drafts: Vec<CriteriaDraft>) -> Result<Vec<CriteriaDraft>, DepartmentError> {
    let mut retained = Vec::with_capacity(drafts.len());
    for draft in drafts {
        let trimmed = draft.name.trim();
        if trimmed.is_empty() {
            continue;
        }
        if draft.max_score == 0 {
            return Err(DepartmentError::InvalidMaxScore(trimmed.to_string()));
        }
        retained.push(CriteriaDraft {
            name: trimmed.to_string(),
            max_score: draft.max_score,
        });
    }
    Ok(retained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::domain::DEFAULT_MAX_SCORE;
    use crate::storage::InMemoryStore;

    fn service() -> DepartmentService<InMemoryStore, InMemoryStore> {
        let store = Arc::new(InMemoryStore::default());
        DepartmentService::new(store.clone(), store)
    }

    #[test]
    fn create_drops_blank_criteria_names() {
        let service = service();
        let record = service
            .create(
                "Support",
                vec![
                    CriteriaDraft::named("Responsiveness"),
                    CriteriaDraft::named("   "),
                    CriteriaDraft::named("Empathy"),
                ],
            )
            .expect("department created");

        assert_eq!(record.criteria_count(), 2);
        assert!(record
            .criteria
            .iter()
            .all(|criteria| criteria.max_score == DEFAULT_MAX_SCORE));
    }

    #[test]
    fn create_rejects_all_blank_criteria() {
        let service = service();
        let result = service.create("Support", vec![CriteriaDraft::named("  ")]);
        assert!(matches!(result, Err(DepartmentError::CriteriaRequired)));
    }

    #[test]
    fn create_rejects_duplicate_name() {
        let service = service();
        service
            .create("Support", vec![CriteriaDraft::named("Responsiveness")])
            .expect("first create");
        let result = service.create("Support", vec![CriteriaDraft::named("Empathy")]);
        assert!(matches!(result, Err(DepartmentError::DuplicateName(_))));
    }

    #[test]
    fn update_replaces_criteria_wholesale() {
        let service = service();
        let record = service
            .create(
                "Support",
                vec![
                    CriteriaDraft::named("Responsiveness"),
                    CriteriaDraft::named("Empathy"),
                ],
            )
            .expect("created");

        let updated = service
            .update(
                record.department.id,
                "Customer Support",
                vec![CriteriaDraft::named("Resolution rate")],
            )
            .expect("updated");

        assert_eq!(updated.department.name, "Customer Support");
        assert_eq!(updated.criteria_count(), 1);
        assert_eq!(updated.criteria[0].name, "Resolution rate");
        // Old criteria rows are gone, not merged.
        assert!(updated
            .criteria
            .iter()
            .all(|criteria| criteria.name != "Responsiveness"));
    }

    #[test]
    fn seed_defaults_is_idempotent() {
        let service = service();
        assert_eq!(service.seed_defaults().expect("seeded"), SeedOutcome::Seeded);
        assert_eq!(
            service.seed_defaults().expect("second call"),
            SeedOutcome::AlreadyPresent
        );

        let departments = service.list().expect("list");
        assert_eq!(departments.len(), 4);
        let counts: Vec<usize> = departments
            .iter()
            .map(DepartmentRecord::criteria_count)
            .collect();
        assert_eq!(counts, vec![5, 8, 8, 5]);
    }
}
