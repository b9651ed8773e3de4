use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for departments.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DepartmentId(pub i64);

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for evaluation criteria.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct CriteriaId(pub i64);

impl fmt::Display for CriteriaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Score ceiling applied when an inbound criterion does not name one.
pub const DEFAULT_MAX_SCORE: u16 = 5;

/// Organizational unit defining its own evaluation criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
}

/// A named, scored dimension of evaluation belonging to one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    pub id: CriteriaId,
    pub department_id: DepartmentId,
    pub name: String,
    pub max_score: u16,
}

impl Criteria {
    pub fn to_view(&self) -> CriteriaView {
        CriteriaView {
            id: self.id,
            department_id: self.department_id,
            criteria_name: self.name.clone(),
            max_score: self.max_score,
        }
    }
}

/// Inbound criterion definition used when creating or redefining a department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaDraft {
    pub name: String,
    #[serde(default = "default_max_score")]
    pub max_score: u16,
}

impl CriteriaDraft {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            max_score: DEFAULT_MAX_SCORE,
        }
    }
}

fn default_max_score() -> u16 {
    DEFAULT_MAX_SCORE
}

/// Department together with its persisted criteria set, ordered as registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentRecord {
    pub department: Department,
    pub criteria: Vec<Criteria>,
}

impl DepartmentRecord {
    /// Derived count; never trusted from caller input.
    pub fn criteria_count(&self) -> usize {
        self.criteria.len()
    }

    pub fn to_view(&self) -> DepartmentView {
        DepartmentView {
            id: self.department.id,
            name: self.department.name.clone(),
            criteria_count: self.criteria_count(),
        }
    }

    pub fn to_detail_view(&self) -> DepartmentDetailView {
        DepartmentDetailView {
            id: self.department.id,
            name: self.department.name.clone(),
            criteria_count: self.criteria_count(),
            criteria: self.criteria.iter().map(Criteria::to_view).collect(),
        }
    }
}

/// Canonical representation: `{id, name, criteria_count}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentView {
    pub id: DepartmentId,
    pub name: String,
    pub criteria_count: usize,
}

/// Department view expanded with its criteria set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentDetailView {
    pub id: DepartmentId,
    pub name: String,
    pub criteria_count: usize,
    pub criteria: Vec<CriteriaView>,
}

/// Canonical representation: `{id, department_id, criteria_name, max_score}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriteriaView {
    pub id: CriteriaId,
    pub department_id: DepartmentId,
    pub criteria_name: String,
    pub max_score: u16,
}
