use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::registry::domain::DepartmentId;

/// Identifier wrapper for employees.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EmployeeId(pub i64);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Directory record for one employee, bound to exactly one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub employee_number: String,
    pub full_name: String,
    pub job_title: String,
    pub department_id: DepartmentId,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    pub fn to_view(&self, department_name: Option<String>) -> EmployeeView {
        EmployeeView {
            id: self.id,
            employee_number: self.employee_number.clone(),
            full_name: self.full_name.clone(),
            job_title: self.job_title.clone(),
            department_id: self.department_id,
            department_name,
            created_at: self.created_at,
        }
    }
}

/// Inbound fields for hire registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeDraft {
    pub employee_number: String,
    pub full_name: String,
    pub job_title: String,
    pub department_id: DepartmentId,
}

/// Field-level patch marker; a field absent from the payload stays untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldPatch<T> {
    Unchanged,
    Set(T),
}

impl<T> Default for FieldPatch<T> {
    fn default() -> Self {
        FieldPatch::Unchanged
    }
}

impl<T> FieldPatch<T> {
    pub fn as_ref(&self) -> Option<&T> {
        match self {
            FieldPatch::Unchanged => None,
            FieldPatch::Set(value) => Some(value),
        }
    }
}

impl<'de, T> Deserialize<'de> for FieldPatch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(FieldPatch::Set)
    }
}

/// Partial update for an employee; every field independently optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EmployeePatch {
    #[serde(default)]
    pub employee_number: FieldPatch<String>,
    #[serde(default)]
    pub full_name: FieldPatch<String>,
    #[serde(default)]
    pub job_title: FieldPatch<String>,
    #[serde(default)]
    pub department_id: FieldPatch<DepartmentId>,
}

/// Canonical representation with the denormalized department name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeView {
    pub id: EmployeeId,
    pub employee_number: String,
    pub full_name: String,
    pub job_title: String,
    pub department_id: DepartmentId,
    pub department_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
