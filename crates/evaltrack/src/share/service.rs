use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::analytics;
use crate::directory::domain::{Employee, EmployeeId, EmployeeView};
use crate::directory::repository::EmployeeRepository;
use crate::export::{summary_row, SummaryRow};
use crate::ledger::domain::EvaluationView;
use crate::ledger::repository::EvaluationRepository;
use crate::ledger::service::build_view;
use crate::registry::repository::DepartmentRepository;
use crate::storage::RepositoryError;

use super::domain::{ShareScope, ShareToken, ShareTokenStore};

static SHARE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Service issuing and resolving read-only share links.
pub struct ShareService<S, V, E, D> {
    tokens: Arc<S>,
    evaluations: Arc<V>,
    employees: Arc<E>,
    departments: Arc<D>,
}

/// Error raised by the share service.
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("employee {0} not found")]
    EmployeeNotFound(EmployeeId),
    #[error("share link is unknown or no longer valid")]
    UnknownToken,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Read-only payload behind a resolved share link.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SharePayload {
    Employee {
        employee: EmployeeView,
        evaluations: Vec<EvaluationView>,
        overall_average: Option<f64>,
    },
    Public {
        summary: Vec<SummaryRow>,
    },
}

fn derive_token(payload: &str) -> ShareToken {
    let digest = Sha256::digest(payload.as_bytes());
    let hex: String = digest[..16].iter().map(|byte| format!("{byte:02x}")).collect();
    ShareToken(hex)
}

impl<S, V, E, D> ShareService<S, V, E, D>
where
    S: ShareTokenStore + 'static,
    V: EvaluationRepository + 'static,
    E: EmployeeRepository + 'static,
    D: DepartmentRepository + 'static,
{
    pub fn new(tokens: Arc<S>, evaluations: Arc<V>, employees: Arc<E>, departments: Arc<D>) -> Self {
        Self {
            tokens,
            evaluations,
            employees,
            departments,
        }
    }

    /// Issue a link scoped to one employee's evaluation history.
    pub fn issue_employee_link(&self, employee_id: EmployeeId) -> Result<ShareToken, ShareError> {
        if self.employees.fetch(employee_id)?.is_none() {
            return Err(ShareError::EmployeeNotFound(employee_id));
        }

        let token = self.mint(&format!("employee-{employee_id}"));
        self.tokens
            .insert(token.clone(), ShareScope::Employee(employee_id))?;
        Ok(token)
    }

    /// Issue a link scoped to the cross-employee summary.
    pub fn issue_public_link(&self) -> Result<ShareToken, ShareError> {
        let token = self.mint("public");
        self.tokens.insert(token.clone(), ShareScope::Public)?;
        Ok(token)
    }

    /// Resolve a token to its read-only payload.
    pub fn resolve(&self, token: &ShareToken) -> Result<SharePayload, ShareError> {
        let scope = self
            .tokens
            .resolve(token)?
            .ok_or(ShareError::UnknownToken)?;

        match scope {
            ShareScope::Employee(employee_id) => {
                let employee = self
                    .employees
                    .fetch(employee_id)?
                    .ok_or(ShareError::EmployeeNotFound(employee_id))?;

                let records = self.evaluations.list_for_employee(employee_id)?;
                let mut evaluations = Vec::with_capacity(records.len());
                for record in &records {
                    evaluations.push(build_view(self.departments.as_ref(), record)?);
                }

                Ok(SharePayload::Employee {
                    employee: self.view(&employee)?,
                    overall_average: analytics::overall_average(&records),
                    evaluations,
                })
            }
            ShareScope::Public => {
                let employees = self.employees.list()?;
                let mut summary = Vec::with_capacity(employees.len());
                for employee in &employees {
                    let records = self.evaluations.list_for_employee(employee.id)?;
                    summary.push(summary_row(&self.view(employee)?, &records));
                }
                Ok(SharePayload::Public { summary })
            }
        }
    }

    fn mint(&self, scope_label: &str) -> ShareToken {
        let sequence = SHARE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let stamp = Utc::now().timestamp_millis();
        derive_token(&format!("{scope_label}-{stamp}-{sequence}"))
    }

    fn view(&self, employee: &Employee) -> Result<EmployeeView, ShareError> {
        let department_name = self
            .departments
            .fetch(employee.department_id)?
            .map(|record| record.department.name);
        Ok(employee.to_view(department_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_tokens_are_stable_hex() {
        let token = derive_token("employee-1-1700000000-1");
        assert_eq!(token.0.len(), 32);
        assert!(token.0.chars().all(|c| c.is_ascii_hexdigit()));
        // Same payload, same token.
        assert_eq!(token, derive_token("employee-1-1700000000-1"));
    }
}
