use serde::{Deserialize, Serialize};

use crate::directory::domain::EmployeeId;
use crate::storage::RepositoryError;

/// Opaque token embedded in a share URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShareToken(pub String);

/// What a resolved token grants access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareScope {
    Employee(EmployeeId),
    Public,
}

/// Persistence seam for issued tokens.
pub trait ShareTokenStore: Send + Sync {
    fn insert(&self, token: ShareToken, scope: ShareScope) -> Result<(), RepositoryError>;
    fn resolve(&self, token: &ShareToken) -> Result<Option<ShareScope>, RepositoryError>;
}
