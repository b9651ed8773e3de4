//! Department registry: departments and the evaluation criteria they define.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Criteria, CriteriaDraft, CriteriaId, CriteriaView, Department, DepartmentDetailView,
    DepartmentId, DepartmentRecord, DepartmentView, DEFAULT_MAX_SCORE,
};
pub use repository::DepartmentRepository;
pub use router::department_router;
pub use service::{DepartmentError, DepartmentService, SeedOutcome};
