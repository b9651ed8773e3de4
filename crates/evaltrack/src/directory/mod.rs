//! Employee directory: hire registration, reassignment, and cascade removal.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Employee, EmployeeDraft, EmployeeId, EmployeePatch, EmployeeView, FieldPatch};
pub use repository::EmployeeRepository;
pub use router::employee_router;
pub use service::{EmployeeError, EmployeeService};
