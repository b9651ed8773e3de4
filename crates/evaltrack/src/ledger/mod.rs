//! Evaluation ledger: one recorded evaluation per employee per calendar month.
//!
//! Cross-entity consistency is enforced at write time: the employee must
//! exist, the period must be free, and every score must reference a criterion
//! belonging to the employee's department.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    EvaluationId, EvaluationPeriod, EvaluationRecord, EvaluationView, MonthlyEvaluation, Score,
    ScoreDraft, ScoreId, ScoreInput, ScoreView,
};
pub use repository::EvaluationRepository;
pub use router::evaluation_router;
pub use service::{EvaluationError, EvaluationService};
