use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::domain::EmployeeId;
use crate::registry::domain::CriteriaId;

/// Identifier wrapper for monthly evaluations.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EvaluationId(pub i64);

impl fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for individual score rows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ScoreId(pub i64);

impl fmt::Display for ScoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const MONTH_LABELS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One evaluation cycle: a calendar month within a year.
///
/// Field order gives the derived ordering chronological meaning.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EvaluationPeriod {
    pub year: i32,
    pub month: u8,
}

impl EvaluationPeriod {
    /// Build a period, rejecting months outside 1-12.
    pub fn new(month: u8, year: i32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn month_label(self) -> &'static str {
        MONTH_LABELS[(self.month - 1) as usize]
    }
}

impl fmt::Display for EvaluationPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

/// One employee's recorded evaluation for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyEvaluation {
    pub id: EvaluationId,
    pub employee_id: EmployeeId,
    pub period: EvaluationPeriod,
    pub created_at: DateTime<Utc>,
}

/// A single criterion's numeric rating within one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub id: ScoreId,
    pub evaluation_id: EvaluationId,
    pub criteria_id: CriteriaId,
    pub score: f64,
}

/// Raw inbound score entry; both fields must be present to pass validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDraft {
    #[serde(default)]
    pub criteria_id: Option<CriteriaId>,
    #[serde(default)]
    pub score: Option<f64>,
}

impl ScoreDraft {
    pub fn new(criteria_id: CriteriaId, score: f64) -> Self {
        Self {
            criteria_id: Some(criteria_id),
            score: Some(score),
        }
    }
}

/// Validated score entry ready for insertion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInput {
    pub criteria_id: CriteriaId,
    pub score: f64,
}

/// Evaluation together with the score rows it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub evaluation: MonthlyEvaluation,
    pub scores: Vec<Score>,
}

/// Canonical representation:
/// `{id, employee_id, evaluation_month, evaluation_year, created_at, scores}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationView {
    pub id: EvaluationId,
    pub employee_id: EmployeeId,
    pub evaluation_month: u8,
    pub evaluation_year: i32,
    pub created_at: DateTime<Utc>,
    pub scores: Vec<ScoreView>,
}

/// Canonical representation:
/// `{id, evaluation_id, criteria_id, criteria_name, score, max_score}`.
/// Name and cap serialize as null when the criterion has since been deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreView {
    pub id: ScoreId,
    pub evaluation_id: EvaluationId,
    pub criteria_id: CriteriaId,
    pub criteria_name: Option<String>,
    pub score: f64,
    pub max_score: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_rejects_out_of_range_months() {
        assert!(EvaluationPeriod::new(0, 2024).is_none());
        assert!(EvaluationPeriod::new(13, 2024).is_none());
        assert!(EvaluationPeriod::new(12, 2024).is_some());
    }

    #[test]
    fn period_ordering_is_chronological() {
        let december_2023 = EvaluationPeriod::new(12, 2023).expect("valid");
        let january_2024 = EvaluationPeriod::new(1, 2024).expect("valid");
        assert!(december_2023 < january_2024);
    }

    #[test]
    fn month_labels_cover_the_year() {
        let march = EvaluationPeriod::new(3, 2024).expect("valid");
        assert_eq!(march.month_label(), "March");
        let december = EvaluationPeriod::new(12, 2024).expect("valid");
        assert_eq!(december.month_label(), "December");
    }
}
