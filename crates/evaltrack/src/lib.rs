//! Monthly employee evaluation service.
//!
//! Departments define their own scored criteria, employees belong to exactly
//! one department, and the evaluation ledger records at most one evaluation
//! per employee per calendar month. Aggregation and export shape the raw
//! scores into charts, completion summaries, and flat tables.

pub mod analytics;
pub mod config;
pub mod directory;
pub mod error;
pub mod export;
pub mod ledger;
pub mod registry;
pub mod share;
pub mod storage;
pub mod sync;
pub mod telemetry;
