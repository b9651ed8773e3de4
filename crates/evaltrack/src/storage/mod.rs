//! Storage seams shared by every repository trait, plus the reference
//! in-memory adapter.

pub mod memory;

pub use memory::InMemoryStore;

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
