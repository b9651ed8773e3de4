//! Read-only share links for evaluation reports.
//!
//! A token grants access either to one employee's history or to the
//! cross-employee summary; resolution never exposes write operations.

pub mod domain;
pub mod router;
pub mod service;

pub use domain::{ShareScope, ShareToken, ShareTokenStore};
pub use router::share_router;
pub use service::{ShareError, SharePayload, ShareService};
