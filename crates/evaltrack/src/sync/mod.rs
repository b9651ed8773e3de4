//! Optional spreadsheet-mirror collaborator.
//!
//! The mirror is an external integration: core mutations hand it entity
//! snapshots after the fact, and a failing mirror must never block the
//! mutation that triggered it.

pub mod router;
pub mod settings;

pub use router::sync_router;
pub use settings::{
    FileSettingsStore, SettingsError, SettingsStore, SyncSettings, SyncSettingsHandle,
};

use serde::Serialize;

use crate::directory::domain::{EmployeeId, EmployeeView};
use crate::ledger::domain::{EvaluationId, EvaluationView};

/// Entity snapshots handed to the mirror after successful mutations.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MirrorEvent {
    EmployeeUpserted(EmployeeView),
    EmployeeRemoved(EmployeeId),
    EvaluationRecorded(EvaluationView),
    EvaluationRemoved(EvaluationId),
}

/// Mirror dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("mirror transport unavailable: {0}")]
    Transport(String),
}

/// Outbound hook toward the spreadsheet integration.
pub trait MirrorPublisher: Send + Sync {
    fn publish(&self, event: MirrorEvent) -> Result<(), MirrorError>;
}

/// Mirror that drops events; used when no spreadsheet integration is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMirror;

impl MirrorPublisher for NullMirror {
    fn publish(&self, _event: MirrorEvent) -> Result<(), MirrorError> {
        Ok(())
    }
}

/// Publish without letting a mirror failure reach the caller.
pub fn publish_best_effort<M>(mirror: &M, event: MirrorEvent)
where
    M: MirrorPublisher + ?Sized,
{
    if let Err(err) = mirror.publish(event) {
        tracing::warn!(error = %err, "spreadsheet mirror publish failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct FailingMirror;

    impl MirrorPublisher for FailingMirror {
        fn publish(&self, _event: MirrorEvent) -> Result<(), MirrorError> {
            Err(MirrorError::Transport("offline".to_string()))
        }
    }

    #[derive(Default, Clone)]
    struct RecordingMirror {
        events: Arc<Mutex<Vec<MirrorEvent>>>,
    }

    impl MirrorPublisher for RecordingMirror {
        fn publish(&self, event: MirrorEvent) -> Result<(), MirrorError> {
            self.events.lock().expect("mirror mutex poisoned").push(event);
            Ok(())
        }
    }

    #[test]
    fn best_effort_swallows_transport_failures() {
        publish_best_effort(
            &FailingMirror,
            MirrorEvent::EmployeeRemoved(EmployeeId(1)),
        );
    }

    #[test]
    fn best_effort_delivers_events() {
        let mirror = RecordingMirror::default();
        publish_best_effort(&mirror, MirrorEvent::EmployeeRemoved(EmployeeId(7)));
        let events = mirror.events.lock().expect("mirror mutex poisoned");
        assert_eq!(events.len(), 1);
    }
}
