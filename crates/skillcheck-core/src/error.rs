//! Error types shared across the core.
//!
//! Every failure here is recoverable: an `Err` return means the operation
//! was a no-op and the session or planner state is unchanged. Nothing in
//! this crate panics on bad input.

use thiserror::Error;
use uuid::Uuid;

/// Errors from the assessment session state machine.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A selection references a student the roster does not know.
    #[error("student '{0}' is not registered")]
    UnknownStudent(String),

    /// A selection references a checklist the roster does not know.
    #[error("checklist '{0}' is not registered")]
    UnknownChecklist(String),

    /// A selection references an assessor the roster does not know.
    #[error("assessor '{0}' is not registered")]
    UnknownAssessor(String),

    /// A required selection was never made.
    #[error("missing {0} selection")]
    MissingSelection(&'static str),

    /// The selected checklist has no steps to score.
    #[error("checklist '{0}' has no steps")]
    EmptyChecklist(String),

    /// The operation is not valid in the session's current phase.
    #[error("expected session phase {expected}, but session is {actual}")]
    WrongPhase {
        expected: &'static str,
        actual: &'static str,
    },

    /// A step index outside the checklist was scored.
    #[error("step index {index} out of range for checklist with {total} steps")]
    StepOutOfRange { index: usize, total: usize },

    /// A score outside {0, 1, 2} was recorded.
    #[error("invalid step score {0}, expected 0, 1 or 2")]
    InvalidScore(u8),

    /// The submitted PIN did not match the assessor's verification code.
    /// Recoverable: the session stays active and the attempt can be retried.
    #[error("incorrect PIN")]
    VerificationFailed,

    /// Abandoning a protected session requires explicit confirmation,
    /// because in-progress scores and elapsed time are discarded for good.
    #[error("an assessment is in progress; abandoning requires confirmation")]
    ConfirmationRequired,
}

/// Errors from OSCE hierarchy operations. A not-found error leaves the
/// planner untouched.
#[derive(Debug, Error)]
pub enum OsceError {
    #[error("OSCE session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("circuit not found: {0}")]
    CircuitNotFound(Uuid),

    #[error("station not found: {0}")]
    StationNotFound(Uuid),
}

/// Errors from a [`crate::traits::RecordStore`] collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The collaborator refused the record. Non-fatal after finalize: the
    /// local record remains authoritative.
    #[error("record rejected by store: {0}")]
    Rejected(String),
}
