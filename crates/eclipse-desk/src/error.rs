//! # Desk Error Type
//!
//! Unified error type for desk operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Eclipse PMS                            │
//! │                                                                         │
//! │  eclipse-core           eclipse-db              eclipse-desk            │
//! │  ────────────           ──────────              ────────────            │
//! │                                                                         │
//! │  ValidationError ──┐                                                    │
//! │                    ├──► CoreError ─────────────┐                        │
//! │  business rules ───┘                           │                        │
//! │                                                ├──► DeskError           │
//! │  sqlx::Error ─────────► DbError ───────────────┘         │              │
//! │                                                          ▼              │
//! │                                              kind() → ErrorKind         │
//! │                                                          │              │
//! │                                        transport maps kinds to UI       │
//! │                                        (retry only StoreUnavailable)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every desk operation returns `Result<T, DeskError>`. The transport layer
//! never matches on variants; it matches on [`ErrorKind`], which stays stable
//! as variants come and go.

use serde::Serialize;
use thiserror::Error;

use eclipse_core::CoreError;
use eclipse_db::DbError;

/// Error from a desk operation.
#[derive(Debug, Error)]
pub enum DeskError {
    /// A business rule refused the operation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The persistent store failed.
    #[error(transparent)]
    Store(#[from] DbError),

    /// An entity named by the caller doesn't exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// The current business state refuses the operation.
    ///
    /// Used where no CoreError variant fits, e.g. purging history while
    /// stays are still open.
    #[error("{0}")]
    Conflict(String),

    /// A guard that should have held didn't.
    ///
    /// ## When This Occurs
    /// - A conditional write affected zero rows after its precondition was
    ///   checked inside the same transaction
    ///
    /// Indicates a bug or manual tampering with the database; the operation
    /// rolled back and the data is untouched.
    #[error("Inconsistent state: {0}")]
    Inconsistent(String),
}

/// Coarse error classification for the transport layer.
///
/// ## Usage in Frontend
/// ```typescript
/// try {
///   await invoke('check_in', { roomId });
/// } catch (e) {
///   switch (e.kind) {
///     case 'conflict':        refreshRoomMap(); break;
///     case 'validation':      showFormError(e.message); break;
///     case 'storeUnavailable': offerRetry(); break;
///     default:                showError(e.message);
///   }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// Bad input; fix the request and resubmit.
    Validation,
    /// The operation lost a race or hit a business-state conflict.
    /// Refresh and reassess; do not blindly retry.
    Conflict,
    /// Named entity doesn't exist.
    NotFound,
    /// The store is unreachable. The only retriable kind.
    StoreUnavailable,
    /// A guard failed that should have held. Surfaces for investigation.
    InconsistentState,
}

impl DeskError {
    /// Creates a NotFound error.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DeskError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Classifies this error for the transport layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeskError::Core(core) => match core {
                CoreError::Validation(_) | CoreError::InvalidAmount { .. } => ErrorKind::Validation,
                CoreError::NoOpenShift
                | CoreError::RoomNotAvailable { .. }
                | CoreError::InvalidTransition { .. }
                | CoreError::InsufficientStock { .. }
                | CoreError::StayAlreadyFinalized(_)
                | CoreError::ShiftAlreadyClosed(_)
                | CoreError::ShiftAlreadyOpen(_) => ErrorKind::Conflict,
            },

            DeskError::Store(db) => {
                if db.is_unavailable() {
                    ErrorKind::StoreUnavailable
                } else {
                    match db {
                        DbError::NotFound { .. } => ErrorKind::NotFound,
                        DbError::InvalidInput(_) => ErrorKind::Validation,
                        // Partial unique indexes back the single-open-shift and
                        // single-open-stay invariants; a violation is a lost race.
                        DbError::UniqueViolation { .. } => ErrorKind::Conflict,
                        DbError::ForeignKeyViolation { .. } => ErrorKind::Validation,
                        _ => ErrorKind::InconsistentState,
                    }
                }
            }

            DeskError::NotFound { .. } => ErrorKind::NotFound,
            DeskError::Conflict(_) => ErrorKind::Conflict,
            DeskError::Inconsistent(_) => ErrorKind::InconsistentState,
        }
    }

    /// Whether retrying the same call might succeed.
    pub fn is_retriable(&self) -> bool {
        self.kind() == ErrorKind::StoreUnavailable
    }
}

/// Result type for desk operations.
pub type DeskResult<T> = Result<T, DeskError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use eclipse_core::RoomState;

    #[test]
    fn test_business_rules_are_conflicts() {
        let err = DeskError::Core(CoreError::NoOpenShift);
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(!err.is_retriable());

        let err = DeskError::Core(CoreError::RoomNotAvailable {
            number: "3".into(),
            state: RoomState::Occupied,
        });
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_validation_is_not_conflict() {
        let err = DeskError::Core(CoreError::InvalidAmount {
            field: "amount",
            value: -5,
        });
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_only_unavailable_store_is_retriable() {
        let err = DeskError::Store(DbError::PoolExhausted);
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
        assert!(err.is_retriable());

        let err = DeskError::Store(DbError::duplicate("stays.room_id", "r1"));
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(!err.is_retriable());

        let err = DeskError::Store(DbError::not_found("Room", "r1"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_inconsistent_state() {
        let err = DeskError::Inconsistent("finalize affected 0 rows".into());
        assert_eq!(err.kind(), ErrorKind::InconsistentState);
        assert!(!err.is_retriable());
    }
}
