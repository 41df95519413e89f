//! # Error Types
//!
//! Domain-specific error types for eclipse-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  eclipse-core errors (this file)                                       │
//! │  ├── CoreError        - Business-rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  eclipse-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  eclipse-desk errors (separate crate)                                  │
//! │  └── DeskError        - What the transport layer sees                  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DeskError → caller                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (room number, amounts, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

use crate::types::RoomState;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They should be caught
/// and translated to user-friendly messages by the calling layer.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No cash shift is currently open.
    ///
    /// ## When This Occurs
    /// - Check-in attempted before anyone opened a shift
    /// - Withdrawal recorded against a shift that already closed
    ///
    /// Revenue must always land in an accountable shift, so the desk
    /// refuses to operate without one.
    #[error("No cash shift is open; open a shift before operating the desk")]
    NoOpenShift,

    /// Room cannot take a new guest right now.
    ///
    /// ## When This Occurs
    /// - Check-in on an occupied room
    /// - Check-in on a room still in cleaning or maintenance
    /// - An unfinalized stay already exists for the room
    #[error("Room {number} is {state:?}, cannot check in")]
    RoomNotAvailable { number: String, state: RoomState },

    /// A room-state transition was attempted from the wrong source state.
    ///
    /// ## When This Occurs
    /// - Marking a room cleaned when it was never in cleaning
    /// - Sending an occupied room to cleaning while a guest is inside
    #[error("Room {number} is {state:?}, expected {expected:?}")]
    InvalidTransition {
        number: String,
        state: RoomState,
        expected: RoomState,
    },

    /// Insufficient stock to sell the requested quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Attach consumption (qty: 5)
    ///      │
    ///      ▼
    /// Conditional stock decrement fails: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Bottled Water", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 Bottled Water in stock"
    /// ```
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: i64,
        requested: i64,
    },

    /// The stay was already checked out; the record is immutable.
    #[error("Stay {0} is already finalized")]
    StayAlreadyFinalized(String),

    /// The shift was already closed; the record is immutable.
    #[error("Shift {0} is already closed")]
    ShiftAlreadyClosed(String),

    /// A shift is already open; only one may be open at a time.
    #[error("Shift {0} is already open; close it first")]
    ShiftAlreadyOpen(String),

    /// A monetary amount or quantity was zero or negative.
    #[error("Invalid {field}: {value} (must be positive)")]
    InvalidAmount { field: &'static str, value: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product: "Bottled Water".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Bottled Water: available 3, requested 5"
        );

        let err = CoreError::RoomNotAvailable {
            number: "3".to_string(),
            state: RoomState::Occupied,
        };
        assert_eq!(err.to_string(), "Room 3 is Occupied, cannot check in");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "number".to_string(),
        };
        assert_eq!(err.to_string(), "number is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "number".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
