//! # Validation Module
//!
//! Input validation utilities for Eclipse PMS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard (TypeScript)                                       │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Desk operation (Rust)                                        │
//! │  └── THIS MODULE: field validation before business logic               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints (room number, one open shift/stay)             │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum quantity of a single product per consumption entry.
///
/// Prevents accidental over-entry (e.g., typing 1000 instead of 10).
pub const MAX_CONSUMPTION_QUANTITY: i64 = 999;

/// Maximum length of free-text notes (closing notes, withdrawal reasons).
pub const MAX_NOTE_LENGTH: usize = 500;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a room number.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 10 characters
/// - Alphanumeric only (rooms like "12" or "3B")
///
/// ## Example
/// ```rust
/// use eclipse_core::validation::validate_room_number;
///
/// assert!(validate_room_number("3").is_ok());
/// assert!(validate_room_number("12B").is_ok());
/// assert!(validate_room_number("").is_err());
/// ```
pub fn validate_room_number(number: &str) -> ValidationResult<()> {
    let number = number.trim();

    if number.is_empty() {
        return Err(ValidationError::Required {
            field: "number".to_string(),
        });
    }

    if number.len() > 10 {
        return Err(ValidationError::TooLong {
            field: "number".to_string(),
            max: 10,
        });
    }

    if !number.chars().all(|c| c.is_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "number".to_string(),
            reason: "must contain only letters and numbers".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates free-text notes (shift closing notes, withdrawal reasons).
///
/// ## Rules
/// - May be empty
/// - Maximum 500 characters
pub fn validate_note(note: &str) -> ValidationResult<()> {
    if note.len() > MAX_NOTE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "note".to_string(),
            max: MAX_NOTE_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a consumption quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_CONSUMPTION_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_CONSUMPTION_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_CONSUMPTION_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in whole currency units.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (complimentary items)
pub fn validate_price(units: i64) -> ValidationResult<()> {
    if units < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a withdrawal amount.
///
/// ## Rules
/// - Must be positive (> 0)
/// - There is deliberately NO upper bound here: the ledger records
///   over-withdrawals rather than rejecting them (callers warn using
///   the computed available cash)
pub fn validate_withdrawal_amount(units: i64) -> ValidationResult<()> {
    if units <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// UUID Validators
// =============================================================================

/// Validates a UUID string format.
///
/// ## Example
/// ```rust
/// use eclipse_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_room_number() {
        assert!(validate_room_number("3").is_ok());
        assert!(validate_room_number("12B").is_ok());

        assert!(validate_room_number("").is_err());
        assert!(validate_room_number("   ").is_err());
        assert!(validate_room_number("no spaces").is_err());
        assert!(validate_room_number("12345678901").is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Bottled Water 600ml").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_note() {
        assert!(validate_note("").is_ok());
        assert!(validate_note("end of shift, drawer counted").is_ok());
        assert!(validate_note(&"x".repeat(501)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(50_000).is_ok());
        assert!(validate_price(-100).is_err());
    }

    #[test]
    fn test_validate_withdrawal_amount() {
        assert!(validate_withdrawal_amount(1).is_ok());
        // deliberately no ceiling
        assert!(validate_withdrawal_amount(i64::MAX).is_ok());
        assert!(validate_withdrawal_amount(0).is_err());
        assert!(validate_withdrawal_amount(-500).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
    }
}
