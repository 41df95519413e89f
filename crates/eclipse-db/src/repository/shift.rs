//! # Shift Repository
//!
//! Database operations for cash shifts and withdrawal entries.
//!
//! ## Single-Open-Shift Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CREATE UNIQUE INDEX shifts_single_open ON shifts ((1))                 │
//! │  WHERE closed_at IS NULL;                                               │
//! │                                                                         │
//! │  Every open row indexes the same constant key, so a second concurrent  │
//! │  INSERT with closed_at NULL violates the index and fails. The check    │
//! │  in application code is a courtesy; this index is the guarantee.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use eclipse_core::{Shift, WithdrawalEntry};

/// Repository for shift database operations.
#[derive(Debug, Clone)]
pub struct ShiftRepository {
    pool: SqlitePool,
}

impl ShiftRepository {
    /// Creates a new ShiftRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShiftRepository { pool }
    }

    /// Gets the currently open shift, if any.
    pub async fn current_open(&self) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, clerk_id, opened_at, closed_at, opening_balance,
                   total_income, total_withdrawals, closing_balance, notes
            FROM shifts
            WHERE closed_at IS NULL
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Gets a shift by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, clerk_id, opened_at, closed_at, opening_balance,
                   total_income, total_withdrawals, closing_balance, notes
            FROM shifts
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Gets the most recently closed shift, if any.
    ///
    /// Its closing balance is the default opening balance of the next shift.
    pub async fn last_closed(&self) -> DbResult<Option<Shift>> {
        let shift = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, clerk_id, opened_at, closed_at, opening_balance,
                   total_income, total_withdrawals, closing_balance, notes
            FROM shifts
            WHERE closed_at IS NOT NULL
            ORDER BY closed_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(shift)
    }

    /// Lists recent shifts, newest first (for shift history screens).
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Shift>> {
        let shifts = sqlx::query_as::<_, Shift>(
            r#"
            SELECT id, clerk_id, opened_at, closed_at, opening_balance,
                   total_income, total_withdrawals, closing_balance, notes
            FROM shifts
            ORDER BY opened_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(shifts)
    }

    /// Lists a shift's withdrawal entries in chronological order.
    pub async fn withdrawals_for_shift(&self, shift_id: &str) -> DbResult<Vec<WithdrawalEntry>> {
        let entries = sqlx::query_as::<_, WithdrawalEntry>(
            r#"
            SELECT id, shift_id, clerk_id, amount, note, created_at
            FROM withdrawals
            WHERE shift_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(shift_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

// =============================================================================
// Transaction-Scoped Operations
// =============================================================================

/// Fetches a shift inside a transaction, failing if it doesn't exist.
pub async fn fetch_shift(conn: &mut SqliteConnection, shift_id: &str) -> DbResult<Shift> {
    sqlx::query_as::<_, Shift>(
        r#"
        SELECT id, clerk_id, opened_at, closed_at, opening_balance,
               total_income, total_withdrawals, closing_balance, notes
        FROM shifts
        WHERE id = ?1
        "#,
    )
    .bind(shift_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DbError::not_found("Shift", shift_id))
}

/// Fetches the open shift inside a transaction, if any.
pub async fn fetch_open_shift(conn: &mut SqliteConnection) -> DbResult<Option<Shift>> {
    let shift = sqlx::query_as::<_, Shift>(
        r#"
        SELECT id, clerk_id, opened_at, closed_at, opening_balance,
               total_income, total_withdrawals, closing_balance, notes
        FROM shifts
        WHERE closed_at IS NULL
        "#,
    )
    .fetch_optional(&mut *conn)
    .await?;

    Ok(shift)
}

/// Fetches the most recently closed shift inside a transaction.
pub async fn fetch_last_closed(conn: &mut SqliteConnection) -> DbResult<Option<Shift>> {
    let shift = sqlx::query_as::<_, Shift>(
        r#"
        SELECT id, clerk_id, opened_at, closed_at, opening_balance,
               total_income, total_withdrawals, closing_balance, notes
        FROM shifts
        WHERE closed_at IS NOT NULL
        ORDER BY closed_at DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(&mut *conn)
    .await?;

    Ok(shift)
}

/// Inserts a freshly opened shift.
///
/// The shifts_single_open index turns a concurrent double open into a
/// UniqueViolation.
pub async fn insert_shift(conn: &mut SqliteConnection, shift: &Shift) -> DbResult<()> {
    debug!(shift_id = %shift.id, opening_balance = %shift.opening_balance, "Inserting shift");

    sqlx::query(
        r#"
        INSERT INTO shifts (
            id, clerk_id, opened_at, closed_at, opening_balance,
            total_income, total_withdrawals, closing_balance, notes
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&shift.id)
    .bind(&shift.clerk_id)
    .bind(shift.opened_at)
    .bind(shift.closed_at)
    .bind(shift.opening_balance)
    .bind(shift.total_income)
    .bind(shift.total_withdrawals)
    .bind(shift.closing_balance)
    .bind(&shift.notes)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// The terminal write: fills totals and the closing timestamp.
///
/// ## Returns
/// * `Ok(true)` - the shift was closed by this call
/// * `Ok(false)` - the shift was already closed (caller rolls back)
pub async fn close_shift(
    conn: &mut SqliteConnection,
    shift_id: &str,
    closed_at: DateTime<Utc>,
    total_income: i64,
    total_withdrawals: i64,
    closing_balance: i64,
    notes: Option<&str>,
) -> DbResult<bool> {
    debug!(shift_id = %shift_id, closing_balance = %closing_balance, "Closing shift");

    let result = sqlx::query(
        r#"
        UPDATE shifts
        SET closed_at = ?2,
            total_income = ?3,
            total_withdrawals = ?4,
            closing_balance = ?5,
            notes = ?6
        WHERE id = ?1 AND closed_at IS NULL
        "#,
    )
    .bind(shift_id)
    .bind(closed_at)
    .bind(total_income)
    .bind(total_withdrawals)
    .bind(closing_balance)
    .bind(notes)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Appends a withdrawal entry (manual or automatic opening adjustment).
pub async fn insert_withdrawal(
    conn: &mut SqliteConnection,
    entry: &WithdrawalEntry,
) -> DbResult<()> {
    debug!(shift_id = %entry.shift_id, amount = %entry.amount, "Inserting withdrawal");

    sqlx::query(
        r#"
        INSERT INTO withdrawals (
            id, shift_id, clerk_id, amount, note, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&entry.id)
    .bind(&entry.shift_id)
    .bind(&entry.clerk_id)
    .bind(entry.amount)
    .bind(&entry.note)
    .bind(entry.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Sums total_paid over a shift's finalized stays.
pub async fn sum_income(conn: &mut SqliteConnection, shift_id: &str) -> DbResult<i64> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(total_paid), 0)
        FROM stays
        WHERE shift_id = ?1 AND finalized = 1
        "#,
    )
    .bind(shift_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(total)
}

/// Sums the amounts of a shift's withdrawal entries.
pub async fn sum_withdrawals(conn: &mut SqliteConnection, shift_id: &str) -> DbResult<i64> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(amount), 0)
        FROM withdrawals
        WHERE shift_id = ?1
        "#,
    )
    .bind(shift_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(total)
}

/// Deletes every withdrawal entry. Part of the bulk historical reset.
pub async fn delete_all_withdrawals(conn: &mut SqliteConnection) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM withdrawals")
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Deletes every shift. Part of the bulk historical reset.
pub async fn delete_all_shifts(conn: &mut SqliteConnection) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM shifts").execute(&mut *conn).await?;

    Ok(result.rows_affected())
}
