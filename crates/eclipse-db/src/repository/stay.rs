//! # Stay Repository
//!
//! Database operations for stay records and their consumption entries.
//!
//! ## Immutability Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              A stay is written exactly twice                            │
//! │                                                                         │
//! │  check-in:   INSERT ... finalized = 0                                  │
//! │  check-out:  UPDATE ... SET finalized = 1, totals, timestamps          │
//! │              WHERE id = ? AND finalized = 0                            │
//! │                                                                         │
//! │  The finalized = 0 guard makes the terminal write idempotent-safe:     │
//! │  a double-clicked check-out updates zero rows the second time and      │
//! │  the caller rolls back instead of double-billing.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use eclipse_core::{ConsumptionEntry, StayRecord};

/// Repository for stay database operations.
#[derive(Debug, Clone)]
pub struct StayRepository {
    pool: SqlitePool,
}

impl StayRepository {
    /// Creates a new StayRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StayRepository { pool }
    }

    /// Gets a stay by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<StayRecord>> {
        let stay = sqlx::query_as::<_, StayRecord>(
            r#"
            SELECT id, room_id, shift_id, clerk_id, checked_in_at, checked_out_at,
                   elapsed_hours, room_subtotal, consumption_subtotal, total_paid,
                   finalized
            FROM stays
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stay)
    }

    /// Gets the open (unfinalized) stay for a room, if any.
    ///
    /// The partial unique index guarantees at most one exists.
    pub async fn open_for_room(&self, room_id: &str) -> DbResult<Option<StayRecord>> {
        let stay = sqlx::query_as::<_, StayRecord>(
            r#"
            SELECT id, room_id, shift_id, clerk_id, checked_in_at, checked_out_at,
                   elapsed_hours, room_subtotal, consumption_subtotal, total_paid,
                   finalized
            FROM stays
            WHERE room_id = ?1 AND finalized = 0
            "#,
        )
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stay)
    }

    /// Lists the finalized stays reconciled against a shift, newest first.
    pub async fn finalized_by_shift(&self, shift_id: &str) -> DbResult<Vec<StayRecord>> {
        let stays = sqlx::query_as::<_, StayRecord>(
            r#"
            SELECT id, room_id, shift_id, clerk_id, checked_in_at, checked_out_at,
                   elapsed_hours, room_subtotal, consumption_subtotal, total_paid,
                   finalized
            FROM stays
            WHERE shift_id = ?1 AND finalized = 1
            ORDER BY checked_out_at DESC
            "#,
        )
        .bind(shift_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stays)
    }

    /// Lists the stays finalized inside a time window, oldest first.
    ///
    /// Used by the daily summary (window = one local business day).
    pub async fn finalized_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DbResult<Vec<StayRecord>> {
        let stays = sqlx::query_as::<_, StayRecord>(
            r#"
            SELECT id, room_id, shift_id, clerk_id, checked_in_at, checked_out_at,
                   elapsed_hours, room_subtotal, consumption_subtotal, total_paid,
                   finalized
            FROM stays
            WHERE finalized = 1 AND checked_out_at >= ?1 AND checked_out_at < ?2
            ORDER BY checked_out_at
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(stays)
    }

    /// Lists a stay's consumption entries in sale order.
    pub async fn consumption_for_stay(&self, stay_id: &str) -> DbResult<Vec<ConsumptionEntry>> {
        let entries = sqlx::query_as::<_, ConsumptionEntry>(
            r#"
            SELECT id, stay_id, product_id, quantity, unit_price, created_at
            FROM consumption_entries
            WHERE stay_id = ?1
            ORDER BY created_at
            "#,
        )
        .bind(stay_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

// =============================================================================
// Transaction-Scoped Operations
// =============================================================================

/// Fetches a stay inside a transaction, failing if it doesn't exist.
pub async fn fetch_stay(conn: &mut SqliteConnection, stay_id: &str) -> DbResult<StayRecord> {
    sqlx::query_as::<_, StayRecord>(
        r#"
        SELECT id, room_id, shift_id, clerk_id, checked_in_at, checked_out_at,
               elapsed_hours, room_subtotal, consumption_subtotal, total_paid,
               finalized
        FROM stays
        WHERE id = ?1
        "#,
    )
    .bind(stay_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DbError::not_found("Stay", stay_id))
}

/// Fetches the open stay for a room inside a transaction.
pub async fn fetch_open_stay_for_room(
    conn: &mut SqliteConnection,
    room_id: &str,
) -> DbResult<Option<StayRecord>> {
    let stay = sqlx::query_as::<_, StayRecord>(
        r#"
        SELECT id, room_id, shift_id, clerk_id, checked_in_at, checked_out_at,
               elapsed_hours, room_subtotal, consumption_subtotal, total_paid,
               finalized
        FROM stays
        WHERE room_id = ?1 AND finalized = 0
        "#,
    )
    .bind(room_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(stay)
}

/// Inserts a freshly opened stay.
///
/// The partial unique index on (room_id) WHERE finalized = 0 turns a
/// concurrent double check-in into a UniqueViolation.
pub async fn insert_stay(conn: &mut SqliteConnection, stay: &StayRecord) -> DbResult<()> {
    debug!(stay_id = %stay.id, room_id = %stay.room_id, "Inserting stay");

    sqlx::query(
        r#"
        INSERT INTO stays (
            id, room_id, shift_id, clerk_id, checked_in_at, checked_out_at,
            elapsed_hours, room_subtotal, consumption_subtotal, total_paid,
            finalized
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
    )
    .bind(&stay.id)
    .bind(&stay.room_id)
    .bind(&stay.shift_id)
    .bind(&stay.clerk_id)
    .bind(stay.checked_in_at)
    .bind(stay.checked_out_at)
    .bind(stay.elapsed_hours)
    .bind(stay.room_subtotal)
    .bind(stay.consumption_subtotal)
    .bind(stay.total_paid)
    .bind(stay.finalized)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// The terminal write: fills check-out data and flips `finalized`.
///
/// ## Returns
/// * `Ok(true)` - the stay was finalized by this call
/// * `Ok(false)` - the stay was already finalized (caller rolls back)
#[allow(clippy::too_many_arguments)]
pub async fn finalize_stay(
    conn: &mut SqliteConnection,
    stay_id: &str,
    checked_out_at: DateTime<Utc>,
    elapsed_hours: f64,
    room_subtotal: i64,
    consumption_subtotal: i64,
    total_paid: i64,
) -> DbResult<bool> {
    debug!(stay_id = %stay_id, total_paid = %total_paid, "Finalizing stay");

    let result = sqlx::query(
        r#"
        UPDATE stays
        SET checked_out_at = ?2,
            elapsed_hours = ?3,
            room_subtotal = ?4,
            consumption_subtotal = ?5,
            total_paid = ?6,
            finalized = 1
        WHERE id = ?1 AND finalized = 0
        "#,
    )
    .bind(stay_id)
    .bind(checked_out_at)
    .bind(elapsed_hours)
    .bind(room_subtotal)
    .bind(consumption_subtotal)
    .bind(total_paid)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Fetches a consumption entry inside a transaction.
pub async fn fetch_consumption(
    conn: &mut SqliteConnection,
    entry_id: &str,
) -> DbResult<ConsumptionEntry> {
    sqlx::query_as::<_, ConsumptionEntry>(
        r#"
        SELECT id, stay_id, product_id, quantity, unit_price, created_at
        FROM consumption_entries
        WHERE id = ?1
        "#,
    )
    .bind(entry_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DbError::not_found("ConsumptionEntry", entry_id))
}

/// Inserts a consumption entry with its frozen unit price.
pub async fn insert_consumption(
    conn: &mut SqliteConnection,
    entry: &ConsumptionEntry,
) -> DbResult<()> {
    debug!(
        entry_id = %entry.id,
        stay_id = %entry.stay_id,
        quantity = %entry.quantity,
        "Inserting consumption entry"
    );

    sqlx::query(
        r#"
        INSERT INTO consumption_entries (
            id, stay_id, product_id, quantity, unit_price, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&entry.id)
    .bind(&entry.stay_id)
    .bind(&entry.product_id)
    .bind(entry.quantity)
    .bind(entry.unit_price)
    .bind(entry.created_at)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// Deletes a consumption entry (correcting a mis-keyed sale).
///
/// ## Returns
/// * `Ok(true)` - deleted
/// * `Ok(false)` - entry no longer exists
pub async fn delete_consumption(conn: &mut SqliteConnection, entry_id: &str) -> DbResult<bool> {
    debug!(entry_id = %entry_id, "Deleting consumption entry");

    let result = sqlx::query("DELETE FROM consumption_entries WHERE id = ?1")
        .bind(entry_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Counts stays that are still open.
pub async fn count_open_stays(conn: &mut SqliteConnection) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stays WHERE finalized = 0")
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

/// Deletes every consumption entry. Part of the bulk historical reset.
pub async fn delete_all_consumption(conn: &mut SqliteConnection) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM consumption_entries")
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected())
}

/// Deletes every stay. Part of the bulk historical reset.
pub async fn delete_all_stays(conn: &mut SqliteConnection) -> DbResult<u64> {
    let result = sqlx::query("DELETE FROM stays").execute(&mut *conn).await?;

    Ok(result.rows_affected())
}

/// Sums quantity × unit_price over a stay's consumption entries.
pub async fn consumption_total(conn: &mut SqliteConnection, stay_id: &str) -> DbResult<i64> {
    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(quantity * unit_price), 0)
        FROM consumption_entries
        WHERE stay_id = ?1
        "#,
    )
    .bind(stay_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(total)
}
