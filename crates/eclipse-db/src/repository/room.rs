//! # Room Repository
//!
//! Database operations for rooms and their rate plans.
//!
//! ## State Transition Guard
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               Why transitions are conditional UPDATEs                   │
//! │                                                                         │
//! │  Two desks click "check in room 3" at the same moment:                 │
//! │                                                                         │
//! │  Desk A: UPDATE rooms SET state='occupied'                              │
//! │          WHERE id=? AND state='available'   → rows_affected = 1  ✓    │
//! │  Desk B: UPDATE rooms SET state='occupied'                              │
//! │          WHERE id=? AND state='available'   → rows_affected = 0  ✗    │
//! │                                                                         │
//! │  The losing desk rolls back its whole transaction. No read-then-write  │
//! │  race, no double check-in.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use eclipse_core::validation::validate_room_number;
use eclipse_core::{RatePlan, Room, RoomState};

/// Repository for room database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.rooms();
/// let rooms = repo.list_active().await?;
/// let room = repo.get_by_number("3").await?;
/// ```
#[derive(Debug, Clone)]
pub struct RoomRepository {
    pool: SqlitePool,
}

impl RoomRepository {
    /// Creates a new RoomRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RoomRepository { pool }
    }

    /// Lists active rooms ordered by number, for the occupancy dashboard.
    pub async fn list_active(&self) -> DbResult<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(
            r#"
            SELECT id, number, room_type, state, rate_plan_id, is_active,
                   created_at, updated_at
            FROM rooms
            WHERE is_active = 1
            ORDER BY number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    /// Gets a room by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            SELECT id, number, room_type, state, rate_plan_id, is_active,
                   created_at, updated_at
            FROM rooms
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// Gets a room by its business number (e.g. "3", "12B").
    pub async fn get_by_number(&self, number: &str) -> DbResult<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(
            r#"
            SELECT id, number, room_type, state, rate_plan_id, is_active,
                   created_at, updated_at
            FROM rooms
            WHERE number = ?1
            "#,
        )
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// Inserts a new room.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - room number already exists
    pub async fn insert(&self, room: &Room) -> DbResult<()> {
        validate_room_number(&room.number).map_err(DbError::invalid_input)?;

        debug!(number = %room.number, "Inserting room");

        sqlx::query(
            r#"
            INSERT INTO rooms (
                id, number, room_type, state, rate_plan_id, is_active,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&room.id)
        .bind(&room.number)
        .bind(room.room_type)
        .bind(room.state)
        .bind(&room.rate_plan_id)
        .bind(room.is_active)
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Soft-deletes a room by setting is_active = false.
    ///
    /// Historical stays still reference the room, so rows are never removed.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting room");

        let result = sqlx::query(
            "UPDATE rooms SET is_active = 0, updated_at = ?2 WHERE id = ?1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Room", id));
        }

        Ok(())
    }

    /// Gets a rate plan by its ID.
    pub async fn get_rate_plan(&self, id: &str) -> DbResult<Option<RatePlan>> {
        let plan = sqlx::query_as::<_, RatePlan>(
            r#"
            SELECT id, name, base_price, base_hours, extra_hour_price,
                   created_at, updated_at
            FROM rate_plans
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plan)
    }

    /// Lists all rate plans ordered by name.
    pub async fn list_rate_plans(&self) -> DbResult<Vec<RatePlan>> {
        let plans = sqlx::query_as::<_, RatePlan>(
            r#"
            SELECT id, name, base_price, base_hours, extra_hour_price,
                   created_at, updated_at
            FROM rate_plans
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }

    /// Inserts a new rate plan.
    pub async fn insert_rate_plan(&self, plan: &RatePlan) -> DbResult<()> {
        debug!(name = %plan.name, "Inserting rate plan");

        sqlx::query(
            r#"
            INSERT INTO rate_plans (
                id, name, base_price, base_hours, extra_hour_price,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.name)
        .bind(plan.base_price)
        .bind(plan.base_hours)
        .bind(plan.extra_hour_price)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts active rooms grouped by state, for the occupancy snapshot.
    ///
    /// States with no rooms are absent from the result; callers that need
    /// every state default the missing ones to zero.
    pub async fn count_by_state(&self) -> DbResult<Vec<(RoomState, i64)>> {
        let counts = sqlx::query_as::<_, (RoomState, i64)>(
            r#"
            SELECT state, COUNT(*)
            FROM rooms
            WHERE is_active = 1
            GROUP BY state
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    /// Counts active rooms (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rooms WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction-Scoped Operations
// =============================================================================
// These run on a caller-owned connection so eclipse-desk can compose them
// into a single transaction with other guarded writes.

/// Fetches a room inside a transaction, failing if it doesn't exist.
pub async fn fetch_room(conn: &mut SqliteConnection, room_id: &str) -> DbResult<Room> {
    sqlx::query_as::<_, Room>(
        r#"
        SELECT id, number, room_type, state, rate_plan_id, is_active,
               created_at, updated_at
        FROM rooms
        WHERE id = ?1
        "#,
    )
    .bind(room_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DbError::not_found("Room", room_id))
}

/// Fetches a rate plan inside a transaction, failing if it doesn't exist.
pub async fn fetch_rate_plan(conn: &mut SqliteConnection, plan_id: &str) -> DbResult<RatePlan> {
    sqlx::query_as::<_, RatePlan>(
        r#"
        SELECT id, name, base_price, base_hours, extra_hour_price,
               created_at, updated_at
        FROM rate_plans
        WHERE id = ?1
        "#,
    )
    .bind(plan_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| DbError::not_found("RatePlan", plan_id))
}

/// Moves a room from `from` to `to`, but only if it is still in `from`.
///
/// ## Returns
/// * `Ok(true)` - the transition applied
/// * `Ok(false)` - the room was no longer in `from` (caller rolls back)
pub async fn transition_state(
    conn: &mut SqliteConnection,
    room_id: &str,
    from: RoomState,
    to: RoomState,
    now: DateTime<Utc>,
) -> DbResult<bool> {
    debug!(room_id = %room_id, ?from, ?to, "Transitioning room state");

    let result = sqlx::query(
        r#"
        UPDATE rooms
        SET state = ?3, updated_at = ?4
        WHERE id = ?1 AND state = ?2
        "#,
    )
    .bind(room_id)
    .bind(from)
    .bind(to)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() == 1)
}
