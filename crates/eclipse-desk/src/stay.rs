//! # Stay Lifecycle Manager
//!
//! Check-in, consumption, check-out, and the room-state moves around them.
//!
//! ## Room State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │              check_in                  check_out                        │
//! │   AVAILABLE ───────────► OCCUPIED ───────────────► CLEANING            │
//! │    ▲ │  ▲                                            │  ▲              │
//! │    │ │  └────────────── mark_cleaned ────────────────┘  │              │
//! │    │ └───────────────── send_to_cleaning ───────────────┘              │
//! │    │                                                                   │
//! │    │ set_maintenance ►                                                 │
//! │    MAINTENANCE ◄── clear_maintenance                                   │
//! │                                                                         │
//! │  Every arrow is one transaction with a conditional state UPDATE;        │
//! │  a room that moved since the clerk's screen refreshed loses the race    │
//! │  and the operation rolls back untouched.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Check-Out Is The Billing Moment
//! Nothing monetary is written before check-out. The terminal write computes
//! the room charge from the rate plan and the actual elapsed time, sums the
//! consumption entries, and freezes all of it on the stay in one go.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use eclipse_core::pricing;
use eclipse_core::validation::{validate_quantity, validate_uuid};
use eclipse_core::{ConsumptionEntry, CoreError, RoomState, StayRecord};
use eclipse_db::repository::product as product_repo;
use eclipse_db::repository::room as room_repo;
use eclipse_db::repository::shift as shift_repo;
use eclipse_db::repository::stay as stay_repo;
use eclipse_db::{Database, DbError};

use crate::error::{DeskError, DeskResult};

/// What the clerk sees on the stay modal while the guest is in the room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveCharge {
    pub stay_id: String,
    pub room_number: String,
    pub checked_in_at: String,
    /// Room charge if the guest checked out right now.
    pub room_charge: i64,
    pub consumption_subtotal: i64,
    pub total: i64,
}

/// The bill produced by check-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutSummary {
    pub stay_id: String,
    pub room_number: String,
    pub checked_out_at: String,
    /// Hours occupied, rounded to 2 decimal places.
    pub elapsed_hours: f64,
    pub room_subtotal: i64,
    pub consumption_subtotal: i64,
    pub total_paid: i64,
}

/// Orchestrates the stay lifecycle.
///
/// ## Usage
/// ```rust,ignore
/// let stays = StayManager::new(db.clone());
/// let stay = stays.check_in(&room.id, "clerk-1").await?;
/// stays.attach_consumption(&stay.id, &water.id, 2).await?;
/// let bill = stays.check_out(&room.id).await?;
/// stays.mark_cleaned(&room.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct StayManager {
    db: Database,
}

impl StayManager {
    /// Creates a new StayManager.
    pub fn new(db: Database) -> Self {
        StayManager { db }
    }

    /// Checks a guest into an available room.
    ///
    /// One transaction: verify an open shift exists, move the room
    /// available → occupied, insert the stay bound to that shift.
    ///
    /// ## Errors
    /// - `NoOpenShift` - revenue must land in an accountable shift
    /// - `RoomNotAvailable` - room is occupied/cleaning/maintenance/inactive
    pub async fn check_in(&self, room_id: &str, clerk_id: &str) -> DeskResult<StayRecord> {
        validate_uuid(room_id).map_err(CoreError::from)?;

        debug!(room_id = %room_id, clerk_id = %clerk_id, "check_in");

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let shift = shift_repo::fetch_open_shift(&mut tx)
            .await?
            .ok_or(CoreError::NoOpenShift)?;

        let room = room_repo::fetch_room(&mut tx, room_id).await?;
        if room.state != RoomState::Available || !room.is_active {
            return Err(CoreError::RoomNotAvailable {
                number: room.number,
                state: room.state,
            }
            .into());
        }

        let moved = room_repo::transition_state(
            &mut tx,
            room_id,
            RoomState::Available,
            RoomState::Occupied,
            now,
        )
        .await?;
        if !moved {
            // State changed between the read and the guarded write.
            return Err(DeskError::Inconsistent(format!(
                "room {} changed state during check-in",
                room.number
            )));
        }

        let stay = StayRecord {
            id: Uuid::new_v4().to_string(),
            room_id: room.id.clone(),
            shift_id: shift.id.clone(),
            clerk_id: clerk_id.to_string(),
            checked_in_at: now,
            checked_out_at: None,
            elapsed_hours: None,
            room_subtotal: 0,
            consumption_subtotal: 0,
            total_paid: 0,
            finalized: false,
        };

        stay_repo::insert_stay(&mut tx, &stay).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!(
            stay_id = %stay.id,
            room = %room.number,
            shift_id = %shift.id,
            "Guest checked in"
        );

        Ok(stay)
    }

    /// Sells a product against an open stay, freezing its current price.
    ///
    /// The stock decrement is conditional; concurrent sales cannot drive
    /// stock negative, and the loser gets `InsufficientStock`.
    pub async fn attach_consumption(
        &self,
        stay_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> DeskResult<ConsumptionEntry> {
        validate_uuid(stay_id).map_err(CoreError::from)?;
        validate_uuid(product_id).map_err(CoreError::from)?;
        validate_quantity(quantity).map_err(CoreError::from)?;

        debug!(stay_id = %stay_id, product_id = %product_id, quantity = %quantity, "attach_consumption");

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let stay = stay_repo::fetch_stay(&mut tx, stay_id).await?;
        if stay.finalized {
            return Err(CoreError::StayAlreadyFinalized(stay.id).into());
        }

        let product = product_repo::fetch_product(&mut tx, product_id).await?;
        if !product.is_active {
            return Err(DeskError::not_found("Product", product_id));
        }

        let reserved = product_repo::reserve_stock(&mut tx, product_id, quantity).await?;
        if !reserved {
            return Err(CoreError::InsufficientStock {
                product: product.name,
                available: product.stock,
                requested: quantity,
            }
            .into());
        }

        let entry = ConsumptionEntry {
            id: Uuid::new_v4().to_string(),
            stay_id: stay.id.clone(),
            product_id: product.id.clone(),
            quantity,
            unit_price: product.sale_price,
            created_at: now,
        };

        stay_repo::insert_consumption(&mut tx, &entry).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!(
            stay_id = %stay.id,
            product = %product.name,
            quantity = %quantity,
            unit_price = %entry.unit_price,
            "Consumption attached"
        );

        Ok(entry)
    }

    /// Removes a mis-keyed consumption entry from an open stay.
    ///
    /// Stock is NOT returned: the entry is assumed to correct a recording
    /// mistake, not to undo a physical sale. Restocking is a separate,
    /// deliberate inventory action.
    pub async fn remove_consumption(&self, entry_id: &str) -> DeskResult<()> {
        validate_uuid(entry_id).map_err(CoreError::from)?;

        debug!(entry_id = %entry_id, "remove_consumption");

        let mut tx = self.db.begin().await?;

        let entry = stay_repo::fetch_consumption(&mut tx, entry_id).await?;
        let stay = stay_repo::fetch_stay(&mut tx, &entry.stay_id).await?;
        if stay.finalized {
            return Err(CoreError::StayAlreadyFinalized(stay.id).into());
        }

        let deleted = stay_repo::delete_consumption(&mut tx, entry_id).await?;
        if !deleted {
            return Err(DeskError::not_found("ConsumptionEntry", entry_id));
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(entry_id = %entry_id, stay_id = %stay.id, "Consumption removed");
        Ok(())
    }

    /// Checks the guest out at the current time.
    pub async fn check_out(&self, room_id: &str) -> DeskResult<CheckOutSummary> {
        self.check_out_at(room_id, Utc::now()).await
    }

    /// Checks the guest out, billing as of `now`.
    ///
    /// One transaction, one terminal write on the stay:
    /// 1. Compute the room charge from the rate plan and elapsed time
    /// 2. Sum the consumption entries
    /// 3. Freeze timestamps, subtotals and total on the stay
    /// 4. Move the room occupied → cleaning
    pub async fn check_out_at(
        &self,
        room_id: &str,
        now: DateTime<Utc>,
    ) -> DeskResult<CheckOutSummary> {
        validate_uuid(room_id).map_err(CoreError::from)?;

        debug!(room_id = %room_id, "check_out");

        let mut tx = self.db.begin().await?;

        let room = room_repo::fetch_room(&mut tx, room_id).await?;
        let stay = stay_repo::fetch_open_stay_for_room(&mut tx, room_id)
            .await?
            .ok_or_else(|| CoreError::InvalidTransition {
                number: room.number.clone(),
                state: room.state,
                expected: RoomState::Occupied,
            })?;

        let plan = room_repo::fetch_rate_plan(&mut tx, &room.rate_plan_id).await?;

        let room_charge = pricing::compute_charge(&plan, stay.checked_in_at, now);
        let consumption_subtotal = stay_repo::consumption_total(&mut tx, &stay.id).await?;
        let total_paid = room_charge.units() + consumption_subtotal;
        let elapsed_hours = pricing::round_elapsed_hours(now - stay.checked_in_at);

        let finalized = stay_repo::finalize_stay(
            &mut tx,
            &stay.id,
            now,
            elapsed_hours,
            room_charge.units(),
            consumption_subtotal,
            total_paid,
        )
        .await?;
        if !finalized {
            return Err(CoreError::StayAlreadyFinalized(stay.id).into());
        }

        let moved = room_repo::transition_state(
            &mut tx,
            room_id,
            RoomState::Occupied,
            RoomState::Cleaning,
            now,
        )
        .await?;
        if !moved {
            return Err(DeskError::Inconsistent(format!(
                "room {} was not occupied during check-out of stay {}",
                room.number, stay.id
            )));
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            stay_id = %stay.id,
            room = %room.number,
            elapsed_hours = %elapsed_hours,
            room_subtotal = %room_charge.units(),
            consumption_subtotal = %consumption_subtotal,
            total_paid = %total_paid,
            "Guest checked out"
        );

        Ok(CheckOutSummary {
            stay_id: stay.id,
            room_number: room.number,
            checked_out_at: now.to_rfc3339(),
            elapsed_hours,
            room_subtotal: room_charge.units(),
            consumption_subtotal,
            total_paid,
        })
    }

    /// Computes the live bill for an occupied room without writing anything.
    ///
    /// The dashboard polls this; the charge is a non-decreasing step
    /// function, so successive reads never show a smaller number.
    pub async fn live_charge(&self, room_id: &str) -> DeskResult<LiveCharge> {
        self.live_charge_at(room_id, Utc::now()).await
    }

    /// Live bill evaluated at an explicit instant.
    pub async fn live_charge_at(&self, room_id: &str, now: DateTime<Utc>) -> DeskResult<LiveCharge> {
        validate_uuid(room_id).map_err(CoreError::from)?;

        let room = self
            .db
            .rooms()
            .get_by_id(room_id)
            .await?
            .ok_or_else(|| DeskError::not_found("Room", room_id))?;

        let stay = self
            .db
            .stays()
            .open_for_room(room_id)
            .await?
            .ok_or_else(|| DeskError::not_found("open stay for room", room_id))?;

        let plan = self
            .db
            .rooms()
            .get_rate_plan(&room.rate_plan_id)
            .await?
            .ok_or_else(|| DeskError::not_found("RatePlan", &room.rate_plan_id))?;

        let room_charge = pricing::compute_charge(&plan, stay.checked_in_at, now).units();
        let consumption_subtotal: i64 = self
            .db
            .stays()
            .consumption_for_stay(&stay.id)
            .await?
            .iter()
            .map(|e| e.quantity * e.unit_price)
            .sum();

        Ok(LiveCharge {
            stay_id: stay.id,
            room_number: room.number,
            checked_in_at: stay.checked_in_at.to_rfc3339(),
            room_charge,
            consumption_subtotal,
            total: room_charge + consumption_subtotal,
        })
    }

    /// Housekeeping released the room: cleaning → available.
    pub async fn mark_cleaned(&self, room_id: &str) -> DeskResult<()> {
        self.transition(room_id, RoomState::Cleaning, RoomState::Available)
            .await
    }

    /// Pulls a vacant room back for another pass: available → cleaning.
    pub async fn send_to_cleaning(&self, room_id: &str) -> DeskResult<()> {
        self.transition(room_id, RoomState::Available, RoomState::Cleaning)
            .await
    }

    /// Takes an available room out of service: available → maintenance.
    pub async fn set_maintenance(&self, room_id: &str) -> DeskResult<()> {
        self.transition(room_id, RoomState::Available, RoomState::Maintenance)
            .await
    }

    /// Returns a repaired room to service: maintenance → available.
    pub async fn clear_maintenance(&self, room_id: &str) -> DeskResult<()> {
        self.transition(room_id, RoomState::Maintenance, RoomState::Available)
            .await
    }

    /// Guarded single-step room transition in its own transaction.
    async fn transition(&self, room_id: &str, from: RoomState, to: RoomState) -> DeskResult<()> {
        validate_uuid(room_id).map_err(CoreError::from)?;

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let room = room_repo::fetch_room(&mut tx, room_id).await?;
        if room.state != from {
            return Err(CoreError::InvalidTransition {
                number: room.number,
                state: room.state,
                expected: from,
            }
            .into());
        }

        let moved = room_repo::transition_state(&mut tx, room_id, from, to, now).await?;
        if !moved {
            return Err(DeskError::Inconsistent(format!(
                "room {} changed state during transition",
                room.number
            )));
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(room = %room.number, ?from, ?to, "Room transitioned");
        Ok(())
    }
}
