//! # Reporting Aggregator
//!
//! Read-only rollups of shift activity.
//!
//! ## Cross-Check Property
//! The reporter recomputes income from the stay rows themselves. For a
//! closed shift, its `totalIncome` must equal the stored value the ledger
//! wrote at close; a mismatch means someone edited history.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use eclipse_core::{RoomState, Shift, StayRecord, WithdrawalEntry};
use eclipse_db::Database;

use crate::error::{DeskError, DeskResult};

/// Per-product sales rollup inside one shift.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSalesLine {
    pub product_id: String,
    pub name: String,
    /// Total units sold across the shift's stays.
    pub quantity: i64,
    /// Total revenue (sum of quantity × frozen unit price).
    pub amount: i64,
}

/// Everything the end-of-shift report screen shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftReport {
    pub shift: Shift,
    pub stays: Vec<StayRecord>,
    pub withdrawals: Vec<WithdrawalEntry>,
    pub product_sales: Vec<ProductSalesLine>,
    pub room_income: i64,
    pub consumption_income: i64,
    pub total_income: i64,
    pub total_withdrawals: i64,
    /// opening + income − withdrawals, recomputed from the rows above.
    pub expected_closing_balance: i64,
}

/// Current room counts by state, as of the moment the summary ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomOccupancy {
    pub available: i64,
    pub occupied: i64,
    pub cleaning: i64,
    pub maintenance: i64,
}

/// One business day of finalized stays, plus a live occupancy snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub stays_closed: usize,
    pub room_income: i64,
    pub consumption_income: i64,
    pub total_income: i64,
    pub occupancy: RoomOccupancy,
}

/// Builds reports from stored rows. Never writes.
#[derive(Debug, Clone)]
pub struct ShiftReporter {
    db: Database,
}

impl ShiftReporter {
    /// Creates a new ShiftReporter.
    pub fn new(db: Database) -> Self {
        ShiftReporter { db }
    }

    /// Produces the full report for a shift (open or closed).
    pub async fn shift_report(&self, shift_id: &str) -> DeskResult<ShiftReport> {
        debug!(shift_id = %shift_id, "shift_report");

        let shift = self
            .db
            .shifts()
            .get_by_id(shift_id)
            .await?
            .ok_or_else(|| DeskError::not_found("Shift", shift_id))?;

        let stays = self.db.stays().finalized_by_shift(shift_id).await?;
        let withdrawals = self.db.shifts().withdrawals_for_shift(shift_id).await?;

        let room_income: i64 = stays.iter().map(|s| s.room_subtotal).sum();
        let consumption_income: i64 = stays.iter().map(|s| s.consumption_subtotal).sum();
        let total_income: i64 = stays.iter().map(|s| s.total_paid).sum();
        let total_withdrawals: i64 = withdrawals.iter().map(|w| w.amount).sum();

        // Per-product rollup from the raw consumption entries.
        // BTreeMap keeps the output order stable.
        let mut rollup: BTreeMap<String, (i64, i64)> = BTreeMap::new();
        for stay in &stays {
            let entries = self.db.stays().consumption_for_stay(&stay.id).await?;
            for entry in entries {
                let line = rollup.entry(entry.product_id.clone()).or_insert((0, 0));
                line.0 += entry.quantity;
                line.1 += entry.quantity * entry.unit_price;
            }
        }

        let mut product_sales = Vec::with_capacity(rollup.len());
        for (product_id, (quantity, amount)) in rollup {
            // Soft-deleted products still resolve; history outlives catalog edits.
            let name = self
                .db
                .products()
                .get_by_id(&product_id)
                .await?
                .map(|p| p.name)
                .unwrap_or_else(|| product_id.clone());

            product_sales.push(ProductSalesLine {
                product_id,
                name,
                quantity,
                amount,
            });
        }

        let expected_closing_balance = shift.opening_balance + total_income - total_withdrawals;

        Ok(ShiftReport {
            shift,
            stays,
            withdrawals,
            product_sales,
            room_income,
            consumption_income,
            total_income,
            total_withdrawals,
            expected_closing_balance,
        })
    }

    /// Summarizes the stays finalized within 24 hours of `day_start`.
    ///
    /// The caller picks the business-day boundary (local midnight, 6am
    /// changeover, whatever the house uses) and passes it in UTC.
    pub async fn daily_summary(&self, day_start: DateTime<Utc>) -> DeskResult<DailySummary> {
        let day_end = day_start + Duration::hours(24);
        let stays = self.db.stays().finalized_between(day_start, day_end).await?;

        let mut occupancy = RoomOccupancy {
            available: 0,
            occupied: 0,
            cleaning: 0,
            maintenance: 0,
        };
        for (state, count) in self.db.rooms().count_by_state().await? {
            match state {
                RoomState::Available => occupancy.available = count,
                RoomState::Occupied => occupancy.occupied = count,
                RoomState::Cleaning => occupancy.cleaning = count,
                RoomState::Maintenance => occupancy.maintenance = count,
            }
        }

        Ok(DailySummary {
            stays_closed: stays.len(),
            room_income: stays.iter().map(|s| s.room_subtotal).sum(),
            consumption_income: stays.iter().map(|s| s.consumption_subtotal).sum(),
            total_income: stays.iter().map(|s| s.total_paid).sum(),
            occupancy,
        })
    }
}
