//! # Cash Shift Ledger
//!
//! Opens and closes shifts, records withdrawals, and keeps the drawer math
//! honest.
//!
//! ## Shift Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  last closed shift                                                      │
//! │  closing_balance ────┐ inherited                                        │
//! │                      ▼                                                  │
//! │  open_shift ───► Shift (open) ───► record_withdrawal (0..n)            │
//! │       │               │                                                 │
//! │       │ counted ≠     │  stays finalized against this shift            │
//! │       │ inherited?    │  accumulate income                             │
//! │       ▼               ▼                                                 │
//! │  adjustment      close_shift: one terminal write                       │
//! │  entry           closing = opening + income − withdrawals              │
//! │                                                                         │
//! │  At most ONE open shift system-wide (partial unique index).            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Over-Withdrawal
//! The ledger deliberately does not cap withdrawals at the available cash.
//! The drawer is physical; if the cash left the drawer, refusing to record
//! it only makes the books wrong. [`ShiftLedger::available_cash`] gives
//! callers the number to warn with.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use eclipse_core::validation::{validate_note, validate_withdrawal_amount};
use eclipse_core::{CoreError, Shift, WithdrawalEntry};
use eclipse_db::repository::shift as shift_repo;
use eclipse_db::{Database, DbError};

use crate::error::DeskResult;

/// Snapshot of the open shift's drawer, for UI warnings and dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawerStatus {
    pub shift_id: String,
    pub opening_balance: i64,
    pub income_so_far: i64,
    pub withdrawals_so_far: i64,
    /// opening + income − withdrawals. Negative when over-withdrawn.
    pub available_cash: i64,
}

/// Orchestrates the cash-shift lifecycle.
///
/// ## Usage
/// ```rust,ignore
/// let ledger = ShiftLedger::new(db.clone());
/// let shift = ledger.open_shift("clerk-1", Some(100_000)).await?;
/// ledger.record_withdrawal("clerk-1", 25_000, "supplier payment").await?;
/// let closed = ledger.close_shift(Some("drawer counted twice")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ShiftLedger {
    db: Database,
}

impl ShiftLedger {
    /// Creates a new ShiftLedger.
    pub fn new(db: Database) -> Self {
        ShiftLedger { db }
    }

    /// Opens a new shift, inheriting the previous closing balance.
    ///
    /// ## Balance Rules
    /// - `requested_opening` omitted or zero → opening = inherited balance
    ///   (the closing balance of the most recently closed shift, 0 if none)
    /// - positive `requested_opening` → opening = the counted amount, and if
    ///   it differs from a positive inherited balance, an automatic
    ///   adjustment entry of magnitude |difference| is appended so the close
    ///   reconciliation balances against recorded entries
    ///
    /// ## Errors
    /// - `ShiftAlreadyOpen` - an open shift exists (also enforced by the
    ///   single-open-shift index under races)
    /// - `InvalidAmount` - negative requested opening balance
    pub async fn open_shift(
        &self,
        clerk_id: &str,
        requested_opening: Option<i64>,
    ) -> DeskResult<Shift> {
        if let Some(requested) = requested_opening {
            if requested < 0 {
                return Err(CoreError::InvalidAmount {
                    field: "opening_balance",
                    value: requested,
                }
                .into());
            }
        }

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        if let Some(open) = shift_repo::fetch_open_shift(&mut tx).await? {
            return Err(CoreError::ShiftAlreadyOpen(open.id).into());
        }

        let inherited = shift_repo::fetch_last_closed(&mut tx)
            .await?
            .and_then(|s| s.closing_balance)
            .unwrap_or(0);

        // Zero is "take what the last shift left", same as omitting it.
        let counted = requested_opening.filter(|&v| v > 0);
        let opening_balance = counted.unwrap_or(inherited);

        let shift = Shift {
            id: Uuid::new_v4().to_string(),
            clerk_id: clerk_id.to_string(),
            opened_at: now,
            closed_at: None,
            opening_balance,
            total_income: None,
            total_withdrawals: None,
            closing_balance: None,
            notes: None,
        };

        shift_repo::insert_shift(&mut tx, &shift).await?;

        // The clerk counted a different amount than the books say was left.
        // Record the difference so close-time reconciliation still balances
        // against entries instead of silently absorbing the gap.
        if let Some(counted) = counted {
            if inherited > 0 && counted != inherited {
                let difference = (inherited - counted).abs();
                let direction = if counted < inherited {
                    "shortfall against inherited balance"
                } else {
                    "surplus over inherited balance"
                };
                let note = format!(
                    "Automatic opening adjustment ({}): counted {}, inherited {}",
                    direction, counted, inherited
                );

                let entry = WithdrawalEntry {
                    id: Uuid::new_v4().to_string(),
                    shift_id: shift.id.clone(),
                    clerk_id: clerk_id.to_string(),
                    amount: difference,
                    note: Some(note),
                    created_at: now,
                };
                shift_repo::insert_withdrawal(&mut tx, &entry).await?;

                info!(
                    shift_id = %shift.id,
                    inherited = %inherited,
                    counted = %counted,
                    "Opening balance adjusted"
                );
            }
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            shift_id = %shift.id,
            clerk_id = %clerk_id,
            opening_balance = %opening_balance,
            "Shift opened"
        );

        Ok(shift)
    }

    /// Records cash removed from the open shift's drawer.
    ///
    /// ## Errors
    /// - `InvalidAmount` / validation - amount ≤ 0 or note too long
    /// - `NoOpenShift` - no shift is open
    ///
    /// There is no upper bound: over-withdrawal is recorded, not rejected
    /// (it shows up as negative available cash and a reporting anomaly).
    pub async fn record_withdrawal(
        &self,
        clerk_id: &str,
        amount: i64,
        note: &str,
    ) -> DeskResult<WithdrawalEntry> {
        validate_withdrawal_amount(amount).map_err(CoreError::from)?;
        validate_note(note).map_err(CoreError::from)?;

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let shift = shift_repo::fetch_open_shift(&mut tx)
            .await?
            .ok_or(CoreError::NoOpenShift)?;

        let entry = WithdrawalEntry {
            id: Uuid::new_v4().to_string(),
            shift_id: shift.id.clone(),
            clerk_id: clerk_id.to_string(),
            amount,
            note: if note.trim().is_empty() {
                None
            } else {
                Some(note.trim().to_string())
            },
            created_at: now,
        };

        shift_repo::insert_withdrawal(&mut tx, &entry).await?;
        tx.commit().await.map_err(DbError::from)?;

        info!(
            shift_id = %shift.id,
            amount = %amount,
            "Withdrawal recorded"
        );

        Ok(entry)
    }

    /// Closes the open shift with one terminal write.
    ///
    /// Computes totalIncome (sum of total_paid over the shift's finalized
    /// stays), totalWithdrawals, and
    /// `closing = opening + income − withdrawals`, then fills the record.
    /// After this the shift is immutable.
    ///
    /// ## Errors
    /// - `ShiftAlreadyClosed` - the most recent shift is already closed
    ///   (a double-click on "close shift" lands here)
    /// - `NoOpenShift` - no shift has ever been opened
    pub async fn close_shift(&self, notes: Option<&str>) -> DeskResult<Shift> {
        if let Some(n) = notes {
            validate_note(n).map_err(CoreError::from)?;
        }

        let now = Utc::now();
        let mut tx = self.db.begin().await?;

        let shift = match shift_repo::fetch_open_shift(&mut tx).await? {
            Some(shift) => shift,
            None => {
                // Distinguish "closed twice" from "never opened" so the UI
                // can say which happened.
                return match shift_repo::fetch_last_closed(&mut tx).await? {
                    Some(last) => Err(CoreError::ShiftAlreadyClosed(last.id).into()),
                    None => Err(CoreError::NoOpenShift.into()),
                };
            }
        };

        let total_income = shift_repo::sum_income(&mut tx, &shift.id).await?;
        let total_withdrawals = shift_repo::sum_withdrawals(&mut tx, &shift.id).await?;
        let closing_balance = shift.opening_balance + total_income - total_withdrawals;

        let closed = shift_repo::close_shift(
            &mut tx,
            &shift.id,
            now,
            total_income,
            total_withdrawals,
            closing_balance,
            notes,
        )
        .await?;

        if !closed {
            return Err(CoreError::ShiftAlreadyClosed(shift.id).into());
        }

        tx.commit().await.map_err(DbError::from)?;

        info!(
            shift_id = %shift.id,
            total_income = %total_income,
            total_withdrawals = %total_withdrawals,
            closing_balance = %closing_balance,
            "Shift closed"
        );

        Ok(Shift {
            closed_at: Some(now),
            total_income: Some(total_income),
            total_withdrawals: Some(total_withdrawals),
            closing_balance: Some(closing_balance),
            notes: notes.map(str::to_string),
            ..shift
        })
    }

    /// Returns the currently open shift, if any.
    pub async fn current_shift(&self) -> DeskResult<Option<Shift>> {
        Ok(self.db.shifts().current_open().await?)
    }

    /// Computes the open shift's live drawer status.
    ///
    /// This is the number the UI warns with before a withdrawal; the ledger
    /// itself never blocks on it.
    pub async fn available_cash(&self) -> DeskResult<DrawerStatus> {
        let mut tx = self.db.begin().await?;

        let shift = shift_repo::fetch_open_shift(&mut tx)
            .await?
            .ok_or(CoreError::NoOpenShift)?;

        let income = shift_repo::sum_income(&mut tx, &shift.id).await?;
        let withdrawals = shift_repo::sum_withdrawals(&mut tx, &shift.id).await?;

        // Read-only; nothing to commit.
        debug!(shift_id = %shift.id, income = %income, withdrawals = %withdrawals, "Drawer status");

        Ok(DrawerStatus {
            shift_id: shift.id,
            opening_balance: shift.opening_balance,
            income_so_far: income,
            withdrawals_so_far: withdrawals,
            available_cash: shift.opening_balance + income - withdrawals,
        })
    }
}
