//! # Bulk Historical Reset
//!
//! Deletes all operational history (stays, consumption, shifts,
//! withdrawals) while preserving the catalog tables (rooms, rate plans,
//! products).
//!
//! Owner-only, irreversible, and refused while anything is open: an open
//! shift or stay means live money is in flight and the books must not
//! disappear under it.

use tracing::{info, warn};

use eclipse_db::repository::{shift as shift_repo, stay as stay_repo};
use eclipse_db::{Database, DbError};

use crate::error::{DeskError, DeskResult};

/// What the reset removed.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeReport {
    pub consumption_entries: u64,
    pub withdrawals: u64,
    pub stays: u64,
    pub shifts: u64,
}

/// Deletes all history in foreign-key order, in one transaction.
///
/// ## Deletion Order
/// consumption_entries → withdrawals → stays → shifts
/// (children before parents, so foreign keys never dangle mid-way)
///
/// ## Errors
/// - `Conflict` - a shift or stay is still open
pub async fn purge_history(db: &Database) -> DeskResult<PurgeReport> {
    warn!("Bulk historical reset requested");

    let mut tx = db.begin().await?;

    if let Some(open) = shift_repo::fetch_open_shift(&mut tx).await? {
        return Err(DeskError::Conflict(format!(
            "shift {} is still open; close it before resetting history",
            open.id
        )));
    }

    let open_stays = stay_repo::count_open_stays(&mut tx).await?;
    if open_stays > 0 {
        return Err(DeskError::Conflict(format!(
            "{} stay(s) are still open; check them out before resetting history",
            open_stays
        )));
    }

    let consumption_entries = stay_repo::delete_all_consumption(&mut tx).await?;
    let withdrawals = shift_repo::delete_all_withdrawals(&mut tx).await?;
    let stays = stay_repo::delete_all_stays(&mut tx).await?;
    let shifts = shift_repo::delete_all_shifts(&mut tx).await?;

    tx.commit().await.map_err(DbError::from)?;

    let report = PurgeReport {
        consumption_entries,
        withdrawals,
        stays,
        shifts,
    };

    info!(
        consumption_entries = report.consumption_entries,
        withdrawals = report.withdrawals,
        stays = report.stays,
        shifts = report.shifts,
        "History purged"
    );

    Ok(report)
}
