//! # eclipse-desk: Desk Operations for Eclipse PMS
//!
//! This crate composes the pure logic in `eclipse-core` and the storage in
//! `eclipse-db` into the operations a front desk actually performs. It is
//! the layer a transport (IPC commands, HTTP handlers) calls into.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Eclipse PMS Desk Layer                            │
//! │                                                                         │
//! │  Transport (out of tree)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   eclipse-desk (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │  ┌────────────┐ ┌────────────┐ ┌──────────────┐ ┌──────────┐  │   │
//! │  │  │StayManager │ │ShiftLedger │ │ShiftReporter │ │  reset   │  │   │
//! │  │  │ check_in   │ │ open_shift │ │ shift_report │ │ purge_   │  │   │
//! │  │  │ check_out  │ │ close_shift│ │ daily_summary│ │ history  │  │   │
//! │  │  │ consumption│ │ withdrawals│ │              │ │          │  │   │
//! │  │  └────────────┘ └────────────┘ └──────────────┘ └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │  ONE TRANSACTION PER OPERATION • GUARDED WRITES • TYPED ERRORS │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                              │                                  │
//! │       ▼                              ▼                                  │
//! │  eclipse-core (pricing, rules)  eclipse-db (SQLite)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity Model
//!
//! Each operation runs its reads and guarded writes on a single transaction.
//! Guards are conditional UPDATEs (`WHERE state = ...`, `WHERE finalized = 0`,
//! `WHERE stock >= qty`, `WHERE closed_at IS NULL`); a guard that affects
//! zero rows aborts the operation and the transaction rolls back, so two
//! terminals racing on the same room, product, or shift cannot corrupt
//! anything - one of them simply loses.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod report;
pub mod reset;
pub mod stay;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DeskError, DeskResult, ErrorKind};
pub use ledger::{DrawerStatus, ShiftLedger};
pub use report::{DailySummary, ProductSalesLine, RoomOccupancy, ShiftReport, ShiftReporter};
pub use reset::{purge_history, PurgeReport};
pub use stay::{CheckOutSummary, LiveCharge, StayManager};
