//! # Domain Types
//!
//! Core domain types used throughout Eclipse PMS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Room       │   │   StayRecord    │   │      Shift      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  number (biz)   │   │  room_id (FK)   │   │  clerk_id       │       │
//! │  │  state          │   │  shift_id (FK)  │   │  opening_balance│       │
//! │  │  rate_plan_id   │   │  total_paid     │   │  closing_balance│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    RoomState    │   │ConsumptionEntry │   │ WithdrawalEntry │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Available      │   │  unit_price     │   │  amount         │       │
//! │  │  Occupied       │   │  (captured at   │   │  (never edited  │       │
//! │  │  Cleaning       │   │   sale time)    │   │   or deleted)   │       │
//! │  │  Maintenance    │   └─────────────────┘   └─────────────────┘       │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists (room number) - human-readable display key

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Room State & Type
// =============================================================================

/// The operational state of a room.
///
/// State is mutated only by the stay lifecycle (check-in/check-out) and by
/// cleaning-staff actions; admin tooling owns everything else about a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoomState {
    /// Ready for a new guest.
    Available,
    /// A guest is checked in (exactly one unfinalized stay exists).
    Occupied,
    /// Check-out happened; housekeeping has not released the room yet.
    Cleaning,
    /// Taken out of service by staff.
    Maintenance,
}

impl Default for RoomState {
    fn default() -> Self {
        RoomState::Available
    }
}

/// Room category, used for display and reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Standard,
    Specialty,
    Suite,
}

impl Default for RoomType {
    fn default() -> Self {
        RoomType::Standard
    }
}

// =============================================================================
// Clerk Roles & Capabilities
// =============================================================================

/// Clerk role. A closed enum: there are exactly two roles in the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ClerkRole {
    /// The business owner: full access.
    Owner,
    /// A front-desk administrator: operates rooms and the cash shift.
    Administrator,
}

/// Things a clerk may be allowed to do.
///
/// The transport layer checks these before invoking a desk operation; the
/// core exposes the table so the rules live in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// View the occupancy dashboard.
    ViewDashboard,
    /// Check guests in/out, manage cleaning transitions.
    OperateRooms,
    /// Open/close shifts and record withdrawals.
    OperateCashShift,
    /// Create/edit/delete consumable products.
    ManageInventory,
    /// Manage clerk accounts.
    ManageUsers,
    /// View shift reports.
    ViewReports,
    /// Run the bulk historical reset.
    ResetHistory,
}

impl ClerkRole {
    /// Capability lookup table.
    ///
    /// Administrators run the front desk and the cash drawer; everything
    /// with a back-office flavor (inventory, users, reports, resets) is
    /// owner-only.
    pub const fn allows(&self, capability: Capability) -> bool {
        use Capability::*;
        match self {
            ClerkRole::Owner => true,
            ClerkRole::Administrator => matches!(
                capability,
                ViewDashboard | OperateRooms | OperateCashShift
            ),
        }
    }
}

// =============================================================================
// Rate Plan
// =============================================================================

/// Default base duration of a stay, in hours.
pub const DEFAULT_BASE_HOURS: i64 = 12;

/// Pricing parameters for a room.
///
/// Immutable during a stay: the plan is read at check-out time, and rooms
/// keep the same plan while occupied (admin tooling refuses to edit plans of
/// occupied rooms).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RatePlan {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name (e.g. "Standard 12h").
    pub name: String,

    /// Price for the base duration, in whole currency units.
    pub base_price: i64,

    /// Base duration covered by the base price, in hours.
    pub base_hours: i64,

    /// Price per additional hour past base + grace.
    pub extra_hour_price: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl RatePlan {
    /// Returns the base price as a Money type.
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_units(self.base_price)
    }

    /// Returns the extra-hour price as a Money type.
    #[inline]
    pub fn extra_hour_price(&self) -> Money {
        Money::from_units(self.extra_hour_price)
    }
}

// =============================================================================
// Room
// =============================================================================

/// A room available for occupancy.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Room {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Room number - unique business identifier, shown on the room map.
    pub number: String,

    /// Room category.
    pub room_type: RoomType,

    /// Current operational state.
    pub state: RoomState,

    /// The rate plan this room is billed under.
    pub rate_plan_id: String,

    /// Whether the room is active (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A consumable product sold during a stay (minibar, snacks, toiletries).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the clerk and on the bill.
    pub name: String,

    /// Optional category for report grouping.
    pub category: Option<String>,

    /// Sale price in whole currency units.
    pub sale_price: i64,

    /// Units currently in stock.
    pub stock: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the sale price as a Money type.
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_units(self.sale_price)
    }

    /// Checks whether `quantity` units could be sold right now.
    ///
    /// Advisory only: the authoritative check is the conditional stock
    /// decrement inside the attach-consumption transaction.
    pub fn can_sell(&self, quantity: i64) -> bool {
        quantity > 0 && self.stock >= quantity
    }
}

// =============================================================================
// Stay Record
// =============================================================================

/// One occupancy of a room, from check-in to check-out.
///
/// ## Lifecycle
/// Created at check-in with zeroed subtotals and `finalized = false`;
/// mutated exactly once at check-out (the terminal write fills the
/// check-out timestamp, elapsed hours, subtotals and total); immutable
/// afterwards. At most one unfinalized stay exists per room.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StayRecord {
    pub id: String,

    /// Room being occupied.
    pub room_id: String,

    /// Shift that was open when the guest checked in; the stay's income is
    /// reconciled against this shift at close.
    pub shift_id: String,

    /// Clerk who performed the check-in.
    pub clerk_id: String,

    #[ts(as = "String")]
    pub checked_in_at: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub checked_out_at: Option<DateTime<Utc>>,

    /// Elapsed hours at check-out, rounded to 2 decimal places.
    pub elapsed_hours: Option<f64>,

    /// Room charge at check-out (pricing engine output).
    pub room_subtotal: i64,

    /// Sum of quantity × unit_price over the stay's consumption entries.
    pub consumption_subtotal: i64,

    /// room_subtotal + consumption_subtotal, captured at check-out.
    pub total_paid: i64,

    /// Terminal flag: once true, the record never changes again.
    pub finalized: bool,
}

impl StayRecord {
    /// Returns the captured total as Money.
    #[inline]
    pub fn total_paid(&self) -> Money {
        Money::from_units(self.total_paid)
    }
}

// =============================================================================
// Consumption Entry
// =============================================================================

/// A product sold against an open stay.
/// Uses snapshot pattern: the unit price is frozen at sale time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ConsumptionEntry {
    pub id: String,
    pub stay_id: String,
    pub product_id: String,
    /// Units sold (always positive).
    pub quantity: i64,
    /// Price per unit at time of sale (frozen).
    pub unit_price: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl ConsumptionEntry {
    /// Returns the line total as Money (quantity × frozen unit price).
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_units(self.unit_price).multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Shift
// =============================================================================

/// A clerk's accountable cash-handling session.
///
/// At most one shift is open (closed_at NULL) system-wide. The totals and
/// closing balance are filled by the single terminal write at close:
/// `closing_balance = opening_balance + total_income − total_withdrawals`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Shift {
    pub id: String,

    /// Clerk who opened the shift.
    pub clerk_id: String,

    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub closed_at: Option<DateTime<Utc>>,

    /// Cash in the drawer when the shift opened (inherited or overridden).
    pub opening_balance: i64,

    /// Sum of total_paid over the shift's finalized stays (set at close).
    pub total_income: Option<i64>,

    /// Sum of the shift's withdrawal amounts (set at close).
    pub total_withdrawals: Option<i64>,

    /// Reconciled cash at close (set at close).
    pub closing_balance: Option<i64>,

    /// Free-text closing notes.
    pub notes: Option<String>,
}

impl Shift {
    /// Returns the opening balance as Money.
    #[inline]
    pub fn opening_balance(&self) -> Money {
        Money::from_units(self.opening_balance)
    }

    /// Whether the shift is still open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

// =============================================================================
// Withdrawal Entry
// =============================================================================

/// Cash removed from the open shift's drawer (or an automatic opening
/// adjustment). Entries are append-only: never mutated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct WithdrawalEntry {
    pub id: String,
    pub shift_id: String,
    /// Clerk who took the cash (recorded for accountability).
    pub clerk_id: String,
    /// Amount removed, always positive.
    pub amount: i64,
    /// Free-text reason; automatic adjustments describe their direction here.
    pub note: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl WithdrawalEntry {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_units(self.amount)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
