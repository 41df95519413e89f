//! # Pricing Engine
//!
//! Pure computation of the room charge for a stay.
//!
//! ## Billing Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TIERED TIME-BASED PRICING WITH GRACE                                   │
//! │                                                                         │
//! │  charge                                                                 │
//! │    │                                    ┌─────────                      │
//! │    │                          ┌─────────┘ +extra_hour_price             │
//! │    │   ┌──────────────────────┘                                         │
//! │    │   │ base_price                                                     │
//! │    └───┴────────────┬────┬────────┬─────────► elapsed                   │
//! │        0        base│grace│  +1h   │  +2h                               │
//! │                hours│ 15m │        │                                    │
//! │                                                                         │
//! │  • elapsed ≤ base hours          → base price                           │
//! │  • overage ≤ 15 min grace        → base price (grace absorbs it all)    │
//! │  • past grace                    → every started hour bills in full     │
//! │                                                                         │
//! │  The charge is a NON-DECREASING step function of elapsed time, so it    │
//! │  is safe to recompute against a live ticking clock.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All arithmetic is integer (seconds → minutes → hours); no floating point
//! touches a monetary value.

use chrono::{DateTime, Duration, Utc};

use crate::money::Money;
use crate::types::RatePlan;

/// Minutes past the base duration that bill nothing.
///
/// Fixed business policy: a guest leaving at 12h10m on a 12h plan pays the
/// base price. One minute past the grace window starts a full extra hour.
pub const GRACE_PERIOD_MINUTES: i64 = 15;

/// Computes the room charge for a stay that began at `checked_in_at`,
/// evaluated at `now`.
///
/// Pure and deterministic: no I/O, no side effects. The live dashboard calls
/// this once per second against the current clock; check-out calls it once
/// with the terminal timestamp.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, Utc};
/// use eclipse_core::pricing::compute_charge;
/// # use eclipse_core::types::RatePlan;
/// # let plan = RatePlan {
/// #     id: "r".into(), name: "Standard".into(),
/// #     base_price: 50_000, base_hours: 12, extra_hour_price: 10_000,
/// #     created_at: Utc::now(), updated_at: Utc::now(),
/// # };
/// let check_in = Utc::now();
/// // 13h20m later: 80 minutes over, 65 billable past grace → 2 extra hours
/// let now = check_in + Duration::minutes(13 * 60 + 20);
/// assert_eq!(compute_charge(&plan, check_in, now).units(), 70_000);
/// ```
pub fn compute_charge(plan: &RatePlan, checked_in_at: DateTime<Utc>, now: DateTime<Utc>) -> Money {
    charge_for_elapsed(plan, now - checked_in_at)
}

/// Computes the charge from an already-measured elapsed duration.
///
/// Negative durations (clock skew between terminals) clamp to zero rather
/// than panicking or going negative.
pub fn charge_for_elapsed(plan: &RatePlan, elapsed: Duration) -> Money {
    let elapsed_seconds = elapsed.num_seconds().max(0);
    let base_seconds = plan.base_hours * 3600;
    let base = plan.base_price();

    if elapsed_seconds <= base_seconds {
        return base;
    }

    // Whole minutes over the base duration, rounded half-up from seconds.
    let over_seconds = elapsed_seconds - base_seconds;
    let over_minutes = (over_seconds + 30) / 60;

    if over_minutes <= GRACE_PERIOD_MINUTES {
        return base;
    }

    // Any started hour past the grace window bills as a full hour.
    let extra_hours = (over_minutes - GRACE_PERIOD_MINUTES + 59) / 60;
    base + plan.extra_hour_price().multiply_quantity(extra_hours)
}

/// Elapsed hours rounded to 2 decimal places (half-up), recorded on the
/// stay at check-out.
///
/// Computed in integer centi-hours so the stored value is exact.
pub fn round_elapsed_hours(elapsed: Duration) -> f64 {
    let seconds = elapsed.num_seconds().max(0);
    let centi_hours = (seconds * 100 + 1800) / 3600;
    centi_hours as f64 / 100.0
}

// =============================================================================
// Unit Tests
// =============================================================================
