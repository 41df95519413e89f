//! # eclipse-core: Pure Business Logic for Eclipse PMS
//!
//! This crate is the **heart** of Eclipse PMS. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Eclipse PMS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (SPA)                              │   │
//! │  │    Room map ──► Stay modal ──► Cash drawer ──► Shift report    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (out of tree)                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    eclipse-desk                                 │   │
//! │  │    check_in, check_out, open_shift, close_shift, reports       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ eclipse-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │   Room    │  │   Money   │  │  charge   │  │   rules   │  │   │
//! │  │   │   Shift   │  │  i64 units│  │  + grace  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    eclipse-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Room, StayRecord, Shift, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Tiered room pricing with the 15-minute grace window
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **No Clock**: `now` is always a parameter, never read internally
//! 4. **Integer Money**: All monetary values are whole currency units (i64)
//! 5. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use eclipse_core::pricing::compute_charge;
//! use eclipse_core::types::RatePlan;
//!
//! let plan = RatePlan {
//!     id: "plan-std".into(),
//!     name: "Standard 12h".into(),
//!     base_price: 50_000,
//!     base_hours: 12,
//!     extra_hour_price: 10_000,
//!     created_at: Utc::now(),
//!     updated_at: Utc::now(),
//! };
//!
//! let check_in = Utc::now();
//!
//! // Within the base duration the base price applies
//! let now = check_in + Duration::hours(5);
//! assert_eq!(compute_charge(&plan, check_in, now).units(), 50_000);
//!
//! // 13h20m: 65 billable minutes past grace → two full extra hours
//! let now = check_in + Duration::minutes(13 * 60 + 20);
//! assert_eq!(compute_charge(&plan, check_in, now).units(), 70_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use eclipse_core::Money` instead of
// `use eclipse_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
