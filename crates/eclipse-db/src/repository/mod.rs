//! # Repository Modules
//!
//! Database access organized by entity.
//!
//! ## Two Shapes of Access
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Repository structs (pool-backed)                                       │
//! │  ───────────────────────────────                                        │
//! │  Standalone reads and admin CRUD. Each call uses its own connection.    │
//! │    db.rooms().list_active().await?                                      │
//! │                                                                         │
//! │  Free functions over &mut SqliteConnection (transaction-scoped)         │
//! │  ─────────────────────────────────────────                              │
//! │  Guarded writes composed by eclipse-desk into one transaction:          │
//! │    let mut tx = db.begin().await?;                                      │
//! │    room::transition_state(&mut tx, ...).await?;                         │
//! │    stay::insert_stay(&mut tx, ...).await?;                              │
//! │    tx.commit().await?;                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod product;
pub mod room;
pub mod shift;
pub mod stay;
