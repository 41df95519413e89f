//! # eclipse-db: Database Layer for Eclipse PMS
//!
//! This crate provides database access for the Eclipse property-management
//! system. It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Eclipse PMS Data Flow                             │
//! │                                                                         │
//! │  Desk operation (check_out)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    eclipse-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (room, stay, │    │  (embedded)  │  │   │
//! │  │   │               │    │  shift, ...)  │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ Pool reads +  │    │ 001_init.sql │  │   │
//! │  │   │ Transactions  │    │ tx-scoped fns │    │ ...          │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                    ./data/eclipse.db                            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (room, product, stay, shift)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use eclipse_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/eclipse.db")).await?;
//!
//! // Standalone reads
//! let rooms = db.rooms().list_active().await?;
//!
//! // Multi-step operations compose tx-scoped functions
//! let mut tx = db.begin().await?;
//! // ... guarded writes ...
//! tx.commit().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::room::RoomRepository;
pub use repository::shift::ShiftRepository;
pub use repository::stay::StayRepository;
