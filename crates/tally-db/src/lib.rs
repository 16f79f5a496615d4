//! # tally-db: Database Layer for Tally
//!
//! SQLite storage for the till-review cache, daily summaries, cash
//! reconciliations and the review audit trail, using sqlx for async access.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Data Flow                                  │
//! │                                                                         │
//! │  tally-engine service (review_day, save reconciliation)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     tally-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌──────────────────┐  ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories    │  │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                  │  │  (embedded)  │  │   │
//! │  │   │               │    │ TransactionCache │  │ 001 review   │  │   │
//! │  │   │ SqlitePool    │◄───│ Summary          │  │ 002 recon    │  │   │
//! │  │   │               │    │ Reconciliation   │  │ 003 audit    │  │   │
//! │  │   │               │    │ Audit            │  │              │  │   │
//! │  │   └───────────────┘    └──────────────────┘  └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (tally.db)                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/tally.db")).await?;
//!
//! let cached = db.transactions().count_for_date(date).await?;
//! let summary = db.summaries().get(date).await?;
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
pub use repository::audit::{AuditRepository, NewReviewAudit, ReviewAuditEntry};
pub use repository::reconciliation::{NewNote, ReconciliationRepository};
pub use repository::summary::SummaryRepository;
pub use repository::transaction_cache::{CachedTransaction, TransactionCacheRepository};
