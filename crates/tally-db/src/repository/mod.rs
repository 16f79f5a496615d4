//! # Repository Module
//!
//! Database repository implementations for Tally.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Engine service                                                        │
//! │       │                                                                 │
//! │       │  db.transactions().find_for_date(date, &filter, tz)            │
//! │       ▼                                                                 │
//! │  TransactionCacheRepository                                            │
//! │  ├── replace_for_date(&self, date, records)                            │
//! │  ├── find_for_date(&self, date, filter, tz)                            │
//! │  ├── count_for_date / count_receipts_for_date                          │
//! │  └── delete_for_date(&self, date)                                      │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`TransactionCacheRepository`](transaction_cache::TransactionCacheRepository) - Per-date cached POS events
//! - [`SummaryRepository`](summary::SummaryRepository) - Per-date summaries
//! - [`ReconciliationRepository`](reconciliation::ReconciliationRepository) - Reconciliations, payments, notes
//! - [`AuditRepository`](audit::AuditRepository) - Who reviewed which day

pub mod audit;
pub mod reconciliation;
pub mod summary;
pub mod transaction_cache;
