//! # tally-engine: Till Review & Cash Reconciliation Services
//!
//! Orchestrates the read-only POS gateway, the pure rules in `tally-core`
//! and the SQLite layer in `tally-db`.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          TillEngine                                     │
//! │                                                                         │
//! │  review_day ─────────► audit entry, then transactions + summary        │
//! │  cache_day  ─────────► CacheDayJob (refresh?, cache, summary)          │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │ TransactionCache │  │ DailySummary     │  │ Reconciliation       │  │
//! │  │ Manager          │◄─│ Service          │  │ Service              │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │ empty ⇒ fetch,   │  │ count mismatch ⇒ │  │ get-or-create, save, │  │
//! │  │ normalize, store │  │ regenerate       │  │ history, export      │  │
//! │  └────────┬─────────┘  └────────┬─────────┘  └──────────┬───────────┘  │
//! │           │                     │                        │              │
//! │  ┌────────▼─────────────────────▼────────────────────────▼───────────┐ │
//! │  │   PosGateway (read-only)         Database (tally-db)              │ │
//! │  └───────────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`engine`] - `TillEngine` facade and day review
//! - [`cache`] - Cache-first transaction reads
//! - [`summary`] - Daily summary with staleness detection
//! - [`reconciliation`] - Cash reconciliation workflows
//! - [`job`] - One-shot cache warm-up for a date
//! - [`gateway`] - `PosGateway` trait and in-memory implementation
//! - [`config`] - TOML + environment configuration
//! - [`logging`] - Tracing subscriber setup
//! - [`error`] - Engine error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tally_engine::{EngineConfig, TillEngine, ReviewOrigin};
//! use tally_core::{ActorContext, TransactionFilter};
//!
//! tally_engine::logging::init_tracing();
//! let config = EngineConfig::load_or_default(None);
//! let engine = TillEngine::new(&config, Arc::new(my_pos_gateway)).await?;
//!
//! let review = engine
//!     .review_day(date, &TransactionFilter::none(), &ActorContext::user(4, "Orla"), &ReviewOrigin::default())
//!     .await?;
//!
//! let rec = engine
//!     .reconciliations()
//!     .get_or_create(date, 1, "TILL-1", &ActorContext::anonymous())
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod job;
pub mod logging;
pub mod reconciliation;
pub mod summary;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::TransactionCacheManager;
pub use config::EngineConfig;
pub use engine::{DayReview, ReviewOrigin, TillEngine};
pub use error::{EngineError, EngineResult};
pub use gateway::{GatewayError, GatewayResult, InMemoryPosGateway, PosGateway};
pub use job::{CacheDayJob, CacheDayReport};
pub use reconciliation::ReconciliationService;
pub use summary::DailySummaryService;
