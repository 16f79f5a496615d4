//! # tally-core: Pure Business Logic for Tally
//!
//! Everything about till review and cash reconciliation that can be decided
//! without touching a database or the POS.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 tally-engine (services)                         │   │
//! │  │   cache manager ─ summary service ─ reconciliation service      │   │
//! │  └──────────────┬───────────────────────────────┬──────────────────┘   │
//! │                 │                               │                       │
//! │  ┌──────────────▼───────────────────┐  ┌────────▼──────────────────┐   │
//! │  │     ★ tally-core (THIS CRATE) ★  │  │  tally-db (SQLite)        │   │
//! │  │                                  │  │  cache rows, summaries,   │   │
//! │  │  normalize  filter   summary     │  │  reconciliations, audit   │   │
//! │  │  reconcile  legacy   validation  │  └───────────────────────────┘   │
//! │  │  money      denomination         │                                  │
//! │  │                                  │                                  │
//! │  │  NO I/O • NO DATABASE • NO POS   │                                  │
//! │  └──────────────────────────────────┘                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Transaction records, daily summary, reconciliation types
//! - [`pos`] - Rows as the POS gateway returns them
//! - [`normalize`] - POS rows → [`TransactionRecord`]
//! - [`filter`] - The day-review filter predicate
//! - [`summary`] - Daily aggregation
//! - [`denomination`] - The nine counted denominations
//! - [`reconcile`] - Variance, prior float and POS totals
//! - [`legacy`] - Totals-only legacy rows → counts
//! - [`validation`] - Input rules
//! - [`actor`] - Who performed a write
//! - [`clock`] - Till-local dates in an IANA time zone
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::denomination::DenominationCounts;
//! use tally_core::reconcile::{variance, PriorFloat};
//! use tally_core::Money;
//!
//! let counts = DenominationCounts { cash_50: 10, ..Default::default() };
//! let v = variance(
//!     counts.total(),
//!     Money::from_cents(2_000),
//!     &PriorFloat::none(),
//!     Money::zero(),
//!     Money::from_cents(51_000),
//! );
//! assert_eq!(v.cents(), 1_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod actor;
pub mod clock;
pub mod denomination;
pub mod error;
pub mod filter;
pub mod legacy;
pub mod money;
pub mod normalize;
pub mod pos;
pub mod reconcile;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use actor::{Actor, ActorContext};
pub use denomination::{Denomination, DenominationCounts};
pub use error::{CoreError, CoreResult, ValidationError};
pub use filter::TransactionFilter;
pub use money::Money;
pub use types::*;
