//! # POS Gateway
//!
//! Read-only access to the point-of-sale data store.
//!
//! ## What the Engine Reads
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         PosGateway                                      │
//! │                                                                         │
//! │  Day streams (per business date)                                       │
//! │  ├── receipts_for_date        receipts + ticket + lines + payments     │
//! │  ├── receipt_count_for_date   used to spot a missing cache             │
//! │  ├── drawer_events_for_date                                            │
//! │  └── removed_lines_for_date                                            │
//! │                                                                         │
//! │  Closing sessions                                                      │
//! │  ├── closing_session(host, date)                                       │
//! │  └── payment_totals(money_id)  per payment type                        │
//! │                                                                         │
//! │  Previous cash-up system (keyed by money_id)                           │
//! │  ├── legacy_money / legacy_payee_payments / legacy_day_note            │
//! │                                                                         │
//! │  Lookups: terminals (closing hosts), cashiers                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failures are returned as-is; the engine never retries a gateway call.

pub mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use tally_core::pos::{
    ClosingSession, LegacyDayNote, LegacyMoneyRecord, LegacyPayeePayment, PaymentTypeTotal,
    PosDrawerEvent, PosReceipt, PosRemovedLine,
};

pub use memory::InMemoryPosGateway;

/// Errors surfaced by a gateway implementation.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The POS data store could not be reached.
    #[error("POS unavailable: {0}")]
    Unavailable(String),

    /// A query against the POS failed.
    #[error("POS query failed: {0}")]
    QueryFailed(String),

    /// A POS row could not be read into the expected shape.
    #[error("Unexpected POS data: {0}")]
    Decode(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Read-only view of the POS.
///
/// Dates are business dates in the deployment's configured time zone.
#[async_trait]
pub trait PosGateway: Send + Sync {
    /// The session closed on `date` by the till `host`.
    async fn closing_session(
        &self,
        host: &str,
        date: NaiveDate,
    ) -> GatewayResult<Option<ClosingSession>>;

    async fn receipts_for_date(&self, date: NaiveDate) -> GatewayResult<Vec<PosReceipt>>;

    async fn receipt_count_for_date(&self, date: NaiveDate) -> GatewayResult<i64>;

    async fn drawer_events_for_date(&self, date: NaiveDate) -> GatewayResult<Vec<PosDrawerEvent>>;

    async fn removed_lines_for_date(&self, date: NaiveDate) -> GatewayResult<Vec<PosRemovedLine>>;

    /// Receipt payments of one session summed by payment type.
    async fn payment_totals(&self, money_id: &str) -> GatewayResult<Vec<PaymentTypeTotal>>;

    async fn legacy_money(&self, money_id: &str) -> GatewayResult<Option<LegacyMoneyRecord>>;

    /// Ordered by sequence.
    async fn legacy_payee_payments(&self, money_id: &str)
        -> GatewayResult<Vec<LegacyPayeePayment>>;

    async fn legacy_day_note(&self, money_id: &str) -> GatewayResult<Option<LegacyDayNote>>;

    /// Distinct closing-session hosts, sorted.
    async fn terminals(&self) -> GatewayResult<Vec<String>>;

    /// Distinct cashier names, sorted.
    async fn cashiers(&self) -> GatewayResult<Vec<String>>;
}
