//! # POS Source Records
//!
//! Shapes of the rows the POS gateway hands us. These mirror the POS data
//! store (closing sessions, receipts with tickets/lines/payments, drawer
//! openings, removed lines) plus the totals-only tables left behind by the
//! previous cash-up system.
//!
//! Nothing here is persisted by us; see [`crate::normalize`] for how they
//! become [`TransactionRecord`](crate::types::TransactionRecord)s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Closing Sessions
// =============================================================================

/// One till's closed cash session (the POS `CLOSEDCASH` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingSession {
    /// Session id (`MONEY`), the join key for receipts and legacy rows.
    pub money_id: String,
    /// Till host name.
    pub host: String,
    pub date_start: DateTime<Utc>,
    /// `None` while the session is still open.
    pub date_end: Option<DateTime<Utc>>,
}

// =============================================================================
// Receipts
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosReceipt {
    pub receipt_id: String,
    pub issued_at: DateTime<Utc>,
    /// Closing session the receipt was rung under.
    pub money_id: Option<String>,
    /// Host of that closing session.
    pub host: Option<String>,
    pub ticket: Option<PosTicket>,
    /// In the order the POS stored them; the first is the headline tender.
    #[serde(default)]
    pub payments: Vec<PosPayment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosTicket {
    pub ticket_id: i64,
    /// Name of the person who rang the ticket.
    pub cashier: Option<String>,
    pub customer: Option<String>,
    #[serde(default)]
    pub lines: Vec<PosTicketLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosTicketLine {
    pub line: i64,
    /// `None` when the product row has since been deleted.
    pub product_name: Option<String>,
    pub product_code: Option<String>,
    pub units: f64,
    pub price: f64,
    /// Fractional rate of the line's tax category, if it has one.
    pub tax_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosPayment {
    /// Payment type label (`cash`, `magcard`, `debt`, `free`, `cheque`, ...).
    pub payment: String,
    pub total: Money,
}

// =============================================================================
// Drawer & Removed-Line Events
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosDrawerEvent {
    pub opened_at: DateTime<Utc>,
    /// What the POS logged for the opening, e.g. `"No Sale"`.
    pub name: Option<String>,
    pub ticket_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosRemovedLine {
    pub removed_at: DateTime<Utc>,
    pub product_name: Option<String>,
    pub product_id: Option<String>,
    pub units: f64,
    pub ticket_id: Option<String>,
}

/// Sum of one payment type across a closing session's receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTypeTotal {
    pub payment: String,
    pub total: Money,
}

// =============================================================================
// Legacy Cash-Up Tables
// =============================================================================

/// The previous system's cash-up row for a session.
///
/// Denomination fields hold the **value** counted in that denomination,
/// not the number of notes or coins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyMoneyRecord {
    pub money_id: String,
    pub cash_50: Option<Money>,
    pub cash_20: Option<Money>,
    pub cash_10: Option<Money>,
    pub cash_5: Option<Money>,
    pub cash_2: Option<Money>,
    pub cash_1: Option<Money>,
    pub cash_50c: Option<Money>,
    pub cash_20c: Option<Money>,
    pub cash_10c: Option<Money>,
    pub note_float: Option<Money>,
    pub coin_float: Option<Money>,
    pub card: Option<Money>,
    pub cash_back: Option<Money>,
    pub cheque: Option<Money>,
    pub debt: Option<Money>,
    pub debt_paid_cash: Option<Money>,
    pub debt_paid_cheque: Option<Money>,
    pub debt_paid_card: Option<Money>,
    pub free: Option<Money>,
    pub voucher_used: Option<Money>,
    pub money_added: Option<Money>,
}

/// A supplier payout recorded by the previous system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyPayeePayment {
    pub payee_id: Option<i64>,
    pub amount: Option<Money>,
    pub sequence: Option<i64>,
}

/// The previous system's free-text note for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyDayNote {
    pub message: String,
}
