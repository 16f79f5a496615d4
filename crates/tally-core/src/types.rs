//! # Domain Types
//!
//! Core domain types shared by the cache, the summary aggregator and the
//! reconciliation calculator.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌───────────────────────┐          ┌──────────────────────────┐       │
//! │  │  TransactionRecord    │          │     DailySummary         │       │
//! │  │  ───────────────────  │  fold    │  ──────────────────────  │       │
//! │  │  occurred_at          │ ───────► │  totals per channel      │       │
//! │  │  terminal / cashier   │          │  hourly / terminal /     │       │
//! │  │  amount               │          │  cashier buckets         │       │
//! │  │  detail: Receipt |    │          └──────────────────────────┘       │
//! │  │          Drawer  |    │                                             │
//! │  │          Removed      │          ┌──────────────────────────┐       │
//! │  └───────────────────────┘          │     Reconciliation       │       │
//! │                                     │  ──────────────────────  │       │
//! │                                     │  counts, floats, tenders │       │
//! │                                     │  counted vs POS, variance│       │
//! │                                     │  └─ payments (ordered)   │       │
//! │                                     │  └─ notes (append-only)  │       │
//! │                                     └──────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::denomination::DenominationCounts;
use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Transaction Kind
// =============================================================================

/// The three POS event streams a day is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// A completed sale.
    Receipt,
    /// The cash drawer was opened.
    Drawer,
    /// A line was removed from a ticket before it was closed.
    Removed,
}

impl TransactionKind {
    /// Every kind, in source-stream order.
    pub const ALL: [TransactionKind; 3] = [
        TransactionKind::Receipt,
        TransactionKind::Removed,
        TransactionKind::Drawer,
    ];

    /// Returns the stored label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Receipt => "receipt",
            TransactionKind::Drawer => "drawer",
            TransactionKind::Removed => "removed",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "receipt" => Ok(TransactionKind::Receipt),
            "drawer" => Ok(TransactionKind::Drawer),
            "removed" => Ok(TransactionKind::Removed),
            other => Err(CoreError::UnknownTransactionType(other.to_string())),
        }
    }
}

// =============================================================================
// Transaction Record
// =============================================================================

/// One normalized POS event.
///
/// ## Serialized Shape
/// The variant payload is flattened next to the shared projection and tagged
/// by `transaction_type`, so a cached receipt reads:
/// ```json
/// { "occurred_at": "2024-03-01T09:15:00Z", "terminal": "TILL-1",
///   "cashier": "Aoife", "amount": 1250, "transaction_type": "receipt",
///   "receipt_id": "r-1", "payment_type": "cash", "lines": [...] }
/// ```
/// The database filters on `$.payment_type` through `json_extract`, which
/// depends on this flat layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// When the event happened (UTC).
    pub occurred_at: DateTime<Utc>,

    /// Closing-session host the receipt was rung on. `None` for drawer
    /// and removed-line events.
    pub terminal: Option<String>,

    /// Cashier name. `None` for drawer and removed-line events.
    pub cashier: Option<String>,

    /// First payment's total for receipts, zero otherwise.
    pub amount: Money,

    #[serde(flatten)]
    pub detail: TransactionDetail,
}

impl TransactionRecord {
    /// Returns which stream the record came from.
    pub fn kind(&self) -> TransactionKind {
        self.detail.kind()
    }

    /// Returns the receipt payment type, if any.
    pub fn payment_type(&self) -> Option<&str> {
        match &self.detail {
            TransactionDetail::Receipt(receipt) => receipt.payment_type.as_deref(),
            _ => None,
        }
    }

    /// Returns the receipt id for receipts.
    pub fn receipt_id(&self) -> Option<&str> {
        match &self.detail {
            TransactionDetail::Receipt(receipt) => Some(receipt.receipt_id.as_str()),
            _ => None,
        }
    }

    /// Returns the ticket reference carried by any variant, as text.
    pub fn ticket_ref(&self) -> Option<String> {
        match &self.detail {
            TransactionDetail::Receipt(r) => r.ticket_id.map(|id| id.to_string()),
            TransactionDetail::Drawer(d) => d.ticket_id.clone(),
            TransactionDetail::Removed(r) => r.ticket_id.clone(),
        }
    }
}

/// Variant-specific payload of a [`TransactionRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "transaction_type", rename_all = "lowercase")]
pub enum TransactionDetail {
    Receipt(ReceiptDetail),
    Drawer(DrawerDetail),
    Removed(RemovedDetail),
}

impl TransactionDetail {
    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionDetail::Receipt(_) => TransactionKind::Receipt,
            TransactionDetail::Drawer(_) => TransactionKind::Drawer,
            TransactionDetail::Removed(_) => TransactionKind::Removed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptDetail {
    pub receipt_id: String,
    pub ticket_id: Option<i64>,
    pub customer: Option<String>,
    /// First payment's type (`cash`, `magcard`, `free`, `debt`, ...).
    pub payment_type: Option<String>,
    pub lines: Vec<ReceiptLine>,
    pub line_count: usize,
}

/// A ticket line as shown in the day review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub line: i64,
    pub product: String,
    pub product_code: String,
    pub units: f64,
    pub price: f64,
    /// Tax rate as a fraction (0.23 = 23%).
    pub tax_rate: f64,
    /// `price × units × (1 + tax_rate)`, rounded to the cent.
    pub total: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawerDetail {
    /// Label recorded by the POS, e.g. `"No Sale"`.
    pub action: String,
    pub ticket_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedDetail {
    pub product_name: String,
    pub product_id: Option<String>,
    pub units: f64,
    pub ticket_id: Option<String>,
}

// =============================================================================
// Daily Summary
// =============================================================================

/// Count and value of receipts falling into one breakdown key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SummaryBucket {
    pub count: i64,
    pub total: Money,
}

impl SummaryBucket {
    pub fn record(&mut self, amount: Money) {
        self.count += 1;
        self.total += amount;
    }
}

/// Per-day totals derived from the cached transaction set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailySummary {
    #[ts(as = "String")]
    pub summary_date: NaiveDate,
    pub total_sales: Money,
    /// Number of receipts. Compared against the live cache to detect staleness.
    pub total_transactions: i64,
    pub cash_total: Money,
    pub card_total: Money,
    pub free_total: Money,
    pub debt_total: Money,
    pub other_total: Money,
    pub drawer_opens: i64,
    pub no_sales: i64,
    pub voided_items_count: i64,
    /// Keyed by two-digit local hour (`"09"`).
    pub hourly_breakdown: BTreeMap<String, SummaryBucket>,
    pub terminal_breakdown: BTreeMap<String, SummaryBucket>,
    pub cashier_breakdown: BTreeMap<String, SummaryBucket>,
}

impl DailySummary {
    /// An all-zero summary for `date`.
    pub fn empty(date: NaiveDate) -> Self {
        DailySummary {
            summary_date: date,
            total_sales: Money::zero(),
            total_transactions: 0,
            cash_total: Money::zero(),
            card_total: Money::zero(),
            free_total: Money::zero(),
            debt_total: Money::zero(),
            other_total: Money::zero(),
            drawer_opens: 0,
            no_sales: 0,
            voided_items_count: 0,
            hourly_breakdown: BTreeMap::new(),
            terminal_breakdown: BTreeMap::new(),
            cashier_breakdown: BTreeMap::new(),
        }
    }
}

// =============================================================================
// Reconciliation
// =============================================================================

/// Non-cash tenders and adjustments entered alongside the count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderAmounts {
    pub card: Money,
    pub cash_back: Money,
    pub cheque: Money,
    pub debt: Money,
    pub debt_paid_cash: Money,
    pub debt_paid_cheque: Money,
    pub debt_paid_card: Money,
    pub free: Money,
    pub voucher_used: Money,
    pub money_added: Money,
}

/// One till's end-of-day cash reconciliation.
///
/// Exactly one exists per closing session (`closed_cash_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub id: String,
    /// POS closing-session id this reconciliation belongs to.
    pub closed_cash_id: String,
    pub till_id: i64,
    pub till_name: String,
    pub date: NaiveDate,
    pub counts: DenominationCounts,
    pub note_float: Money,
    pub coin_float: Money,
    pub tenders: TenderAmounts,
    pub total_cash_counted: Money,
    pub pos_cash_total: Money,
    pub pos_card_total: Money,
    pub variance: Money,
    pub created_by: i64,
    pub created_by_name: String,
    pub updated_by: Option<i64>,
    pub updated_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A payout from the till to a supplier or named payee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationPayment {
    pub id: String,
    pub reconciliation_id: String,
    pub supplier_id: Option<i64>,
    pub payee_name: Option<String>,
    pub amount: Money,
    pub description: Option<String>,
    /// Position in the operator's input (or the legacy sequence number).
    pub sequence: i64,
    pub created_at: DateTime<Utc>,
}

impl ReconciliationPayment {
    /// Name shown for this payee: the supplier's name when known, then the
    /// free-text payee, then `"Unknown"`.
    pub fn payee_display_name(&self, supplier_names: &BTreeMap<i64, String>) -> String {
        self.supplier_id
            .and_then(|id| supplier_names.get(&id).cloned())
            .or_else(|| self.payee_name.clone().filter(|name| !name.trim().is_empty()))
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// An append-only note on a reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationNote {
    pub id: String,
    pub reconciliation_id: String,
    pub message: String,
    pub created_by: i64,
    pub created_by_name: String,
    pub created_at: DateTime<Utc>,
}

/// A reconciliation with its payments and most recent note loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationDetail {
    pub reconciliation: Reconciliation,
    pub payments: Vec<ReconciliationPayment>,
    pub latest_note: Option<ReconciliationNote>,
}

/// Operator-entered values for a save. Omitted numbers count as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationInput {
    #[serde(default)]
    pub cash_50: Option<i64>,
    #[serde(default)]
    pub cash_20: Option<i64>,
    #[serde(default)]
    pub cash_10: Option<i64>,
    #[serde(default)]
    pub cash_5: Option<i64>,
    #[serde(default)]
    pub cash_2: Option<i64>,
    #[serde(default)]
    pub cash_1: Option<i64>,
    #[serde(default)]
    pub cash_50c: Option<i64>,
    #[serde(default)]
    pub cash_20c: Option<i64>,
    #[serde(default)]
    pub cash_10c: Option<i64>,
    #[serde(default)]
    pub note_float: Option<Money>,
    #[serde(default)]
    pub coin_float: Option<Money>,
    #[serde(default)]
    pub card: Option<Money>,
    #[serde(default)]
    pub cash_back: Option<Money>,
    #[serde(default)]
    pub cheque: Option<Money>,
    #[serde(default)]
    pub debt: Option<Money>,
    #[serde(default)]
    pub debt_paid_cash: Option<Money>,
    #[serde(default)]
    pub debt_paid_cheque: Option<Money>,
    #[serde(default)]
    pub debt_paid_card: Option<Money>,
    #[serde(default)]
    pub free: Option<Money>,
    #[serde(default)]
    pub voucher_used: Option<Money>,
    #[serde(default)]
    pub money_added: Option<Money>,
    /// `None` leaves stored payments alone; `Some` replaces them all.
    #[serde(default)]
    pub payments: Option<Vec<PaymentInput>>,
    /// Appended as a new note when non-blank.
    #[serde(default)]
    pub notes: Option<String>,
}

impl ReconciliationInput {
    /// Denomination counts with omitted entries as zero.
    pub fn counts(&self) -> DenominationCounts {
        DenominationCounts {
            cash_50: self.cash_50.unwrap_or(0),
            cash_20: self.cash_20.unwrap_or(0),
            cash_10: self.cash_10.unwrap_or(0),
            cash_5: self.cash_5.unwrap_or(0),
            cash_2: self.cash_2.unwrap_or(0),
            cash_1: self.cash_1.unwrap_or(0),
            cash_50c: self.cash_50c.unwrap_or(0),
            cash_20c: self.cash_20c.unwrap_or(0),
            cash_10c: self.cash_10c.unwrap_or(0),
        }
    }

    /// Tender amounts with omitted entries as zero.
    pub fn tenders(&self) -> TenderAmounts {
        let or_zero = |m: Option<Money>| m.unwrap_or_default();
        TenderAmounts {
            card: or_zero(self.card),
            cash_back: or_zero(self.cash_back),
            cheque: or_zero(self.cheque),
            debt: or_zero(self.debt),
            debt_paid_cash: or_zero(self.debt_paid_cash),
            debt_paid_cheque: or_zero(self.debt_paid_cheque),
            debt_paid_card: or_zero(self.debt_paid_card),
            free: or_zero(self.free),
            voucher_used: or_zero(self.voucher_used),
            money_added: or_zero(self.money_added),
        }
    }

    /// Trimmed note text, if there is any.
    pub fn note_text(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// One payout line as entered by the operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentInput {
    #[serde(default)]
    pub supplier_id: Option<i64>,
    #[serde(default)]
    pub payee_name: Option<String>,
    #[serde(default)]
    pub amount: Option<Money>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A payment row ready to persist, after zero-amount entries are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub supplier_id: Option<i64>,
    pub payee_name: Option<String>,
    pub amount: Money,
    pub description: Option<String>,
    pub sequence: i64,
}

/// Flat row for the reconciliation export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReconciliationExportRow {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub till: String,
    pub total_cash_counted: Money,
    pub pos_cash_total: Money,
    pub variance: Money,
    pub card: Money,
    pub notes: String,
    /// `"<payee>: €<amount>"` entries joined by `"; "`.
    pub payments: String,
    pub created_by: String,
}
