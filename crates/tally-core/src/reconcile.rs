//! # Reconciliation Math
//!
//! Pure calculations behind a till's cash-up.
//!
//! ## Variance
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  days_cash_takings = total_cash_counted                                 │
//! │                    + cash_back                                          │
//! │                    − (prior note_float + prior coin_float)              │
//! │                    − money_added                                        │
//! │                                                                         │
//! │  variance          = days_cash_takings − pos_cash_total                 │
//! │                                                                         │
//! │  > 0  till is over        < 0  till is short                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The float subtracted is always the one left in the till by the most recent
//! earlier reconciliation, never the float stored on the record being
//! computed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::denomination::DenominationCounts;
use crate::money::Money;
use crate::pos::PaymentTypeTotal;
use crate::types::{NewPayment, PaymentInput, TenderAmounts};

// =============================================================================
// Prior Float
// =============================================================================

/// Float carried over from the previous reconciliation of the same till.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorFloat {
    pub note_float: Money,
    pub coin_float: Money,
    /// Date of the reconciliation it came from; `None` when there was none.
    pub from_date: Option<NaiveDate>,
}

impl PriorFloat {
    /// No earlier reconciliation: the till started empty.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn total(&self) -> Money {
        self.note_float + self.coin_float
    }
}

// =============================================================================
// POS Totals
// =============================================================================

/// What the POS recorded per tender for a closing session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosTotals {
    pub cash: Money,
    pub card: Money,
    pub debt: Money,
    pub free: Money,
    pub cheque: Money,
}

impl PosTotals {
    /// Folds per-payment-type sums. Unrecognised types are ignored.
    pub fn from_payment_totals(totals: &[PaymentTypeTotal]) -> Self {
        let mut pos = PosTotals::default();
        for total in totals {
            let slot = match total.payment.as_str() {
                "cash" => &mut pos.cash,
                "magcard" => &mut pos.card,
                "debt" => &mut pos.debt,
                "free" => &mut pos.free,
                "cheque" => &mut pos.cheque,
                _ => continue,
            };
            *slot += total.total;
        }
        pos
    }
}

// =============================================================================
// Figures
// =============================================================================

/// Computes the variance from its components.
pub fn variance(
    total_cash_counted: Money,
    cash_back: Money,
    prior: &PriorFloat,
    money_added: Money,
    pos_cash_total: Money,
) -> Money {
    let days_cash_takings = total_cash_counted + cash_back - prior.total() - money_added;
    days_cash_takings - pos_cash_total
}

/// The two derived figures stored on a reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashFigures {
    pub total_cash_counted: Money,
    pub variance: Money,
}

/// Derives `total_cash_counted` and `variance` from a count sheet.
pub fn cash_figures(
    counts: &DenominationCounts,
    tenders: &TenderAmounts,
    prior: &PriorFloat,
    pos_cash_total: Money,
) -> CashFigures {
    let total_cash_counted = counts.total();
    CashFigures {
        total_cash_counted,
        variance: variance(
            total_cash_counted,
            tenders.cash_back,
            prior,
            tenders.money_added,
            pos_cash_total,
        ),
    }
}

/// Turns operator payment input into rows to store.
///
/// Entries with no or zero amount are dropped. Kept entries retain their
/// input position as `sequence`, so gaps are expected.
pub fn payments_to_persist(inputs: &[PaymentInput]) -> Vec<NewPayment> {
    inputs
        .iter()
        .enumerate()
        .filter_map(|(index, input)| {
            let amount = input.amount.filter(|a| !a.is_zero())?;
            Some(NewPayment {
                supplier_id: input.supplier_id,
                payee_name: input.payee_name.clone(),
                amount,
                description: input.description.clone(),
                sequence: index as i64,
            })
        })
        .collect()
}
