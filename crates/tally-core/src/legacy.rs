//! # Legacy Import Converter
//!
//! The previous cash-up system stored the **value** counted per denomination
//! (e.g. `cash50 = 250.00`), not the number of notes. On first creation of a
//! reconciliation those values are turned back into counts.
//!
//! ```text
//!   cash50 = €250.00  ──► 250.00 / 50.00 = 5 notes
//!   cash20 = €130.00  ──► 130.00 / 20.00 = 6 notes, €10.00 drift
//! ```
//!
//! The conversion truncates. A value that is not a whole multiple of its face
//! value loses the remainder; the loss is reported as `drift` so callers can
//! log it. Division happens in cents, so €0.30 of 10c coins is 3 coins, not 2.

use crate::denomination::{Denomination, DenominationCounts};
use crate::money::Money;
use crate::pos::{LegacyMoneyRecord, LegacyPayeePayment};
use crate::types::{NewPayment, TenderAmounts};

/// Result of converting one legacy money row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyConversion {
    pub counts: DenominationCounts,
    pub tenders: TenderAmounts,
    /// Legacy floats; `None` means "fall back to the prior reconciliation".
    pub note_float: Option<Money>,
    pub coin_float: Option<Money>,
    /// Value lost to truncation, per denomination with a non-zero remainder.
    pub drift: Vec<(Denomination, Money)>,
}

impl LegacyConversion {
    pub fn total_drift(&self) -> Money {
        self.drift.iter().map(|(_, lost)| *lost).sum()
    }
}

/// Converts a legacy totals-only row into counts and tender amounts.
pub fn convert_money_record(record: &LegacyMoneyRecord) -> LegacyConversion {
    let mut counts = DenominationCounts::default();
    let mut drift = Vec::new();

    for denomination in Denomination::ALL {
        let stored = legacy_value(record, denomination).unwrap_or_default();
        let (count, remainder) = stored.split_into(denomination.face_value());
        counts.set(denomination, count);
        if !remainder.is_zero() {
            drift.push((denomination, remainder));
        }
    }

    let or_zero = |m: Option<Money>| m.unwrap_or_default();
    LegacyConversion {
        counts,
        tenders: TenderAmounts {
            card: or_zero(record.card),
            cash_back: or_zero(record.cash_back),
            cheque: or_zero(record.cheque),
            debt: or_zero(record.debt),
            debt_paid_cash: or_zero(record.debt_paid_cash),
            debt_paid_cheque: or_zero(record.debt_paid_cheque),
            debt_paid_card: or_zero(record.debt_paid_card),
            free: or_zero(record.free),
            voucher_used: or_zero(record.voucher_used),
            money_added: or_zero(record.money_added),
        },
        note_float: record.note_float,
        coin_float: record.coin_float,
        drift,
    }
}

fn legacy_value(record: &LegacyMoneyRecord, denomination: Denomination) -> Option<Money> {
    match denomination {
        Denomination::Fifty => record.cash_50,
        Denomination::Twenty => record.cash_20,
        Denomination::Ten => record.cash_10,
        Denomination::Five => record.cash_5,
        Denomination::Two => record.cash_2,
        Denomination::One => record.cash_1,
        Denomination::FiftyCent => record.cash_50c,
        Denomination::TwentyCent => record.cash_20c,
        Denomination::TenCent => record.cash_10c,
    }
}

/// Maps legacy supplier payouts to payment rows, keeping their sequence.
/// Missing amounts and sequences become zero.
pub fn convert_payee_payments(payments: &[LegacyPayeePayment]) -> Vec<NewPayment> {
    payments
        .iter()
        .map(|p| NewPayment {
            supplier_id: p.payee_id,
            payee_name: None,
            amount: p.amount.unwrap_or_default(),
            description: None,
            sequence: p.sequence.unwrap_or(0),
        })
        .collect()
}
