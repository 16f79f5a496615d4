//! # Daily Summary Aggregation
//!
//! Single pass over a day's transactions.
//!
//! ```text
//! receipt ─► total_sales, total_transactions
//!          ├► one channel bucket  (cash | magcard | free | debt | other)
//!          ├► hourly bucket       ("HH" in the till's local time)
//!          ├► terminal bucket     (skipped when no terminal)
//!          └► cashier bucket      (skipped when no cashier)
//! drawer  ─► drawer_opens (+ no_sales when the action is "No Sale")
//! removed ─► voided_items_count
//! ```

use chrono::NaiveDate;

use crate::clock::Tz;
use crate::money::Money;
use crate::types::{DailySummary, TransactionDetail, TransactionRecord};

/// Drawer action label the POS records for a no-sale opening.
pub const NO_SALE_ACTION: &str = "No Sale";

/// Which summary total a receipt's payment type feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentChannel {
    Cash,
    Card,
    Free,
    Debt,
    Other,
}

impl PaymentChannel {
    pub fn from_payment_type(payment_type: Option<&str>) -> Self {
        match payment_type {
            Some("cash") => PaymentChannel::Cash,
            Some("magcard") => PaymentChannel::Card,
            Some("free") => PaymentChannel::Free,
            Some("debt") => PaymentChannel::Debt,
            _ => PaymentChannel::Other,
        }
    }
}

/// Builds the summary for `date` from its transactions.
pub fn aggregate(
    date: NaiveDate,
    records: &[TransactionRecord],
    tz: Tz,
) -> DailySummary {
    let mut summary = DailySummary::empty(date);

    for record in records {
        match &record.detail {
            TransactionDetail::Receipt(receipt) => {
                let amount = record.amount;
                summary.total_transactions += 1;
                summary.total_sales += amount;
                *channel_total(&mut summary, receipt.payment_type.as_deref()) += amount;

                let hour = record
                    .occurred_at
                    .with_timezone(&tz)
                    .format("%H")
                    .to_string();
                summary.hourly_breakdown.entry(hour).or_default().record(amount);

                if let Some(terminal) = non_empty(record.terminal.as_deref()) {
                    summary
                        .terminal_breakdown
                        .entry(terminal.to_string())
                        .or_default()
                        .record(amount);
                }
                if let Some(cashier) = non_empty(record.cashier.as_deref()) {
                    summary
                        .cashier_breakdown
                        .entry(cashier.to_string())
                        .or_default()
                        .record(amount);
                }
            }
            TransactionDetail::Drawer(drawer) => {
                summary.drawer_opens += 1;
                if drawer.action == NO_SALE_ACTION {
                    summary.no_sales += 1;
                }
            }
            TransactionDetail::Removed(_) => {
                summary.voided_items_count += 1;
            }
        }
    }

    summary
}

fn channel_total<'a>(summary: &'a mut DailySummary, payment_type: Option<&str>) -> &'a mut Money {
    match PaymentChannel::from_payment_type(payment_type) {
        PaymentChannel::Cash => &mut summary.cash_total,
        PaymentChannel::Card => &mut summary.card_total,
        PaymentChannel::Free => &mut summary.free_total,
        PaymentChannel::Debt => &mut summary.debt_total,
        PaymentChannel::Other => &mut summary.other_total,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{parse_time_zone, utc};
    use crate::types::{DrawerDetail, ReceiptDetail, RemovedDetail};
    use chrono::{TimeZone, Utc};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn receipt(h: u32, cents: i64, payment: Option<&str>, terminal: Option<&str>) -> TransactionRecord {
        TransactionRecord {
            occurred_at: Utc.with_ymd_and_hms(2024, 3, 1, h, 10, 0).unwrap(),
            terminal: terminal.map(str::to_string),
            cashier: Some("Aoife".to_string()),
            amount: Money::from_cents(cents),
            detail: TransactionDetail::Receipt(ReceiptDetail {
                receipt_id: format!("r-{h}-{cents}"),
                ticket_id: None,
                customer: None,
                payment_type: payment.map(str::to_string),
                lines: vec![],
                line_count: 0,
            }),
        }
    }

    fn drawer(action: &str) -> TransactionRecord {
        TransactionRecord {
            occurred_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            terminal: None,
            cashier: None,
            amount: Money::zero(),
            detail: TransactionDetail::Drawer(DrawerDetail {
                action: action.to_string(),
                ticket_id: None,
            }),
        }
    }

    fn removed() -> TransactionRecord {
        TransactionRecord {
            occurred_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 5, 0).unwrap(),
            terminal: None,
            cashier: None,
            amount: Money::zero(),
            detail: TransactionDetail::Removed(RemovedDetail {
                product_name: "Latte".to_string(),
                product_id: None,
                units: 1.0,
                ticket_id: None,
            }),
        }
    }

    #[test]
    fn test_channels_and_totals() {
        let records = vec![
            receipt(9, 1000, Some("cash"), Some("TILL-1")),
            receipt(9, 250, Some("magcard"), Some("TILL-1")),
            receipt(10, 300, Some("free"), Some("TILL-2")),
            receipt(10, 400, Some("debt"), None),
            receipt(11, 50, Some("voucher"), Some("")),
            receipt(11, 70, None, None),
        ];
        let summary = aggregate(date(), &records, utc());

        assert_eq!(summary.total_transactions, 6);
        assert_eq!(summary.total_sales.cents(), 2070);
        assert_eq!(summary.cash_total.cents(), 1000);
        assert_eq!(summary.card_total.cents(), 250);
        assert_eq!(summary.free_total.cents(), 300);
        assert_eq!(summary.debt_total.cents(), 400);
        assert_eq!(summary.other_total.cents(), 120);

        assert_eq!(summary.terminal_breakdown.len(), 2);
        assert_eq!(summary.terminal_breakdown["TILL-1"].count, 2);
        assert_eq!(summary.terminal_breakdown["TILL-1"].total.cents(), 1250);
        assert_eq!(summary.cashier_breakdown["Aoife"].count, 6);
        assert_eq!(summary.hourly_breakdown["09"].count, 2);
        assert_eq!(summary.hourly_breakdown["11"].total.cents(), 120);
    }

    #[test]
    fn test_hour_buckets_follow_daylight_saving() {
        let dublin = parse_time_zone("Europe/Dublin").unwrap();

        let mut summer = receipt(8, 100, Some("cash"), None);
        summer.occurred_at = Utc.with_ymd_and_hms(2024, 7, 1, 8, 30, 0).unwrap();
        let july = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let summary = aggregate(july, &[summer], dublin);
        assert_eq!(summary.hourly_breakdown.keys().collect::<Vec<_>>(), vec!["09"]);

        let mut winter = receipt(9, 100, Some("cash"), None);
        winter.occurred_at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        let january = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let summary = aggregate(january, &[winter], dublin);
        assert_eq!(summary.hourly_breakdown.keys().collect::<Vec<_>>(), vec!["09"]);
    }

    #[test]
    fn test_drawer_and_removed_counters() {
        let records = vec![drawer("No Sale"), drawer("Float"), drawer("No Sale"), removed()];
        let summary = aggregate(date(), &records, utc());
        assert_eq!(summary.drawer_opens, 3);
        assert_eq!(summary.no_sales, 2);
        assert_eq!(summary.voided_items_count, 1);
        assert_eq!(summary.total_transactions, 0);
        assert!(summary.total_sales.is_zero());
    }

    #[test]
    fn test_empty_day() {
        let summary = aggregate(date(), &[], utc());
        assert_eq!(summary, DailySummary::empty(date()));
    }
}
