//! # Transaction Normalizer
//!
//! Maps the three POS event streams into one [`TransactionRecord`] shape and
//! merges them into a single time-ordered day.
//!
//! ```text
//!   receipts ───► normalize_receipt ──────┐
//!   removed  ───► normalize_removed_line ─┼──► stable sort by occurred_at
//!   drawer   ───► normalize_drawer_event ─┘
//! ```
//!
//! Ties keep stream order (receipts, then removed lines, then drawer events)
//! because the sort is stable.

use crate::money::Money;
use crate::pos::{PosDrawerEvent, PosReceipt, PosRemovedLine, PosTicketLine};
use crate::types::{
    DrawerDetail, ReceiptDetail, ReceiptLine, RemovedDetail, TransactionDetail, TransactionRecord,
};

/// Product label used when a ticket line's product row is gone.
pub const UNKNOWN_PRODUCT: &str = "Unknown";

/// Normalizes a receipt. The headline amount and payment type come from the
/// first payment; a receipt without payments is worth zero.
pub fn normalize_receipt(receipt: &PosReceipt) -> TransactionRecord {
    let first_payment = receipt.payments.first();
    let ticket = receipt.ticket.as_ref();

    let lines: Vec<ReceiptLine> = ticket
        .map(|t| t.lines.iter().map(normalize_line).collect())
        .unwrap_or_default();

    TransactionRecord {
        occurred_at: receipt.issued_at,
        terminal: receipt.host.clone(),
        cashier: ticket.and_then(|t| t.cashier.clone()),
        amount: first_payment.map(|p| p.total).unwrap_or_default(),
        detail: TransactionDetail::Receipt(ReceiptDetail {
            receipt_id: receipt.receipt_id.clone(),
            ticket_id: ticket.map(|t| t.ticket_id),
            customer: ticket.and_then(|t| t.customer.clone()),
            payment_type: first_payment.map(|p| p.payment.clone()),
            line_count: lines.len(),
            lines,
        }),
    }
}

fn normalize_line(line: &PosTicketLine) -> ReceiptLine {
    let tax_rate = line.tax_rate.unwrap_or(0.0);
    ReceiptLine {
        line: line.line,
        product: line
            .product_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
        product_code: line.product_code.clone().unwrap_or_default(),
        units: line.units,
        price: line.price,
        tax_rate,
        total: Money::from_decimal(line.price * line.units * (1.0 + tax_rate)),
    }
}

/// Normalizes a drawer opening. Drawer events carry no till or cashier.
pub fn normalize_drawer_event(event: &PosDrawerEvent) -> TransactionRecord {
    TransactionRecord {
        occurred_at: event.opened_at,
        terminal: None,
        cashier: None,
        amount: Money::zero(),
        detail: TransactionDetail::Drawer(DrawerDetail {
            action: event.name.clone().unwrap_or_default(),
            ticket_id: event.ticket_id.clone(),
        }),
    }
}

/// Normalizes a removed ticket line.
pub fn normalize_removed_line(removed: &PosRemovedLine) -> TransactionRecord {
    TransactionRecord {
        occurred_at: removed.removed_at,
        terminal: None,
        cashier: None,
        amount: Money::zero(),
        detail: TransactionDetail::Removed(RemovedDetail {
            product_name: removed
                .product_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            product_id: removed.product_id.clone(),
            units: removed.units,
            ticket_id: removed.ticket_id.clone(),
        }),
    }
}

/// Builds a day's ordered transaction list from the three source streams.
pub fn assemble_day(
    receipts: &[PosReceipt],
    removed: &[PosRemovedLine],
    drawer: &[PosDrawerEvent],
) -> Vec<TransactionRecord> {
    let mut records: Vec<TransactionRecord> =
        Vec::with_capacity(receipts.len() + removed.len() + drawer.len());
    records.extend(receipts.iter().map(normalize_receipt));
    records.extend(removed.iter().map(normalize_removed_line));
    records.extend(drawer.iter().map(normalize_drawer_event));

    // Vec::sort_by_key is stable
    records.sort_by_key(|r| r.occurred_at);
    records
}
