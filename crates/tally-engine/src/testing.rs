//! Shared fixtures for engine tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::Arc;

use crate::gateway::InMemoryPosGateway;
use tally_core::clock::utc;
use tally_core::pos::{
    ClosingSession, PosDrawerEvent, PosPayment, PosReceipt, PosRemovedLine, PosTicket,
};
use tally_core::Money;
use tally_db::{Database, DbConfig};

pub fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

pub fn at(date: NaiveDate, h: u32, m: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(h, m, 0).unwrap())
}

pub async fn setup() -> (Arc<InMemoryPosGateway>, Database) {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    (Arc::new(InMemoryPosGateway::new(utc())), db)
}

pub fn money_id(till: &str, date: NaiveDate) -> String {
    format!("{till}-{date}")
}

pub async fn add_session(pos: &InMemoryPosGateway, till: &str, date: NaiveDate) -> String {
    let id = money_id(till, date);
    pos.add_session(ClosingSession {
        money_id: id.clone(),
        host: till.to_string(),
        date_start: at(date, 8, 0),
        date_end: Some(at(date, 22, 0)),
    })
    .await;
    id
}

pub fn receipt(
    id: &str,
    issued_at: DateTime<Utc>,
    till: &str,
    money_id: &str,
    cashier: &str,
    payment: &str,
    cents: i64,
) -> PosReceipt {
    PosReceipt {
        receipt_id: id.to_string(),
        issued_at,
        money_id: Some(money_id.to_string()),
        host: Some(till.to_string()),
        ticket: Some(PosTicket {
            ticket_id: 100,
            cashier: Some(cashier.to_string()),
            customer: None,
            lines: vec![],
        }),
        payments: vec![PosPayment {
            payment: payment.to_string(),
            total: Money::from_cents(cents),
        }],
    }
}

/// Two tills on [`day`]: three receipts, one removed line, two drawer openings.
pub async fn seed_day(pos: &InMemoryPosGateway) {
    let d = day();
    let m1 = add_session(pos, "TILL-1", d).await;
    let m2 = add_session(pos, "TILL-2", d).await;

    pos.add_receipt(receipt("r-1", at(d, 9, 0), "TILL-1", &m1, "Aoife", "cash", 1_000))
        .await;
    pos.add_receipt(receipt("r-2", at(d, 11, 30), "TILL-2", &m2, "Brian", "magcard", 2_500))
        .await;
    pos.add_receipt(receipt("r-3", at(d, 14, 0), "TILL-1", &m1, "Aoife", "cash", 550))
        .await;

    pos.add_removed_line(PosRemovedLine {
        removed_at: at(d, 10, 0),
        product_name: Some("Crisps".into()),
        product_id: Some("p-9".into()),
        units: 1.0,
        ticket_id: Some("100".into()),
    })
    .await;

    pos.add_drawer_event(PosDrawerEvent {
        opened_at: at(d, 9, 5),
        name: Some("No Sale".into()),
        ticket_id: None,
    })
    .await;
    pos.add_drawer_event(PosDrawerEvent {
        opened_at: at(d, 15, 0),
        name: Some("Sale".into()),
        ticket_id: Some("100".into()),
    })
    .await;
}
