//! # In-Memory POS Gateway
//!
//! A [`PosGateway`] over rows held in memory. Used for fixtures, demos and
//! every engine test. Rows can be added while the engine is running, so a
//! test can change "what the POS says" between two calls.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::RwLock;

use super::{GatewayError, GatewayResult, PosGateway};
use tally_core::clock::{local_date, Tz};
use tally_core::pos::{
    ClosingSession, LegacyDayNote, LegacyMoneyRecord, LegacyPayeePayment, PaymentTypeTotal,
    PosDrawerEvent, PosReceipt, PosRemovedLine,
};
use tally_core::Money;

#[derive(Debug, Default)]
struct PosData {
    sessions: Vec<ClosingSession>,
    receipts: Vec<PosReceipt>,
    drawer_events: Vec<PosDrawerEvent>,
    removed_lines: Vec<PosRemovedLine>,
    legacy_money: HashMap<String, LegacyMoneyRecord>,
    legacy_payments: HashMap<String, Vec<LegacyPayeePayment>>,
    legacy_notes: HashMap<String, LegacyDayNote>,
    unavailable: bool,
}

/// POS gateway backed by in-memory rows.
#[derive(Debug)]
pub struct InMemoryPosGateway {
    /// Zone used to decide which business date an instant belongs to.
    tz: Tz,
    data: RwLock<PosData>,
}

impl InMemoryPosGateway {
    pub fn new(tz: Tz) -> Self {
        InMemoryPosGateway {
            tz,
            data: RwLock::new(PosData::default()),
        }
    }

    pub async fn add_session(&self, session: ClosingSession) {
        self.data.write().await.sessions.push(session);
    }

    pub async fn add_receipt(&self, receipt: PosReceipt) {
        self.data.write().await.receipts.push(receipt);
    }

    pub async fn add_drawer_event(&self, event: PosDrawerEvent) {
        self.data.write().await.drawer_events.push(event);
    }

    pub async fn add_removed_line(&self, line: PosRemovedLine) {
        self.data.write().await.removed_lines.push(line);
    }

    pub async fn set_legacy_money(&self, record: LegacyMoneyRecord) {
        self.data
            .write()
            .await
            .legacy_money
            .insert(record.money_id.clone(), record);
    }

    pub async fn add_legacy_payment(&self, money_id: &str, payment: LegacyPayeePayment) {
        self.data
            .write()
            .await
            .legacy_payments
            .entry(money_id.to_string())
            .or_default()
            .push(payment);
    }

    pub async fn set_legacy_note(&self, money_id: &str, note: LegacyDayNote) {
        self.data
            .write()
            .await
            .legacy_notes
            .insert(money_id.to_string(), note);
    }

    /// While set, every call fails with [`GatewayError::Unavailable`].
    pub async fn set_unavailable(&self, unavailable: bool) {
        self.data.write().await.unavailable = unavailable;
    }

    async fn read(&self) -> GatewayResult<tokio::sync::RwLockReadGuard<'_, PosData>> {
        let data = self.data.read().await;
        if data.unavailable {
            return Err(GatewayError::Unavailable("in-memory POS switched off".into()));
        }
        Ok(data)
    }
}

#[async_trait]
impl PosGateway for InMemoryPosGateway {
    async fn closing_session(
        &self,
        host: &str,
        date: NaiveDate,
    ) -> GatewayResult<Option<ClosingSession>> {
        let data = self.read().await?;
        Ok(data
            .sessions
            .iter()
            .find(|s| {
                s.host == host
                    && s.date_end
                        .is_some_and(|end| local_date(end, self.tz) == date)
            })
            .cloned())
    }

    async fn receipts_for_date(&self, date: NaiveDate) -> GatewayResult<Vec<PosReceipt>> {
        let data = self.read().await?;
        Ok(data
            .receipts
            .iter()
            .filter(|r| local_date(r.issued_at, self.tz) == date)
            .cloned()
            .collect())
    }

    async fn receipt_count_for_date(&self, date: NaiveDate) -> GatewayResult<i64> {
        let data = self.read().await?;
        Ok(data
            .receipts
            .iter()
            .filter(|r| local_date(r.issued_at, self.tz) == date)
            .count() as i64)
    }

    async fn drawer_events_for_date(&self, date: NaiveDate) -> GatewayResult<Vec<PosDrawerEvent>> {
        let data = self.read().await?;
        Ok(data
            .drawer_events
            .iter()
            .filter(|e| local_date(e.opened_at, self.tz) == date)
            .cloned()
            .collect())
    }

    async fn removed_lines_for_date(&self, date: NaiveDate) -> GatewayResult<Vec<PosRemovedLine>> {
        let data = self.read().await?;
        Ok(data
            .removed_lines
            .iter()
            .filter(|l| local_date(l.removed_at, self.tz) == date)
            .cloned()
            .collect())
    }

    async fn payment_totals(&self, money_id: &str) -> GatewayResult<Vec<PaymentTypeTotal>> {
        let data = self.read().await?;

        let mut totals: BTreeMap<&str, Money> = BTreeMap::new();
        for receipt in data
            .receipts
            .iter()
            .filter(|r| r.money_id.as_deref() == Some(money_id))
        {
            for payment in &receipt.payments {
                *totals.entry(payment.payment.as_str()).or_default() += payment.total;
            }
        }

        Ok(totals
            .into_iter()
            .map(|(payment, total)| PaymentTypeTotal {
                payment: payment.to_string(),
                total,
            })
            .collect())
    }

    async fn legacy_money(&self, money_id: &str) -> GatewayResult<Option<LegacyMoneyRecord>> {
        Ok(self.read().await?.legacy_money.get(money_id).cloned())
    }

    async fn legacy_payee_payments(
        &self,
        money_id: &str,
    ) -> GatewayResult<Vec<LegacyPayeePayment>> {
        let mut payments = self
            .read()
            .await?
            .legacy_payments
            .get(money_id)
            .cloned()
            .unwrap_or_default();
        payments.sort_by_key(|p| p.sequence);
        Ok(payments)
    }

    async fn legacy_day_note(&self, money_id: &str) -> GatewayResult<Option<LegacyDayNote>> {
        Ok(self.read().await?.legacy_notes.get(money_id).cloned())
    }

    async fn terminals(&self) -> GatewayResult<Vec<String>> {
        let data = self.read().await?;
        let hosts: BTreeSet<&str> = data.sessions.iter().map(|s| s.host.as_str()).collect();
        Ok(hosts.into_iter().map(str::to_string).collect())
    }

    async fn cashiers(&self) -> GatewayResult<Vec<String>> {
        let data = self.read().await?;
        let names: BTreeSet<&str> = data
            .receipts
            .iter()
            .filter_map(|r| r.ticket.as_ref()?.cashier.as_deref())
            .filter(|name| !name.trim().is_empty())
            .collect();
        Ok(names.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tally_core::clock::{parse_time_zone, utc};
    use tally_core::pos::{PosPayment, PosTicket};

    fn receipt(id: &str, money_id: &str, payments: &[(&str, i64)]) -> PosReceipt {
        PosReceipt {
            receipt_id: id.to_string(),
            issued_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            money_id: Some(money_id.to_string()),
            host: Some("TILL-1".to_string()),
            ticket: Some(PosTicket {
                ticket_id: 1,
                cashier: Some("Aoife".to_string()),
                customer: None,
                lines: vec![],
            }),
            payments: payments
                .iter()
                .map(|(payment, cents)| PosPayment {
                    payment: payment.to_string(),
                    total: Money::from_cents(*cents),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_payment_totals_group_by_type() {
        let pos = InMemoryPosGateway::new(utc());
        pos.add_receipt(receipt("r-1", "m-1", &[("cash", 1_000)])).await;
        pos.add_receipt(receipt("r-2", "m-1", &[("cash", 500), ("magcard", 2_000)])).await;
        pos.add_receipt(receipt("r-3", "m-2", &[("cash", 9_999)])).await;

        let totals = pos.payment_totals("m-1").await.unwrap();
        assert_eq!(
            totals,
            vec![
                PaymentTypeTotal { payment: "cash".into(), total: Money::from_cents(1_500) },
                PaymentTypeTotal { payment: "magcard".into(), total: Money::from_cents(2_000) },
            ]
        );
    }

    #[tokio::test]
    async fn test_closing_session_matches_end_date() {
        let pos = InMemoryPosGateway::new(utc());
        pos.add_session(ClosingSession {
            money_id: "m-1".into(),
            host: "TILL-1".into(),
            date_start: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            date_end: Some(Utc.with_ymd_and_hms(2024, 3, 1, 22, 0, 0).unwrap()),
        })
        .await;

        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(pos.closing_session("TILL-1", day).await.unwrap().is_some());
        assert!(pos.closing_session("TILL-2", day).await.unwrap().is_none());
        assert!(pos
            .closing_session("TILL-1", day.succ_opt().unwrap())
            .await
            .unwrap()
            .is_none());
        assert_eq!(pos.terminals().await.unwrap(), vec!["TILL-1"]);
    }

    #[tokio::test]
    async fn test_business_date_follows_time_zone() {
        let pos = InMemoryPosGateway::new(parse_time_zone("Europe/Dublin").unwrap());
        let mut late = receipt("r-late", "m-1", &[("cash", 1_000)]);
        // 00:30 on 2 July in Dublin
        late.issued_at = Utc.with_ymd_and_hms(2024, 7, 1, 23, 30, 0).unwrap();
        pos.add_receipt(late).await;

        let july_1 = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let july_2 = NaiveDate::from_ymd_opt(2024, 7, 2).unwrap();
        assert!(pos.receipts_for_date(july_1).await.unwrap().is_empty());
        assert_eq!(pos.receipt_count_for_date(july_2).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_fails_every_call() {
        let pos = InMemoryPosGateway::new(utc());
        pos.set_unavailable(true).await;
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert!(matches!(
            pos.receipts_for_date(day).await,
            Err(GatewayError::Unavailable(_))
        ));
        pos.set_unavailable(false).await;
        assert!(pos.receipts_for_date(day).await.unwrap().is_empty());
    }
}
