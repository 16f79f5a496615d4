//! # Reconciliation Service
//!
//! End-of-day cash reconciliation for one till.
//!
//! ## Creation Flow
//! ```text
//! get_or_create(date, till_id, till_name, actor)
//!   │
//!   ├─ 1. closing session for (till_name, date) ── none ──► ClosingSessionNotFound
//!   ├─ 2. reconciliation for that session exists? ── yes ──► return it as stored
//!   ├─ 3. POS totals per payment type for the session
//!   ├─ 4. prior float: latest reconciliation of this till before `date`
//!   ├─ 5. legacy money row?  counts from totals, tenders copied,
//!   │                        stored floats = legacy ?? prior
//!   ├─ 6. total counted + variance (variance always uses the prior float)
//!   └─ 7. insert + legacy payments + legacy note, one transaction
//!          lost the UNIQUE(session) race? ──► return the winner's row
//! ```
//!
//! ## Save Flow
//! Validate, overwrite every figure (omitted → 0), recompute the prior float,
//! total and variance, then in one transaction: update, replace payments if
//! given, append the note if non-blank.

use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::gateway::PosGateway;
use tally_core::legacy::{convert_money_record, convert_payee_payments};
use tally_core::reconcile::{cash_figures, payments_to_persist, PosTotals, PriorFloat};
use tally_core::validation::validate_reconciliation_input;
use tally_core::{
    Actor, ActorContext, DenominationCounts, NewPayment, Reconciliation, ReconciliationDetail,
    ReconciliationExportRow, ReconciliationInput, TenderAmounts, ValidationError,
};
use tally_db::{Database, DbError, NewNote};

#[derive(Clone)]
pub struct ReconciliationService {
    gateway: Arc<dyn PosGateway>,
    db: Database,
    /// Recorded as the author when a call carries no user.
    system_actor: Actor,
}

impl ReconciliationService {
    pub fn new(gateway: Arc<dyn PosGateway>, db: Database, system_actor: Actor) -> Self {
        ReconciliationService {
            gateway,
            db,
            system_actor,
        }
    }

    // =========================================================================
    // Create / Save
    // =========================================================================

    /// Returns the reconciliation for `till_name` on `date`, creating it on
    /// first access.
    ///
    /// ## Errors
    /// `ClosingSessionNotFound` when the till has no closed session that day.
    pub async fn get_or_create(
        &self,
        date: NaiveDate,
        till_id: i64,
        till_name: &str,
        ctx: &ActorContext,
    ) -> EngineResult<ReconciliationDetail> {
        let session = self
            .gateway
            .closing_session(till_name, date)
            .await?
            .ok_or_else(|| EngineError::ClosingSessionNotFound {
                till: till_name.to_string(),
                date,
            })?;

        let repo = self.db.reconciliations();
        if let Some(existing) = repo.find_by_session(&session.money_id).await? {
            debug!(id = %existing.id, closed_cash_id = %session.money_id, "Reconciliation exists");
            return Ok(repo.detail(existing).await?);
        }

        let totals = self.gateway.payment_totals(&session.money_id).await?;
        let pos = PosTotals::from_payment_totals(&totals);
        let prior = self.previous_float(date, till_id).await?;
        let legacy = self.gateway.legacy_money(&session.money_id).await?;

        let (counts, tenders, note_float, coin_float) = match &legacy {
            Some(record) => {
                let conversion = convert_money_record(record);
                if !conversion.drift.is_empty() {
                    warn!(
                        closed_cash_id = %session.money_id,
                        drift = %conversion.total_drift(),
                        denominations = conversion.drift.len(),
                        "Legacy totals were not whole multiples of their face value"
                    );
                }
                (
                    conversion.counts,
                    conversion.tenders,
                    conversion.note_float.unwrap_or(prior.note_float),
                    conversion.coin_float.unwrap_or(prior.coin_float),
                )
            }
            None => (
                DenominationCounts::default(),
                TenderAmounts::default(),
                prior.note_float,
                prior.coin_float,
            ),
        };

        let figures = cash_figures(&counts, &tenders, &prior, pos.cash);
        let actor = ctx.performed_by(&self.system_actor);
        let now = Utc::now();

        let rec = Reconciliation {
            id: Uuid::new_v4().to_string(),
            closed_cash_id: session.money_id.clone(),
            till_id,
            till_name: till_name.to_string(),
            date,
            counts,
            note_float,
            coin_float,
            tenders,
            total_cash_counted: figures.total_cash_counted,
            pos_cash_total: pos.cash,
            pos_card_total: pos.card,
            variance: figures.variance,
            created_by: actor.id,
            created_by_name: actor.name.clone(),
            updated_by: None,
            updated_by_name: None,
            created_at: now,
            updated_at: now,
        };

        let (payments, note) = match legacy {
            Some(_) => self.legacy_backfill(&session.money_id, &actor).await?,
            None => (Vec::new(), None),
        };

        match repo.create(&rec, &payments, note.as_ref()).await {
            Ok(()) => {
                info!(
                    id = %rec.id,
                    till = %till_name,
                    %date,
                    variance = %rec.variance,
                    imported_payments = payments.len(),
                    "Reconciliation created"
                );
                Ok(repo.detail(rec).await?)
            }
            Err(DbError::UniqueViolation { .. }) => {
                warn!(closed_cash_id = %session.money_id, "Reconciliation created concurrently, using existing");
                let existing = repo.find_by_session(&session.money_id).await?.ok_or_else(|| {
                    EngineError::ReconciliationNotFound(session.money_id.clone())
                })?;
                Ok(repo.detail(existing).await?)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn legacy_backfill(
        &self,
        money_id: &str,
        actor: &Actor,
    ) -> EngineResult<(Vec<NewPayment>, Option<NewNote>)> {
        let payments = convert_payee_payments(&self.gateway.legacy_payee_payments(money_id).await?);
        let note = self
            .gateway
            .legacy_day_note(money_id)
            .await?
            .map(|n| NewNote::new(n.message, actor.clone()));
        Ok((payments, note))
    }

    /// Overwrites a reconciliation with operator input.
    ///
    /// Omitted figures become zero. `payments: None` keeps the stored list;
    /// a supplied list replaces it, dropping zero amounts.
    pub async fn save(
        &self,
        id: &str,
        input: &ReconciliationInput,
        ctx: &ActorContext,
    ) -> EngineResult<ReconciliationDetail> {
        validate_reconciliation_input(input)?;

        let repo = self.db.reconciliations();
        let mut rec = repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| EngineError::ReconciliationNotFound(id.to_string()))?;

        let prior = self.previous_float(rec.date, rec.till_id).await?;

        rec.counts = input.counts();
        rec.tenders = input.tenders();
        rec.note_float = input.note_float.unwrap_or_default();
        rec.coin_float = input.coin_float.unwrap_or_default();

        let figures = cash_figures(&rec.counts, &rec.tenders, &prior, rec.pos_cash_total);
        rec.total_cash_counted = figures.total_cash_counted;
        rec.variance = figures.variance;

        let actor = ctx.performed_by(&self.system_actor);
        rec.updated_by = Some(actor.id);
        rec.updated_by_name = Some(actor.name.clone());
        rec.updated_at = Utc::now();

        let payments = input.payments.as_deref().map(payments_to_persist);
        let note = input.note_text().map(|text| NewNote::new(text, actor.clone()));

        repo.save(&rec, payments.as_deref(), note.as_ref())
            .await
            .map_err(|e| match e {
                DbError::NotFound { .. } => EngineError::ReconciliationNotFound(id.to_string()),
                other => other.into(),
            })?;

        info!(
            id = %rec.id,
            variance = %rec.variance,
            payments = payments.as_ref().map(Vec::len),
            note_added = note.is_some(),
            "Reconciliation saved"
        );

        Ok(repo.detail(rec).await?)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Float carried over from the till's most recent earlier reconciliation.
    pub async fn previous_float(&self, date: NaiveDate, till_id: i64) -> EngineResult<PriorFloat> {
        let previous = self
            .db
            .reconciliations()
            .find_previous(till_id, date)
            .await?;

        Ok(match previous {
            Some(prev) => PriorFloat {
                note_float: prev.note_float,
                coin_float: prev.coin_float,
                from_date: Some(prev.date),
            },
            None => PriorFloat::none(),
        })
    }

    /// The most recent reconciliations, newest first.
    pub async fn history(
        &self,
        till_id: Option<i64>,
        limit: i64,
    ) -> EngineResult<Vec<ReconciliationDetail>> {
        let repo = self.db.reconciliations();
        let mut details = Vec::new();
        for rec in repo.history(till_id, limit).await? {
            details.push(repo.detail(rec).await?);
        }
        Ok(details)
    }

    /// Export rows for `start..=end`, oldest first.
    ///
    /// `supplier_names` resolves payment supplier ids to display names.
    pub async fn export_rows(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        till_id: Option<i64>,
        supplier_names: &BTreeMap<i64, String>,
    ) -> EngineResult<Vec<ReconciliationExportRow>> {
        if start > end {
            return Err(ValidationError::InvertedRange {
                low: "start_date".into(),
                high: "end_date".into(),
            }
            .into());
        }

        let repo = self.db.reconciliations();
        let mut rows = Vec::new();

        for rec in repo.in_range(start, end, till_id).await? {
            let payments = repo
                .payments(&rec.id)
                .await?
                .iter()
                .map(|p| format!("{}: {}", p.payee_display_name(supplier_names), p.amount))
                .collect::<Vec<_>>()
                .join("; ");
            let notes = repo
                .latest_note(&rec.id)
                .await?
                .map(|n| n.message)
                .unwrap_or_default();

            rows.push(ReconciliationExportRow {
                date: rec.date,
                till: rec.till_name,
                total_cash_counted: rec.total_cash_counted,
                pos_cash_total: rec.pos_cash_total,
                variance: rec.variance,
                card: rec.tenders.card,
                notes,
                payments,
                created_by: rec.created_by_name,
            });
        }

        debug!(%start, %end, rows = rows.len(), "Built reconciliation export");
        Ok(rows)
    }

    /// Till hosts keyed by a 1-based index, in name order.
    pub async fn available_tills(&self) -> EngineResult<BTreeMap<usize, String>> {
        let hosts = self.gateway.terminals().await?;
        Ok(hosts
            .into_iter()
            .enumerate()
            .map(|(index, host)| (index + 1, host))
            .collect())
    }

    /// The till host at a 1-based `index`.
    pub async fn till_by_index(&self, index: usize) -> EngineResult<Option<String>> {
        Ok(self.available_tills().await?.remove(&index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::InMemoryPosGateway;
    use crate::testing::{add_session, at, day, receipt, setup};
    use tally_core::pos::{LegacyDayNote, LegacyMoneyRecord, LegacyPayeePayment};
    use tally_core::{Money, PaymentInput};

    fn service(pos: &Arc<InMemoryPosGateway>, db: &Database) -> ReconciliationService {
        ReconciliationService::new(pos.clone(), db.clone(), Actor::system())
    }

    fn cents(c: i64) -> Money {
        Money::from_cents(c)
    }

    /// A closed TILL-1 session on `date` that took `cash_cents` in cash.
    async fn closed_day(pos: &InMemoryPosGateway, date: NaiveDate, cash_cents: i64) -> String {
        let money_id = add_session(pos, "TILL-1", date).await;
        pos.add_receipt(receipt("r-cash", at(date, 10, 0), "TILL-1", &money_id, "Aoife", "cash", cash_cents))
            .await;
        pos.add_receipt(receipt("r-card", at(date, 11, 0), "TILL-1", &money_id, "Aoife", "magcard", 4_000))
            .await;
        money_id
    }

    #[tokio::test]
    async fn test_missing_session_is_not_found() {
        let (pos, db) = setup().await;
        let svc = service(&pos, &db);

        let err = svc
            .get_or_create(day(), 1, "TILL-1", &ActorContext::anonymous())
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::ClosingSessionNotFound { .. }));
        assert!(db.reconciliations().history(None, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_without_legacy_uses_pos_totals() {
        let (pos, db) = setup().await;
        closed_day(&pos, day(), 51_000).await;
        let svc = service(&pos, &db);

        let detail = svc
            .get_or_create(day(), 1, "TILL-1", &ActorContext::user(7, "Niamh"))
            .await
            .unwrap();
        let rec = detail.reconciliation;

        assert_eq!(rec.pos_cash_total, cents(51_000));
        assert_eq!(rec.pos_card_total, cents(4_000));
        assert!(rec.total_cash_counted.is_zero());
        assert_eq!(rec.variance, cents(-51_000));
        assert_eq!(rec.created_by, 7);
        assert_eq!(rec.created_by_name, "Niamh");
        assert!(detail.payments.is_empty());
        assert!(detail.latest_note.is_none());
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let (pos, db) = setup().await;
        let money_id = closed_day(&pos, day(), 1_000).await;
        pos.set_legacy_money(LegacyMoneyRecord {
            money_id: money_id.clone(),
            ..Default::default()
        })
        .await;
        pos.add_legacy_payment(&money_id, LegacyPayeePayment {
            payee_id: Some(3),
            amount: Some(cents(2_000)),
            sequence: Some(0),
        })
        .await;
        let svc = service(&pos, &db);

        let first = svc
            .get_or_create(day(), 1, "TILL-1", &ActorContext::anonymous())
            .await
            .unwrap();
        let second = svc
            .get_or_create(day(), 1, "TILL-1", &ActorContext::anonymous())
            .await
            .unwrap();

        assert_eq!(first.reconciliation.id, second.reconciliation.id);
        assert_eq!(second.payments.len(), 1);
        assert_eq!(first.reconciliation.created_by_name, "system");
    }

    #[tokio::test]
    async fn test_legacy_import() {
        let (pos, db) = setup().await;
        let money_id = closed_day(&pos, day(), 0).await;
        pos.set_legacy_money(LegacyMoneyRecord {
            money_id: money_id.clone(),
            cash_50: Some(cents(25_000)),
            cash_20: Some(cents(13_000)),
            card: Some(cents(4_000)),
            cash_back: Some(cents(2_000)),
            note_float: Some(cents(15_000)),
            coin_float: None,
            ..Default::default()
        })
        .await;
        for sequence in [0, 1] {
            pos.add_legacy_payment(&money_id, LegacyPayeePayment {
                payee_id: Some(3 + sequence),
                amount: Some(cents(1_000 * (sequence + 1))),
                sequence: Some(sequence),
            })
            .await;
        }
        pos.set_legacy_note(&money_id, LegacyDayNote {
            message: "Float short, see manager\n".into(),
        })
        .await;
        let svc = service(&pos, &db);

        let detail = svc
            .get_or_create(day(), 1, "TILL-1", &ActorContext::anonymous())
            .await
            .unwrap();
        let rec = &detail.reconciliation;

        // €250 in fifties is five notes; €130 in twenties truncates to six
        assert_eq!(rec.counts.cash_50, 5);
        assert_eq!(rec.counts.cash_20, 6);
        assert_eq!(rec.total_cash_counted, cents(37_000));
        assert_eq!(rec.tenders.card, cents(4_000));
        assert_eq!(rec.note_float, cents(15_000));
        assert!(rec.coin_float.is_zero());
        // Variance ignores the legacy float: 370 + 20 - 0 - 0 - 0
        assert_eq!(rec.variance, cents(39_000));
        assert_eq!(detail.payments.len(), 2);
        assert_eq!(
            detail.latest_note.as_ref().map(|n| n.message.as_str()),
            Some("Float short, see manager\n")
        );
    }

    #[tokio::test]
    async fn test_prior_float_carries_into_variance() {
        let (pos, db) = setup().await;
        let previous_day = day().pred_opt().unwrap();
        closed_day(&pos, previous_day, 0).await;
        closed_day(&pos, day(), 51_000).await;
        let svc = service(&pos, &db);

        let prev = svc
            .get_or_create(previous_day, 1, "TILL-1", &ActorContext::anonymous())
            .await
            .unwrap();
        svc.save(
            &prev.reconciliation.id,
            &ReconciliationInput {
                note_float: Some(cents(10_000)),
                coin_float: Some(cents(2_500)),
                ..Default::default()
            },
            &ActorContext::anonymous(),
        )
        .await
        .unwrap();

        let float = svc.previous_float(day(), 1).await.unwrap();
        assert_eq!(float.total(), cents(12_500));
        assert_eq!(float.from_date, Some(previous_day));

        let today = svc
            .get_or_create(day(), 1, "TILL-1", &ActorContext::anonymous())
            .await
            .unwrap();
        assert_eq!(today.reconciliation.note_float, cents(10_000));
        assert_eq!(today.reconciliation.variance, cents(-12_500 - 51_000));
    }

    #[tokio::test]
    async fn test_save_without_prior_reconciliation() {
        let (pos, db) = setup().await;
        closed_day(&pos, day(), 51_000).await;
        let svc = service(&pos, &db);
        let created = svc
            .get_or_create(day(), 1, "TILL-1", &ActorContext::anonymous())
            .await
            .unwrap();

        let saved = svc
            .save(
                &created.reconciliation.id,
                &ReconciliationInput {
                    cash_50: Some(10),
                    cash_back: Some(cents(2_000)),
                    ..Default::default()
                },
                &ActorContext::user(9, "Ciara"),
            )
            .await
            .unwrap();

        let rec = saved.reconciliation;
        assert_eq!(rec.total_cash_counted, cents(50_000));
        // 500 + 20 - 0 - 0 - 510
        assert_eq!(rec.variance, cents(1_000));
        assert_eq!(rec.updated_by, Some(9));
        assert_eq!(rec.updated_by_name.as_deref(), Some("Ciara"));
        assert_eq!(rec.created_by_name, "system");
    }

    #[tokio::test]
    async fn test_save_drops_zero_payments() {
        let (pos, db) = setup().await;
        closed_day(&pos, day(), 0).await;
        let svc = service(&pos, &db);
        let created = svc
            .get_or_create(day(), 1, "TILL-1", &ActorContext::anonymous())
            .await
            .unwrap();

        let saved = svc
            .save(
                &created.reconciliation.id,
                &ReconciliationInput {
                    payments: Some(vec![
                        PaymentInput {
                            amount: Some(Money::zero()),
                            ..Default::default()
                        },
                        PaymentInput {
                            amount: Some(cents(5_000)),
                            supplier_id: Some(3),
                            ..Default::default()
                        },
                    ]),
                    notes: Some("  counted twice  ".into()),
                    ..Default::default()
                },
                &ActorContext::anonymous(),
            )
            .await
            .unwrap();

        assert_eq!(saved.payments.len(), 1);
        assert_eq!(saved.payments[0].sequence, 1);
        assert_eq!(saved.payments[0].supplier_id, Some(3));
        assert_eq!(saved.latest_note.map(|n| n.message), Some("counted twice".to_string()));

        // No payments in the input leaves the stored list alone
        let again = svc
            .save(&created.reconciliation.id, &ReconciliationInput::default(), &ActorContext::anonymous())
            .await
            .unwrap();
        assert_eq!(again.payments.len(), 1);
        assert_eq!(db.reconciliations().notes(&created.reconciliation.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_save_writes_nothing() {
        let (pos, db) = setup().await;
        closed_day(&pos, day(), 0).await;
        let svc = service(&pos, &db);
        let created = svc
            .get_or_create(day(), 1, "TILL-1", &ActorContext::anonymous())
            .await
            .unwrap();

        let err = svc
            .save(
                &created.reconciliation.id,
                &ReconciliationInput {
                    cash_50: Some(-1),
                    notes: Some("should not land".into()),
                    ..Default::default()
                },
                &ActorContext::anonymous(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Validation(_)));
        let stored = db
            .reconciliations()
            .find_by_id(&created.reconciliation.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.counts, created.reconciliation.counts);
        assert_eq!(stored.updated_by, None);
        assert!(db.reconciliations().notes(&stored.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_count_rejected() {
        let (pos, db) = setup().await;
        closed_day(&pos, day(), 0).await;
        let svc = service(&pos, &db);
        let created = svc
            .get_or_create(day(), 1, "TILL-1", &ActorContext::anonymous())
            .await
            .unwrap();

        let err = svc
            .save(
                &created.reconciliation.id,
                &ReconciliationInput {
                    cash_50: Some(i64::MAX / 1000),
                    ..Default::default()
                },
                &ActorContext::user(4, "Orla"),
            )
            .await
            .unwrap_err();

        match err {
            EngineError::Validation(ValidationError::TooLarge { field, .. }) => {
                assert_eq!(field, "cash_50")
            }
            other => panic!("unexpected: {other:?}"),
        }
        let stored = db
            .reconciliations()
            .find_by_id(&created.reconciliation.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.counts, created.reconciliation.counts);
        assert_eq!(stored.updated_by, None);
    }

    #[tokio::test]
    async fn test_save_unknown_id() {
        let (pos, db) = setup().await;
        let err = service(&pos, &db)
            .save("missing", &ReconciliationInput::default(), &ActorContext::anonymous())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::ReconciliationNotFound(_)));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_export_rows() {
        let (pos, db) = setup().await;
        closed_day(&pos, day(), 0).await;
        let svc = service(&pos, &db);
        let created = svc
            .get_or_create(day(), 1, "TILL-1", &ActorContext::anonymous())
            .await
            .unwrap();
        svc.save(
            &created.reconciliation.id,
            &ReconciliationInput {
                card: Some(cents(4_000)),
                payments: Some(vec![
                    PaymentInput {
                        supplier_id: Some(3),
                        amount: Some(cents(1_250)),
                        ..Default::default()
                    },
                    PaymentInput {
                        payee_name: Some("Window cleaner".into()),
                        amount: Some(cents(2_000)),
                        ..Default::default()
                    },
                ]),
                notes: Some("All good".into()),
                ..Default::default()
            },
            &ActorContext::anonymous(),
        )
        .await
        .unwrap();

        let suppliers = BTreeMap::from([(3, "Dairy Co".to_string())]);
        let rows = svc
            .export_rows(day(), day(), None, &suppliers)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].till, "TILL-1");
        assert_eq!(rows[0].card, cents(4_000));
        assert_eq!(rows[0].notes, "All good");
        assert_eq!(rows[0].payments, "Dairy Co: €12.50; Window cleaner: €20.00");
        assert_eq!(rows[0].created_by, "system");

        let err = svc
            .export_rows(day(), day().pred_opt().unwrap(), None, &suppliers)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[tokio::test]
    async fn test_history_newest_first() {
        let (pos, db) = setup().await;
        let svc = service(&pos, &db);
        for offset in 0..3 {
            let date = day() + chrono::Days::new(offset);
            closed_day(&pos, date, 0).await;
            svc.get_or_create(date, 1, "TILL-1", &ActorContext::anonymous())
                .await
                .unwrap();
        }

        let history = svc.history(Some(1), 2).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].reconciliation.date, day() + chrono::Days::new(2));
        assert!(svc.history(Some(2), 30).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_available_tills() {
        let (pos, db) = setup().await;
        add_session(&pos, "TILL-2", day()).await;
        add_session(&pos, "TILL-1", day()).await;
        let svc = service(&pos, &db);

        let tills = svc.available_tills().await.unwrap();
        assert_eq!(tills.get(&1).map(String::as_str), Some("TILL-1"));
        assert_eq!(tills.get(&2).map(String::as_str), Some("TILL-2"));
        assert_eq!(svc.till_by_index(2).await.unwrap().as_deref(), Some("TILL-2"));
        assert_eq!(svc.till_by_index(3).await.unwrap(), None);
    }
}
