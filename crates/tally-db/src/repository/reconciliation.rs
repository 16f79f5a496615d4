//! # Reconciliation Repository
//!
//! Cash reconciliations with their payout lines and append-only notes.
//!
//! ## Write Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Reconciliation Write Paths                           │
//! │                                                                         │
//! │  create()  ── one transaction ─────────────────────────────────────┐   │
//! │  │  INSERT cash_reconciliations (closed_cash_id UNIQUE)            │   │
//! │  │  INSERT backfilled payments, skipping sequences already held    │   │
//! │  │  INSERT backfilled note, only when no note exists yet           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  save()    ── one transaction ─────────────────────────────────────┐   │
//! │  │  UPDATE figures + updated_by                                    │   │
//! │  │  payments given?  DELETE all, INSERT the new list               │   │
//! │  │  note given?      INSERT (notes are never edited)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  Any failure rolls the whole transaction back.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::{
    Actor, DenominationCounts, Money, NewPayment, Reconciliation, ReconciliationDetail,
    ReconciliationNote, ReconciliationPayment, TenderAmounts,
};

const RECONCILIATION_COLUMNS: &str = r#"
    id, closed_cash_id, till_id, till_name, date,
    cash_50, cash_20, cash_10, cash_5, cash_2, cash_1, cash_50c, cash_20c, cash_10c,
    note_float_cents, coin_float_cents,
    card_cents, cash_back_cents, cheque_cents, debt_cents,
    debt_paid_cash_cents, debt_paid_cheque_cents, debt_paid_card_cents,
    free_cents, voucher_used_cents, money_added_cents,
    total_cash_counted_cents, pos_cash_total_cents, pos_card_total_cents, variance_cents,
    created_by, created_by_name, updated_by, updated_by_name, created_at, updated_at
"#;

/// A note to append, with its author.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub message: String,
    pub author: Actor,
}

impl NewNote {
    pub fn new(message: impl Into<String>, author: Actor) -> Self {
        NewNote {
            message: message.into(),
            author,
        }
    }
}

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ReconciliationRow {
    id: String,
    closed_cash_id: String,
    till_id: i64,
    till_name: String,
    date: NaiveDate,
    cash_50: i64,
    cash_20: i64,
    cash_10: i64,
    cash_5: i64,
    cash_2: i64,
    cash_1: i64,
    cash_50c: i64,
    cash_20c: i64,
    cash_10c: i64,
    note_float_cents: i64,
    coin_float_cents: i64,
    card_cents: i64,
    cash_back_cents: i64,
    cheque_cents: i64,
    debt_cents: i64,
    debt_paid_cash_cents: i64,
    debt_paid_cheque_cents: i64,
    debt_paid_card_cents: i64,
    free_cents: i64,
    voucher_used_cents: i64,
    money_added_cents: i64,
    total_cash_counted_cents: i64,
    pos_cash_total_cents: i64,
    pos_card_total_cents: i64,
    variance_cents: i64,
    created_by: i64,
    created_by_name: String,
    updated_by: Option<i64>,
    updated_by_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReconciliationRow> for Reconciliation {
    fn from(row: ReconciliationRow) -> Self {
        Reconciliation {
            id: row.id,
            closed_cash_id: row.closed_cash_id,
            till_id: row.till_id,
            till_name: row.till_name,
            date: row.date,
            counts: DenominationCounts {
                cash_50: row.cash_50,
                cash_20: row.cash_20,
                cash_10: row.cash_10,
                cash_5: row.cash_5,
                cash_2: row.cash_2,
                cash_1: row.cash_1,
                cash_50c: row.cash_50c,
                cash_20c: row.cash_20c,
                cash_10c: row.cash_10c,
            },
            note_float: Money::from_cents(row.note_float_cents),
            coin_float: Money::from_cents(row.coin_float_cents),
            tenders: TenderAmounts {
                card: Money::from_cents(row.card_cents),
                cash_back: Money::from_cents(row.cash_back_cents),
                cheque: Money::from_cents(row.cheque_cents),
                debt: Money::from_cents(row.debt_cents),
                debt_paid_cash: Money::from_cents(row.debt_paid_cash_cents),
                debt_paid_cheque: Money::from_cents(row.debt_paid_cheque_cents),
                debt_paid_card: Money::from_cents(row.debt_paid_card_cents),
                free: Money::from_cents(row.free_cents),
                voucher_used: Money::from_cents(row.voucher_used_cents),
                money_added: Money::from_cents(row.money_added_cents),
            },
            total_cash_counted: Money::from_cents(row.total_cash_counted_cents),
            pos_cash_total: Money::from_cents(row.pos_cash_total_cents),
            pos_card_total: Money::from_cents(row.pos_card_total_cents),
            variance: Money::from_cents(row.variance_cents),
            created_by: row.created_by,
            created_by_name: row.created_by_name,
            updated_by: row.updated_by,
            updated_by_name: row.updated_by_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: String,
    reconciliation_id: String,
    supplier_id: Option<i64>,
    payee_name: Option<String>,
    amount_cents: i64,
    description: Option<String>,
    sequence: i64,
    created_at: DateTime<Utc>,
}

impl From<PaymentRow> for ReconciliationPayment {
    fn from(row: PaymentRow) -> Self {
        ReconciliationPayment {
            id: row.id,
            reconciliation_id: row.reconciliation_id,
            supplier_id: row.supplier_id,
            payee_name: row.payee_name,
            amount: Money::from_cents(row.amount_cents),
            description: row.description,
            sequence: row.sequence,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct NoteRow {
    id: String,
    reconciliation_id: String,
    message: String,
    created_by: i64,
    created_by_name: String,
    created_at: DateTime<Utc>,
}

impl From<NoteRow> for ReconciliationNote {
    fn from(row: NoteRow) -> Self {
        ReconciliationNote {
            id: row.id,
            reconciliation_id: row.reconciliation_id,
            message: row.message,
            created_by: row.created_by,
            created_by_name: row.created_by_name,
            created_at: row.created_at,
        }
    }
}

/// Binds the 25 counted and computed figures, in column order.
fn bind_figures<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    rec: &'q Reconciliation,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    let c = &rec.counts;
    let t = &rec.tenders;
    query
        .bind(c.cash_50)
        .bind(c.cash_20)
        .bind(c.cash_10)
        .bind(c.cash_5)
        .bind(c.cash_2)
        .bind(c.cash_1)
        .bind(c.cash_50c)
        .bind(c.cash_20c)
        .bind(c.cash_10c)
        .bind(rec.note_float.cents())
        .bind(rec.coin_float.cents())
        .bind(t.card.cents())
        .bind(t.cash_back.cents())
        .bind(t.cheque.cents())
        .bind(t.debt.cents())
        .bind(t.debt_paid_cash.cents())
        .bind(t.debt_paid_cheque.cents())
        .bind(t.debt_paid_card.cents())
        .bind(t.free.cents())
        .bind(t.voucher_used.cents())
        .bind(t.money_added.cents())
        .bind(rec.total_cash_counted.cents())
        .bind(rec.pos_cash_total.cents())
        .bind(rec.pos_card_total.cents())
        .bind(rec.variance.cents())
}

async fn insert_payment(
    conn: &mut SqliteConnection,
    reconciliation_id: &str,
    payment: &NewPayment,
    created_at: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO cash_reconciliation_payments (
            id, reconciliation_id, supplier_id, payee_name,
            amount_cents, description, sequence, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(reconciliation_id)
    .bind(payment.supplier_id)
    .bind(payment.payee_name.as_deref())
    .bind(payment.amount.cents())
    .bind(payment.description.as_deref())
    .bind(payment.sequence)
    .bind(created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

async fn insert_note(
    conn: &mut SqliteConnection,
    reconciliation_id: &str,
    note: &NewNote,
    created_at: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO cash_reconciliation_notes (
            id, reconciliation_id, message, created_by, created_by_name, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(reconciliation_id)
    .bind(note.message.as_str())
    .bind(note.author.id)
    .bind(note.author.name.as_str())
    .bind(created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for cash reconciliations.
#[derive(Debug, Clone)]
pub struct ReconciliationRepository {
    pool: SqlitePool,
}

impl ReconciliationRepository {
    /// Creates a new ReconciliationRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReconciliationRepository { pool }
    }

    fn select_where(clause: &str) -> String {
        format!("SELECT {RECONCILIATION_COLUMNS} FROM cash_reconciliations {clause}")
    }

    /// Gets a reconciliation by ID.
    pub async fn find_by_id(&self, id: &str) -> DbResult<Option<Reconciliation>> {
        let sql = Self::select_where("WHERE id = ?1");
        let row: Option<ReconciliationRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Reconciliation::from))
    }

    /// Gets the reconciliation for a POS closing session.
    pub async fn find_by_session(&self, closed_cash_id: &str) -> DbResult<Option<Reconciliation>> {
        let sql = Self::select_where("WHERE closed_cash_id = ?1");
        let row: Option<ReconciliationRow> = sqlx::query_as(&sql)
            .bind(closed_cash_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Reconciliation::from))
    }

    /// Gets the reconciliation for a till on a date.
    pub async fn find_for_till_date(
        &self,
        till_id: i64,
        date: NaiveDate,
    ) -> DbResult<Option<Reconciliation>> {
        let sql =
            Self::select_where("WHERE till_id = ?1 AND date = ?2 ORDER BY updated_at DESC LIMIT 1");
        let row: Option<ReconciliationRow> = sqlx::query_as(&sql)
            .bind(till_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Reconciliation::from))
    }

    /// Gets the most recent reconciliation for `till_id` strictly before `date`.
    pub async fn find_previous(
        &self,
        till_id: i64,
        date: NaiveDate,
    ) -> DbResult<Option<Reconciliation>> {
        let sql = Self::select_where(
            "WHERE till_id = ?1 AND date < ?2 ORDER BY date DESC, updated_at DESC LIMIT 1",
        );
        let row: Option<ReconciliationRow> = sqlx::query_as(&sql)
            .bind(till_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Reconciliation::from))
    }

    /// Inserts a new reconciliation together with any backfilled payments
    /// and note, in one transaction.
    ///
    /// ## Backfill Rules
    /// - A payment whose `sequence` is already held is skipped
    /// - The note is written only when the reconciliation has no notes
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` when the closing session already has a
    /// reconciliation.
    pub async fn create(
        &self,
        rec: &Reconciliation,
        payments: &[NewPayment],
        note: Option<&NewNote>,
    ) -> DbResult<()> {
        debug!(
            id = %rec.id,
            closed_cash_id = %rec.closed_cash_id,
            till_id = rec.till_id,
            date = %rec.date,
            "Creating reconciliation"
        );

        let sql = format!(
            r#"
            INSERT INTO cash_reconciliations ({RECONCILIATION_COLUMNS})
            VALUES (
                ?, ?, ?, ?, ?,
                ?, ?, ?, ?, ?, ?, ?, ?, ?,
                ?, ?,
                ?, ?, ?, ?, ?, ?, ?, ?, ?, ?,
                ?, ?, ?, ?,
                ?, ?, ?, ?, ?, ?
            )
            "#
        );

        let query = sqlx::query(&sql)
            .bind(rec.id.as_str())
            .bind(rec.closed_cash_id.as_str())
            .bind(rec.till_id)
            .bind(rec.till_name.as_str())
            .bind(rec.date);
        let query = bind_figures(query, rec)
            .bind(rec.created_by)
            .bind(rec.created_by_name.as_str())
            .bind(rec.updated_by)
            .bind(rec.updated_by_name.as_deref())
            .bind(rec.created_at)
            .bind(rec.updated_at);

        let mut tx = self.pool.begin().await?;

        query.execute(&mut *tx).await?;

        for payment in payments {
            let held: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*) FROM cash_reconciliation_payments
                WHERE reconciliation_id = ?1 AND sequence = ?2
                "#,
            )
            .bind(rec.id.as_str())
            .bind(payment.sequence)
            .fetch_one(&mut *tx)
            .await?;

            if held == 0 {
                insert_payment(&mut *tx, &rec.id, payment, rec.created_at).await?;
            }
        }

        if let Some(note) = note {
            let notes: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM cash_reconciliation_notes WHERE reconciliation_id = ?1",
            )
            .bind(rec.id.as_str())
            .fetch_one(&mut *tx)
            .await?;

            if notes == 0 {
                insert_note(&mut *tx, &rec.id, note, rec.created_at).await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    /// Writes the figures of `rec` over the stored row, optionally replacing
    /// the payment list and appending a note, in one transaction.
    ///
    /// `payments: None` leaves stored payments untouched; `Some(&[])`
    /// deletes them all.
    pub async fn save(
        &self,
        rec: &Reconciliation,
        payments: Option<&[NewPayment]>,
        note: Option<&NewNote>,
    ) -> DbResult<()> {
        debug!(id = %rec.id, till_id = rec.till_id, date = %rec.date, "Saving reconciliation");

        let query = sqlx::query(
            r#"
            UPDATE cash_reconciliations SET
                cash_50 = ?1, cash_20 = ?2, cash_10 = ?3, cash_5 = ?4, cash_2 = ?5,
                cash_1 = ?6, cash_50c = ?7, cash_20c = ?8, cash_10c = ?9,
                note_float_cents = ?10, coin_float_cents = ?11,
                card_cents = ?12, cash_back_cents = ?13, cheque_cents = ?14,
                debt_cents = ?15, debt_paid_cash_cents = ?16,
                debt_paid_cheque_cents = ?17, debt_paid_card_cents = ?18,
                free_cents = ?19, voucher_used_cents = ?20, money_added_cents = ?21,
                total_cash_counted_cents = ?22, pos_cash_total_cents = ?23,
                pos_card_total_cents = ?24, variance_cents = ?25,
                updated_by = ?26, updated_by_name = ?27, updated_at = ?28
            WHERE id = ?29
            "#,
        );
        let query = bind_figures(query, rec)
            .bind(rec.updated_by)
            .bind(rec.updated_by_name.as_deref())
            .bind(rec.updated_at)
            .bind(rec.id.as_str());

        let mut tx = self.pool.begin().await?;

        let result = query.execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Reconciliation", rec.id.as_str()));
        }

        if let Some(payments) = payments {
            sqlx::query("DELETE FROM cash_reconciliation_payments WHERE reconciliation_id = ?1")
                .bind(rec.id.as_str())
                .execute(&mut *tx)
                .await?;

            for payment in payments {
                insert_payment(&mut *tx, &rec.id, payment, rec.updated_at).await?;
            }
        }

        if let Some(note) = note {
            insert_note(&mut *tx, &rec.id, note, rec.updated_at).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Payments for a reconciliation, in sequence order.
    pub async fn payments(&self, reconciliation_id: &str) -> DbResult<Vec<ReconciliationPayment>> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT id, reconciliation_id, supplier_id, payee_name,
                   amount_cents, description, sequence, created_at
            FROM cash_reconciliation_payments
            WHERE reconciliation_id = ?1
            ORDER BY sequence ASC, rowid ASC
            "#,
        )
        .bind(reconciliation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReconciliationPayment::from).collect())
    }

    /// Every note on a reconciliation, newest first.
    pub async fn notes(&self, reconciliation_id: &str) -> DbResult<Vec<ReconciliationNote>> {
        let rows: Vec<NoteRow> = sqlx::query_as(
            r#"
            SELECT id, reconciliation_id, message, created_by, created_by_name, created_at
            FROM cash_reconciliation_notes
            WHERE reconciliation_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(reconciliation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReconciliationNote::from).collect())
    }

    /// The most recently written note.
    pub async fn latest_note(&self, reconciliation_id: &str) -> DbResult<Option<ReconciliationNote>> {
        let row: Option<NoteRow> = sqlx::query_as(
            r#"
            SELECT id, reconciliation_id, message, created_by, created_by_name, created_at
            FROM cash_reconciliation_notes
            WHERE reconciliation_id = ?1
            ORDER BY created_at DESC, rowid DESC
            LIMIT 1
            "#,
        )
        .bind(reconciliation_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ReconciliationNote::from))
    }

    /// Loads payments and the latest note alongside `rec`.
    pub async fn detail(&self, rec: Reconciliation) -> DbResult<ReconciliationDetail> {
        let payments = self.payments(&rec.id).await?;
        let latest_note = self.latest_note(&rec.id).await?;
        Ok(ReconciliationDetail {
            reconciliation: rec,
            payments,
            latest_note,
        })
    }

    /// Most recent reconciliations first, optionally for one till.
    pub async fn history(&self, till_id: Option<i64>, limit: i64) -> DbResult<Vec<Reconciliation>> {
        let sql = format!(
            r#"
            SELECT {RECONCILIATION_COLUMNS} FROM cash_reconciliations
            WHERE (?1 IS NULL OR till_id = ?1)
            ORDER BY date DESC, till_id ASC
            LIMIT ?2
            "#
        );
        let rows: Vec<ReconciliationRow> = sqlx::query_as(&sql)
            .bind(till_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Reconciliation::from).collect())
    }

    /// Reconciliations dated `start..=end`, oldest first, optionally for one till.
    pub async fn in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        till_id: Option<i64>,
    ) -> DbResult<Vec<Reconciliation>> {
        let sql = format!(
            r#"
            SELECT {RECONCILIATION_COLUMNS} FROM cash_reconciliations
            WHERE date >= ?1 AND date <= ?2
              AND (?3 IS NULL OR till_id = ?3)
            ORDER BY date ASC, till_id ASC
            "#
        );
        let rows: Vec<ReconciliationRow> = sqlx::query_as(&sql)
            .bind(start)
            .bind(end)
            .bind(till_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Reconciliation::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn reconciliation(session: &str, till_id: i64, day: u32) -> Reconciliation {
        let now = Utc::now();
        Reconciliation {
            id: Uuid::new_v4().to_string(),
            closed_cash_id: session.to_string(),
            till_id,
            till_name: format!("TILL-{till_id}"),
            date: date(day),
            counts: DenominationCounts {
                cash_50: 10,
                ..Default::default()
            },
            note_float: Money::from_cents(10_000),
            coin_float: Money::from_cents(2_000),
            tenders: TenderAmounts {
                card: Money::from_cents(25_000),
                ..Default::default()
            },
            total_cash_counted: Money::from_cents(50_000),
            pos_cash_total: Money::from_cents(48_000),
            pos_card_total: Money::from_cents(25_000),
            variance: Money::from_cents(2_000),
            created_by: 1,
            created_by_name: "system".to_string(),
            updated_by: None,
            updated_by_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn payment(sequence: i64, cents: i64) -> NewPayment {
        NewPayment {
            supplier_id: Some(3),
            payee_name: None,
            amount: Money::from_cents(cents),
            description: None,
            sequence,
        }
    }

    async fn repo() -> ReconciliationRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().reconciliations()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = repo().await;
        let rec = reconciliation("m-1", 3, 1);
        repo.create(&rec, &[], None).await.unwrap();

        assert_eq!(repo.find_by_id(&rec.id).await.unwrap().unwrap().closed_cash_id, "m-1");
        let by_session = repo.find_by_session("m-1").await.unwrap().unwrap();
        assert_eq!(by_session.id, rec.id);
        assert_eq!(by_session.counts.cash_50, 10);
        assert_eq!(by_session.variance, Money::from_cents(2_000));
        assert!(repo.find_for_till_date(3, date(1)).await.unwrap().is_some());
        assert!(repo.find_by_session("m-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_reconciliation_for_session_rejected() {
        let repo = repo().await;
        repo.create(&reconciliation("m-1", 3, 1), &[], None).await.unwrap();

        let err = repo
            .create(&reconciliation("m-1", 3, 1), &[], None)
            .await
            .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_backfill_skips_duplicate_sequences() {
        let repo = repo().await;
        let rec = reconciliation("m-1", 3, 1);
        let note = NewNote::new("Imported", Actor::system());

        repo.create(&rec, &[payment(0, 500), payment(0, 900), payment(1, 700)], Some(&note))
            .await
            .unwrap();

        let payments = repo.payments(&rec.id).await.unwrap();
        let amounts: Vec<i64> = payments.iter().map(|p| p.amount.cents()).collect();
        assert_eq!(amounts, vec![500, 700]);
        assert_eq!(repo.latest_note(&rec.id).await.unwrap().unwrap().message, "Imported");
    }

    #[tokio::test]
    async fn test_save_replaces_payments_and_appends_notes() {
        let repo = repo().await;
        let mut rec = reconciliation("m-1", 3, 1);
        repo.create(&rec, &[payment(0, 500)], None).await.unwrap();

        rec.counts.cash_20 = 2;
        rec.updated_by = Some(7);
        rec.updated_by_name = Some("Siobhan".to_string());
        repo.save(
            &rec,
            Some(&[payment(0, 1_000), payment(1, 2_000)]),
            Some(&NewNote::new("first", Actor::new(7, "Siobhan"))),
        )
        .await
        .unwrap();
        repo.save(&rec, None, Some(&NewNote::new("second", Actor::new(7, "Siobhan"))))
            .await
            .unwrap();

        let stored = repo.find_by_id(&rec.id).await.unwrap().unwrap();
        assert_eq!(stored.counts.cash_20, 2);
        assert_eq!(stored.updated_by, Some(7));

        // None left the two payments alone
        assert_eq!(repo.payments(&rec.id).await.unwrap().len(), 2);
        assert_eq!(repo.notes(&rec.id).await.unwrap().len(), 2);
        assert_eq!(repo.latest_note(&rec.id).await.unwrap().unwrap().message, "second");

        repo.save(&rec, Some(&[]), None).await.unwrap();
        let detail = repo.detail(stored).await.unwrap();
        assert!(detail.payments.is_empty());
        assert_eq!(detail.latest_note.unwrap().message, "second");
    }

    #[tokio::test]
    async fn test_save_unknown_reconciliation() {
        let repo = repo().await;
        let err = repo
            .save(&reconciliation("m-9", 1, 1), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_previous_history_and_range() {
        let repo = repo().await;
        for (session, till, day) in [("a", 3, 1), ("b", 3, 2), ("c", 4, 2), ("d", 3, 4)] {
            repo.create(&reconciliation(session, till, day), &[], None).await.unwrap();
        }

        let previous = repo.find_previous(3, date(4)).await.unwrap().unwrap();
        assert_eq!(previous.closed_cash_id, "b");
        assert!(repo.find_previous(3, date(1)).await.unwrap().is_none());

        let history = repo.history(Some(3), 30).await.unwrap();
        let sessions: Vec<_> = history.iter().map(|r| r.closed_cash_id.as_str()).collect();
        assert_eq!(sessions, vec!["d", "b", "a"]);
        assert_eq!(repo.history(None, 2).await.unwrap().len(), 2);

        let range = repo.in_range(date(2), date(4), None).await.unwrap();
        let sessions: Vec<_> = range.iter().map(|r| r.closed_cash_id.as_str()).collect();
        assert_eq!(sessions, vec!["b", "c", "d"]);
        assert_eq!(repo.in_range(date(2), date(4), Some(4)).await.unwrap().len(), 1);
    }
}
