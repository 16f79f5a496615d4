//! # Transaction Cache Repository
//!
//! Normalized POS events, stored per business date.
//!
//! ## Cache Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cache Lifecycle (one date)                        │
//! │                                                                         │
//! │  1. EMPTY                                                              │
//! │     └── count_for_date() == 0 → caller fetches the day from the POS    │
//! │                                                                         │
//! │  2. POPULATED                                                          │
//! │     └── replace_for_date() → DELETE + INSERT in one transaction        │
//! │         Readers see the old set or the new set, never a mixture.       │
//! │                                                                         │
//! │  3. QUERIED                                                            │
//! │     └── find_for_date(filter) → WHERE clauses built per filter field  │
//! │                                                                         │
//! │  4. CLEARED                                                            │
//! │     └── delete_for_date() → back to EMPTY                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every filter field is pushed down to SQL; the stored `transaction_data`
//! column is the same JSON the in-memory filter searches, so both paths
//! agree on what a free-text search matches.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use tally_core::clock::Tz;
use tally_core::{TransactionFilter, TransactionKind, TransactionRecord};

const SELECT_CACHED: &str = r#"
    SELECT
        id, transaction_date, occurred_at_ms, transaction_type,
        receipt_id, ticket_id, terminal, cashier, amount_cents,
        transaction_data, cached_at
    FROM till_review_cache
    WHERE transaction_date = "#;

/// One cached row: the queryable projection plus the full record as JSON.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CachedTransaction {
    pub id: i64,
    pub transaction_date: NaiveDate,
    pub occurred_at_ms: i64,
    pub transaction_type: TransactionKind,
    pub receipt_id: Option<String>,
    pub ticket_id: Option<String>,
    pub terminal: Option<String>,
    pub cashier: Option<String>,
    pub amount_cents: i64,
    pub transaction_data: String,
    pub cached_at: DateTime<Utc>,
}

impl CachedTransaction {
    /// Decodes the stored record.
    pub fn record(&self) -> DbResult<TransactionRecord> {
        Ok(serde_json::from_str(&self.transaction_data)?)
    }
}

/// Repository for the till-review transaction cache.
#[derive(Debug, Clone)]
pub struct TransactionCacheRepository {
    pool: SqlitePool,
}

impl TransactionCacheRepository {
    /// Creates a new TransactionCacheRepository.
    pub fn new(pool: SqlitePool) -> Self {
        TransactionCacheRepository { pool }
    }

    /// Replaces every cached row for `date` with `records`.
    ///
    /// Runs in one transaction. Returns the number of rows written.
    pub async fn replace_for_date(
        &self,
        date: NaiveDate,
        records: &[TransactionRecord],
    ) -> DbResult<usize> {
        debug!(%date, count = records.len(), "Replacing cached transactions");

        let cached_at = Utc::now();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM till_review_cache WHERE transaction_date = ?1")
            .bind(date)
            .execute(&mut *tx)
            .await?;

        for record in records {
            let data = serde_json::to_string(record)?;

            sqlx::query(
                r#"
                INSERT INTO till_review_cache (
                    transaction_date, occurred_at_ms, transaction_type,
                    receipt_id, ticket_id, terminal, cashier, amount_cents,
                    transaction_data, cached_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(date)
            .bind(record.occurred_at.timestamp_millis())
            .bind(record.kind())
            .bind(record.receipt_id())
            .bind(record.ticket_ref())
            .bind(record.terminal.as_deref())
            .bind(record.cashier.as_deref())
            .bind(record.amount.cents())
            .bind(data)
            .bind(cached_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(records.len())
    }

    /// Number of cached rows of any type for `date`.
    pub async fn count_for_date(&self, date: NaiveDate) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM till_review_cache WHERE transaction_date = ?1")
                .bind(date)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// Number of cached receipts for `date`.
    pub async fn count_receipts_for_date(&self, date: NaiveDate) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM till_review_cache
            WHERE transaction_date = ?1 AND transaction_type = ?2
            "#,
        )
        .bind(date)
        .bind(TransactionKind::Receipt)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Cached rows for `date` matching `filter`, oldest first.
    ///
    /// Time-of-day bounds are read in `tz`, the till's time zone.
    pub async fn find_rows_for_date(
        &self,
        date: NaiveDate,
        filter: &TransactionFilter,
        tz: Tz,
    ) -> DbResult<Vec<CachedTransaction>> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_CACHED);
        query.push_bind(date);

        if let Some(kind) = filter.kind {
            query.push(" AND transaction_type = ").push_bind(kind);
        }
        if let Some(terminal) = filter.terminal() {
            query.push(" AND terminal = ").push_bind(terminal.to_string());
        }
        if let Some(cashier) = filter.cashier() {
            query.push(" AND cashier = ").push_bind(cashier.to_string());
        }

        let window = filter.time_window(date, tz);
        if let Some(from) = window.from {
            query
                .push(" AND occurred_at_ms >= ")
                .push_bind(from.timestamp_millis());
        }
        if let Some(to) = window.to {
            query
                .push(" AND occurred_at_ms <= ")
                .push_bind(to.timestamp_millis());
        }

        if let Some(payment_type) = filter.payment_type() {
            query
                .push(" AND json_extract(transaction_data, '$.payment_type') = ")
                .push_bind(payment_type.to_string());
        }
        if let Some(min) = filter.min_amount {
            query.push(" AND amount_cents >= ").push_bind(min.cents());
        }
        if let Some(max) = filter.max_amount {
            query.push(" AND amount_cents <= ").push_bind(max.cents());
        }
        if let Some(needle) = filter.search_needle() {
            query
                .push(" AND instr(lower(transaction_data), ")
                .push_bind(needle)
                .push(") > 0");
        }

        query.push(" ORDER BY occurred_at_ms ASC, id ASC");

        let rows = query
            .build_query_as::<CachedTransaction>()
            .fetch_all(&self.pool)
            .await?;

        debug!(%date, rows = rows.len(), "Loaded cached transactions");

        Ok(rows)
    }

    /// Cached records for `date` matching `filter`, oldest first.
    pub async fn find_for_date(
        &self,
        date: NaiveDate,
        filter: &TransactionFilter,
        tz: Tz,
    ) -> DbResult<Vec<TransactionRecord>> {
        self.find_rows_for_date(date, filter, tz)
            .await?
            .iter()
            .map(CachedTransaction::record)
            .collect()
    }

    /// Deletes every cached row for `date`. Returns how many were removed.
    pub async fn delete_for_date(&self, date: NaiveDate) -> DbResult<u64> {
        debug!(%date, "Clearing cached transactions");

        let result = sqlx::query("DELETE FROM till_review_cache WHERE transaction_date = ?1")
            .bind(date)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Every terminal seen in the cache, across all dates, sorted.
    pub async fn distinct_terminals(&self) -> DbResult<Vec<String>> {
        let terminals: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT terminal FROM till_review_cache
            WHERE terminal IS NOT NULL AND terminal <> ''
            ORDER BY terminal
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(terminals)
    }

    /// Every cashier seen in the cache, across all dates, sorted.
    pub async fn distinct_cashiers(&self) -> DbResult<Vec<String>> {
        let cashiers: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT cashier FROM till_review_cache
            WHERE cashier IS NOT NULL AND cashier <> ''
            ORDER BY cashier
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(cashiers)
    }
}
