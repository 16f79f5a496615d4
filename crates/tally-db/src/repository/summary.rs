//! # Summary Repository
//!
//! At most one [`DailySummary`] per date. Summaries are never patched: a
//! stale one is deleted and a fresh one inserted in its place.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use tally_core::{DailySummary, Money};

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    summary_date: NaiveDate,
    total_sales_cents: i64,
    total_transactions: i64,
    cash_total_cents: i64,
    card_total_cents: i64,
    free_total_cents: i64,
    debt_total_cents: i64,
    other_total_cents: i64,
    drawer_opens: i64,
    no_sales: i64,
    voided_items_count: i64,
    hourly_breakdown: String,
    terminal_breakdown: String,
    cashier_breakdown: String,
}

impl TryFrom<SummaryRow> for DailySummary {
    type Error = DbError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        Ok(DailySummary {
            summary_date: row.summary_date,
            total_sales: Money::from_cents(row.total_sales_cents),
            total_transactions: row.total_transactions,
            cash_total: Money::from_cents(row.cash_total_cents),
            card_total: Money::from_cents(row.card_total_cents),
            free_total: Money::from_cents(row.free_total_cents),
            debt_total: Money::from_cents(row.debt_total_cents),
            other_total: Money::from_cents(row.other_total_cents),
            drawer_opens: row.drawer_opens,
            no_sales: row.no_sales,
            voided_items_count: row.voided_items_count,
            hourly_breakdown: serde_json::from_str(&row.hourly_breakdown)?,
            terminal_breakdown: serde_json::from_str(&row.terminal_breakdown)?,
            cashier_breakdown: serde_json::from_str(&row.cashier_breakdown)?,
        })
    }
}

/// Repository for per-day summaries.
#[derive(Debug, Clone)]
pub struct SummaryRepository {
    pool: SqlitePool,
}

impl SummaryRepository {
    /// Creates a new SummaryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SummaryRepository { pool }
    }

    /// Gets the stored summary for `date`.
    pub async fn get(&self, date: NaiveDate) -> DbResult<Option<DailySummary>> {
        let row: Option<SummaryRow> = sqlx::query_as(
            r#"
            SELECT
                summary_date, total_sales_cents, total_transactions,
                cash_total_cents, card_total_cents, free_total_cents,
                debt_total_cents, other_total_cents,
                drawer_opens, no_sales, voided_items_count,
                hourly_breakdown, terminal_breakdown, cashier_breakdown
            FROM till_review_summaries
            WHERE summary_date = ?1
            "#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DailySummary::try_from).transpose()
    }

    /// Stores `summary`, replacing any summary already held for its date.
    pub async fn replace(&self, summary: &DailySummary) -> DbResult<()> {
        debug!(
            date = %summary.summary_date,
            receipts = summary.total_transactions,
            "Storing daily summary"
        );

        let hourly = serde_json::to_string(&summary.hourly_breakdown)?;
        let terminal = serde_json::to_string(&summary.terminal_breakdown)?;
        let cashier = serde_json::to_string(&summary.cashier_breakdown)?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM till_review_summaries WHERE summary_date = ?1")
            .bind(summary.summary_date)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO till_review_summaries (
                summary_date, total_sales_cents, total_transactions,
                cash_total_cents, card_total_cents, free_total_cents,
                debt_total_cents, other_total_cents,
                drawer_opens, no_sales, voided_items_count,
                hourly_breakdown, terminal_breakdown, cashier_breakdown,
                generated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
        )
        .bind(summary.summary_date)
        .bind(summary.total_sales.cents())
        .bind(summary.total_transactions)
        .bind(summary.cash_total.cents())
        .bind(summary.card_total.cents())
        .bind(summary.free_total.cents())
        .bind(summary.debt_total.cents())
        .bind(summary.other_total.cents())
        .bind(summary.drawer_opens)
        .bind(summary.no_sales)
        .bind(summary.voided_items_count)
        .bind(hourly)
        .bind(terminal)
        .bind(cashier)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Deletes the summary for `date`. Returns whether one existed.
    pub async fn delete(&self, date: NaiveDate) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM till_review_summaries WHERE summary_date = ?1")
            .bind(date)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
