//! # Review Audit Repository
//!
//! Append-only log of who opened which day in the till review, and with
//! which filters.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use tally_core::{Actor, TransactionFilter};

/// Action recorded for a plain day view.
pub const ACTION_VIEW: &str = "view";

/// An audit entry to append.
#[derive(Debug, Clone)]
pub struct NewReviewAudit {
    pub actor: Actor,
    pub viewed_date: NaiveDate,
    pub filters: TransactionFilter,
    pub action: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl NewReviewAudit {
    /// A `view` entry with no request metadata.
    pub fn view(actor: Actor, viewed_date: NaiveDate, filters: TransactionFilter) -> Self {
        NewReviewAudit {
            actor,
            viewed_date,
            filters,
            action: ACTION_VIEW.to_string(),
            ip_address: None,
            user_agent: None,
        }
    }
}

/// A stored audit entry. `filters_used` is the filter as JSON.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewAuditEntry {
    pub id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub viewed_date: NaiveDate,
    pub filters_used: String,
    pub action: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ReviewAuditEntry {
    /// Decodes `filters_used`.
    pub fn filters(&self) -> DbResult<TransactionFilter> {
        Ok(serde_json::from_str(&self.filters_used)?)
    }
}

/// Repository for the till-review audit trail.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: SqlitePool,
}

impl AuditRepository {
    pub fn new(pool: SqlitePool) -> Self {
        AuditRepository { pool }
    }

    /// Appends an entry and returns its id.
    pub async fn record(&self, entry: &NewReviewAudit) -> DbResult<i64> {
        debug!(
            user_id = entry.actor.id,
            date = %entry.viewed_date,
            action = %entry.action,
            "Recording review audit"
        );

        let filters = serde_json::to_string(&entry.filters)?;

        let result = sqlx::query(
            r#"
            INSERT INTO till_review_audit (
                user_id, user_name, viewed_date, filters_used, action,
                ip_address, user_agent, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(entry.actor.id)
        .bind(entry.actor.name.as_str())
        .bind(entry.viewed_date)
        .bind(filters)
        .bind(entry.action.as_str())
        .bind(entry.ip_address.as_deref())
        .bind(entry.user_agent.as_deref())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Entries for one reviewed date, newest first.
    pub async fn for_date(&self, viewed_date: NaiveDate) -> DbResult<Vec<ReviewAuditEntry>> {
        let entries = sqlx::query_as::<_, ReviewAuditEntry>(
            r#"
            SELECT id, user_id, user_name, viewed_date, filters_used, action,
                   ip_address, user_agent, created_at
            FROM till_review_audit
            WHERE viewed_date = ?1
            ORDER BY id DESC
            "#,
        )
        .bind(viewed_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// A user's most recent entries.
    pub async fn recent_for_user(&self, user_id: i64, limit: i64) -> DbResult<Vec<ReviewAuditEntry>> {
        let entries = sqlx::query_as::<_, ReviewAuditEntry>(
            r#"
            SELECT id, user_id, user_name, viewed_date, filters_used, action,
                   ip_address, user_agent, created_at
            FROM till_review_audit
            WHERE user_id = ?1
            ORDER BY id DESC
            LIMIT ?2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_record_and_read_back() {
        let repo = Database::new(DbConfig::in_memory()).await.unwrap().audit();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let filter = TransactionFilter::none().with_terminal("TILL-1");

        let mut entry = NewReviewAudit::view(Actor::new(7, "Siobhan"), day, filter.clone());
        entry.ip_address = Some("10.0.0.4".to_string());
        let first = repo.record(&entry).await.unwrap();
        let second = repo
            .record(&NewReviewAudit::view(Actor::system(), day, TransactionFilter::none()))
            .await
            .unwrap();
        assert!(second > first);

        let entries = repo.for_date(day).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].user_name, "system");
        assert_eq!(entries[1].action, ACTION_VIEW);
        assert_eq!(entries[1].ip_address.as_deref(), Some("10.0.0.4"));
        assert_eq!(entries[1].filters().unwrap(), filter);

        assert_eq!(repo.recent_for_user(7, 10).await.unwrap().len(), 1);
    }
}
