//! # Till Engine
//!
//! One handle over the three services, wired to a shared database and POS
//! gateway. Host applications hold a `TillEngine` and call through it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::cache::TransactionCacheManager;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::gateway::PosGateway;
use crate::job::{CacheDayJob, CacheDayReport};
use crate::reconciliation::ReconciliationService;
use crate::summary::DailySummaryService;
use tally_core::clock::Tz;
use tally_core::validation::validate_filter;
use tally_core::{Actor, ActorContext, DailySummary, TransactionFilter, TransactionRecord};
use tally_db::{Database, NewReviewAudit};

/// Where a review request came from, for the audit trail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewOrigin {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Everything the till-review screen shows for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayReview {
    pub date: NaiveDate,
    pub filters: TransactionFilter,
    pub transactions: Vec<TransactionRecord>,
    pub summary: DailySummary,
    /// Choices for the terminal filter.
    pub terminals: Vec<String>,
    /// Choices for the cashier filter.
    pub cashiers: Vec<String>,
}

#[derive(Clone)]
pub struct TillEngine {
    db: Database,
    system_actor: Actor,
    cache: TransactionCacheManager,
    summaries: DailySummaryService,
    reconciliations: ReconciliationService,
}

impl TillEngine {
    /// Opens the configured database and wires the services to `gateway`.
    pub async fn new(config: &EngineConfig, gateway: Arc<dyn PosGateway>) -> EngineResult<Self> {
        config.validate()?;
        let db = Database::new(config.db_config()).await?;
        info!(path = ?config.database.path, time_zone = %config.locale.time_zone, "Till engine ready");
        Ok(Self::with_database(
            gateway,
            db,
            config.time_zone()?,
            config.system_actor(),
        ))
    }

    /// Wires the services over an already opened database.
    pub fn with_database(
        gateway: Arc<dyn PosGateway>,
        db: Database,
        tz: Tz,
        system_actor: Actor,
    ) -> Self {
        let cache = TransactionCacheManager::new(gateway.clone(), db.clone(), tz);
        let summaries = DailySummaryService::new(gateway.clone(), db.clone(), cache.clone());
        let reconciliations = ReconciliationService::new(gateway, db.clone(), system_actor.clone());

        TillEngine {
            db,
            system_actor,
            cache,
            summaries,
            reconciliations,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn cache(&self) -> &TransactionCacheManager {
        &self.cache
    }

    pub fn summaries(&self) -> &DailySummaryService {
        &self.summaries
    }

    pub fn reconciliations(&self) -> &ReconciliationService {
        &self.reconciliations
    }

    /// Loads a day for review and records who looked at it.
    ///
    /// The audit entry is written before anything is read, so a review that
    /// fails part way is still on record.
    pub async fn review_day(
        &self,
        date: NaiveDate,
        filters: &TransactionFilter,
        ctx: &ActorContext,
        origin: &ReviewOrigin,
    ) -> EngineResult<DayReview> {
        validate_filter(filters)?;

        let mut entry = NewReviewAudit::view(
            ctx.performed_by(&self.system_actor),
            date,
            filters.clone(),
        );
        entry.ip_address = origin.ip_address.clone();
        entry.user_agent = origin.user_agent.clone();
        self.db.audit().record(&entry).await?;

        let transactions = self.cache.get_transactions_for_date(date, filters).await?;
        let summary = self.summaries.get_daily_summary(date).await?;
        let terminals = self.cache.terminals().await?;
        let cashiers = self.cache.cashiers().await?;

        Ok(DayReview {
            date,
            filters: filters.clone(),
            transactions,
            summary,
            terminals,
            cashiers,
        })
    }

    /// Runs a [`CacheDayJob`] against this engine's services.
    pub async fn cache_day(&self, job: CacheDayJob) -> EngineResult<CacheDayReport> {
        job.run(&self.cache, &self.summaries).await
    }
}
