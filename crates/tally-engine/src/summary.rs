//! # Daily Summary Service
//!
//! Returns the stored daily summary when it still agrees with the cache,
//! otherwise rebuilds it.
//!
//! ## Staleness Check
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cached receipts == 0  AND  POS receipts > 0                           │
//! │      → cache missing: drop summary, rebuild cache from POS             │
//! │                                                                         │
//! │  stored summary absent                                                 │
//! │      → generate                                                        │
//! │                                                                         │
//! │  stored.total_transactions != cached receipts                          │
//! │      → stale: drop and generate                                        │
//! │                                                                         │
//! │  otherwise → return stored summary                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is no version column. The receipt count is the only freshness signal,
//! so a rebuild that dies half way corrects itself on the next read.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::TransactionCacheManager;
use crate::error::EngineResult;
use crate::gateway::PosGateway;
use tally_core::summary::aggregate;
use tally_core::{DailySummary, TransactionFilter};
use tally_db::Database;

#[derive(Clone)]
pub struct DailySummaryService {
    gateway: Arc<dyn PosGateway>,
    db: Database,
    cache: TransactionCacheManager,
}

impl DailySummaryService {
    pub fn new(gateway: Arc<dyn PosGateway>, db: Database, cache: TransactionCacheManager) -> Self {
        DailySummaryService { gateway, db, cache }
    }

    /// The summary for `date`, regenerated first if it is missing or stale.
    pub async fn get_daily_summary(&self, date: NaiveDate) -> EngineResult<DailySummary> {
        let summaries = self.db.summaries();
        let mut cached_receipts = self.db.transactions().count_receipts_for_date(date).await?;

        if cached_receipts == 0 {
            let live = self.gateway.receipt_count_for_date(date).await?;
            if live > 0 {
                info!(%date, live, "Transaction cache missing, rebuilding before summary");
                summaries.delete(date).await?;
                self.cache.rebuild(date).await?;
                cached_receipts = self.db.transactions().count_receipts_for_date(date).await?;
            }
        }

        match summaries.get(date).await? {
            Some(stored) if stored.total_transactions == cached_receipts => {
                debug!(%date, receipts = cached_receipts, "Serving stored summary");
                return Ok(stored);
            }
            Some(stored) => {
                warn!(
                    %date,
                    stored = stored.total_transactions,
                    cached = cached_receipts,
                    "Daily summary is stale, regenerating"
                );
                summaries.delete(date).await?;
            }
            None => {
                info!(%date, "No daily summary stored, generating");
            }
        }

        self.generate(date).await
    }

    /// Aggregates the cached day and stores the result over any prior summary.
    pub async fn generate(&self, date: NaiveDate) -> EngineResult<DailySummary> {
        let records = self
            .cache
            .get_transactions_for_date(date, &TransactionFilter::none())
            .await?;

        let summary = aggregate(date, &records, self.cache.time_zone());
        self.db.summaries().replace(&summary).await?;

        info!(
            %date,
            transactions = summary.total_transactions,
            total_sales = %summary.total_sales,
            "Daily summary generated"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, day, receipt, seed_day, setup};
    use tally_core::clock::utc;
    use tally_core::Money;

    async fn service() -> (Arc<crate::gateway::InMemoryPosGateway>, Database, DailySummaryService) {
        let (pos, db) = setup().await;
        let cache = TransactionCacheManager::new(pos.clone(), db.clone(), utc());
        let service = DailySummaryService::new(pos.clone(), db.clone(), cache);
        (pos, db, service)
    }

    #[tokio::test]
    async fn test_summary_from_cold_cache() {
        let (pos, db, service) = service().await;
        seed_day(&pos).await;

        let summary = service.get_daily_summary(day()).await.unwrap();

        assert_eq!(summary.total_transactions, 3);
        assert_eq!(summary.total_sales, Money::from_cents(4_050));
        assert_eq!(summary.cash_total, Money::from_cents(1_550));
        assert_eq!(summary.card_total, Money::from_cents(2_500));
        assert_eq!(summary.drawer_opens, 2);
        assert_eq!(summary.no_sales, 1);
        assert_eq!(summary.voided_items_count, 1);
        assert_eq!(summary.terminal_breakdown["TILL-1"].count, 2);
        assert_eq!(summary.hourly_breakdown["11"].total, Money::from_cents(2_500));
        assert!(db.summaries().get(day()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stale_summary_regenerated() {
        let (pos, db, service) = service().await;
        seed_day(&pos).await;

        let mut stale = DailySummary::empty(day());
        stale.total_transactions = 99;
        db.summaries().replace(&stale).await.unwrap();
        service
            .cache
            .get_transactions_for_date(day(), &TransactionFilter::none())
            .await
            .unwrap();

        let summary = service.get_daily_summary(day()).await.unwrap();
        assert_eq!(summary.total_transactions, 3);
    }

    #[tokio::test]
    async fn test_matching_summary_returned_as_stored() {
        let (pos, _db, service) = service().await;
        seed_day(&pos).await;

        let first = service.get_daily_summary(day()).await.unwrap();
        pos.set_unavailable(true).await;
        let second = service.get_daily_summary(day()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_refresh_then_summary_tracks_live_count() {
        let (pos, db, service) = service().await;
        seed_day(&pos).await;
        service.get_daily_summary(day()).await.unwrap();

        pos.add_receipt(receipt("r-4", at(day(), 16, 0), "TILL-2", "TILL-2-2024-03-01", "Brian", "free", 300))
            .await;

        for _ in 0..3 {
            service.cache.refresh_cache(day()).await.unwrap();
        }
        let summary = service.get_daily_summary(day()).await.unwrap();

        assert_eq!(summary.total_transactions, 4);
        assert_eq!(summary.free_total, Money::from_cents(300));
        assert_eq!(
            db.transactions().count_receipts_for_date(day()).await.unwrap(),
            summary.total_transactions
        );
    }

    #[tokio::test]
    async fn test_empty_day() {
        let (_pos, _db, service) = service().await;
        let summary = service.get_daily_summary(day()).await.unwrap();
        assert_eq!(summary.total_transactions, 0);
        assert!(summary.total_sales.is_zero());
    }
}
