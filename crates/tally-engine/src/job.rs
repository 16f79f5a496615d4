//! # Cache-Day Job
//!
//! One-shot warm-up for a business date: optionally clears what is cached,
//! then builds the transaction cache and the daily summary.
//! Meant to be run by a scheduler after the tills close.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::cache::TransactionCacheManager;
use crate::error::EngineResult;
use crate::summary::DailySummaryService;
use tally_core::{Money, TransactionFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDayJob {
    pub date: NaiveDate,
    /// Drop the cached day and its summary first.
    pub clear_existing: bool,
}

/// Outcome of a finished [`CacheDayJob`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDayReport {
    pub date: NaiveDate,
    pub transaction_count: usize,
    pub total_sales: Money,
}

impl CacheDayJob {
    pub fn new(date: NaiveDate) -> Self {
        CacheDayJob {
            date,
            clear_existing: false,
        }
    }

    pub fn clear_existing(mut self, clear: bool) -> Self {
        self.clear_existing = clear;
        self
    }

    pub async fn run(
        &self,
        cache: &TransactionCacheManager,
        summaries: &DailySummaryService,
    ) -> EngineResult<CacheDayReport> {
        info!(date = %self.date, clear_existing = self.clear_existing, "Cache-day job started");

        match self.execute(cache, summaries).await {
            Ok(report) => {
                info!(
                    date = %report.date,
                    transactions = report.transaction_count,
                    total_sales = %report.total_sales,
                    "Cache-day job finished"
                );
                Ok(report)
            }
            Err(e) => {
                error!(date = %self.date, error = %e, "Cache-day job failed");
                Err(e)
            }
        }
    }

    async fn execute(
        &self,
        cache: &TransactionCacheManager,
        summaries: &DailySummaryService,
    ) -> EngineResult<CacheDayReport> {
        if self.clear_existing {
            cache.refresh_cache(self.date).await?;
        }

        let records = cache
            .get_transactions_for_date(self.date, &TransactionFilter::none())
            .await?;
        let summary = summaries.get_daily_summary(self.date).await?;

        Ok(CacheDayReport {
            date: self.date,
            transaction_count: records.len(),
            total_sales: summary.total_sales,
        })
    }
}
