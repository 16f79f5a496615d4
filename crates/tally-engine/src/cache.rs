//! # Transaction Cache Manager
//!
//! Serves a day's transactions from the local cache, building the cache
//! from the POS on first read.
//!
//! ## Read Path
//! ```text
//! get_transactions_for_date(date, filter)
//!         │
//!         ▼
//!   validate filter ──► Err(Validation)
//!         │
//!   cached rows for date? (unfiltered count)
//!     │ yes                         │ no
//!     ▼                             ▼
//!   filter in SQL            receipts + removed lines + drawer events
//!     │                             │  (POS gateway)
//!     │                             ▼
//!     │                       assemble_day (stable sort by time)
//!     │                             │
//!     │                       replace_for_date (one transaction)
//!     │                             │
//!     │                       filter in memory
//!     ▼                             ▼
//!            ordered Vec<TransactionRecord>
//! ```
//!
//! A filter that matches nothing in a populated cache returns an empty list;
//! it never triggers a refetch.

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::EngineResult;
use crate::gateway::PosGateway;
use tally_core::clock::Tz;
use tally_core::normalize::assemble_day;
use tally_core::validation::validate_filter;
use tally_core::{TransactionFilter, TransactionRecord};
use tally_db::Database;

/// Cache-first access to a day's transactions.
#[derive(Clone)]
pub struct TransactionCacheManager {
    gateway: Arc<dyn PosGateway>,
    db: Database,
    tz: Tz,
}

impl TransactionCacheManager {
    pub fn new(gateway: Arc<dyn PosGateway>, db: Database, tz: Tz) -> Self {
        TransactionCacheManager {
            gateway,
            db,
            tz,
        }
    }

    /// The day's transactions matching `filter`, ascending by time.
    pub async fn get_transactions_for_date(
        &self,
        date: NaiveDate,
        filter: &TransactionFilter,
    ) -> EngineResult<Vec<TransactionRecord>> {
        validate_filter(filter)?;

        let cache = self.db.transactions();
        if cache.count_for_date(date).await? > 0 {
            debug!(%date, "Serving transactions from cache");
            return Ok(cache.find_for_date(date, filter, self.tz).await?);
        }

        let records = self.rebuild(date).await?;
        Ok(filter.apply(records, date, self.tz))
    }

    /// Fetches the day from the POS and replaces whatever the cache holds.
    ///
    /// Returns the full, unfiltered day.
    pub async fn rebuild(&self, date: NaiveDate) -> EngineResult<Vec<TransactionRecord>> {
        let receipts = self.gateway.receipts_for_date(date).await?;
        let removed = self.gateway.removed_lines_for_date(date).await?;
        let drawer = self.gateway.drawer_events_for_date(date).await?;

        let records = assemble_day(&receipts, &removed, &drawer);
        let stored = self.db.transactions().replace_for_date(date, &records).await?;

        info!(
            %date,
            receipts = receipts.len(),
            removed_lines = removed.len(),
            drawer_events = drawer.len(),
            stored,
            "Rebuilt transaction cache"
        );

        Ok(records)
    }

    /// Drops the cached transactions and the summary for `date`.
    ///
    /// The next read rebuilds both from the POS.
    pub async fn refresh_cache(&self, date: NaiveDate) -> EngineResult<()> {
        let removed = self.db.transactions().delete_for_date(date).await?;
        let had_summary = self.db.summaries().delete(date).await?;
        info!(%date, removed, had_summary, "Cache refreshed");
        Ok(())
    }

    /// Terminals seen in the cache, or the POS closing hosts when the cache is empty.
    pub async fn terminals(&self) -> EngineResult<Vec<String>> {
        let cached = self.db.transactions().distinct_terminals().await?;
        if !cached.is_empty() {
            return Ok(cached);
        }
        Ok(self.gateway.terminals().await?)
    }

    /// Cashiers seen in the cache, or the POS cashier list when the cache is empty.
    pub async fn cashiers(&self) -> EngineResult<Vec<String>> {
        let cached = self.db.transactions().distinct_cashiers().await?;
        if !cached.is_empty() {
            return Ok(cached);
        }
        Ok(self.gateway.cashiers().await?)
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }
}
