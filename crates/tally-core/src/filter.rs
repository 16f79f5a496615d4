//! # Transaction Filters
//!
//! One filter set used for both read paths: the database applies it as SQL
//! on cached rows, and [`TransactionFilter::matches`] applies the identical
//! predicate in memory right after a day is fetched from the POS.
//!
//! ## Field Semantics
//! ```text
//! kind          exact transaction_type
//! terminal      exact terminal (drawer/removed rows have none, so never match)
//! cashier       exact cashier
//! time_from     occurred_at ≥ date + time_from      (till-local time)
//! time_to       occurred_at ≤ date + time_to + 59.999s (whole minute inclusive)
//! payment_type  exact receipt payment type
//! search        case-insensitive substring of the serialized record
//! min_amount    amount ≥ min
//! max_amount    amount ≤ max
//! ```

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::{local_instant, Tz};
use crate::money::Money;
use crate::types::{TransactionKind, TransactionRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionFilter {
    #[serde(default)]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub terminal: Option<String>,
    #[serde(default)]
    pub cashier: Option<String>,
    #[serde(default)]
    pub time_from: Option<NaiveTime>,
    #[serde(default)]
    pub time_to: Option<NaiveTime>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub min_amount: Option<Money>,
    #[serde(default)]
    pub max_amount: Option<Money>,
}

/// Inclusive UTC window derived from the time-of-day bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    /// No filtering at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_terminal(mut self, terminal: impl Into<String>) -> Self {
        self.terminal = Some(terminal.into());
        self
    }

    pub fn with_cashier(mut self, cashier: impl Into<String>) -> Self {
        self.cashier = Some(cashier.into());
        self
    }

    pub fn with_payment_type(mut self, payment_type: impl Into<String>) -> Self {
        self.payment_type = Some(payment_type.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_time_range(mut self, from: Option<NaiveTime>, to: Option<NaiveTime>) -> Self {
        self.time_from = from;
        self.time_to = to;
        self
    }

    pub fn with_amount_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    /// True when no field restricts the result.
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.terminal().is_none()
            && self.cashier().is_none()
            && self.time_from.is_none()
            && self.time_to.is_none()
            && self.payment_type().is_none()
            && self.search_needle().is_none()
            && self.min_amount.is_none()
            && self.max_amount.is_none()
    }

    /// Terminal to match, ignoring blank input.
    pub fn terminal(&self) -> Option<&str> {
        non_blank(self.terminal.as_deref())
    }

    /// Cashier to match, ignoring blank input.
    pub fn cashier(&self) -> Option<&str> {
        non_blank(self.cashier.as_deref())
    }

    /// Payment type to match, ignoring blank input.
    pub fn payment_type(&self) -> Option<&str> {
        non_blank(self.payment_type.as_deref())
    }

    /// Trimmed, ASCII-lowercased search text. SQLite's `lower()` only folds
    /// ASCII, so both paths fold the same way.
    pub fn search_needle(&self) -> Option<String> {
        non_blank(self.search.as_deref()).map(|s| s.to_ascii_lowercase())
    }

    /// Converts the time-of-day bounds on `date`, read in `tz`, to UTC.
    ///
    /// A bound inside the autumn fold widens the window to cover both
    /// readings of that wall-clock time.
    pub fn time_window(&self, date: NaiveDate, tz: Tz) -> TimeWindow {
        TimeWindow {
            from: self
                .time_from
                .and_then(|time| local_instant(date, time, tz, true)),
            to: self
                .time_to
                .and_then(|time| local_instant(date, time, tz, false))
                .map(|end| end + Duration::milliseconds(59_999)),
        }
    }

    /// Applies every field to one record.
    pub fn matches(&self, record: &TransactionRecord, date: NaiveDate, tz: Tz) -> bool {
        if let Some(kind) = self.kind {
            if record.kind() != kind {
                return false;
            }
        }
        if let Some(terminal) = self.terminal() {
            if record.terminal.as_deref() != Some(terminal) {
                return false;
            }
        }
        if let Some(cashier) = self.cashier() {
            if record.cashier.as_deref() != Some(cashier) {
                return false;
            }
        }

        let window = self.time_window(date, tz);
        if window.from.is_some_and(|from| record.occurred_at < from) {
            return false;
        }
        if window.to.is_some_and(|to| record.occurred_at > to) {
            return false;
        }

        if let Some(payment_type) = self.payment_type() {
            if record.payment_type() != Some(payment_type) {
                return false;
            }
        }
        if self.min_amount.is_some_and(|min| record.amount < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| record.amount > max) {
            return false;
        }

        if let Some(needle) = self.search_needle() {
            let haystack = serde_json::to_string(record)
                .map(|json| json.to_ascii_lowercase())
                .unwrap_or_default();
            if !haystack.contains(&needle) {
                return false;
            }
        }

        true
    }

    /// Keeps the matching records, preserving order.
    pub fn apply(
        &self,
        records: Vec<TransactionRecord>,
        date: NaiveDate,
        tz: Tz,
    ) -> Vec<TransactionRecord> {
        if self.is_empty() {
            return records;
        }
        records
            .into_iter()
            .filter(|r| self.matches(r, date, tz))
            .collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
