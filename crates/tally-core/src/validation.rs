//! # Validation Module
//!
//! Input validation for day-review filters and reconciliation saves.
//!
//! ## Where It Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  caller input ──► THIS MODULE ──► service ──► SQLite constraints        │
//! │                                                                         │
//! │  A save that fails here never opens a database transaction.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveTime;

use crate::error::ValidationError;
use crate::filter::TransactionFilter;
use crate::money::Money;
use crate::types::ReconciliationInput;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest free-text search accepted.
pub const MAX_SEARCH_LEN: usize = 100;

/// Longest reconciliation note accepted.
pub const MAX_NOTE_LEN: usize = 1000;

/// Longest payee name or payment description accepted.
pub const MAX_PAYEE_FIELD_LEN: usize = 255;

/// Most notes or coins of one denomination a till count may hold.
pub const MAX_DENOMINATION_COUNT: i64 = 1_000_000;

/// Largest float, tender or payment amount a reconciliation may record.
pub const MAX_RECONCILED_AMOUNT: Money = Money::from_cents(1_000_000_000);

/// Payment types the review screen filters on.
pub const FILTERABLE_PAYMENT_TYPES: [&str; 4] = ["cash", "magcard", "free", "debt"];

// =============================================================================
// Filters
// =============================================================================

/// Validates a day-review filter.
pub fn validate_filter(filter: &TransactionFilter) -> ValidationResult<()> {
    if let Some(search) = filter.search.as_deref() {
        if search.trim().chars().count() > MAX_SEARCH_LEN {
            return Err(ValidationError::TooLong {
                field: "search".to_string(),
                max: MAX_SEARCH_LEN,
            });
        }
    }

    if let Some(payment_type) = filter.payment_type() {
        if !FILTERABLE_PAYMENT_TYPES.contains(&payment_type) {
            return Err(ValidationError::NotAllowed {
                field: "payment_type".to_string(),
                allowed: FILTERABLE_PAYMENT_TYPES.iter().map(|s| s.to_string()).collect(),
            });
        }
    }

    non_negative("min_amount", filter.min_amount)?;
    non_negative("max_amount", filter.max_amount)?;

    if let (Some(min), Some(max)) = (filter.min_amount, filter.max_amount) {
        if min > max {
            return Err(ValidationError::InvertedRange {
                low: "min_amount".to_string(),
                high: "max_amount".to_string(),
            });
        }
    }

    Ok(())
}

/// Parses a till-local time of day written as `HH:MM`.
///
/// ## Example
/// ```rust
/// use tally_core::validation::parse_time_of_day;
///
/// assert!(parse_time_of_day("time_from", "09:30").is_ok());
/// assert!(parse_time_of_day("time_from", "9.30").is_err());
/// ```
pub fn parse_time_of_day(field: &str, value: &str) -> ValidationResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "expected HH:MM".to_string(),
    })
}

// =============================================================================
// Reconciliation Input
// =============================================================================

/// Validates a reconciliation save before anything is written.
///
/// ## Rules
/// - Denomination counts are whole numbers in `0..=MAX_DENOMINATION_COUNT`
/// - Floats, tenders and payment amounts are in `0..=MAX_RECONCILED_AMOUNT`
/// - Notes ≤ 1000 characters; payee name and description ≤ 255
pub fn validate_reconciliation_input(input: &ReconciliationInput) -> ValidationResult<()> {
    for (denomination, count) in input.counts().iter() {
        if count < 0 {
            return Err(ValidationError::MustNotBeNegative {
                field: denomination.field_name().to_string(),
            });
        }
        if count > MAX_DENOMINATION_COUNT {
            return Err(ValidationError::TooLarge {
                field: denomination.field_name().to_string(),
                max: MAX_DENOMINATION_COUNT.to_string(),
            });
        }
    }

    let amounts = [
        ("note_float", input.note_float),
        ("coin_float", input.coin_float),
        ("card", input.card),
        ("cash_back", input.cash_back),
        ("cheque", input.cheque),
        ("debt", input.debt),
        ("debt_paid_cash", input.debt_paid_cash),
        ("debt_paid_cheque", input.debt_paid_cheque),
        ("debt_paid_card", input.debt_paid_card),
        ("free", input.free),
        ("voucher_used", input.voucher_used),
        ("money_added", input.money_added),
    ];
    for (field, amount) in amounts {
        reconciled_amount(field, amount)?;
    }

    if let Some(notes) = input.notes.as_deref() {
        max_chars("notes", notes, MAX_NOTE_LEN)?;
    }

    for (index, payment) in input.payments.iter().flatten().enumerate() {
        reconciled_amount(&format!("payments.{index}.amount"), payment.amount)?;
        if let Some(name) = payment.payee_name.as_deref() {
            max_chars(&format!("payments.{index}.payee_name"), name, MAX_PAYEE_FIELD_LEN)?;
        }
        if let Some(description) = payment.description.as_deref() {
            max_chars(
                &format!("payments.{index}.description"),
                description,
                MAX_PAYEE_FIELD_LEN,
            )?;
        }
    }

    Ok(())
}

fn non_negative(field: &str, amount: Option<Money>) -> ValidationResult<()> {
    match amount {
        Some(value) if value.is_negative() => Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        }),
        _ => Ok(()),
    }
}

fn reconciled_amount(field: &str, amount: Option<Money>) -> ValidationResult<()> {
    non_negative(field, amount)?;
    match amount {
        Some(value) if value > MAX_RECONCILED_AMOUNT => Err(ValidationError::TooLarge {
            field: field.to_string(),
            max: MAX_RECONCILED_AMOUNT.to_string(),
        }),
        _ => Ok(()),
    }
}

fn max_chars(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentInput;

    #[test]
    fn test_filter_rules() {
        assert!(validate_filter(&TransactionFilter::none()).is_ok());
        assert!(validate_filter(&TransactionFilter::none().with_payment_type("cash")).is_ok());
        assert!(matches!(
            validate_filter(&TransactionFilter::none().with_payment_type("bitcoin")),
            Err(ValidationError::NotAllowed { .. })
        ));
        assert!(matches!(
            validate_filter(&TransactionFilter::none().with_search("x".repeat(101))),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(matches!(
            validate_filter(
                &TransactionFilter::none().with_amount_range(Some(Money::from_cents(-1)), None)
            ),
            Err(ValidationError::MustNotBeNegative { .. })
        ));
        assert!(matches!(
            validate_filter(&TransactionFilter::none().with_amount_range(
                Some(Money::from_cents(500)),
                Some(Money::from_cents(100))
            )),
            Err(ValidationError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(
            parse_time_of_day("time_from", "14:05").unwrap(),
            NaiveTime::from_hms_opt(14, 5, 0).unwrap()
        );
        assert!(parse_time_of_day("time_from", "25:00").is_err());
        assert!(parse_time_of_day("time_to", "noon").is_err());
    }

    #[test]
    fn test_negative_count_rejected() {
        let input = ReconciliationInput {
            cash_20c: Some(-1),
            ..Default::default()
        };
        match validate_reconciliation_input(&input) {
            Err(ValidationError::MustNotBeNegative { field }) => assert_eq!(field, "cash_20c"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_negative_amount_rejected() {
        let input = ReconciliationInput {
            money_added: Some(Money::from_cents(-100)),
            ..Default::default()
        };
        assert!(validate_reconciliation_input(&input).is_err());
    }

    #[test]
    fn test_oversized_values_rejected() {
        let input = ReconciliationInput {
            cash_50: Some(i64::MAX / 1000),
            ..Default::default()
        };
        match validate_reconciliation_input(&input) {
            Err(ValidationError::TooLarge { field, .. }) => assert_eq!(field, "cash_50"),
            other => panic!("unexpected: {other:?}"),
        }

        let input = ReconciliationInput {
            cash_50: Some(MAX_DENOMINATION_COUNT),
            note_float: Some(MAX_RECONCILED_AMOUNT),
            ..Default::default()
        };
        assert!(validate_reconciliation_input(&input).is_ok());

        let input = ReconciliationInput {
            payments: Some(vec![PaymentInput {
                amount: Some(Money::from_cents(i64::MAX)),
                ..Default::default()
            }]),
            ..Default::default()
        };
        match validate_reconciliation_input(&input) {
            Err(ValidationError::TooLarge { field, .. }) => assert_eq!(field, "payments.0.amount"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_text_limits() {
        let input = ReconciliationInput {
            notes: Some("n".repeat(1001)),
            ..Default::default()
        };
        assert!(validate_reconciliation_input(&input).is_err());

        let input = ReconciliationInput {
            payments: Some(vec![PaymentInput {
                payee_name: Some("p".repeat(256)),
                amount: Some(Money::from_cents(100)),
                ..Default::default()
            }]),
            ..Default::default()
        };
        assert!(matches!(
            validate_reconciliation_input(&input),
            Err(ValidationError::TooLong { max: 255, .. })
        ));
    }

    #[test]
    fn test_valid_input_passes() {
        let input = ReconciliationInput {
            cash_50: Some(4),
            card: Some(Money::from_cents(25_000)),
            notes: Some("All good".to_string()),
            payments: Some(vec![PaymentInput {
                supplier_id: Some(3),
                amount: Some(Money::from_cents(5_000)),
                ..Default::default()
            }]),
            ..Default::default()
        };
        assert!(validate_reconciliation_input(&input).is_ok());
    }
}
