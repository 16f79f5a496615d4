//! # Denominations
//!
//! The nine euro denominations a till is counted in, and the count sheet.
//!
//! ```text
//! Notes:  €50  €20  €10  €5
//! Coins:  €2   €1   €0.50  €0.20  €0.10
//! ```
//!
//! 1c and 5c coins are not counted; tills bag them separately.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

/// A counted denomination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Denomination {
    Fifty,
    Twenty,
    Ten,
    Five,
    Two,
    One,
    FiftyCent,
    TwentyCent,
    TenCent,
}

impl Denomination {
    /// All denominations, largest first.
    pub const ALL: [Denomination; 9] = [
        Denomination::Fifty,
        Denomination::Twenty,
        Denomination::Ten,
        Denomination::Five,
        Denomination::Two,
        Denomination::One,
        Denomination::FiftyCent,
        Denomination::TwentyCent,
        Denomination::TenCent,
    ];

    /// Face value of one note or coin.
    pub const fn face_value(&self) -> Money {
        Money::from_cents(match self {
            Denomination::Fifty => 5_000,
            Denomination::Twenty => 2_000,
            Denomination::Ten => 1_000,
            Denomination::Five => 500,
            Denomination::Two => 200,
            Denomination::One => 100,
            Denomination::FiftyCent => 50,
            Denomination::TwentyCent => 20,
            Denomination::TenCent => 10,
        })
    }

    /// Field name used in storage and input payloads.
    pub const fn field_name(&self) -> &'static str {
        match self {
            Denomination::Fifty => "cash_50",
            Denomination::Twenty => "cash_20",
            Denomination::Ten => "cash_10",
            Denomination::Five => "cash_5",
            Denomination::Two => "cash_2",
            Denomination::One => "cash_1",
            Denomination::FiftyCent => "cash_50c",
            Denomination::TwentyCent => "cash_20c",
            Denomination::TenCent => "cash_10c",
        }
    }

    pub const fn is_note(&self) -> bool {
        matches!(
            self,
            Denomination::Fifty | Denomination::Twenty | Denomination::Ten | Denomination::Five
        )
    }
}

/// Number of notes/coins counted per denomination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DenominationCounts {
    pub cash_50: i64,
    pub cash_20: i64,
    pub cash_10: i64,
    pub cash_5: i64,
    pub cash_2: i64,
    pub cash_1: i64,
    pub cash_50c: i64,
    pub cash_20c: i64,
    pub cash_10c: i64,
}

impl DenominationCounts {
    pub fn get(&self, denomination: Denomination) -> i64 {
        match denomination {
            Denomination::Fifty => self.cash_50,
            Denomination::Twenty => self.cash_20,
            Denomination::Ten => self.cash_10,
            Denomination::Five => self.cash_5,
            Denomination::Two => self.cash_2,
            Denomination::One => self.cash_1,
            Denomination::FiftyCent => self.cash_50c,
            Denomination::TwentyCent => self.cash_20c,
            Denomination::TenCent => self.cash_10c,
        }
    }

    pub fn set(&mut self, denomination: Denomination, count: i64) {
        let slot = match denomination {
            Denomination::Fifty => &mut self.cash_50,
            Denomination::Twenty => &mut self.cash_20,
            Denomination::Ten => &mut self.cash_10,
            Denomination::Five => &mut self.cash_5,
            Denomination::Two => &mut self.cash_2,
            Denomination::One => &mut self.cash_1,
            Denomination::FiftyCent => &mut self.cash_50c,
            Denomination::TwentyCent => &mut self.cash_20c,
            Denomination::TenCent => &mut self.cash_10c,
        };
        *slot = count;
    }

    /// Iterates `(denomination, count)` largest first.
    pub fn iter(&self) -> impl Iterator<Item = (Denomination, i64)> + '_ {
        Denomination::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    /// Σ count × face value over all nine denominations.
    pub fn total(&self) -> Money {
        self.iter().map(|(d, n)| d.face_value() * n).sum()
    }

    /// Value held in notes (€50 to €5).
    pub fn notes_total(&self) -> Money {
        self.iter()
            .filter(|(d, _)| d.is_note())
            .map(|(d, n)| d.face_value() * n)
            .sum()
    }

    /// Value held in coins (€2 to €0.10).
    pub fn coins_total(&self) -> Money {
        self.iter()
            .filter(|(d, _)| !d.is_note())
            .map(|(d, n)| d.face_value() * n)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> DenominationCounts {
        DenominationCounts {
            cash_50: 2,
            cash_20: 5,
            cash_10: 3,
            cash_5: 4,
            cash_2: 6,
            cash_1: 7,
            cash_50c: 3,
            cash_20c: 4,
            cash_10c: 9,
        }
    }

    #[test]
    fn test_total_matches_face_value_formula() {
        // 100 + 100 + 30 + 20 + 12 + 7 + 1.50 + 0.80 + 0.90
        assert_eq!(sheet().total().cents(), 27_220);
    }

    #[test]
    fn test_notes_and_coins_partition_total() {
        let counts = sheet();
        assert_eq!(counts.notes_total().cents(), 25_000);
        assert_eq!(counts.coins_total().cents(), 2_220);
        assert_eq!(counts.notes_total() + counts.coins_total(), counts.total());
    }

    #[test]
    fn test_set_and_get_every_slot() {
        let mut counts = DenominationCounts::default();
        for (i, d) in Denomination::ALL.into_iter().enumerate() {
            counts.set(d, i as i64 + 1);
        }
        for (i, d) in Denomination::ALL.into_iter().enumerate() {
            assert_eq!(counts.get(d), i as i64 + 1);
        }
        assert_eq!(counts.cash_10c, 9);
    }

    #[test]
    fn test_empty_sheet_is_zero() {
        assert!(DenominationCounts::default().total().is_zero());
    }
}
