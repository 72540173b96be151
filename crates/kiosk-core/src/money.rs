//! # Money Module
//!
//! Provides the `Money` type for catalog prices and configuration totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every price in the catalog is an integer in the smallest unit the      │
//! │  catalog is denominated in. Totals are plain integer sums, so a         │
//! │  configuration always prices identically on every run and platform.   │
//! │                                                                         │
//! │  Formatting (symbol, decimals, digit grouping) happens only at the     │
//! │  edge, in `Money::format`.                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kiosk_core::money::{CurrencyFormat, Money};
//!
//! let base = Money::new(250_000);
//! let total = base + Money::new(15_000);
//! assert_eq!(total.format(&CurrencyFormat::default()), "₹2,65,000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary amount in the catalog's smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: sums never overflow for realistic catalogs and
///   the type matches the rest of the host's integer money
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **No float constructor**: prices come from integer catalog data only
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from an amount in the smallest unit.
    #[inline]
    pub const fn new(amount: i64) -> Self {
        Money(amount)
    }

    /// Returns the amount in the smallest unit.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.0
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative. Catalog validation rejects these.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, returning `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(amount) => Some(Money(amount)),
            None => None,
        }
    }

    /// Adds two amounts, clamping at the bounds of `i64`.
    #[inline]
    pub const fn saturating_add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }

    /// Formats the amount for display.
    ///
    /// ## Example
    /// ```rust
    /// use kiosk_core::money::{CurrencyFormat, DigitGrouping, Money};
    ///
    /// let western = CurrencyFormat {
    ///     symbol: "$".to_string(),
    ///     decimals: 2,
    ///     grouping: DigitGrouping::Western,
    /// };
    /// assert_eq!(Money::new(123_456_789).format(&western), "$1,234,567.89");
    /// ```
    ///
    /// Decimals above [`MAX_CURRENCY_DECIMALS`] are treated as that maximum.
    pub fn format(&self, format: &CurrencyFormat) -> String {
        let decimals = format.decimals.min(MAX_CURRENCY_DECIMALS);
        let divisor = 10_u64.pow(u32::from(decimals));
        let magnitude = self.0.unsigned_abs();
        let whole = group_digits(&(magnitude / divisor).to_string(), format.grouping);

        let mut out = String::new();
        if self.0 < 0 {
            out.push('-');
        }
        out.push_str(&format.symbol);
        out.push_str(&whole);
        if decimals > 0 {
            out.push_str(&format!(
                ".{:0width$}",
                magnitude % divisor,
                width = usize::from(decimals)
            ));
        }
        out
    }
}

/// Inserts group separators into a run of ASCII digits.
fn group_digits(digits: &str, grouping: DigitGrouping) -> String {
    let step = match grouping {
        DigitGrouping::None => return digits.to_string(),
        DigitGrouping::Western => 3,
        DigitGrouping::Indian => 2,
    };
    if digits.len() <= 3 {
        return digits.to_string();
    }

    // The last three digits always form one group; the head is split by `step`.
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > step {
        groups.push(&head[end - step..end]);
        end -= step;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

// =============================================================================
// Currency Format
// =============================================================================

/// How digits of the whole part are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitGrouping {
    /// 1,234,567
    Western,
    /// 12,34,567 (lakh / crore)
    #[default]
    Indian,
    /// 1234567
    None,
}

/// Largest supported number of minor-unit digits; `10^18` still fits a `u64`.
pub const MAX_CURRENCY_DECIMALS: u8 = 18;

/// Display settings for money values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormat {
    /// Symbol placed before the amount.
    pub symbol: String,

    /// Number of minor-unit digits in the smallest unit.
    /// The built-in catalog is priced in whole rupees, so this is 0.
    pub decimals: u8,

    /// Digit grouping of the whole part.
    pub grouping: DigitGrouping,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: "₹".to_string(),
            decimals: 0,
            grouping: DigitGrouping::Indian,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the default rupee format.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&CurrencyFormat::default()))
    }
}

impl Add for Money {
    type Output = Self;

    /// Saturates instead of overflowing; validated catalogs never get there.
    #[inline]
    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = self.saturating_add(other);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
