//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Publisher balances accumulate thousands of small credits, so every    │
//! │  rounding error would compound into the banking ledger.                 │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Prices, line totals and balances are i64 cents.                     │
//! │    Fractions (publisher share) round ONCE, half away from zero.        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bookstore_core::money::Money;
//! use bookstore_core::types::ShareRate;
//!
//! let price = Money::from_cents(2000); // $20.00
//! let line = price * 5;                // $100.00
//! let credit = line.share(ShareRate::from_bps(3000));
//! assert_eq!(credit.cents(), 3000);    // $30.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::ShareRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Arithmetic on deltas stays closed under subtraction
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Book.price_cents ──┬──► OrderLine.unit_price ──► OrderLine.total       │
/// │                     │                                                   │
/// │                     └──► line total × share ──► publisher balance       │
/// │                                                                         │
/// │  Σ OrderLine.total ──► OrderView.total ──► Displayed as "$D.CC"         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use bookstore_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units (dollars and cents).
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_major_minor(-5, 50)` = -$5.50, not -$4.50
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use bookstore_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total.cents(), 897); // $8.97
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Returns the publisher's portion of this amount.
    ///
    /// ## Rounding: Half Away From Zero
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  amount × bps / 10000, rounded to whole cents:                      │
    /// │                                                                     │
    /// │     362.5 cents →  363        -362.5 cents → -363                   │
    /// │     362.4 cents →  362        -362.4 cents → -362                   │
    /// │                                                                     │
    /// │  Applied once per order line, never per unit.                       │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use bookstore_core::money::Money;
    /// use bookstore_core::types::ShareRate;
    ///
    /// // 5 × $20.00 at 30% = $30.00
    /// let line = Money::from_cents(2000).multiply_quantity(5);
    /// assert_eq!(line.share(ShareRate::from_bps(3000)).cents(), 3000);
    ///
    /// // $10.99 at 33% = 362.67 cents → $3.63
    /// let odd = Money::from_cents(1099);
    /// assert_eq!(odd.share(ShareRate::from_bps(3300)).cents(), 363);
    /// ```
    pub fn share(&self, rate: ShareRate) -> Money {
        // i128 so large balances cannot overflow mid-calculation
        let scaled = self.0 as i128 * rate.bps() as i128;
        Money::from_cents(div_round_half_away(scaled, 10_000) as i64)
    }

    /// Parses a decimal amount such as `"20"`, `"20.5"` or `"$1,200.00"`.
    ///
    /// More than two fractional digits are rounded half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use bookstore_core::money::Money;
    ///
    /// assert_eq!(Money::parse("20.00").unwrap().cents(), 2000);
    /// assert_eq!(Money::parse("$7.5").unwrap().cents(), 750);
    /// assert_eq!(Money::parse("0.125").unwrap().cents(), 13);
    /// assert!(Money::parse("abc").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Money, ValidationError> {
        let invalid = || ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "must be a decimal amount like 12.34".to_string(),
        };

        let cleaned: String = input
            .trim()
            .trim_start_matches('$')
            .chars()
            .filter(|c| *c != ',')
            .collect();

        let (negative, digits) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.as_str()),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let whole: i128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };

        // Scale the fraction to exact hundredths, then round the remainder.
        let mut frac_digits = frac.chars().map(|c| c as i128 - '0' as i128);
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = i128::from(frac_digits.next().unwrap_or(0) >= 5);

        let cents = whole
            .checked_mul(100)
            .and_then(|c| c.checked_add(tenths * 10 + hundredths + round_up))
            .ok_or_else(invalid)?;

        let signed = if negative { -cents } else { cents };
        i64::try_from(signed).map(Money).map_err(|_| invalid())
    }
}

/// Integer division that rounds half away from zero.
fn div_round_half_away(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money as `$D.CC` (the format the terminals print).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::parse(s)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_share_exact() {
        // 5 × $20.00 × 0.3 = $30.00
        let line = Money::from_cents(2000).multiply_quantity(5);
        assert_eq!(line.share(ShareRate::from_bps(3000)).cents(), 3000);
    }

    #[test]
    fn test_share_rounds_half_away_from_zero() {
        // 25 cents at 50% = 12.5 → 13
        assert_eq!(Money::from_cents(25).share(ShareRate::from_bps(5000)).cents(), 13);
        // -25 cents at 50% = -12.5 → -13
        assert_eq!(Money::from_cents(-25).share(ShareRate::from_bps(5000)).cents(), -13);
        // 1099 at 33% = 362.67 → 363
        assert_eq!(Money::from_cents(1099).share(ShareRate::from_bps(3300)).cents(), 363);
        // 1001 at 1% = 10.01 → 10
        assert_eq!(Money::from_cents(1001).share(ShareRate::from_bps(100)).cents(), 10);
    }

    #[test]
    fn test_share_zero_rate() {
        let line = Money::from_cents(123_456);
        assert!(line.share(ShareRate::zero()).is_zero());
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("20.00").unwrap().cents(), 2000);
        assert_eq!(Money::parse("20").unwrap().cents(), 2000);
        assert_eq!(Money::parse(" $1,200.5 ").unwrap().cents(), 120_050);
        assert_eq!(Money::parse(".99").unwrap().cents(), 99);
        assert_eq!(Money::parse("-3.10").unwrap().cents(), -310);
        assert_eq!(Money::parse("0.125").unwrap().cents(), 13);
        assert_eq!(Money::parse("0.124").unwrap().cents(), 12);
        assert_eq!("4.25".parse::<Money>().unwrap().cents(), 425);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Money::parse("").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("12.3x").is_err());
        assert!(Money::parse("1.2.3").is_err());
        assert!(Money::parse("ten").is_err());
    }

    #[test]
    fn test_parse_rejects_amounts_too_large() {
        // Fits i128 before scaling, overflows once multiplied by 100.
        assert!(Money::parse(&"9".repeat(38)).is_err());
        assert!(Money::parse(&"9".repeat(39)).is_err());
        assert!(Money::parse(&format!("-{}.99", "9".repeat(38))).is_err());

        assert_eq!(
            Money::parse("92233720368547758.07").unwrap().cents(),
            i64::MAX
        );
        assert!(Money::parse("92233720368547758.08").is_err());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }
}
