//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  A float cart:                                                          │
//! │    sub_total * 0.1 = 125.00000000000001                                 │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (paise / cents)                     │
//! │    125000 paise * 1000 bps / 10000 = 12500 paise                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fastr_core::money::Money;
//!
//! let rate = Money::from_major(250);     // ₹250.00
//! let line = rate.multiply_quantity(3);  // ₹750.00
//! assert_eq!(line.minor(), 75_000);
//! assert_eq!(line.to_string(), "750.00");
//! ```
//!
//! Catalog feeds carry prices as plain JSON numbers in major units
//! (`"rate": 500`). The [`major_units`] serde adapter converts those at the
//! boundary so nothing past deserialization touches a float.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use crate::types::TaxRate;

/// Minor units per major unit.
const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// Serializes as the raw minor-unit integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use fastr_core::money::Money;
    ///
    /// let price = Money::from_minor(49_950); // ₹499.50
    /// assert_eq!(price.major(), 499);
    /// assert_eq!(price.minor_part(), 50);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole major units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the whole major-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax at `rate`, rounded half up to the nearest minor unit.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// The +5000 provides rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use fastr_core::money::Money;
    /// use fastr_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_major(1250);
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(1000)); // 10%
    /// assert_eq!(tax, Money::from_major(125));
    ///
    /// // 0.05 at 10% = 0.005 → 0.01
    /// assert_eq!(Money::from_minor(5).calculate_tax(TaxRate::from_bps(1000)).minor(), 1);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large carts from overflowing the intermediate product
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_minor(tax as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use fastr_core::money::Money;
    ///
    /// let unit = Money::from_major(350);
    /// assert_eq!(unit.multiply_quantity(2), Money::from_major(700));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Plain decimal rendering with two places and no currency symbol.
    ///
    /// Used for receipt rows, where the symbol would break numeric parsing.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows the amount as a plain decimal, e.g. `1375.00`.
///
/// Currency symbols are a presentation concern and live in the kiosk config.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal_string())
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Major-unit serde adapter
// =============================================================================

/// Serde adapter for prices written as JSON numbers in major units.
///
/// Integers map exactly; fractional values are rounded to the nearest minor
/// unit. Negative or non-finite prices are rejected.
///
/// ```rust
/// use fastr_core::money::{major_units, Money};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Row {
///     #[serde(with = "major_units")]
///     rate: Money,
/// }
///
/// let row: Row = serde_json::from_str(r#"{"rate": 499.5}"#).unwrap();
/// assert_eq!(row.rate.minor(), 49_950);
/// ```
pub mod major_units {
    use super::{Money, MINOR_PER_MAJOR};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if money.minor_part() == 0 {
            serializer.serialize_i64(money.major())
        } else {
            serializer.serialize_f64(money.minor() as f64 / MINOR_PER_MAJOR as f64)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        let number = serde_json::Number::deserialize(deserializer)?;

        if let Some(major) = number.as_i64() {
            if major < 0 {
                return Err(D::Error::custom("price must not be negative"));
            }
            return major
                .checked_mul(MINOR_PER_MAJOR)
                .map(Money::from_minor)
                .ok_or_else(|| D::Error::custom("price is out of range"));
        }

        let value = number
            .as_f64()
            .ok_or_else(|| D::Error::custom("price is not a number"))?;
        if !value.is_finite() || value < 0.0 {
            return Err(D::Error::custom("price must be a non-negative number"));
        }
        let minor = (value * MINOR_PER_MAJOR as f64).round();
        if minor > i64::MAX as f64 {
            return Err(D::Error::custom("price is out of range"));
        }
        Ok(Money::from_minor(minor as i64))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
