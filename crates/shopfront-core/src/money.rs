//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The catalog API sends prices as decimal strings: "10.50", "5".         │
//! │  parseFloat("10.50") * 2 + parseFloat("5") happens to work, but        │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                   │
//! │                                                                         │
//! │  OUR SOLUTION: parse the string straight into integer cents            │
//! │    "10.50" → 1050, "5" → 500                                           │
//! │    1050 × 2 + 500 = 2600 → "26.00"  ✅                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use shopfront_core::money::Money;
//!
//! let price = Money::parse_decimal("10.50").unwrap();
//! assert_eq!(price.cents(), 1050);
//! assert_eq!((price * 2).to_string(), "21.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (kuruş / cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: keeps subtraction total; negative prices are rejected
///   by validation, not by the type
/// - **Derives**: serializes as plain cents in DTOs; product records use
///   [`decimal_string`] to keep the API's string representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from a whole number of major units.
    ///
    /// Returns `None` on overflow.
    pub const fn from_major(major: i64) -> Option<Self> {
        match major.checked_mul(100) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Parses a decimal string such as `"10.50"`, `"5"` or `"-3.2"`.
    ///
    /// ## Rounding
    /// Fractional digits past the second are rounded half away from zero:
    /// `"0.005"` → 1 cent, `"0.004"` → 0 cents.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("10.5").unwrap().cents(), 1050);
    /// assert_eq!(Money::parse_decimal(" 7 ").unwrap().cents(), 700);
    /// assert!(Money::parse_decimal("ten").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<Money, ValidationError> {
        let raw = input.trim();
        if raw.is_empty() {
            return Err(ValidationError::Required {
                field: "price".to_string(),
            });
        }

        let (negative, unsigned) = if let Some(rest) = raw.strip_prefix('-') {
            (true, rest)
        } else if let Some(rest) = raw.strip_prefix('+') {
            (false, rest)
        } else {
            (false, raw)
        };

        let (major_str, minor_str) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if (major_str.is_empty() && minor_str.is_empty())
            || !all_digits(major_str)
            || !all_digits(minor_str)
        {
            return Err(invalid_price(format!("'{}' is not a decimal number", raw)));
        }

        let major: i64 = if major_str.is_empty() {
            0
        } else {
            major_str
                .parse()
                .map_err(|_| invalid_price(format!("'{}' is too large", raw)))?
        };

        let mut minor_digits = minor_str.bytes().map(|b| i64::from(b - b'0'));
        let tens = minor_digits.next().unwrap_or(0);
        let ones = minor_digits.next().unwrap_or(0);
        let round_up = minor_digits.next().is_some_and(|d| d >= 5);

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(tens * 10 + ones + i64::from(round_up)))
            .ok_or_else(|| invalid_price(format!("'{}' is too large", raw)))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use shopfront_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Formats as a two-decimal string, the representation the API uses.
    pub fn to_decimal_string(&self) -> String {
        self.to_string()
    }
}

fn invalid_price(reason: String) -> ValidationError {
    ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason,
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `major.minor` with two digits, no currency symbol.
///
/// The symbol and its position are a display concern of the screens.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Multiplication by i64 (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
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
// Serde: decimal string representation
// =============================================================================

/// `#[serde(with = "...")]` helper for fields that travel as decimal strings.
///
/// Deserializes from either a JSON string (`"10.50"`) or a JSON number
/// (`10.5`), and always serializes back to a two-decimal string.
pub mod decimal_string {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    use super::Money;

    pub fn serialize<S>(money: &Money, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&money.to_decimal_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Money, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(PriceVisitor)
    }

    struct PriceVisitor;

    impl<'de> Visitor<'de> for PriceVisitor {
        type Value = Money;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal price as a string or number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
            Money::parse_decimal(v).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
            Money::from_major(v).ok_or_else(|| E::custom("price is too large"))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
            i64::try_from(v)
                .ok()
                .and_then(Money::from_major)
                .ok_or_else(|| E::custom("price is too large"))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
            // f64 Display never uses exponent notation, so the string parser applies
            Money::parse_decimal(&v.to_string()).map_err(E::custom)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
