//! Money type for representing currency amounts
//!
//! Internally stores amounts in cents (i64) to avoid floating-point precision
//! issues. Provides safe arithmetic operations and formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// Represents a monetary amount stored as cents (hundredths of the currency unit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from cents
    ///
    /// # Examples
    /// ```
    /// use expense_grid::models::Money;
    /// let amount = Money::from_cents(1050); // 10.50
    /// assert_eq!(amount.to_string(), "10.50");
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from whole units
    pub const fn from_units(units: i64) -> Self {
        Self(units * 100)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the amount in cents
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Get the whole units portion (truncated toward zero)
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Get the cents portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Amount as a floating-point number of currency units
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Mean of `total` over `count` items, rounded half away from zero
    ///
    /// Returns `None` when `count` is zero.
    pub fn average(total: Money, count: usize) -> Option<Money> {
        if count == 0 {
            return None;
        }
        let count = count as i64;
        let half = count / 2;
        let cents = if total.0 >= 0 {
            (total.0 + half) / count
        } else {
            (total.0 - half) / count
        };
        Some(Money(cents))
    }

    /// Parse a money amount from a string
    ///
    /// Accepts formats: "10.50", "10,50", "$10.50", "R$ 10.50", "10", "-3.5"
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let s = s.trim();

        let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
            (true, stripped)
        } else {
            (false, s)
        };

        let s = s.trim_start_matches(|c: char| c.is_alphabetic() || c == '$').trim();
        let normalized = if s.contains('.') {
            s.to_string()
        } else {
            s.replacen(',', ".", 1)
        };
        let s = normalized.as_str();

        let invalid = || MoneyParseError::InvalidFormat(s.to_string());
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

        let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
        if (whole.is_empty() && frac.is_empty()) || !digits(whole) || !digits(frac) {
            return Err(invalid());
        }

        let units: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        // Digits past the second decimal place are truncated
        let cents: i64 = match frac.get(..2).unwrap_or(frac) {
            "" => 0,
            one if one.len() == 1 => one.parse::<i64>().map_err(|_| invalid())? * 10,
            two => two.parse().map_err(|_| invalid())?,
        };

        let cents = units
            .checked_mul(100)
            .and_then(|c| c.checked_add(cents))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format with a currency symbol
    pub fn format_with_symbol(&self, symbol: &str) -> String {
        if self.is_negative() {
            format!("-{}{}.{:02}", symbol, self.units().abs(), self.cents_part())
        } else {
            format!("{}{}.{:02}", symbol, self.units(), self.cents_part())
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            write!(f, "-{}.{:02}", self.units().abs(), self.cents_part())
        } else {
            write!(f, "{}.{:02}", self.units(), self.cents_part())
        }
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid money format: '{}'", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts() {
        let m = Money::from_cents(1050);
        assert_eq!(m.units(), 10);
        assert_eq!(m.cents_part(), 50);
        assert_eq!(Money::from_units(3).cents(), 300);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1050).to_string(), "10.50");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(-1050).to_string(), "-10.50");
        assert_eq!(Money::from_cents(1050).format_with_symbol("R$"), "R$10.50");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("10,5").unwrap().cents(), 1050);
        assert_eq!(Money::parse("$10.50").unwrap().cents(), 1050);
        assert_eq!(Money::parse("R$ 7").unwrap().cents(), 700);
        assert_eq!(Money::parse("-3.25").unwrap().cents(), -325);
        assert_eq!(Money::parse("0.999").unwrap().cents(), 99);
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("").is_err());
        assert!(Money::parse("1.2.3").is_err());
    }

    #[test]
    fn test_parse_rejects_signed_or_non_digit_parts() {
        assert!(Money::parse("1.-5").is_err());
        assert!(Money::parse("1.+5").is_err());
        assert!(Money::parse("+1.50").is_err());
        assert!(Money::parse("1.€").is_err());
        assert!(Money::parse("1.5€").is_err());
        assert!(Money::parse(".").is_err());
        assert_eq!(Money::parse(".5").unwrap(), Money::from_cents(50));
        assert_eq!(Money::parse("12.").unwrap(), Money::from_units(12));
        assert_eq!(Money::parse("1.999").unwrap(), Money::from_cents(199));
    }

    #[test]
    fn test_parse_overflow_is_error() {
        assert!(Money::parse("92233720368547759").is_err());
        assert!(Money::parse("92233720368547758.08").is_err());
        assert!(Money::parse("99999999999999999999").is_err());
        assert_eq!(
            Money::parse("92233720368547758.07").unwrap(),
            Money::from_cents(i64::MAX)
        );
        assert_eq!(
            Money::parse("-1000000").unwrap(),
            Money::from_units(-1_000_000)
        );
    }

    #[test]
    fn test_average() {
        assert_eq!(
            Money::average(Money::from_units(300), 2),
            Some(Money::from_units(150))
        );
        // 10.00 / 3 = 3.333.. -> 3.33
        assert_eq!(
            Money::average(Money::from_units(10), 3),
            Some(Money::from_cents(333))
        );
        // 0.05 / 2 = 0.025 -> 0.03
        assert_eq!(
            Money::average(Money::from_cents(5), 2),
            Some(Money::from_cents(3))
        );
        assert_eq!(Money::average(Money::from_units(10), 0), None);
    }

    #[test]
    fn test_sum() {
        let values = [Money::from_units(1), Money::from_units(2), Money::from_cents(50)];
        let total: Money = values.iter().sum();
        assert_eq!(total.cents(), 350);
    }
}
