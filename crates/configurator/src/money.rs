//! Money type for representing monetary values.
//!
//! Amounts are integer minor units (cents). Catalog documents carry
//! decimal prices; they are converted once at ingestion so that every
//! price computation in the engine is exact and bit-identical across runs.

use crate::error::ConfiguratorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    USD,
    EUR,
    GBP,
    JPY,
}

impl Currency {
    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::GBP => "\u{00a3}",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Number of decimal places in the minor unit.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "GBP" => Some(Currency::GBP),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Convert a decimal document price into minor units.
    ///
    /// Returns `None` for NaN, infinities and values outside the `i64` range.
    ///
    /// ```
    /// use configurator::money::{Currency, Money};
    /// let price = Money::from_decimal(299.99, Currency::USD).unwrap();
    /// assert_eq!(price.amount_cents, 29999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let scaled = (amount * 10_f64.powi(currency.decimal_places() as i32)).round();
        if scaled < i64::MIN as f64 || scaled > i64::MAX as f64 {
            return None;
        }
        Some(Self::new(scaled as i64, currency))
    }

    /// Convert to a decimal value (display only).
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount_cents as f64 / divisor as f64
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Replace a negative amount with zero.
    pub fn clamp_non_negative(self) -> Self {
        Self::new(self.amount_cents.max(0), self.currency)
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        let sign = if self.is_negative() { "-" } else { "" };
        let magnitude = self.amount_cents.unsigned_abs() as f64
            / 10_u64.pow(self.currency.decimal_places()) as f64;
        format!("{sign}{}{magnitude:.places$}", self.currency.symbol())
    }

    /// Add another amount of the same currency.
    pub fn checked_add(&self, other: &Money) -> Result<Money, ConfiguratorError> {
        self.ensure_same_currency(other)?;
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
            .ok_or(ConfiguratorError::Overflow)
    }

    /// Subtract another amount of the same currency.
    pub fn checked_sub(&self, other: &Money) -> Result<Money, ConfiguratorError> {
        self.ensure_same_currency(other)?;
        self.amount_cents
            .checked_sub(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
            .ok_or(ConfiguratorError::Overflow)
    }

    /// Multiply by a quantity.
    pub fn checked_mul(&self, factor: i64) -> Result<Money, ConfiguratorError> {
        self.amount_cents
            .checked_mul(factor)
            .map(|cents| Money::new(cents, self.currency))
            .ok_or(ConfiguratorError::Overflow)
    }

    /// Sum an iterator of amounts, starting from zero in `currency`.
    pub fn sum<'a>(
        iter: impl IntoIterator<Item = &'a Money>,
        currency: Currency,
    ) -> Result<Money, ConfiguratorError> {
        iter.into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.checked_add(m))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), ConfiguratorError> {
        if self.currency != other.currency {
            return Err(ConfiguratorError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        let m = Money::from_decimal(299.99, Currency::USD).unwrap();
        assert_eq!(m.amount_cents, 29999);

        let m = Money::from_decimal(35.0, Currency::USD).unwrap();
        assert_eq!(m.amount_cents, 3500);

        let m = Money::from_decimal(100.0, Currency::JPY).unwrap();
        assert_eq!(m.amount_cents, 100);
    }

    #[test]
    fn test_money_from_decimal_rejects_non_finite() {
        assert!(Money::from_decimal(f64::NAN, Currency::USD).is_none());
        assert!(Money::from_decimal(f64::INFINITY, Currency::USD).is_none());
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(2000, Currency::USD).display(), "$20.00");
        assert_eq!(Money::new(-150, Currency::USD).display(), "-$1.50");
        assert_eq!(Money::new(100, Currency::JPY).display(), "\u{00a5}100");
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::new(1000, Currency::USD);
        let b = Money::new(300, Currency::USD);
        assert_eq!(a.checked_add(&b).unwrap().amount_cents, 1300);
        assert_eq!(a.checked_sub(&b).unwrap().amount_cents, 700);
        assert_eq!(a.checked_mul(3).unwrap().amount_cents, 3000);
    }

    #[test]
    fn test_currency_mismatch() {
        let usd = Money::new(1000, Currency::USD);
        let eur = Money::new(1000, Currency::EUR);
        assert!(matches!(
            usd.checked_add(&eur),
            Err(ConfiguratorError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_overflow() {
        let max = Money::new(i64::MAX, Currency::USD);
        assert!(matches!(
            max.checked_add(&Money::new(1, Currency::USD)),
            Err(ConfiguratorError::Overflow)
        ));
        assert!(matches!(max.checked_mul(2), Err(ConfiguratorError::Overflow)));
    }

    #[test]
    fn test_clamp_non_negative() {
        let m = Money::new(-500, Currency::USD).clamp_non_negative();
        assert!(m.is_zero());
        assert_eq!(Money::new(5, Currency::USD).clamp_non_negative().amount_cents, 5);
    }

    #[test]
    fn test_sum() {
        let items = [Money::new(100, Currency::USD), Money::new(250, Currency::USD)];
        assert_eq!(Money::sum(&items, Currency::USD).unwrap().amount_cents, 350);
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("usd"), Some(Currency::USD));
        assert_eq!(Currency::from_code("XYZ"), None);
    }
}
