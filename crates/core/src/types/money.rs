//! Monetary amounts using decimal arithmetic.
//!
//! Ecwid reports prices as JSON numbers. They are parsed into [`Decimal`]
//! so that min/max comparisons and line totals never go through binary
//! floating point, and serialized back out as decimal strings.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An amount with its currency.
///
/// ```
/// use ecwid_headless_core::{CurrencyCode, Money};
/// use rust_decimal::Decimal;
///
/// let price = Money::new(Decimal::new(1999, 2), CurrencyCode::default());
/// assert_eq!(price.amount_string(), "19.99");
/// assert_eq!(price.currency_code.as_str(), "USD");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// The amount as a decimal string without trailing zeros (`"20"`, `"19.9"`).
    #[must_use]
    pub fn amount_string(&self) -> String {
        self.amount.normalize().to_string()
    }

    /// Multiply the amount by a quantity, keeping the currency.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code.clone())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount.round_dp(2), self.currency_code)
    }
}

/// ISO 4217 currency code as reported by the store profile.
///
/// Kept as an open string: the store decides its currency, and any code the
/// provider returns is passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Currency used until the store profile has been read.
    pub const DEFAULT: &'static str = "USD";

    /// Create a currency code, upper-casing the input.
    #[must_use]
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_uppercase())
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_serializes_as_string() {
        let money = Money::new(Decimal::new(2550, 2), CurrencyCode::new("eur"));
        let json = serde_json::to_value(&money).unwrap();
        assert_eq!(json["amount"], "25.50");
        assert_eq!(json["currencyCode"], "EUR");
    }

    #[test]
    fn test_amount_string_drops_trailing_zeros() {
        let money = Money::new(Decimal::new(2000, 2), CurrencyCode::default());
        assert_eq!(money.amount_string(), "20");
    }

    #[test]
    fn test_times_multiplies_amount() {
        let unit = Money::new(Decimal::new(1250, 2), CurrencyCode::default());
        let line = unit.times(3);
        assert_eq!(line.amount, Decimal::new(3750, 2));
        assert_eq!(line.currency_code, unit.currency_code);
    }

    #[test]
    fn test_zero() {
        let zero = Money::zero(CurrencyCode::new("GBP"));
        assert_eq!(zero.amount, Decimal::ZERO);
        assert_eq!(zero.to_string(), "0 GBP");
    }

    #[test]
    fn test_default_currency() {
        assert_eq!(CurrencyCode::default().as_str(), "USD");
    }
}
