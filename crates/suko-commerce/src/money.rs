//! Money and currency conversion.
//!
//! All stored prices are denominated in the base currency (EUR). Display
//! prices are derived with a fixed, five-entry rate table; there is no
//! live-rate fetching.
//!
//! Totals use a cents-based integer representation to avoid floating-point
//! drift when summing many lines.

use crate::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency all catalog prices are stored in.
pub const BASE_CURRENCY: Currency = Currency::EUR;

/// Supported display currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    DKK,
    /// Swedish krona. The code is kept as stored by existing clients.
    SWE,
    #[default]
    EUR,
    USD,
    GBP,
}

impl Currency {
    /// Every supported currency, in menu order.
    pub const ALL: [Currency; 5] = [
        Currency::DKK,
        Currency::SWE,
        Currency::EUR,
        Currency::USD,
        Currency::GBP,
    ];

    /// Get the currency code (e.g., "USD").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::DKK => "DKK",
            Currency::SWE => "SWE",
            Currency::EUR => "EUR",
            Currency::USD => "USD",
            Currency::GBP => "GBP",
        }
    }

    /// Get the currency symbol (e.g., "$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::DKK => "kr",
            Currency::SWE => "sek",
            Currency::EUR => "\u{20ac}",
            Currency::USD => "$",
            Currency::GBP => "\u{00a3}",
        }
    }

    /// Units of this currency per one unit of the base currency.
    pub fn rate(&self) -> f64 {
        match self {
            Currency::DKK => 7.45,
            Currency::SWE => 11.13,
            Currency::EUR => 1.0,
            Currency::USD => 1.09,
            Currency::GBP => 0.85,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "DKK" => Some(Currency::DKK),
            "SWE" => Some(Currency::SWE),
            "EUR" => Some(Currency::EUR),
            "USD" => Some(Currency::USD),
            "GBP" => Some(Currency::GBP),
            _ => None,
        }
    }

    /// Convert an amount from the base currency into this currency,
    /// rounded to cents.
    ///
    /// ```
    /// use suko_commerce::Currency;
    /// assert_eq!(Currency::USD.convert(100.0), 109.0);
    /// assert_eq!(Currency::DKK.convert(100.0), 745.0);
    /// ```
    pub fn convert(&self, amount_in_base: f64) -> f64 {
        (amount_in_base * self.rate() * 100.0).round() / 100.0
    }

    /// Format an amount already expressed in this currency.
    pub fn format(&self, amount: f64) -> String {
        format!("{}{:.2}", self.symbol(), amount)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s).ok_or_else(|| CommerceError::UnknownCurrency(s.to_string()))
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in cents of the currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64, currency: Currency) -> Self {
        Self {
            amount_cents,
            currency,
        }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use suko_commerce::money::{Money, Currency};
    /// let price = Money::from_decimal(49.99, Currency::EUR);
    /// assert_eq!(price.amount_cents, 4999);
    /// ```
    pub fn from_decimal(amount: f64, currency: Currency) -> Self {
        Self::new((amount * 100.0).round() as i64, currency)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// Format as a display string (e.g., "€49.99").
    pub fn display(&self) -> String {
        self.currency.format(self.to_decimal())
    }

    /// Format as a display string without symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        format!("{:.2}", self.to_decimal())
    }

    /// Try to add another Money value, returning None on currency mismatch
    /// or overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        self.amount_cents
            .checked_add(other.amount_cents)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Multiply by a quantity, returning None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents
            .checked_mul(factor)
            .map(|cents| Money::new(cents, self.currency))
    }

    /// Sum an iterator of Money values in one currency.
    pub fn try_sum<'a>(
        mut iter: impl Iterator<Item = &'a Money>,
        currency: Currency,
    ) -> Option<Money> {
        iter.try_fold(Money::zero(currency), |acc, m| acc.try_add(m))
    }

    /// Convert a base-currency amount into another display currency.
    ///
    /// Returns None when this value is not in the base currency, since the
    /// rate table only goes one way.
    pub fn convert_to(&self, to: Currency) -> Option<Money> {
        if self.currency != BASE_CURRENCY {
            return None;
        }
        Some(Money::from_decimal(to.convert(self.to_decimal()), to))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
