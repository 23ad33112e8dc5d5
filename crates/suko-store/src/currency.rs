//! Display currency selection.

use crate::observable::{Observable, Subscription};
use suko_commerce::{Currency, Money};

/// The shopper's selected display currency and conversions into it.
///
/// Prices are stored in [`suko_commerce::BASE_CURRENCY`]; everything here converts from
/// the base currency with the fixed rate table on [`Currency`].
#[derive(Debug, Clone, Default)]
pub struct CurrencyService {
    current: Observable<Currency>,
}

impl CurrencyService {
    pub fn new(initial: Currency) -> Self {
        Self {
            current: Observable::new(initial),
        }
    }

    pub fn currency(&self) -> Currency {
        self.current.get()
    }

    pub fn set_currency(&self, currency: Currency) {
        if self.current.modify_if(|current| {
            let changed = *current != currency;
            *current = currency;
            changed
        }) {
            tracing::debug!(currency = %currency, "display currency changed");
        }
    }

    /// Symbol of `currency`, or of the current selection.
    pub fn symbol(&self, currency: Option<Currency>) -> &'static str {
        currency.unwrap_or_else(|| self.currency()).symbol()
    }

    /// Convert a base-currency amount, rounded to cents.
    pub fn convert(&self, amount: f64, to: Option<Currency>) -> f64 {
        to.unwrap_or_else(|| self.currency()).convert(amount)
    }

    /// Convert a base-currency amount and format it with the symbol.
    pub fn format(&self, amount: f64) -> String {
        let currency = self.currency();
        currency.format(currency.convert(amount))
    }

    /// Format a base-currency money value in the current currency. Values
    /// in any other currency are formatted as they are.
    pub fn format_money(&self, money: &Money) -> String {
        money
            .convert_to(self.currency())
            .unwrap_or(*money)
            .display()
    }

    pub fn subscribe(&self) -> Subscription<Currency> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_base_currency() {
        let service = CurrencyService::default();
        assert_eq!(service.currency(), Currency::EUR);
        assert_eq!(service.symbol(None), "\u{20ac}");
        assert_eq!(service.format(48.0), "\u{20ac}48.00");
    }

    #[test]
    fn test_convert_with_explicit_and_current_currency() {
        let service = CurrencyService::new(Currency::USD);
        assert_eq!(service.convert(100.0, None), 109.0);
        assert_eq!(service.convert(100.0, Some(Currency::DKK)), 745.0);
        assert_eq!(service.symbol(Some(Currency::GBP)), "\u{00a3}");
    }

    #[tokio::test]
    async fn test_selection_is_observable() {
        let service = CurrencyService::default();
        let mut sub = service.subscribe();
        assert_eq!(sub.next().await, Some(Currency::EUR));

        service.set_currency(Currency::SWE);
        assert_eq!(sub.next().await, Some(Currency::SWE));
        assert_eq!(service.format(19.99), "sek222.49");
    }

    #[test]
    fn test_format_money() {
        let service = CurrencyService::new(Currency::DKK);
        assert_eq!(service.format_money(&Money::new(4800, Currency::EUR)), "kr357.60");
        assert_eq!(service.format_money(&Money::new(100, Currency::USD)), "$1.00");
    }
}
