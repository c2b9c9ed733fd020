//! Validation of host data before it enters the aggregation layer
//!
//! Host rows are trusted for shape but not for content: quantities and
//! currency columns are checked here so the aggregates stay meaningful.

use rust_decimal::Decimal;

use crate::types::{CurrencyCode, Money};

// ============================================================================
// Stock Validations
// ============================================================================

/// Validate a stock quantity is non-negative
pub fn validate_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity < Decimal::ZERO {
        return Err("Stock quantity cannot be negative");
    }
    Ok(())
}

/// Clamp a host quantity to zero when it is negative
pub fn sanitize_quantity(quantity: Decimal) -> Decimal {
    quantity.max(Decimal::ZERO)
}

// ============================================================================
// Money Validations
// ============================================================================

/// Build a price from a nullable amount/currency column pair.
///
/// A missing amount, a missing currency or an unknown code yields no price.
pub fn price_from_columns(amount: Option<Decimal>, currency: Option<&str>) -> Option<Money> {
    let amount = amount?;
    let currency = CurrencyCode::new(currency?).ok()?;
    Some(Money::new(amount, currency))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(dec("0")).is_ok());
        assert!(validate_quantity(dec("2.5")).is_ok());
        assert!(validate_quantity(dec("-1")).is_err());
    }

    #[test]
    fn test_sanitize_quantity() {
        assert_eq!(sanitize_quantity(dec("-3")), Decimal::ZERO);
        assert_eq!(sanitize_quantity(dec("3")), dec("3"));
    }

    #[test]
    fn test_price_from_columns() {
        let price = price_from_columns(Some(dec("1.50")), Some("eur")).unwrap();
        assert_eq!(price.currency.as_str(), "EUR");
        assert!(price_from_columns(None, Some("EUR")).is_none());
        assert!(price_from_columns(Some(dec("1")), None).is_none());
        assert!(price_from_columns(Some(dec("1")), Some("??")).is_none());
    }
}
