//! Purchase cost tests
//!
//! Tests for per-part purchase cost aggregation including:
//! - Single-currency totals split by status
//! - Mixed-currency detection (accumulation stops at the first conflict)
//! - Internal price fallback and unpriced stock

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    total_purchase_cost, CurrencyCode, Money, Part, PriceBreak, StockItem, StockStatus,
};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn money(amount: &str, currency: &str) -> Money {
    Money::new(dec(amount), CurrencyCode::new(currency).unwrap())
}

fn part() -> Part {
    Part {
        id: 1,
        name: "M3 screw".to_string(),
        internal_price_breaks: Vec::new(),
    }
}

fn item(id: i32, quantity: &str, status: StockStatus, price: Option<Money>) -> StockItem {
    StockItem {
        id,
        part_id: 1,
        quantity: dec(quantity),
        status,
        purchase_price: price,
        location_id: None,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Two items, same currency, one OK and one DAMAGED
    #[test]
    fn test_ok_and_damaged_same_currency() {
        let items = vec![
            item(1, "5", StockStatus::Ok, Some(money("10.00", "USD"))),
            item(2, "3", StockStatus::Damaged, Some(money("4.00", "USD"))),
        ];

        let cost = total_purchase_cost(&part(), &items);

        assert_eq!(cost.total, Some(money("62.00", "USD")));
        assert_eq!(cost.ok_total, Some(money("50.00", "USD")));
        assert_eq!(cost.damaged_total, Some(money("12.00", "USD")));
        assert_eq!(cost.currency.unwrap().as_str(), "USD");
        assert!(!cost.mixed_currency);
        assert_eq!(cost.excluded_items, 0);
    }

    /// USD first, then EUR: flagged mixed, currency stays USD, summing stops
    #[test]
    fn test_mixed_currency_stops_accumulation() {
        let items = vec![
            item(1, "2", StockStatus::Ok, Some(money("10", "USD"))),
            item(2, "1", StockStatus::Ok, Some(money("7", "EUR"))),
            item(3, "1", StockStatus::Damaged, Some(money("3", "USD"))),
        ];

        let cost = total_purchase_cost(&part(), &items);

        assert!(cost.mixed_currency);
        assert_eq!(cost.currency.unwrap().as_str(), "USD");
        assert_eq!(cost.total, Some(money("20", "USD")));
        assert_eq!(cost.ok_total, Some(money("20", "USD")));
        // The USD item after the conflict is not summed
        assert_eq!(cost.damaged_total, Some(money("0", "USD")));
        assert_eq!(cost.excluded_items, 2);
    }

    /// No stock at all
    #[test]
    fn test_no_stock_has_no_totals() {
        let cost = total_purchase_cost(&part(), &[]);

        assert!(cost.total.is_none());
        assert!(cost.ok_total.is_none());
        assert!(cost.damaged_total.is_none());
        assert!(cost.currency.is_none());
        assert!(!cost.mixed_currency);
    }

    /// Unpriced stock is skipped for cost
    #[test]
    fn test_unpriced_items_are_skipped() {
        let items = vec![
            item(1, "5", StockStatus::Ok, None),
            item(2, "2", StockStatus::Ok, Some(money("1.5", "GBP"))),
        ];

        let cost = total_purchase_cost(&part(), &items);

        assert_eq!(cost.total, Some(money("3.0", "GBP")));
        assert_eq!(cost.ok_total, Some(money("3.0", "GBP")));
    }

    /// Priced stock seeds all three totals, even without damaged stock
    #[test]
    fn test_damaged_total_is_zero_not_none() {
        let items = vec![item(1, "4", StockStatus::Ok, Some(money("2", "USD")))];

        let cost = total_purchase_cost(&part(), &items);

        assert_eq!(cost.damaged_total, Some(money("0", "USD")));
    }

    /// Stock in other statuses counts toward the total only
    #[test]
    fn test_other_status_counts_toward_total_only() {
        let items = vec![
            item(1, "1", StockStatus::Ok, Some(money("5", "USD"))),
            item(2, "2", StockStatus::Quarantined, Some(money("5", "USD"))),
        ];

        let cost = total_purchase_cost(&part(), &items);

        assert_eq!(cost.total, Some(money("15", "USD")));
        assert_eq!(cost.ok_total, Some(money("5", "USD")));
        assert_eq!(cost.damaged_total, Some(money("0", "USD")));
    }

    /// Items without purchase price use the first internal price break
    #[test]
    fn test_internal_price_fallback() {
        let mut part = part();
        part.internal_price_breaks = vec![
            PriceBreak {
                quantity: dec("1"),
                price: money("2.50", "CHF"),
            },
            PriceBreak {
                quantity: dec("100"),
                price: money("2.00", "CHF"),
            },
        ];
        let items = vec![
            item(1, "4", StockStatus::Ok, None),
            item(2, "2", StockStatus::Damaged, Some(money("3", "CHF"))),
        ];

        let cost = total_purchase_cost(&part, &items);

        assert_eq!(cost.total, Some(money("16.00", "CHF")));
        assert_eq!(cost.ok_total, Some(money("10.00", "CHF")));
        assert_eq!(cost.damaged_total, Some(money("6", "CHF")));
    }

    /// A zero purchase price counts as no price
    #[test]
    fn test_zero_price_falls_back_to_internal_price() {
        let mut part = part();
        part.internal_price_breaks = vec![PriceBreak {
            quantity: dec("1"),
            price: money("1", "USD"),
        }];
        let items = vec![item(1, "3", StockStatus::Ok, Some(money("0", "USD")))];

        let cost = total_purchase_cost(&part, &items);

        assert_eq!(cost.total, Some(money("3", "USD")));
    }

    /// Zero price and no fallback: the item is skipped
    #[test]
    fn test_zero_price_without_fallback_is_skipped() {
        let items = vec![item(1, "3", StockStatus::Ok, Some(money("0", "USD")))];

        let cost = total_purchase_cost(&part(), &items);

        assert!(cost.total.is_none());
        assert!(cost.currency.is_none());
    }

    /// Fallback currency can itself conflict with purchase prices
    #[test]
    fn test_fallback_currency_can_trigger_mixed() {
        let mut part = part();
        part.internal_price_breaks = vec![PriceBreak {
            quantity: dec("1"),
            price: money("1", "EUR"),
        }];
        let items = vec![
            item(1, "1", StockStatus::Ok, Some(money("9", "USD"))),
            item(2, "1", StockStatus::Ok, None),
        ];

        let cost = total_purchase_cost(&part, &items);

        assert!(cost.mixed_currency);
        assert_eq!(cost.total, Some(money("9", "USD")));
        assert_eq!(cost.excluded_items, 1);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating valid quantities (0.1 to 1000.0)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    /// Strategy for generating unit prices (0.01 to 1000.00)
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn status_strategy() -> impl Strategy<Value = StockStatus> {
        prop_oneof![
            Just(StockStatus::Ok),
            Just(StockStatus::Damaged),
            Just(StockStatus::Attention),
            Just(StockStatus::Lost),
        ]
    }

    fn currency_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("USD"), Just("EUR"), Just("JPY")]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Single currency: total = ok + damaged + other statuses, never mixed
        #[test]
        fn prop_single_currency_totals_add_up(
            rows in prop::collection::vec(
                (quantity_strategy(), price_strategy(), status_strategy()),
                1..20
            )
        ) {
            let items: Vec<StockItem> = rows
                .iter()
                .enumerate()
                .map(|(i, (qty, price, status))| StockItem {
                    id: i as i32,
                    part_id: 1,
                    quantity: *qty,
                    status: *status,
                    purchase_price: Some(Money::new(*price, CurrencyCode::new("USD").unwrap())),
                    location_id: None,
                })
                .collect();

            let cost = total_purchase_cost(&part(), &items);
            prop_assert!(!cost.mixed_currency);

            let other: Decimal = items
                .iter()
                .filter(|i| !matches!(i.status, StockStatus::Ok | StockStatus::Damaged))
                .map(|i| i.quantity * i.purchase_price.as_ref().unwrap().amount)
                .sum();

            let total = cost.total.unwrap().amount;
            let ok = cost.ok_total.unwrap().amount;
            let damaged = cost.damaged_total.unwrap().amount;
            prop_assert_eq!(total, ok + damaged + other);
        }

        /// Two or more currencies: mixed, and currency is the first one seen
        #[test]
        fn prop_mixed_currency_keeps_first_currency(
            rows in prop::collection::vec(
                (quantity_strategy(), price_strategy(), currency_strategy()),
                2..20
            )
        ) {
            let items: Vec<StockItem> = rows
                .iter()
                .enumerate()
                .map(|(i, (qty, price, cur))| {
                    let price = Money::new(*price, CurrencyCode::new(cur).unwrap());
                    item(i as i32, &qty.to_string(), StockStatus::Ok, Some(price))
                })
                .collect();

            let distinct = rows.iter().map(|r| r.2).collect::<std::collections::HashSet<_>>().len();
            let cost = total_purchase_cost(&part(), &items);

            prop_assert_eq!(cost.currency.as_ref().unwrap().as_str(), rows[0].2);
            prop_assert_eq!(cost.mixed_currency, distinct > 1);

            // The total covers exactly the prefix before the first conflict
            let prefix: Decimal = rows
                .iter()
                .take_while(|r| r.2 == rows[0].2)
                .map(|r| r.0 * r.1)
                .sum();
            prop_assert_eq!(cost.total.unwrap().amount, prefix);

            let summed = rows.iter().take_while(|r| r.2 == rows[0].2).count();
            let expected_excluded = if distinct > 1 { rows.len() - summed } else { 0 };
            prop_assert_eq!(cost.excluded_items as usize, expected_excluded);
        }
    }
}
