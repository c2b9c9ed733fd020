//! Per-part valuation: purchase cost, stock totals and per-location stock
//!
//! All functions here are pure. Callers load host rows and pass them in.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::location::{
    deleted_location_label, LocationKey, LocationResolver, NO_LOCATION_LABEL,
};
use super::part::Part;
use super::stock::{StockItem, StockStatus};
use crate::types::{CurrencyCode, LocationId, Money};

// ============================================================================
// Money accumulation
// ============================================================================

/// Fold one amount into a running sum.
///
/// Returns the new sum, the sum's currency and whether a second currency has
/// been seen. Once mixed, the sum no longer changes.
pub fn accumulate(
    current: Option<Money>,
    saw_mixed: bool,
    candidate: &Money,
) -> (Option<Money>, Option<CurrencyCode>, bool) {
    if saw_mixed {
        let currency = current.as_ref().map(|m| m.currency.clone());
        return (current, currency, true);
    }

    match current {
        None => (
            Some(candidate.clone()),
            Some(candidate.currency.clone()),
            false,
        ),
        Some(sum) => match sum.checked_add(candidate) {
            Ok(next) => {
                let currency = Some(next.currency.clone());
                (Some(next), currency, false)
            }
            Err(_) => {
                let currency = Some(sum.currency.clone());
                (Some(sum), currency, true)
            }
        },
    }
}

/// Running single-currency sum that trips on the first foreign currency
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoneyAccumulator {
    sum: Option<Money>,
    mixed: bool,
}

impl MoneyAccumulator {
    /// Start at zero in a known currency
    pub fn seeded(currency: CurrencyCode) -> Self {
        Self {
            sum: Some(Money::zero(currency)),
            mixed: false,
        }
    }

    /// Returns false when the candidate was not added
    pub fn add(&mut self, candidate: &Money) -> bool {
        let was_mixed = self.mixed;
        let (sum, _, mixed) = accumulate(self.sum.take(), self.mixed, candidate);
        self.sum = sum;
        self.mixed = mixed;
        !was_mixed && !mixed
    }

    pub fn is_empty(&self) -> bool {
        self.sum.is_none()
    }

    pub fn is_mixed(&self) -> bool {
        self.mixed
    }

    pub fn currency(&self) -> Option<&CurrencyCode> {
        self.sum.as_ref().map(|m| &m.currency)
    }

    pub fn total(&self) -> Option<&Money> {
        self.sum.as_ref()
    }

    pub fn into_total(self) -> Option<Money> {
        self.sum
    }
}

// ============================================================================
// Purchase cost
// ============================================================================

/// Purchase cost of a part's stock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseCost {
    pub total: Option<Money>,
    pub ok_total: Option<Money>,
    pub damaged_total: Option<Money>,
    /// Currency of the first priced item
    pub currency: Option<CurrencyCode>,
    pub mixed_currency: bool,
    /// Priced items left out because accumulation stopped at a currency conflict
    pub excluded_items: u32,
}

/// Unit price of an item: its own purchase price, else the part's fallback tier
pub fn effective_unit_price<'a>(part: &'a Part, item: &'a StockItem) -> Option<&'a Money> {
    item.priced().or_else(|| part.fallback_unit_price())
}

/// Sum `unit price * quantity` over the part's stock.
///
/// Items without any price are skipped. At the first item priced in a second
/// currency the result is flagged mixed and summing stops for all three
/// totals; the remaining priced items are counted in `excluded_items`.
pub fn total_purchase_cost(part: &Part, items: &[StockItem]) -> PurchaseCost {
    let mut total = MoneyAccumulator::default();
    let mut ok_total = MoneyAccumulator::default();
    let mut damaged_total = MoneyAccumulator::default();
    let mut excluded_items = 0u32;

    for item in items {
        let Some(unit_price) = effective_unit_price(part, item) else {
            continue;
        };

        if total.is_mixed() {
            excluded_items += 1;
            continue;
        }

        if total.is_empty() {
            ok_total = MoneyAccumulator::seeded(unit_price.currency.clone());
            damaged_total = MoneyAccumulator::seeded(unit_price.currency.clone());
        }

        let line = unit_price.times(item.quantity);
        if !total.add(&line) {
            excluded_items += 1;
            continue;
        }

        match item.status {
            StockStatus::Ok => {
                ok_total.add(&line);
            }
            StockStatus::Damaged => {
                damaged_total.add(&line);
            }
            _ => {}
        }
    }

    PurchaseCost {
        currency: total.currency().cloned(),
        mixed_currency: total.is_mixed(),
        total: total.into_total(),
        ok_total: ok_total.into_total(),
        damaged_total: damaged_total.into_total(),
        excluded_items,
    }
}

// ============================================================================
// Stock totals
// ============================================================================

/// Stock quantities of a part split by status
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTotals {
    pub total_stock: Decimal,
    pub ok_stock: Decimal,
    pub damaged_stock: Decimal,
}

impl StockTotals {
    /// Sum quantities by status over loaded items.
    ///
    /// In-memory counterpart of the backend's `SUM ... FILTER` query, which
    /// feeds [`StockTotals::from_sums`]; the stock properties are checked
    /// against this form. `authoritative_total` is the host's own total when
    /// the caller keeps one.
    pub fn from_items(items: &[StockItem], authoritative_total: Option<Decimal>) -> Self {
        let sum_where = |status: Option<StockStatus>| -> Decimal {
            items
                .iter()
                .filter(|item| status.map_or(true, |s| item.status == s))
                .map(|item| item.quantity)
                .sum()
        };

        Self {
            total_stock: authoritative_total.unwrap_or_else(|| sum_where(None)),
            ok_stock: sum_where(Some(StockStatus::Ok)),
            damaged_stock: sum_where(Some(StockStatus::Damaged)),
        }
    }

    /// Build from SQL aggregates where an empty group yields NULL
    pub fn from_sums(
        total: Option<Decimal>,
        ok: Option<Decimal>,
        damaged: Option<Decimal>,
    ) -> Self {
        Self {
            total_stock: total.unwrap_or(Decimal::ZERO),
            ok_stock: ok.unwrap_or(Decimal::ZERO),
            damaged_stock: damaged.unwrap_or(Decimal::ZERO),
        }
    }

    /// Quantity in statuses other than OK and DAMAGED
    pub fn other_stock(&self) -> Decimal {
        self.total_stock - self.ok_stock - self.damaged_stock
    }
}

// ============================================================================
// Stock by location
// ============================================================================

/// One raw row of the grouped per-location query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuantityRow {
    pub location_id: Option<LocationId>,
    pub total_qty: Decimal,
    pub ok_qty: Decimal,
    pub damaged_qty: Decimal,
}

/// Quantities for one location after merging duplicate rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocationQuantities {
    pub total: Decimal,
    pub ok: Decimal,
    pub damaged: Decimal,
}

/// Breakdown entry for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationStock {
    pub location_id: Option<LocationId>,
    pub location_name: String,
    pub location_path: String,
    pub total: Decimal,
    pub ok: Decimal,
    pub damaged: Decimal,
}

/// Per-location breakdown keyed by location id, or `no_location`
pub type LocationBreakdown = BTreeMap<String, LocationStock>;

/// Group rows into one entry per location, including duplicate query rows
pub fn merge_location_rows<I>(rows: I) -> BTreeMap<LocationKey, LocationQuantities>
where
    I: IntoIterator<Item = LocationQuantityRow>,
{
    let mut merged: BTreeMap<LocationKey, LocationQuantities> = BTreeMap::new();
    for row in rows {
        let entry = merged.entry(LocationKey::from(row.location_id)).or_default();
        entry.total += row.total_qty;
        entry.ok += row.ok_qty;
        entry.damaged += row.damaged_qty;
    }
    merged
}

/// One grouped row per stock item.
///
/// In-memory counterpart of the backend's `GROUP BY location_id` query: the
/// rows it returns are not yet merged, exactly like duplicate query rows.
pub fn location_rows_from_items(items: &[StockItem]) -> Vec<LocationQuantityRow> {
    items
        .iter()
        .map(|item| {
            let only = |status: StockStatus| {
                if item.status == status {
                    item.quantity
                } else {
                    Decimal::ZERO
                }
            };
            LocationQuantityRow {
                location_id: item.location_id,
                total_qty: item.quantity,
                ok_qty: only(StockStatus::Ok),
                damaged_qty: only(StockStatus::Damaged),
            }
        })
        .collect()
}

/// Attach location metadata to merged quantities.
///
/// A location that no longer resolves gets a "(deleted)" placeholder label.
pub fn build_location_breakdown<R>(
    merged: BTreeMap<LocationKey, LocationQuantities>,
    resolver: &R,
) -> LocationBreakdown
where
    R: LocationResolver + ?Sized,
{
    merged
        .into_iter()
        .map(|(key, qty)| {
            let (location_name, location_path) = match key {
                LocationKey::NoLocation => {
                    (NO_LOCATION_LABEL.to_string(), NO_LOCATION_LABEL.to_string())
                }
                LocationKey::Location(id) => match resolver.resolve(id) {
                    Ok(location) => {
                        let path = location.display_path().to_string();
                        (location.name, path)
                    }
                    Err(_) => {
                        let label = deleted_location_label(id);
                        (label.clone(), label)
                    }
                },
            };

            let entry = LocationStock {
                location_id: key.location_id(),
                location_name,
                location_path,
                total: qty.total,
                ok: qty.ok,
                damaged: qty.damaged,
            };
            (key.to_string(), entry)
        })
        .collect()
}

/// Location ids in `merged` that the resolver cannot find
pub fn unresolved_locations<R>(
    merged: &BTreeMap<LocationKey, LocationQuantities>,
    resolver: &R,
) -> Vec<LocationId>
where
    R: LocationResolver + ?Sized,
{
    merged
        .keys()
        .filter_map(LocationKey::location_id)
        .filter(|id| resolver.resolve(*id).is_err())
        .collect()
}
