//! Part models consumed from the host catalogue

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::types::{Money, PartId};

/// A catalogue part. Owned by the host, never mutated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub name: String,
    /// Internal price breaks ordered by ascending quantity
    #[serde(default)]
    pub internal_price_breaks: Vec<PriceBreak>,
}

/// Path parameters of the per-part endpoints
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PartPath {
    #[validate(range(min = 1, message = "Part id must be positive"))]
    pub part_id: i32,
}

/// One tier of a part's internal pricing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceBreak {
    pub quantity: Decimal,
    pub price: Money,
}

impl Part {
    pub fn has_internal_price_breaks(&self) -> bool {
        !self.internal_price_breaks.is_empty()
    }

    /// Fallback unit price for stock without a purchase price.
    ///
    /// Uses the first tier; a zero-priced tier yields nothing.
    pub fn fallback_unit_price(&self) -> Option<&Money> {
        if !self.has_internal_price_breaks() {
            return None;
        }

        self.internal_price_breaks
            .first()
            .map(|tier| &tier.price)
            .filter(|price| !price.is_zero())
    }
}
