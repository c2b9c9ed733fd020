//! Stock item models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{LocationId, Money, PartId};

/// Host stock status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum StockStatus {
    Ok,
    Attention,
    Damaged,
    Destroyed,
    Rejected,
    Lost,
    Quarantined,
    Returned,
    /// Any code this plugin does not know about
    Other(i32),
}

impl StockStatus {
    pub const OK_CODE: i32 = 10;
    pub const DAMAGED_CODE: i32 = 55;

    pub fn code(&self) -> i32 {
        match self {
            StockStatus::Ok => Self::OK_CODE,
            StockStatus::Attention => 50,
            StockStatus::Damaged => Self::DAMAGED_CODE,
            StockStatus::Destroyed => 60,
            StockStatus::Rejected => 65,
            StockStatus::Lost => 70,
            StockStatus::Quarantined => 75,
            StockStatus::Returned => 85,
            StockStatus::Other(code) => *code,
        }
    }
}

impl From<i32> for StockStatus {
    fn from(code: i32) -> Self {
        match code {
            10 => StockStatus::Ok,
            50 => StockStatus::Attention,
            55 => StockStatus::Damaged,
            60 => StockStatus::Destroyed,
            65 => StockStatus::Rejected,
            70 => StockStatus::Lost,
            75 => StockStatus::Quarantined,
            85 => StockStatus::Returned,
            other => StockStatus::Other(other),
        }
    }
}

impl From<StockStatus> for i32 {
    fn from(status: StockStatus) -> Self {
        status.code()
    }
}

/// One quantity-bearing unit of stock for a part
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockItem {
    pub id: i32,
    pub part_id: PartId,
    pub quantity: Decimal,
    pub status: StockStatus,
    pub purchase_price: Option<Money>,
    /// May point at a location that has since been deleted
    pub location_id: Option<LocationId>,
}

impl StockItem {
    /// Purchase price, with zero amounts treated as absent
    pub fn priced(&self) -> Option<&Money> {
        self.purchase_price.as_ref().filter(|price| !price.is_zero())
    }
}
