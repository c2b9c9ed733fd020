//! Panel and dashboard descriptors handed to the host UI
//!
//! Context keys are additive-only. Consumers must tolerate unknown keys and
//! treat every key as optional.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::plugin::RendererEntry;
use super::valuation::{LocationBreakdown, PurchaseCost, StockTotals};
use crate::types::{CurrencyCode, PartId};

/// Target model tag for part detail pages
pub const PART_MODEL: &str = "part";

pub const PANEL_KEY: &str = "part-total-price-panel";
pub const DASHBOARD_KEY: &str = "part-total-price-dashboard";

/// Plugin settings as configured by an administrator
pub type PluginSettings = BTreeMap<String, serde_json::Value>;

/// What the host is rendering when it asks for UI elements.
///
/// Never rejected: anything that is not a part detail page gets no panels.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UiContext {
    pub target_model: Option<String>,
    pub target_id: Option<PartId>,
}

impl UiContext {
    /// The part id when the target is a part detail page with a real id
    pub fn part_target(&self) -> Option<PartId> {
        match self.target_model.as_deref() {
            Some(PART_MODEL) => self.target_id.filter(|id| *id > 0),
            _ => None,
        }
    }
}

/// Flat data bag consumed by the panel renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelContext {
    pub settings: PluginSettings,
    pub locations_data: LocationBreakdown,
    pub total_price: Option<Decimal>,
    pub ok_total_price: Option<Decimal>,
    pub damaged_total_price: Option<Decimal>,
    pub total_stock: Option<Decimal>,
    pub ok_stock: Option<Decimal>,
    pub damaged_stock: Option<Decimal>,
    pub currency: Option<CurrencyCode>,
    pub mixed_currency: bool,
    pub excluded_items: u32,
    pub generated_at: Option<DateTime<Utc>>,
}

/// Everything the aggregation layer produced for one part
#[derive(Debug, Clone, PartialEq)]
pub struct PartAggregates {
    pub cost: PurchaseCost,
    pub stock: StockTotals,
    pub locations: LocationBreakdown,
}

impl PanelContext {
    pub fn from_aggregates(
        aggregates: PartAggregates,
        settings: PluginSettings,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let PartAggregates {
            cost,
            stock,
            locations,
        } = aggregates;

        Self {
            settings,
            locations_data: locations,
            total_price: cost.total.map(|m| m.amount),
            ok_total_price: cost.ok_total.map(|m| m.amount),
            damaged_total_price: cost.damaged_total.map(|m| m.amount),
            total_stock: Some(stock.total_stock),
            ok_stock: Some(stock.ok_stock),
            damaged_stock: Some(stock.damaged_stock),
            currency: cost.currency,
            mixed_currency: cost.mixed_currency,
            excluded_items: cost.excluded_items,
            generated_at: Some(generated_at),
        }
    }
}

/// A custom panel for the host's detail page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelDescriptor {
    pub key: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub source: String,
    pub context: PanelContext,
}

/// Panels for one request plus an optional notice when the part is unavailable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelList {
    pub panels: Vec<PanelDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl PanelList {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(panel: PanelDescriptor) -> Self {
        Self {
            panels: vec![panel],
            notice: None,
        }
    }

    pub fn unavailable(notice: impl Into<String>) -> Self {
        Self {
            panels: Vec::new(),
            notice: Some(notice.into()),
        }
    }

    /// The target part does not exist (any more)
    pub fn part_unavailable(part_id: PartId) -> Self {
        Self::unavailable(format!("Part {} is unavailable", part_id))
    }

    /// Aggregation failed for another reason
    pub fn load_failed() -> Self {
        Self::unavailable("Part data could not be loaded")
    }
}

/// Context of the dashboard item; carries no part data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardContext {
    pub settings: PluginSettings,
}

/// A custom dashboard widget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardItem {
    pub key: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub source: String,
    pub context: DashboardContext,
}

/// Build the part panel descriptor
pub fn assemble_part_panel(
    static_url: &str,
    aggregates: PartAggregates,
    settings: PluginSettings,
    generated_at: DateTime<Utc>,
) -> PanelDescriptor {
    PanelDescriptor {
        key: PANEL_KEY.to_string(),
        title: "Part Total Price".to_string(),
        description: "Purchase cost and stock by status and location".to_string(),
        icon: "ti:mood-smile:outline".to_string(),
        source: RendererEntry::Panel.static_source(static_url),
        context: PanelContext::from_aggregates(aggregates, settings, generated_at),
    }
}

/// Dashboard items for a user; only staff see the widget
pub fn dashboard_items(
    static_url: &str,
    settings: PluginSettings,
    is_staff: bool,
) -> Vec<DashboardItem> {
    if !is_staff {
        return Vec::new();
    }

    vec![DashboardItem {
        key: DASHBOARD_KEY.to_string(),
        title: "Part Total Price Dashboard Item".to_string(),
        description: "Part total price overview".to_string(),
        icon: "ti:dashboard:outline".to_string(),
        source: RendererEntry::DashboardItem.static_source(static_url),
        context: DashboardContext { settings },
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_target_requires_part_model() {
        let ctx = UiContext {
            target_model: Some("part".into()),
            target_id: Some(4),
        };
        assert_eq!(ctx.part_target(), Some(4));

        let ctx = UiContext {
            target_model: Some("stockitem".into()),
            target_id: Some(4),
        };
        assert_eq!(ctx.part_target(), None);

        let ctx = UiContext {
            target_model: Some("part".into()),
            target_id: None,
        };
        assert_eq!(ctx.part_target(), None);
    }

    #[test]
    fn test_part_target_ignores_zero_id_and_foreign_tags() {
        let ctx = UiContext {
            target_model: Some("part".into()),
            target_id: Some(0),
        };
        assert_eq!(ctx.part_target(), None);

        let ctx = UiContext {
            target_model: Some("x".repeat(200)),
            target_id: Some(5),
        };
        assert_eq!(ctx.part_target(), None);

        let ctx = UiContext {
            target_model: Some("build".into()),
            target_id: Some(0),
        };
        assert_eq!(ctx.part_target(), None);

        assert_eq!(UiContext::default().part_target(), None);
    }

    #[test]
    fn test_dashboard_hidden_for_non_staff() {
        assert!(dashboard_items("/static", PluginSettings::new(), false).is_empty());
        let items = dashboard_items("/static", PluginSettings::new(), true);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key, DASHBOARD_KEY);
    }

    #[test]
    fn test_context_tolerates_unknown_and_missing_keys() {
        let ctx: PanelContext =
            serde_json::from_str(r#"{"total_stock": "4", "future_key": [1, 2]}"#).unwrap();
        assert_eq!(ctx.total_stock, Some(Decimal::from(4)));
        assert!(ctx.total_price.is_none());
        assert!(!ctx.mixed_currency);
    }
}
