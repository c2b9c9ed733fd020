//! Panel service assembling the host UI elements for a part

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shared::{
    assemble_part_panel, dashboard_items, DashboardItem, PanelList, PartAggregates, PartId,
    UiContext,
};

use crate::config::PluginConfig;
use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::services::ValuationService;

/// Panel service building panel and dashboard descriptors
#[derive(Clone)]
pub struct PanelService {
    valuation: ValuationService,
    plugin: PluginConfig,
}

impl PanelService {
    pub fn new(db: PgPool, plugin: PluginConfig) -> Self {
        Self {
            valuation: ValuationService::new(db),
            plugin,
        }
    }

    /// Panels for the page the host is rendering.
    ///
    /// Never fails: a missing part or a failed query becomes an empty list
    /// with a notice.
    pub async fn get_ui_panels(&self, context: &UiContext) -> PanelList {
        let Some(part_id) = context.part_target() else {
            return PanelList::empty();
        };

        let result = self.valuation.part_aggregates(part_id).await;
        panels_from_aggregation(&self.plugin, part_id, result, Utc::now())
    }

    /// Dashboard items for the current user; staff only
    pub fn get_ui_dashboard_items(&self, user: &AuthUser) -> Vec<DashboardItem> {
        tracing::debug!(
            user_id = user.user_id,
            is_staff = user.is_staff,
            "Dashboard items requested"
        );
        dashboard_items(
            &self.plugin.static_url,
            self.plugin.settings.clone(),
            user.is_staff,
        )
    }
}

/// Turn the outcome of aggregating one part into the panel list
fn panels_from_aggregation(
    plugin: &PluginConfig,
    part_id: PartId,
    result: AppResult<PartAggregates>,
    generated_at: DateTime<Utc>,
) -> PanelList {
    match result {
        Ok(aggregates) => PanelList::single(assemble_part_panel(
            &plugin.static_url,
            aggregates,
            plugin.settings.clone(),
            generated_at,
        )),
        Err(err) if err.is_not_found() => {
            tracing::warn!(part_id, "Panel requested for missing part");
            PanelList::part_unavailable(part_id)
        }
        Err(err) => {
            tracing::error!(part_id, error = %err, "Failed to aggregate part data");
            PanelList::load_failed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use shared::{total_purchase_cost, LocationBreakdown, Part, PluginSettings, StockTotals};

    fn plugin() -> PluginConfig {
        PluginConfig {
            static_url: "/static/".to_string(),
            settings: PluginSettings::new(),
        }
    }

    fn empty_aggregates() -> PartAggregates {
        let part = Part {
            id: 3,
            name: "Fuse".to_string(),
            internal_price_breaks: Vec::new(),
        };
        PartAggregates {
            cost: total_purchase_cost(&part, &[]),
            stock: StockTotals::default(),
            locations: LocationBreakdown::new(),
        }
    }

    #[test]
    fn test_aggregates_become_single_panel() {
        let list = panels_from_aggregation(&plugin(), 3, Ok(empty_aggregates()), Utc::now());

        assert_eq!(list.panels.len(), 1);
        assert!(list.notice.is_none());
        assert_eq!(
            list.panels[0].source,
            "/static/plugins/part-total-price/Panel.js:renderPartTotalPricePanel"
        );
    }

    #[test]
    fn test_missing_part_becomes_notice() {
        let result = Err(AppError::NotFound("Part".to_string()));
        let list = panels_from_aggregation(&plugin(), 99, result, Utc::now());

        assert!(list.panels.is_empty());
        assert_eq!(list.notice.as_deref(), Some("Part 99 is unavailable"));
    }

    #[test]
    fn test_database_failure_becomes_notice() {
        let result = Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut));
        let list = panels_from_aggregation(&plugin(), 3, result, Utc::now());

        assert!(list.panels.is_empty());
        assert_eq!(list.notice.as_deref(), Some("Part data could not be loaded"));
    }
}
