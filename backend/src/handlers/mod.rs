//! HTTP handlers for the Part Total Price service

pub mod health;
pub mod plugin;
pub mod valuation;

pub use health::health_check;
pub use plugin::{get_plugin_metadata, get_ui_dashboard_items, get_ui_panels};
pub use valuation::{get_part_purchase_cost, get_part_stock, get_part_stock_by_location};
