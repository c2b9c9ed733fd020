//! HTTP handlers for the host plugin entry points

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;

use shared::{DashboardItem, PanelList, PluginMetadata, UiContext, PLUGIN};

use crate::middleware::CurrentUser;
use crate::services::PanelService;
use crate::AppState;

/// Plugin metadata as registered with the host
pub async fn get_plugin_metadata() -> Json<PluginMetadata> {
    Json(PLUGIN)
}

/// Custom panels for the page the host is rendering; never an error
pub async fn get_ui_panels(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(context): Query<UiContext>,
) -> Json<PanelList> {
    let service = PanelService::new(state.db, state.config.plugin.clone());
    Json(service.get_ui_panels(&context).await)
}

/// Custom dashboard items for the current user
pub async fn get_ui_dashboard_items(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Json<DashboardItemsResponse> {
    let service = PanelService::new(state.db, state.config.plugin.clone());
    Json(DashboardItemsResponse {
        items: service.get_ui_dashboard_items(&current_user.0),
    })
}

/// Response for dashboard items
#[derive(Debug, Serialize)]
pub struct DashboardItemsResponse {
    pub items: Vec<DashboardItem>,
}
