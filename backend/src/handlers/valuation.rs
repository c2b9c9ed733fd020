//! HTTP handlers for per-part valuation endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use validator::Validate;

use shared::{LocationBreakdown, PartPath, PurchaseCost, StockTotals};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::ValuationService;
use crate::AppState;

/// Get purchase cost totals for a part
pub async fn get_part_purchase_cost(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(path): Path<PartPath>,
) -> AppResult<Json<PurchaseCost>> {
    path.validate()?;
    let service = ValuationService::new(state.db);
    let cost = service.part_total_purchase_cost(path.part_id).await?;
    Ok(Json(cost))
}

/// Get stock totals for a part
pub async fn get_part_stock(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(path): Path<PartPath>,
) -> AppResult<Json<StockTotals>> {
    path.validate()?;
    let service = ValuationService::new(state.db);
    let totals = service.part_total_stock(path.part_id).await?;
    Ok(Json(totals))
}

/// Get per-location stock for a part
pub async fn get_part_stock_by_location(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(path): Path<PartPath>,
) -> AppResult<Json<LocationBreakdown>> {
    path.validate()?;
    let service = ValuationService::new(state.db);
    let breakdown = service.part_stock_by_location(path.part_id).await?;
    Ok(Json(breakdown))
}
