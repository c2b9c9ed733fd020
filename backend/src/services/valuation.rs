//! Valuation service reading a part's stock from the host database
//!
//! All queries are read-only. Aggregation itself happens in `shared`.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use shared::{
    build_location_breakdown, merge_location_rows, price_from_columns, sanitize_quantity,
    total_purchase_cost, unresolved_locations, validate_quantity, LocationBreakdown,
    LocationId, LocationQuantityRow, Part, PartAggregates, PartId, PriceBreak, PurchaseCost,
    StockItem, StockLocation, StockStatus, StockTotals,
};

use crate::error::{AppError, AppResult};

/// Valuation service for per-part cost and stock aggregates
#[derive(Clone)]
pub struct ValuationService {
    db: PgPool,
}

/// Row for part query
#[derive(Debug, FromRow)]
struct PartRow {
    id: i32,
    name: String,
}

/// Row for internal price break query
#[derive(Debug, FromRow)]
struct PriceBreakRow {
    quantity: Decimal,
    price: Option<Decimal>,
    price_currency: Option<String>,
}

/// Row for stock item query
#[derive(Debug, FromRow)]
struct StockItemRow {
    id: i32,
    part_id: i32,
    quantity: Decimal,
    status: i32,
    purchase_price: Option<Decimal>,
    purchase_price_currency: Option<String>,
    location_id: Option<i32>,
}

/// Row for grouped per-location totals
#[derive(Debug, FromRow)]
struct LocationTotalsRow {
    location_id: Option<i32>,
    total_qty: Decimal,
    ok_qty: Decimal,
    damaged_qty: Decimal,
}

/// Row for location query
#[derive(Debug, FromRow)]
struct LocationRow {
    id: i32,
    name: String,
    pathstring: Option<String>,
}

impl From<StockItemRow> for StockItem {
    fn from(row: StockItemRow) -> Self {
        if let Err(reason) = validate_quantity(row.quantity) {
            tracing::warn!(
                stock_item = row.id,
                quantity = %row.quantity,
                "{}; treated as zero",
                reason
            );
        }

        StockItem {
            id: row.id,
            part_id: row.part_id,
            quantity: sanitize_quantity(row.quantity),
            status: StockStatus::from(row.status),
            purchase_price: price_from_columns(
                row.purchase_price,
                row.purchase_price_currency.as_deref(),
            ),
            location_id: row.location_id,
        }
    }
}

impl ValuationService {
    /// Create a new ValuationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a part with its internal price breaks
    pub async fn get_part(&self, part_id: PartId) -> AppResult<Part> {
        let row = sqlx::query_as::<_, PartRow>("SELECT id, name FROM part_part WHERE id = $1")
            .bind(part_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Part".to_string()))?;

        let breaks = sqlx::query_as::<_, PriceBreakRow>(
            r#"
            SELECT quantity, price, price_currency
            FROM part_partinternalpricebreak
            WHERE part_id = $1
            ORDER BY quantity ASC, id ASC
            "#,
        )
        .bind(part_id)
        .fetch_all(&self.db)
        .await?;

        let internal_price_breaks = breaks
            .into_iter()
            .filter_map(|b| {
                price_from_columns(b.price, b.price_currency.as_deref()).map(|price| PriceBreak {
                    quantity: b.quantity,
                    price,
                })
            })
            .collect();

        Ok(Part {
            id: row.id,
            name: row.name,
            internal_price_breaks,
        })
    }

    /// Fail with NotFound unless the part exists
    async fn ensure_part_exists(&self, part_id: PartId) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM part_part WHERE id = $1)",
        )
        .bind(part_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::NotFound("Part".to_string()));
        }
        Ok(())
    }

    /// Get all stock items of a part in insertion order
    pub async fn get_stock_items(&self, part_id: PartId) -> AppResult<Vec<StockItem>> {
        let rows = sqlx::query_as::<_, StockItemRow>(
            r#"
            SELECT id, part_id, quantity, status, purchase_price, purchase_price_currency,
                   location_id
            FROM stock_stockitem
            WHERE part_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(part_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(StockItem::from).collect())
    }

    /// Total purchase cost of a part's stock, split by status
    pub async fn part_total_purchase_cost(&self, part_id: PartId) -> AppResult<PurchaseCost> {
        let part = self.get_part(part_id).await?;
        let items = self.get_stock_items(part_id).await?;

        let cost = total_purchase_cost(&part, &items);
        if cost.mixed_currency {
            tracing::warn!(
                part_id,
                currency = ?cost.currency,
                excluded_items = cost.excluded_items,
                "Mixed currencies in stock; purchase cost is partial"
            );
        }

        Ok(cost)
    }

    /// Total, OK and damaged stock quantities of a part
    pub async fn part_total_stock(&self, part_id: PartId) -> AppResult<StockTotals> {
        self.ensure_part_exists(part_id).await?;

        let (total, ok, damaged) =
            sqlx::query_as::<_, (Option<Decimal>, Option<Decimal>, Option<Decimal>)>(
                r#"
                SELECT SUM(GREATEST(quantity, 0)),
                       SUM(GREATEST(quantity, 0)) FILTER (WHERE status = $2),
                       SUM(GREATEST(quantity, 0)) FILTER (WHERE status = $3)
                FROM stock_stockitem
                WHERE part_id = $1
                "#,
            )
            .bind(part_id)
            .bind(StockStatus::OK_CODE)
            .bind(StockStatus::DAMAGED_CODE)
            .fetch_one(&self.db)
            .await?;

        Ok(StockTotals::from_sums(total, ok, damaged))
    }

    /// Per-location stock of a part.
    ///
    /// Locations deleted after stock referenced them get a placeholder entry.
    pub async fn part_stock_by_location(&self, part_id: PartId) -> AppResult<LocationBreakdown> {
        self.ensure_part_exists(part_id).await?;

        let rows = sqlx::query_as::<_, LocationTotalsRow>(
            r#"
            SELECT location_id,
                   COALESCE(SUM(GREATEST(quantity, 0)), 0) AS total_qty,
                   COALESCE(SUM(GREATEST(quantity, 0)) FILTER (WHERE status = $2), 0) AS ok_qty,
                   COALESCE(SUM(GREATEST(quantity, 0)) FILTER (WHERE status = $3), 0) AS damaged_qty
            FROM stock_stockitem
            WHERE part_id = $1
            GROUP BY location_id
            "#,
        )
        .bind(part_id)
        .bind(StockStatus::OK_CODE)
        .bind(StockStatus::DAMAGED_CODE)
        .fetch_all(&self.db)
        .await?;

        let merged = merge_location_rows(rows.into_iter().map(|r| LocationQuantityRow {
            location_id: r.location_id,
            total_qty: r.total_qty,
            ok_qty: r.ok_qty,
            damaged_qty: r.damaged_qty,
        }));

        let ids: Vec<LocationId> = merged.keys().filter_map(|k| k.location_id()).collect();
        let locations = self.get_locations(&ids).await?;

        let missing = unresolved_locations(&merged, &locations);
        if !missing.is_empty() {
            tracing::warn!(part_id, ?missing, "Stock references deleted locations");
        }

        Ok(build_location_breakdown(merged, &locations))
    }

    /// Get existing locations among the given ids
    async fn get_locations(
        &self,
        ids: &[LocationId],
    ) -> AppResult<HashMap<LocationId, StockLocation>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, LocationRow>(
            "SELECT id, name, pathstring FROM stock_stocklocation WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| {
                (
                    r.id,
                    StockLocation {
                        id: r.id,
                        name: r.name,
                        pathstring: r.pathstring,
                    },
                )
            })
            .collect())
    }

    /// All three aggregates for a part
    pub async fn part_aggregates(&self, part_id: PartId) -> AppResult<PartAggregates> {
        let cost = self.part_total_purchase_cost(part_id).await?;
        let stock = self.part_total_stock(part_id).await?;
        let locations = self.part_stock_by_location(part_id).await?;

        tracing::debug!(
            part_id,
            total_stock = %stock.total_stock,
            locations = locations.len(),
            "Aggregated part valuation"
        );

        Ok(PartAggregates {
            cost,
            stock,
            locations,
        })
    }
}
