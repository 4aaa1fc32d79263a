//! Ops console API: orders, inventory, alerts, players, cache monitoring.

use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::automation;
use crate::cache::CacheStats;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{InventoryAlert, Order, OrderStatus, Player, StringProduct};
use crate::AppState;

const ORDERS_PER_PAGE: i64 = 25;
const PLAYERS_PER_PAGE: i64 = 50;

/// Admin API router, nested under /api/admin
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders))
        .route("/orders/:id/status", patch(patch_status))
        .route("/inventory", get(list_inventory))
        .route("/inventory/:id/adjust", post(adjust_stock))
        .route("/alerts", get(list_alerts))
        .route("/players", get(list_players).post(upsert_player))
        .route("/cache/stats", get(cache_stats))
        .route("/cache/invalidate", post(invalidate_cache))
}

/// Query parameters for order listing
#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_page() -> i64 {
    1
}

/// List orders, newest first, optionally filtered by status
async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> Result<Json<Vec<Order>>> {
    if let Some(status) = &query.status {
        if OrderStatus::parse(status).is_none() {
            return Err(AppError::Validation(format!("unknown status '{status}'")));
        }
    }

    let offset = (query.page.max(1) - 1) * ORDERS_PER_PAGE;
    let orders = db::list_orders(
        &state.db,
        query.status.as_deref(),
        ORDERS_PER_PAGE,
        offset,
    )
    .await?;

    Ok(Json(orders))
}

/// Request to patch an order's status
#[derive(Debug, Deserialize)]
pub struct PatchStatusRequest {
    pub status: String,
}

/// Patch an order's status and run the inventory hooks.
///
/// Any status in the vocabulary is accepted from any current status; staff
/// correct mis-set statuses by patching again.
async fn patch_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(req): Json<PatchStatusRequest>,
) -> Result<Json<Order>> {
    let new_status = OrderStatus::parse(&req.status)
        .ok_or_else(|| AppError::Validation(format!("unknown status '{}'", req.status)))?;

    let order = db::get_order(&state.db, order_id).await?;
    automation::on_status_change(&state.db, &state.cache, &order, new_status).await?;

    let updated = db::update_order_status(&state.db, order_id, new_status.as_str()).await?;
    tracing::info!("Order {} -> {}", order_id, new_status.as_str());

    Ok(Json(updated))
}

/// Full inventory listing with stock and thresholds
async fn list_inventory(State(state): State<AppState>) -> Result<Json<Vec<StringProduct>>> {
    let inventory = db::list_inventory(&state.db).await?;
    Ok(Json(inventory))
}

/// Request to adjust stock by a signed delta
#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: i32,
}

/// Restock or correct a string's stock count
async fn adjust_stock(
    State(state): State<AppState>,
    Path(string_id): Path<Uuid>,
    Json(req): Json<AdjustStockRequest>,
) -> Result<Json<StringProduct>> {
    if req.delta == 0 {
        return Err(AppError::Validation("delta must be non-zero".to_string()));
    }

    let product = db::adjust_string_stock(&state.db, string_id, req.delta).await?;
    state.cache.invalidate_string(string_id).await;

    Ok(Json(product))
}

/// Unresolved low-stock alerts
async fn list_alerts(State(state): State<AppState>) -> Result<Json<Vec<InventoryAlert>>> {
    let alerts = db::list_open_alerts(&state.db).await?;
    Ok(Json(alerts))
}

/// Query parameters for player listing
#[derive(Debug, Deserialize)]
pub struct PlayerListQuery {
    #[serde(default = "default_page")]
    pub page: i64,
}

/// List player profiles
async fn list_players(
    State(state): State<AppState>,
    Query(query): Query<PlayerListQuery>,
) -> Result<Json<Vec<Player>>> {
    let offset = (query.page.max(1) - 1) * PLAYERS_PER_PAGE;
    let players = db::list_players(&state.db, PLAYERS_PER_PAGE, offset).await?;
    Ok(Json(players))
}

/// Request to create or update a player profile
#[derive(Debug, Deserialize)]
pub struct UpsertPlayerRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub default_tension_mains: Option<i32>,
    #[serde(default)]
    pub default_tension_crosses: Option<i32>,
    #[serde(default)]
    pub preferred_string_product_id: Option<Uuid>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Create or update a player profile (keyed by email)
async fn upsert_player(
    State(state): State<AppState>,
    Json(req): Json<UpsertPlayerRequest>,
) -> Result<Json<Player>> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(AppError::Validation("name and email are required".to_string()));
    }

    let player = db::upsert_player(
        &state.db,
        &req.name,
        &req.email,
        req.phone.as_deref(),
        req.default_tension_mains,
        req.default_tension_crosses,
        req.preferred_string_product_id,
        req.notes.as_deref(),
    )
    .await?;

    Ok(Json(player))
}

/// Cache statistics for monitoring
async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}

/// Drop all cached data (forces a fresh policy/catalog read on next request)
async fn invalidate_cache(State(state): State<AppState>) -> Json<CacheStats> {
    state.cache.invalidate_all();
    Json(state.cache.stats())
}
