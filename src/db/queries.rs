//! Database queries for orders, players and inventory

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{InventoryAlert, Order, Player, StringProduct};

/// Fields needed to insert a new order row.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub player_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub service_package: String,
    pub customer_provides_string: bool,
    pub string_product_id: Option<Uuid>,
    pub string_price: Decimal,
    pub is_express: bool,
    pub add_regrip: bool,
    pub add_overgrip: bool,
    pub add_dampener: bool,
    pub dampener_bundle: bool,
    pub add_second_racket: bool,
    pub racquet_model: Option<String>,
    pub tension_mains: Option<i32>,
    pub tension_crosses: Option<i32>,
    pub pickup_address: String,
    pub delivery_address: Option<String>,
    pub pickup_time: Option<DateTime<Utc>>,
    pub special_instructions: Option<String>,
    pub subtotal: Decimal,
    pub pickup_fee: Decimal,
    pub total: Decimal,
    pub policy_version: i32,
}

/// Insert a new order with status 'pending', returning the stored row.
pub async fn insert_order(pool: &PgPool, new: &NewOrder) -> Result<Order> {
    let order = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (
            id, player_id, customer_name, customer_email, customer_phone,
            service_package, customer_provides_string, string_product_id, string_price,
            is_express, add_regrip, add_overgrip, add_dampener, dampener_bundle,
            add_second_racket, racquet_model, tension_mains, tension_crosses,
            pickup_address, delivery_address, pickup_time, special_instructions,
            subtotal, pickup_fee, total, policy_version,
            status, inventory_deducted, created_at, updated_at
        )
        VALUES (
            $1, $2, $3, $4, $5,
            $6, $7, $8, $9,
            $10, $11, $12, $13, $14,
            $15, $16, $17, $18,
            $19, $20, $21, $22,
            $23, $24, $25, $26,
            'pending', false, now(), now()
        )
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.player_id)
    .bind(&new.customer_name)
    .bind(&new.customer_email)
    .bind(&new.customer_phone)
    .bind(&new.service_package)
    .bind(new.customer_provides_string)
    .bind(new.string_product_id)
    .bind(new.string_price)
    .bind(new.is_express)
    .bind(new.add_regrip)
    .bind(new.add_overgrip)
    .bind(new.add_dampener)
    .bind(new.dampener_bundle)
    .bind(new.add_second_racket)
    .bind(&new.racquet_model)
    .bind(new.tension_mains)
    .bind(new.tension_crosses)
    .bind(&new.pickup_address)
    .bind(&new.delivery_address)
    .bind(new.pickup_time)
    .bind(&new.special_instructions)
    .bind(new.subtotal)
    .bind(new.pickup_fee)
    .bind(new.total)
    .bind(new.policy_version)
    .fetch_one(pool)
    .await?;

    Ok(order)
}

/// Get an order by id
pub async fn get_order(pool: &PgPool, order_id: Uuid) -> Result<Order> {
    let order = sqlx::query_as::<_, Order>(
        r#"
        SELECT *
        FROM orders
        WHERE id = $1
        "#,
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(order)
}

/// List orders newest-first, optionally filtered by status
pub async fn list_orders(
    pool: &PgPool,
    status: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Order>> {
    let orders = match status {
        Some(status) => {
            sqlx::query_as::<_, Order>(
                r#"
                SELECT *
                FROM orders
                WHERE status = $1
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Order>(
                r#"
                SELECT *
                FROM orders
                ORDER BY created_at DESC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(orders)
}

/// Patch an order's status, returning the updated row
pub async fn update_order_status(pool: &PgPool, order_id: Uuid, status: &str) -> Result<Order> {
    let order = sqlx::query_as::<_, Order>(
        r#"
        UPDATE orders
        SET status = $2, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(order_id)
    .bind(status)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(order)
}

/// Attach the hosted-checkout session reference to an order
pub async fn set_checkout_session(pool: &PgPool, order_id: Uuid, session_id: &str) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE orders
        SET checkout_session_id = $2, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(order_id)
    .bind(session_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Flip the one-time inventory flag; returns false when it was already set,
/// which makes the stock deduction idempotent under repeated status patches.
pub async fn mark_inventory_deducted(pool: &PgPool, order_id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE orders
        SET inventory_deducted = true, updated_at = now()
        WHERE id = $1
          AND inventory_deducted = false
        "#,
    )
    .bind(order_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Deduct sets of string from stock, returning the updated product
pub async fn decrement_string_stock(
    pool: &PgPool,
    string_id: Uuid,
    sets: i32,
) -> Result<StringProduct> {
    let product = sqlx::query_as::<_, StringProduct>(
        r#"
        UPDATE string_products
        SET stock_quantity = stock_quantity - $2
        WHERE id = $1
        RETURNING id, name, brand, gauge, price, stock_quantity, reorder_threshold, active
        "#,
    )
    .bind(string_id)
    .bind(sets)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(product)
}

/// Adjust stock by a signed delta (staff restock or correction)
pub async fn adjust_string_stock(
    pool: &PgPool,
    string_id: Uuid,
    delta: i32,
) -> Result<StringProduct> {
    let product = sqlx::query_as::<_, StringProduct>(
        r#"
        UPDATE string_products
        SET stock_quantity = stock_quantity + $2
        WHERE id = $1
        RETURNING id, name, brand, gauge, price, stock_quantity, reorder_threshold, active
        "#,
    )
    .bind(string_id)
    .bind(delta)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(product)
}

/// Full inventory listing for the ops console (active strings only)
pub async fn list_inventory(pool: &PgPool) -> Result<Vec<StringProduct>> {
    let strings = sqlx::query_as::<_, StringProduct>(
        r#"
        SELECT id, name, brand, gauge, price, stock_quantity, reorder_threshold, active
        FROM string_products
        WHERE active = true
        ORDER BY brand, name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(strings)
}

/// Unresolved low-stock alert for a string, if one exists
pub async fn find_unresolved_alert(
    pool: &PgPool,
    string_id: Uuid,
) -> Result<Option<InventoryAlert>> {
    let alert = sqlx::query_as::<_, InventoryAlert>(
        r#"
        SELECT id, string_product_id, stock_at_alert, resolved, created_at
        FROM inventory_alerts
        WHERE string_product_id = $1
          AND resolved = false
        LIMIT 1
        "#,
    )
    .bind(string_id)
    .fetch_optional(pool)
    .await?;

    Ok(alert)
}

/// Raise a low-stock alert
pub async fn insert_low_stock_alert(
    pool: &PgPool,
    string_id: Uuid,
    stock_at_alert: i32,
) -> Result<InventoryAlert> {
    let alert = sqlx::query_as::<_, InventoryAlert>(
        r#"
        INSERT INTO inventory_alerts (id, string_product_id, stock_at_alert, resolved, created_at)
        VALUES ($1, $2, $3, false, now())
        RETURNING id, string_product_id, stock_at_alert, resolved, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(string_id)
    .bind(stock_at_alert)
    .fetch_one(pool)
    .await?;

    Ok(alert)
}

/// Unresolved alerts, newest first
pub async fn list_open_alerts(pool: &PgPool) -> Result<Vec<InventoryAlert>> {
    let alerts = sqlx::query_as::<_, InventoryAlert>(
        r#"
        SELECT id, string_product_id, stock_at_alert, resolved, created_at
        FROM inventory_alerts
        WHERE resolved = false
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(alerts)
}

/// List player profiles
pub async fn list_players(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Player>> {
    let players = sqlx::query_as::<_, Player>(
        r#"
        SELECT
            id, name, email, phone,
            default_tension_mains, default_tension_crosses,
            preferred_string_product_id, notes, created_at, updated_at
        FROM players
        ORDER BY name
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(players)
}

/// Get a player profile by id
pub async fn get_player(pool: &PgPool, player_id: Uuid) -> Result<Player> {
    let player = sqlx::query_as::<_, Player>(
        r#"
        SELECT
            id, name, email, phone,
            default_tension_mains, default_tension_crosses,
            preferred_string_product_id, notes, created_at, updated_at
        FROM players
        WHERE id = $1
        "#,
    )
    .bind(player_id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)?;

    Ok(player)
}

/// Create or update a player profile, keyed by email
pub async fn upsert_player(
    pool: &PgPool,
    name: &str,
    email: &str,
    phone: Option<&str>,
    default_tension_mains: Option<i32>,
    default_tension_crosses: Option<i32>,
    preferred_string_product_id: Option<Uuid>,
    notes: Option<&str>,
) -> Result<Player> {
    let player = sqlx::query_as::<_, Player>(
        r#"
        INSERT INTO players (
            id, name, email, phone,
            default_tension_mains, default_tension_crosses,
            preferred_string_product_id, notes, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now(), now())
        ON CONFLICT (email) DO UPDATE SET
            name = EXCLUDED.name,
            phone = EXCLUDED.phone,
            default_tension_mains = EXCLUDED.default_tension_mains,
            default_tension_crosses = EXCLUDED.default_tension_crosses,
            preferred_string_product_id = EXCLUDED.preferred_string_product_id,
            notes = EXCLUDED.notes,
            updated_at = now()
        RETURNING
            id, name, email, phone,
            default_tension_mains, default_tension_crosses,
            preferred_string_product_id, notes, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(default_tension_mains)
    .bind(default_tension_crosses)
    .bind(preferred_string_product_id)
    .bind(notes)
    .fetch_one(pool)
    .await?;

    Ok(player)
}
