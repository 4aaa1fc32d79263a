//! Database queries for the pricing engine: the policy row and the string
//! catalog that feeds concrete prices into order configurations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::StringProduct;

use super::policy::PolicyRow;

/// Latest active pricing policy row, if any.
pub async fn get_active_policy(pool: &PgPool) -> Result<Option<PolicyRow>, AppError> {
    let row = sqlx::query_as::<_, PolicyRow>(
        r#"
        SELECT id, version, terms, active, created_at
        FROM pricing_policy
        WHERE active = true
        ORDER BY version DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Active string catalog, ordered for display.
pub async fn list_active_strings(pool: &PgPool) -> Result<Vec<StringProduct>, AppError> {
    let strings = sqlx::query_as::<_, StringProduct>(
        r#"
        SELECT
            id, name, brand, gauge, price,
            stock_quantity, reorder_threshold, active
        FROM string_products
        WHERE active = true
        ORDER BY brand, name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(strings)
}

/// Single active string by id (used to resolve a chosen string to its price
/// before the calculator runs).
pub async fn get_string_product(
    pool: &PgPool,
    string_id: Uuid,
) -> Result<Option<StringProduct>, AppError> {
    let string = sqlx::query_as::<_, StringProduct>(
        r#"
        SELECT
            id, name, brand, gauge, price,
            stock_quantity, reorder_threshold, active
        FROM string_products
        WHERE id = $1
          AND active = true
        "#,
    )
    .bind(string_id)
    .fetch_optional(pool)
    .await?;

    Ok(string)
}
