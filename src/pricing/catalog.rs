//! Cache-first access to the string catalog.

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::error::AppError;
use crate::models::StringProduct;

use super::queries;

/// Load the active string catalog, cache-first.
pub async fn load_strings(
    pool: &PgPool,
    cache: &AppCache,
) -> Result<Arc<Vec<StringProduct>>, AppError> {
    if let Some(cached) = cache.string_catalog.get(AppCache::CATALOG_KEY).await {
        tracing::debug!("Cache HIT for string catalog");
        return Ok(cached);
    }

    tracing::debug!("Cache MISS for string catalog");
    let strings = Arc::new(queries::list_active_strings(pool).await?);
    cache
        .string_catalog
        .insert(AppCache::CATALOG_KEY.to_string(), strings.clone())
        .await;

    Ok(strings)
}

/// Resolve a chosen string to its catalog entry, cache-first.
///
/// `None` means the id is unknown or inactive; order creation treats that as
/// a validation failure, never a zero-price string.
pub async fn resolve_string(
    pool: &PgPool,
    cache: &AppCache,
    string_id: Uuid,
) -> Result<Option<Arc<StringProduct>>, AppError> {
    if let Some(cached) = cache.string_products.get(&string_id).await {
        return Ok(Some(cached));
    }

    match queries::get_string_product(pool, string_id).await? {
        Some(product) => {
            let product = Arc::new(product);
            cache
                .string_products
                .insert(string_id, product.clone())
                .await;
            Ok(Some(product))
        }
        None => Ok(None),
    }
}
