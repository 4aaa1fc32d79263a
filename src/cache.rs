//! In-memory caching using moka
//!
//! Provides application-level caching for the pricing policy snapshot and the
//! string catalog. The policy TTL is deliberately short: both the quote
//! endpoint and pre-checkout pricing read through this cache, so a policy
//! change propagates to both sites within one TTL window.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::StringProduct;
use crate::pricing::policy::PricingPolicy;
use crate::pricing::queries;

/// Application cache holding the policy snapshot and catalog data
#[derive(Clone)]
pub struct AppCache {
    /// Pricing policy singleton (POLICY_KEY -> PricingPolicy)
    pub policy: Cache<String, Arc<PricingPolicy>>,
    /// Full active string catalog (CATALOG_KEY -> Vec<StringProduct>)
    pub string_catalog: Cache<String, Arc<Vec<StringProduct>>>,
    /// Individual strings by id (for order-time price resolution)
    pub string_products: Cache<Uuid, Arc<StringProduct>>,
}

impl AppCache {
    pub const POLICY_KEY: &'static str = "policy";
    pub const CATALOG_KEY: &'static str = "strings";

    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Policy singleton: 5 min TTL keeps preview and charge aligned
            policy: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(5 * 60))
                .build(),

            // String catalog listing: 10 min TTL
            string_catalog: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(10 * 60))
                .build(),

            // Strings by id: 200 entries, 10 min TTL, 5 min idle
            string_products: Cache::builder()
                .max_capacity(200)
                .time_to_live(Duration::from_secs(10 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            policy_cached: self.policy.entry_count() > 0,
            catalog_cached: self.string_catalog.entry_count() > 0,
            string_products_size: self.string_products.entry_count(),
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.policy.invalidate_all();
        self.string_catalog.invalidate_all();
        self.string_products.invalidate_all();
        info!("All caches invalidated");
    }

    /// Invalidate a single string (after a stock or price edit)
    pub async fn invalidate_string(&self, string_id: Uuid) {
        self.string_products.invalidate(&string_id).await;
        // Listing may carry the stale entry too
        self.string_catalog.invalidate_all();
        info!("Cache invalidated for string: {}", string_id);
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub policy_cached: bool,
    pub catalog_cached: bool,
    pub string_products_size: u64,
}

/// Start background cache warmer
///
/// Warms the cache on startup and refreshes every 10 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    // Initial warm-up
    warm_cache(&cache, &db).await;

    // Periodic refresh every 10 minutes
    let mut interval = interval(Duration::from_secs(10 * 60));
    loop {
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with commonly accessed data
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    // Warm pricing policy
    match queries::get_active_policy(db).await {
        Ok(Some(row)) => match PricingPolicy::from_terms(row.version, row.terms) {
            Ok(loaded) => {
                cache
                    .policy
                    .insert(AppCache::POLICY_KEY.to_string(), Arc::new(loaded))
                    .await;
            }
            Err(e) => warn!("Failed to parse pricing policy during warm-up: {}", e),
        },
        Ok(None) => warn!("No active pricing policy row to warm"),
        Err(e) => warn!("Failed to warm policy cache: {}", e),
    }

    // Warm string catalog
    match queries::list_active_strings(db).await {
        Ok(strings) => {
            cache
                .string_catalog
                .insert(AppCache::CATALOG_KEY.to_string(), Arc::new(strings))
                .await;
        }
        Err(e) => warn!("Failed to warm string catalog cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
