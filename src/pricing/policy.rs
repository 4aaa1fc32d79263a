//! Versioned pricing policy.
//!
//! The policy is a single versioned artifact loaded once per request from the
//! database (cache-first) and threaded into the calculator as a parameter.
//! Nothing reads pricing constants from module-level state: the quote endpoint
//! and the pre-checkout computation must see the same snapshot, and the
//! response's `policy_version` lets the order submission prove it quoted
//! against the version being charged.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::cache::AppCache;
use crate::error::AppError;

use super::calculator::ServicePackage;
use super::queries;

/// Fixed fee per named add-on service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnFees {
    pub regrip: Decimal,
    pub overgrip: Decimal,
    pub dampener: Decimal,
    pub dampener_bundle: Decimal,
}

/// Read-only pricing policy snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    #[serde(default)]
    pub version: i32,
    /// Base labor price per service package.
    pub labor: HashMap<ServicePackage, Decimal>,
    /// Tier used when a package has no labor price (fail closed, never $0).
    pub default_package: ServicePackage,
    /// Flat adjustment when the customer supplies their own string. Negative.
    pub customer_string_credit: Decimal,
    pub add_ons: AddOnFees,
    /// Delivery/logistics charge, currently absorbed into package prices.
    /// A named constant so it stays independently overridable.
    pub pickup_fee: Decimal,
}

impl PricingPolicy {
    /// Labor price for a package, falling closed to the default tier when the
    /// package itself is missing from the table. `None` only when the table
    /// is unusable (default tier missing too).
    pub fn labor_price(&self, package: ServicePackage) -> Option<Decimal> {
        self.labor
            .get(&package)
            .or_else(|| self.labor.get(&self.default_package))
            .copied()
    }

    /// Build a policy from a stored row's JSON terms, stamping the row version.
    pub fn from_terms(version: i32, terms: serde_json::Value) -> Result<Self, AppError> {
        let mut policy: PricingPolicy = serde_json::from_value(terms).map_err(|e| {
            AppError::PolicyUnavailable(format!("malformed pricing policy terms: {e}"))
        })?;
        policy.version = version;
        Ok(policy)
    }
}

impl Default for PricingPolicy {
    /// Launch pricing. Seeds the `pricing_policy` table; it is never used as
    /// a fallback when the load fails - a failed load blocks checkout.
    fn default() -> Self {
        Self {
            version: 1,
            labor: HashMap::from([
                (ServicePackage::MatchReady, dec!(35)),
                (ServicePackage::ProPerformance, dec!(50)),
                (ServicePackage::SameDay, dec!(65)),
            ]),
            default_package: ServicePackage::MatchReady,
            customer_string_credit: dec!(-10),
            add_ons: AddOnFees {
                regrip: dec!(25),
                overgrip: dec!(3),
                dampener: dec!(5),
                dampener_bundle: dec!(7),
            },
            pickup_fee: dec!(0),
        }
    }
}

/// Policy row from pricing_policy
#[derive(Debug, Clone, FromRow)]
pub struct PolicyRow {
    pub id: i32,
    pub version: i32,
    pub terms: serde_json::Value,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Load the active pricing policy, cache-first.
///
/// A missing or malformed row is `PolicyUnavailable` and must block checkout
/// entirely; there is no silent default here.
pub async fn load_policy(pool: &PgPool, cache: &AppCache) -> Result<Arc<PricingPolicy>, AppError> {
    if let Some(cached) = cache.policy.get(AppCache::POLICY_KEY).await {
        tracing::debug!("Cache HIT for pricing policy v{}", cached.version);
        return Ok(cached);
    }

    tracing::debug!("Cache MISS for pricing policy");
    let row = queries::get_active_policy(pool)
        .await?
        .ok_or_else(|| AppError::PolicyUnavailable("no active pricing policy row".to_string()))?;

    let policy = Arc::new(PricingPolicy::from_terms(row.version, row.terms)?);
    cache
        .policy
        .insert(AppCache::POLICY_KEY.to_string(), policy.clone())
        .await;

    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_covers_every_package() {
        let policy = PricingPolicy::default();
        for pkg in [
            ServicePackage::MatchReady,
            ServicePackage::ProPerformance,
            ServicePackage::SameDay,
        ] {
            assert!(policy.labor_price(pkg).is_some());
        }
    }

    #[test]
    fn test_customer_string_credit_is_negative() {
        let policy = PricingPolicy::default();
        assert!(policy.customer_string_credit < Decimal::ZERO);
    }

    #[test]
    fn test_from_terms_stamps_row_version() {
        let terms = serde_json::to_value(PricingPolicy::default()).unwrap();
        let policy = PricingPolicy::from_terms(7, terms).unwrap();
        assert_eq!(policy.version, 7);
        assert_eq!(policy.add_ons.dampener_bundle, dec!(7));
    }

    #[test]
    fn test_from_terms_rejects_malformed_json() {
        let err = PricingPolicy::from_terms(1, serde_json::json!({"labor": "nope"}));
        assert!(err.is_err());
    }

    #[test]
    fn test_terms_round_trip() {
        let policy = PricingPolicy::default();
        let terms = serde_json::to_value(&policy).unwrap();
        let parsed = PricingPolicy::from_terms(policy.version, terms).unwrap();
        assert_eq!(parsed, policy);
    }
}
