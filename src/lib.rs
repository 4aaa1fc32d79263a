//! Stringside: backend for a mobile racquet-stringing service.
//!
//! Customers configure an order, get a live itemized quote, pay via hosted
//! checkout and track status; staff manage orders, string inventory and
//! player profiles. All money math lives in [`pricing`].

use sqlx::PgPool;

pub mod automation;
pub mod cache;
pub mod checkout;
pub mod db;
pub mod error;
pub mod models;
pub mod pricing;
pub mod routes;

use cache::AppCache;
use checkout::CheckoutConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub checkout: CheckoutConfig,
}
