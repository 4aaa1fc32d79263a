//! Pricing engine for stringing orders.
//!
//! The calculator is pure; the surrounding submodules load the versioned
//! policy and string catalog it is parameterized with and expose the quote
//! API consumed by the order-building UI.

pub mod calculator;
pub mod catalog;
pub mod policy;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;

// Re-export commonly used items
pub use calculator::{
    compute_pricing, round_money, OrderConfiguration, PriceBreakdown, PricingError, ServicePackage,
};
pub use policy::{load_policy, PricingPolicy};
pub use routes::router;
