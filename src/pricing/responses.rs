//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculator::PriceBreakdown;

/// Itemized quote for JSON responses.
///
/// Every line item in the customer-facing receipt appears here verbatim;
/// amounts serialize as strings so no precision is lost on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub service_labor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub string_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub express_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub regrip_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub overgrip_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub dampener_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub second_racket_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub pickup_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    /// Version of the policy snapshot this quote was computed against. Order
    /// submission echoes it back so a mid-session policy change is caught.
    pub policy_version: i32,
}

impl QuoteResponse {
    pub fn from_breakdown(breakdown: &PriceBreakdown, policy_version: i32) -> Self {
        Self {
            service_labor: breakdown.service_labor,
            string_price: breakdown.string_price,
            express_fee: breakdown.express_fee,
            regrip_fee: breakdown.regrip_fee,
            overgrip_fee: breakdown.overgrip_fee,
            dampener_fee: breakdown.dampener_fee,
            second_racket_fee: breakdown.second_racket_fee,
            subtotal: breakdown.subtotal,
            pickup_fee: breakdown.pickup_fee,
            total: breakdown.total,
            policy_version,
        }
    }
}
