//! Pricing API route handlers.

use axum::{extract::State, routing::get, routing::post, Json, Router};

use crate::error::Result;
use crate::models::StringCatalogEntry;
use crate::AppState;

use super::calculator::compute_pricing;
use super::policy::load_policy;
use super::catalog;
use super::requests::QuoteRequest;
use super::responses::QuoteResponse;

/// Pricing API router, nested under /api/pricing
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(quote))
        .route("/strings", get(strings))
}

/// Live price quote for the order-building UI.
///
/// Runs the exact computation that order creation runs before checkout, so
/// the preview total always matches the charged total for the same policy
/// version.
async fn quote(
    State(state): State<AppState>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let policy = load_policy(&state.db, &state.cache).await?;
    let config = req.into_configuration();
    let breakdown = compute_pricing(&config, &policy)?;

    Ok(Json(QuoteResponse::from_breakdown(
        &breakdown,
        policy.version,
    )))
}

/// Active string catalog for the string-selection step.
async fn strings(State(state): State<AppState>) -> Result<Json<Vec<StringCatalogEntry>>> {
    let strings = catalog::load_strings(&state.db, &state.cache).await?;
    let entries = strings
        .iter()
        .map(StringCatalogEntry::from_product)
        .collect();
    Ok(Json(entries))
}
