//! Customer order route handlers: order creation (with server-side pricing
//! and checkout-session hand-off) and status tracking.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checkout;
use crate::db::{self, NewOrder};
use crate::error::{AppError, Result};
use crate::pricing::responses::QuoteResponse;
use crate::pricing::{catalog, compute_pricing, load_policy, OrderConfiguration, ServicePackage};
use crate::AppState;

/// Order API router, nested under /api/orders
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/:id", get(status))
}

/// Request to create an order and open a checkout session
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub player_id: Option<Uuid>,

    pub service_package: ServicePackage,
    #[serde(default)]
    pub customer_provides_string: bool,
    /// Chosen catalog string; required unless the customer provides their own
    #[serde(default)]
    pub string_product_id: Option<Uuid>,
    #[serde(default)]
    pub is_express: bool,
    #[serde(default)]
    pub add_regrip: bool,
    #[serde(default)]
    pub add_overgrip: bool,
    #[serde(default)]
    pub add_dampener: bool,
    #[serde(default)]
    pub dampener_bundle: bool,
    #[serde(default)]
    pub add_second_racket: bool,

    #[serde(default)]
    pub racquet_model: Option<String>,
    #[serde(default)]
    pub tension_mains: Option<i32>,
    #[serde(default)]
    pub tension_crosses: Option<i32>,
    pub pickup_address: String,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[serde(default)]
    pub pickup_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub special_instructions: Option<String>,

    /// Policy version the customer's live preview was quoted against. When
    /// present and stale the order is rejected so the shown total can never
    /// differ from the charged total.
    #[serde(default)]
    pub quoted_policy_version: Option<i32>,
}

impl CreateOrderRequest {
    fn validate(&self) -> Result<()> {
        if self.customer_name.trim().is_empty() {
            return Err(AppError::Validation("customer_name is required".to_string()));
        }
        if self.customer_email.trim().is_empty() {
            return Err(AppError::Validation("customer_email is required".to_string()));
        }
        if self.pickup_address.trim().is_empty() {
            return Err(AppError::Validation("pickup_address is required".to_string()));
        }
        if !self.customer_provides_string && self.string_product_id.is_none() {
            return Err(AppError::Validation(
                "string_product_id is required unless the customer provides their own string"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Response for order creation
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: Uuid,
    pub status: String,
    pub checkout_url: String,
    pub quote: QuoteResponse,
}

/// Create an order: resolve the string price, recompute pricing server-side,
/// persist, and open the hosted checkout session.
async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>> {
    req.validate()?;

    // Resolve the chosen string to its catalog price; the calculator trusts
    // this value and never does catalog lookups itself.
    let string_price = match req.string_product_id {
        Some(string_id) if !req.customer_provides_string => {
            catalog::resolve_string(&state.db, &state.cache, string_id)
                .await?
                .ok_or_else(|| {
                    AppError::Validation(format!("unknown or inactive string: {string_id}"))
                })?
                .price
        }
        // ignored by the calculator when the customer supplies their own
        _ => Decimal::ZERO,
    };

    let policy = load_policy(&state.db, &state.cache).await?;
    if let Some(quoted) = req.quoted_policy_version {
        if quoted != policy.version {
            return Err(AppError::StalePolicyVersion {
                quoted,
                current: policy.version,
            });
        }
    }

    let config = OrderConfiguration {
        service_package: req.service_package,
        customer_provides_string: req.customer_provides_string,
        string_price,
        is_express: req.is_express,
        add_regrip: req.add_regrip,
        add_overgrip: req.add_overgrip,
        add_dampener: req.add_dampener,
        dampener_bundle: req.dampener_bundle,
        add_second_racket: req.add_second_racket,
    };

    // The authoritative computation: same function, same policy snapshot as
    // the customer's live preview.
    let breakdown = compute_pricing(&config, &policy)?;

    let order = db::insert_order(
        &state.db,
        &NewOrder {
            player_id: req.player_id,
            customer_name: req.customer_name,
            customer_email: req.customer_email,
            customer_phone: req.customer_phone,
            service_package: config.service_package.as_str().to_string(),
            customer_provides_string: config.customer_provides_string,
            string_product_id: req.string_product_id,
            string_price: breakdown.string_price,
            is_express: config.is_express,
            add_regrip: config.add_regrip,
            add_overgrip: config.add_overgrip,
            add_dampener: config.add_dampener,
            dampener_bundle: config.dampener_bundle,
            add_second_racket: config.add_second_racket,
            racquet_model: req.racquet_model,
            tension_mains: req.tension_mains,
            tension_crosses: req.tension_crosses,
            pickup_address: req.pickup_address,
            delivery_address: req.delivery_address,
            pickup_time: req.pickup_time,
            special_instructions: req.special_instructions,
            subtotal: breakdown.subtotal,
            pickup_fee: breakdown.pickup_fee,
            total: breakdown.total,
            policy_version: policy.version,
        },
    )
    .await?;

    let session = checkout::create_session(
        &state.checkout,
        order.id,
        breakdown.total,
        &order.customer_email,
    );
    db::set_checkout_session(&state.db, order.id, &session.session_id).await?;

    tracing::info!(
        "Order {} created, total {} (policy v{})",
        order.id,
        breakdown.total,
        policy.version
    );

    Ok(Json(CreateOrderResponse {
        order_id: order.id,
        status: order.status,
        checkout_url: session.url,
        quote: QuoteResponse::from_breakdown(&breakdown, policy.version),
    }))
}

/// Customer-facing order status
#[derive(Debug, Serialize)]
pub struct OrderStatusResponse {
    pub order_id: Uuid,
    pub status: String,
    pub service_package: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub pickup_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order status tracking
async fn status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<Json<OrderStatusResponse>> {
    let order = db::get_order(&state.db, order_id).await?;

    Ok(Json(OrderStatusResponse {
        order_id: order.id,
        status: order.status,
        service_package: order.service_package,
        total: order.total,
        pickup_time: order.pickup_time,
        created_at: order.created_at,
        updated_at: order.updated_at,
    }))
}
