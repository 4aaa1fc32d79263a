//! Order models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Order status vocabulary.
///
/// Status patches are free-form within this vocabulary; there is no legal
/// transition graph enforced here, staff may move an order to any status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    PickedUp,
    InProgress,
    QualityCheck,
    Ready,
    OutForDelivery,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::QualityCheck => "quality_check",
            OrderStatus::Ready => "ready",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(OrderStatus::Pending),
            "picked_up" => Some(OrderStatus::PickedUp),
            "in_progress" => Some(OrderStatus::InProgress),
            "quality_check" => Some(OrderStatus::QualityCheck),
            "ready" => Some(OrderStatus::Ready),
            "out_for_delivery" => Some(OrderStatus::OutForDelivery),
            "delivered" => Some(OrderStatus::Delivered),
            _ => None,
        }
    }

    /// Stringing work is complete at quality check and every later status;
    /// that is the point where string stock gets consumed.
    pub fn stringing_complete(&self) -> bool {
        matches!(
            self,
            OrderStatus::QualityCheck
                | OrderStatus::Ready
                | OrderStatus::OutForDelivery
                | OrderStatus::Delivered
        )
    }
}

/// Order from orders
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: Uuid,
    pub player_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub service_package: String,
    pub customer_provides_string: bool,
    pub string_product_id: Option<Uuid>,
    #[serde(with = "rust_decimal::serde::str")]
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
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub pickup_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    pub policy_version: i32,
    pub status: String,
    pub checkout_session_id: Option<String>,
    pub inventory_deducted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::PickedUp,
            OrderStatus::InProgress,
            OrderStatus::QualityCheck,
            OrderStatus::Ready,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
        ] {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("restrung"), None);
    }

    #[test]
    fn test_stringing_complete_boundary() {
        assert!(!OrderStatus::InProgress.stringing_complete());
        assert!(OrderStatus::QualityCheck.stringing_complete());
        assert!(OrderStatus::Delivered.stringing_complete());
    }
}
