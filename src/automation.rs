//! Inventory side effects of order fulfillment.
//!
//! Conditional database writes gated by one-time checks: stock is deducted at
//! most once per order (guarded by the order's `inventory_deducted` flag) and
//! a low-stock alert is raised at most once per string while unresolved.

use sqlx::PgPool;
use tracing::{info, warn};

use crate::cache::AppCache;
use crate::db;
use crate::error::Result;
use crate::models::{Order, OrderStatus};

/// Sets of string an order consumes. The second racquet is strung with its
/// own set; customer-provided string consumes nothing from our stock.
pub fn string_sets_needed(order: &Order) -> i32 {
    if order.customer_provides_string || order.string_product_id.is_none() {
        return 0;
    }
    if order.add_second_racket {
        2
    } else {
        1
    }
}

/// Whether this status patch should trigger the one-time stock deduction.
pub fn deduction_due(order: &Order, new_status: OrderStatus) -> bool {
    new_status.stringing_complete() && !order.inventory_deducted && string_sets_needed(order) > 0
}

/// Run the inventory hooks for an order that just changed status.
///
/// Safe to call on every patch; the flag check makes repeated calls no-ops.
pub async fn on_status_change(
    pool: &PgPool,
    cache: &AppCache,
    order: &Order,
    new_status: OrderStatus,
) -> Result<()> {
    if !deduction_due(order, new_status) {
        return Ok(());
    }

    // Claim the deduction first; a concurrent patch loses this race and skips.
    if !db::mark_inventory_deducted(pool, order.id).await? {
        return Ok(());
    }

    let string_id = match order.string_product_id {
        Some(id) => id,
        None => return Ok(()),
    };

    let sets = string_sets_needed(order);
    let product = db::decrement_string_stock(pool, string_id, sets).await?;
    cache.invalidate_string(string_id).await;
    info!(
        "Deducted {} set(s) of {} {} for order {}, {} left",
        sets, product.brand, product.name, order.id, product.stock_quantity
    );

    if product.needs_reorder() {
        // One alert per string while unresolved
        if db::find_unresolved_alert(pool, string_id).await?.is_none() {
            db::insert_low_stock_alert(pool, string_id, product.stock_quantity).await?;
            warn!(
                "Low stock alert raised for {} {} ({} left, threshold {})",
                product.brand, product.name, product.stock_quantity, product.reorder_threshold
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn order(
        customer_provides_string: bool,
        string_product_id: Option<Uuid>,
        add_second_racket: bool,
        inventory_deducted: bool,
    ) -> Order {
        Order {
            id: Uuid::new_v4(),
            player_id: None,
            customer_name: "Ana".to_string(),
            customer_email: "ana@example.com".to_string(),
            customer_phone: None,
            service_package: "match_ready".to_string(),
            customer_provides_string,
            string_product_id,
            string_price: dec!(25),
            is_express: false,
            add_regrip: false,
            add_overgrip: false,
            add_dampener: false,
            dampener_bundle: false,
            add_second_racket,
            racquet_model: None,
            tension_mains: Some(52),
            tension_crosses: Some(50),
            pickup_address: "123 Court St".to_string(),
            delivery_address: None,
            pickup_time: None,
            special_instructions: None,
            subtotal: dec!(60),
            pickup_fee: dec!(0),
            total: dec!(60),
            policy_version: 1,
            status: "pending".to_string(),
            checkout_session_id: None,
            inventory_deducted,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_sets_needed() {
        let id = Some(Uuid::new_v4());
        assert_eq!(string_sets_needed(&order(false, id, false, false)), 1);
        assert_eq!(string_sets_needed(&order(false, id, true, false)), 2);
        assert_eq!(string_sets_needed(&order(true, id, false, false)), 0);
        assert_eq!(string_sets_needed(&order(false, None, false, false)), 0);
    }

    #[test]
    fn test_deduction_gated_by_status_and_flag() {
        let id = Some(Uuid::new_v4());
        let fresh = order(false, id, false, false);
        assert!(!deduction_due(&fresh, OrderStatus::InProgress));
        assert!(deduction_due(&fresh, OrderStatus::QualityCheck));
        assert!(deduction_due(&fresh, OrderStatus::Delivered));

        let already = order(false, id, false, true);
        assert!(!deduction_due(&already, OrderStatus::QualityCheck));

        let byo = order(true, id, false, false);
        assert!(!deduction_due(&byo, OrderStatus::QualityCheck));
    }
}
