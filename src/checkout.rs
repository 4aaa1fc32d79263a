//! Hosted checkout boundary.
//!
//! The payment provider is an external collaborator: we hand it the order id,
//! the computed total and the customer contact, and it owns the payment page.
//! Nothing here computes or mutates prices; the total passed in is the one
//! `compute_pricing` produced server-side.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// Hosted checkout configuration (from CHECKOUT_BASE_URL)
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    pub base_url: String,
}

/// Opaque session handed back to the browser for redirect
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutSession {
    pub session_id: String,
    pub url: String,
}

/// Build a hosted-checkout session reference for an order.
///
/// The session id is opaque to us; the confirmation URL carries it back after
/// payment so the order can be matched to its session.
pub fn create_session(
    config: &CheckoutConfig,
    order_id: Uuid,
    total: Decimal,
    customer_email: &str,
) -> CheckoutSession {
    let session_id = format!("cs_{}", Uuid::new_v4().simple());
    let url = format!(
        "{}/session/{}?order={}&amount={}&email={}",
        config.base_url.trim_end_matches('/'),
        session_id,
        order_id,
        total,
        customer_email,
    );

    CheckoutSession { session_id, url }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_session_url_carries_order_and_amount() {
        let config = CheckoutConfig {
            base_url: "https://pay.example.com/".to_string(),
        };
        let order_id = Uuid::new_v4();
        let session = create_session(&config, order_id, dec!(60), "a@b.com");

        assert!(session.session_id.starts_with("cs_"));
        assert!(session.url.starts_with("https://pay.example.com/session/cs_"));
        assert!(session.url.contains(&format!("order={order_id}")));
        assert!(session.url.contains("amount=60"));
    }

    #[test]
    fn test_session_ids_are_unique() {
        let config = CheckoutConfig {
            base_url: "https://pay.example.com".to_string(),
        };
        let a = create_session(&config, Uuid::new_v4(), dec!(1), "a@b.com");
        let b = create_session(&config, Uuid::new_v4(), dec!(1), "a@b.com");
        assert_ne!(a.session_id, b.session_id);
    }
}
