//! Request DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::calculator::{OrderConfiguration, ServicePackage};

/// Request for a live price quote.
///
/// Mirrors `OrderConfiguration`; the string price arrives already resolved to
/// a concrete amount by the string-selection step. The same shape (minus the
/// explicit price, which the server re-resolves from the catalog) is embedded
/// in order creation, so preview and charge share one code path.
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub service_package: ServicePackage,
    #[serde(default)]
    pub customer_provides_string: bool,
    #[serde(default, with = "rust_decimal::serde::str")]
    pub string_price: Decimal,
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
}

impl QuoteRequest {
    pub fn into_configuration(self) -> OrderConfiguration {
        OrderConfiguration {
            service_package: self.service_package,
            customer_provides_string: self.customer_provides_string,
            string_price: self.string_price,
            is_express: self.is_express,
            add_regrip: self.add_regrip,
            add_overgrip: self.add_overgrip,
            add_dampener: self.add_dampener,
            dampener_bundle: self.dampener_bundle,
            add_second_racket: self.add_second_racket,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_request_defaults() {
        let req: QuoteRequest =
            serde_json::from_str(r#"{"service_package": "match_ready"}"#).unwrap();
        assert_eq!(req.service_package, ServicePackage::MatchReady);
        assert_eq!(req.string_price, Decimal::ZERO);
        assert!(!req.customer_provides_string);
        assert!(!req.dampener_bundle);
    }

    #[test]
    fn test_quote_request_full() {
        let req: QuoteRequest = serde_json::from_str(
            r#"{
                "service_package": "pro_performance",
                "customer_provides_string": false,
                "string_price": "25.00",
                "add_regrip": true,
                "dampener_bundle": true
            }"#,
        )
        .unwrap();
        assert_eq!(req.string_price, dec!(25.00));
        assert!(req.add_regrip);
    }

    #[test]
    fn test_unknown_package_rejected() {
        let result: Result<QuoteRequest, _> =
            serde_json::from_str(r#"{"service_package": "platinum"}"#);
        assert!(result.is_err());
    }
}
