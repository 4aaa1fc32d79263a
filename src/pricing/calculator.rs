//! Core order pricing calculation.
//!
//! Pure functions for pricing math - no database access.
//! `compute_pricing` is called from the live quote endpoint after every form
//! change and again server-side right before checkout-session creation; both
//! sites must produce identical results for identical input, so all pricing
//! arithmetic lives here and nowhere else.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use super::policy::PricingPolicy;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use stringside_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Labor tier chosen by the customer (distinct from string cost).
///
/// Rush service is a tier of its own (`SameDay`), not an additive fee, so the
/// calculator never charges for the express flag directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServicePackage {
    MatchReady,
    ProPerformance,
    SameDay,
}

impl ServicePackage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServicePackage::MatchReady => "match_ready",
            ServicePackage::ProPerformance => "pro_performance",
            ServicePackage::SameDay => "same_day",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "match_ready" => Some(ServicePackage::MatchReady),
            "pro_performance" => Some(ServicePackage::ProPerformance),
            "same_day" => Some(ServicePackage::SameDay),
            _ => None,
        }
    }
}

/// Fully-typed order configuration, validated once at the request boundary.
///
/// Fulfillment fields (addresses, pickup time, instructions) have no pricing
/// effect and live on the order request, not here. `string_price` is already
/// resolved to a concrete amount by the caller (catalog lookup or UI choice);
/// the calculator never consults the string catalog itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfiguration {
    pub service_package: ServicePackage,
    pub customer_provides_string: bool,
    pub string_price: Decimal,
    pub is_express: bool,
    pub add_regrip: bool,
    pub add_overgrip: bool,
    pub add_dampener: bool,
    pub dampener_bundle: bool,
    pub add_second_racket: bool,
}

impl OrderConfiguration {
    /// Reject malformed input before any arithmetic runs.
    ///
    /// A rejected configuration means "cannot proceed to payment", never a
    /// zero-cost order.
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.string_price < Decimal::ZERO {
            return Err(PricingError::InvalidConfiguration {
                message: format!("string_price must not be negative, got {}", self.string_price),
            });
        }
        Ok(())
    }
}

/// Itemized price breakdown. Never mutated after construction; the breakdown
/// computed at submission time is the one whose `total` is charged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub service_labor: Decimal,
    pub string_price: Decimal,
    pub express_fee: Decimal,
    pub regrip_fee: Decimal,
    pub overgrip_fee: Decimal,
    pub dampener_fee: Decimal,
    pub second_racket_fee: Decimal,
    pub subtotal: Decimal,
    pub pickup_fee: Decimal,
    pub total: Decimal,
}

/// Pricing calculation error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid order configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("No labor price for package '{package}' or the default tier")]
    PolicyUnavailable { package: String },
}

/// Compute the itemized price for an order configuration.
///
/// Total function: no side effects, no I/O, deterministic. All amounts are
/// `Decimal`; formatting to two places happens only at the serde boundary.
///
/// Line items, in order:
/// 1. labor from the policy table (falls closed to the policy's default tier
///    when the chosen package has no price; errors if that is missing too)
/// 2. string line: flat credit when the customer supplies their own string,
///    else the supplied catalog price
/// 3. express fee: always zero - rush pricing is baked into the `SameDay`
///    package, the flag is informational only
/// 4. regrip fee
/// 5. overgrip/dampener, with the bundle winning over the individual flags
/// 6. second-racquet fee: duplicates labor only, never the string cost
pub fn compute_pricing(
    config: &OrderConfiguration,
    policy: &PricingPolicy,
) -> Result<PriceBreakdown, PricingError> {
    config.validate()?;

    let service_labor =
        policy
            .labor_price(config.service_package)
            .ok_or_else(|| PricingError::PolicyUnavailable {
                package: config.service_package.as_str().to_string(),
            })?;

    let string_price = if config.customer_provides_string {
        policy.customer_string_credit
    } else {
        config.string_price
    };

    // Rush is a package tier, not an add-on; charging here would double-bill.
    let express_fee = Decimal::ZERO;

    let regrip_fee = if config.add_regrip {
        policy.add_ons.regrip
    } else {
        Decimal::ZERO
    };

    // Bundle wins: the individual overgrip/dampener flags are ignored for
    // pricing when the bundle is selected, even if the UI let both through.
    let (overgrip_fee, dampener_fee) = if config.dampener_bundle {
        (Decimal::ZERO, policy.add_ons.dampener_bundle)
    } else {
        (
            if config.add_overgrip {
                policy.add_ons.overgrip
            } else {
                Decimal::ZERO
            },
            if config.add_dampener {
                policy.add_ons.dampener
            } else {
                Decimal::ZERO
            },
        )
    };

    let second_racket_fee = if config.add_second_racket {
        service_labor
    } else {
        Decimal::ZERO
    };

    let subtotal = service_labor
        + string_price
        + express_fee
        + regrip_fee
        + overgrip_fee
        + dampener_fee
        + second_racket_fee;

    // Kept as a distinct step: the pickup fee is policy-configurable
    // independent of service tier and must never be folded into subtotal.
    let pickup_fee = policy.pickup_fee;
    let total = subtotal + pickup_fee;

    Ok(PriceBreakdown {
        service_labor,
        string_price,
        express_fee,
        regrip_fee,
        overgrip_fee,
        dampener_fee,
        second_racket_fee,
        subtotal,
        pickup_fee,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_config() -> OrderConfiguration {
        OrderConfiguration {
            service_package: ServicePackage::MatchReady,
            customer_provides_string: false,
            string_price: dec!(25),
            is_express: false,
            add_regrip: false,
            add_overgrip: false,
            add_dampener: false,
            dampener_bundle: false,
            add_second_racket: false,
        }
    }

    fn policy() -> PricingPolicy {
        PricingPolicy::default()
    }

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2)); // rounds down to even
        assert_eq!(round_money(dec!(3.5), 0), dec!(4)); // rounds up to even
        assert_eq!(round_money(dec!(4.5), 0), dec!(4)); // rounds down to even
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
    }

    #[test]
    fn test_round_money_negative() {
        assert_eq!(round_money(dec!(-2.5), 0), dec!(-2)); // rounds to even
        assert_eq!(round_money(dec!(-1.234), 2), dec!(-1.23));
    }

    // ==================== service package tests ====================

    #[test]
    fn test_service_package_round_trip() {
        for pkg in [
            ServicePackage::MatchReady,
            ServicePackage::ProPerformance,
            ServicePackage::SameDay,
        ] {
            assert_eq!(ServicePackage::parse(pkg.as_str()), Some(pkg));
        }
        assert_eq!(ServicePackage::parse("gut_feeling"), None);
    }

    // ==================== compute_pricing tests ====================

    #[test]
    fn test_basic_order_labor_plus_string() {
        // match_ready labor $35 + Luxilon ALU Power $25
        let breakdown = compute_pricing(&base_config(), &policy()).unwrap();
        assert_eq!(breakdown.service_labor, dec!(35));
        assert_eq!(breakdown.string_price, dec!(25));
        assert_eq!(breakdown.subtotal, dec!(60));
        assert_eq!(breakdown.pickup_fee, dec!(0));
        assert_eq!(breakdown.total, dec!(60));
    }

    #[test]
    fn test_customer_provides_string_gets_flat_credit() {
        let config = OrderConfiguration {
            customer_provides_string: true,
            ..base_config()
        };
        let breakdown = compute_pricing(&config, &policy()).unwrap();
        // credit applies regardless of the string_price the config carries
        assert_eq!(breakdown.string_price, dec!(-10));
        assert_eq!(breakdown.subtotal, dec!(25));
        assert_eq!(breakdown.total, dec!(25));
    }

    #[test]
    fn test_express_flag_carries_no_fee() {
        let config = OrderConfiguration {
            is_express: true,
            ..base_config()
        };
        let breakdown = compute_pricing(&config, &policy()).unwrap();
        assert_eq!(breakdown.express_fee, dec!(0));
        assert_eq!(breakdown.total, dec!(60));
    }

    #[test]
    fn test_regrip_fee() {
        let config = OrderConfiguration {
            add_regrip: true,
            ..base_config()
        };
        let breakdown = compute_pricing(&config, &policy()).unwrap();
        assert_eq!(breakdown.regrip_fee, dec!(25));
        assert_eq!(breakdown.subtotal, dec!(85));
    }

    #[test]
    fn test_individual_overgrip_and_dampener() {
        let config = OrderConfiguration {
            add_overgrip: true,
            add_dampener: true,
            ..base_config()
        };
        let breakdown = compute_pricing(&config, &policy()).unwrap();
        assert_eq!(breakdown.overgrip_fee, dec!(3));
        assert_eq!(breakdown.dampener_fee, dec!(5));
        assert_eq!(breakdown.subtotal, dec!(68));
    }

    #[test]
    fn test_bundle_wins_over_individual_flags() {
        let config = OrderConfiguration {
            dampener_bundle: true,
            add_overgrip: true,
            add_dampener: true,
            ..base_config()
        };
        let breakdown = compute_pricing(&config, &policy()).unwrap();
        // bundle price, not 3 + 5
        assert_eq!(breakdown.overgrip_fee, dec!(0));
        assert_eq!(breakdown.dampener_fee, dec!(7));
        assert_eq!(breakdown.subtotal, dec!(67));
    }

    #[test]
    fn test_bundle_alone() {
        let config = OrderConfiguration {
            dampener_bundle: true,
            ..base_config()
        };
        let breakdown = compute_pricing(&config, &policy()).unwrap();
        assert_eq!(breakdown.overgrip_fee, dec!(0));
        assert_eq!(breakdown.dampener_fee, dec!(7));
    }

    #[test]
    fn test_second_racket_duplicates_labor_not_string() {
        let config = OrderConfiguration {
            service_package: ServicePackage::ProPerformance,
            add_second_racket: true,
            ..base_config()
        };
        let breakdown = compute_pricing(&config, &policy()).unwrap();
        assert_eq!(breakdown.service_labor, dec!(50));
        assert_eq!(breakdown.second_racket_fee, dec!(50));
        // string charged once: 50 + 25 + 50
        assert_eq!(breakdown.subtotal, dec!(125));
    }

    #[test]
    fn test_subtotal_is_exact_sum_of_line_items() {
        let config = OrderConfiguration {
            service_package: ServicePackage::SameDay,
            add_regrip: true,
            dampener_bundle: true,
            add_second_racket: true,
            ..base_config()
        };
        let breakdown = compute_pricing(&config, &policy()).unwrap();
        let expected = breakdown.service_labor
            + breakdown.string_price
            + breakdown.express_fee
            + breakdown.regrip_fee
            + breakdown.overgrip_fee
            + breakdown.dampener_fee
            + breakdown.second_racket_fee;
        assert_eq!(breakdown.subtotal, expected);
        assert_eq!(breakdown.total, breakdown.subtotal + breakdown.pickup_fee);
    }

    #[test]
    fn test_pickup_fee_added_after_subtotal() {
        let mut policy = policy();
        policy.pickup_fee = dec!(8);
        let breakdown = compute_pricing(&base_config(), &policy).unwrap();
        assert_eq!(breakdown.subtotal, dec!(60));
        assert_eq!(breakdown.pickup_fee, dec!(8));
        assert_eq!(breakdown.total, dec!(68));
    }

    #[test]
    fn test_idempotent_for_same_input() {
        let config = OrderConfiguration {
            add_regrip: true,
            add_overgrip: true,
            ..base_config()
        };
        let policy = policy();
        let first = compute_pricing(&config, &policy).unwrap();
        let second = compute_pricing(&config, &policy).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_negative_string_price_rejected() {
        let config = OrderConfiguration {
            string_price: dec!(-1),
            ..base_config()
        };
        let err = compute_pricing(&config, &policy()).unwrap_err();
        assert!(matches!(err, PricingError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_missing_tier_falls_closed_to_default() {
        let mut policy = policy();
        policy.labor.remove(&ServicePackage::SameDay);
        let config = OrderConfiguration {
            service_package: ServicePackage::SameDay,
            ..base_config()
        };
        let breakdown = compute_pricing(&config, &policy).unwrap();
        // default tier (match_ready, $35), never a silent $0
        assert_eq!(breakdown.service_labor, dec!(35));
    }

    #[test]
    fn test_empty_labor_table_is_policy_unavailable() {
        let mut policy = policy();
        policy.labor.clear();
        let err = compute_pricing(&base_config(), &policy).unwrap_err();
        assert!(matches!(err, PricingError::PolicyUnavailable { .. }));
    }

    #[test]
    fn test_zero_price_included_string_tier() {
        let config = OrderConfiguration {
            string_price: dec!(0),
            ..base_config()
        };
        let breakdown = compute_pricing(&config, &policy()).unwrap();
        assert_eq!(breakdown.string_price, dec!(0));
        assert_eq!(breakdown.total, dec!(35));
    }
}
