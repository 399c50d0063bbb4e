//! # Pricing Resolver
//!
//! Deterministic, side-effect-free computation of charged amounts.
//!
//! ## Discount Composition Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 FIXED ORDER OF OPERATIONS                               │
//! │                                                                         │
//! │  base price                                                             │
//! │       │  + variant price modifier                                       │
//! │       ▼                                                                 │
//! │  effective unit price                                                   │
//! │       │  × (1 − variant discount %)        round half-up                │
//! │       ▼                                                                 │
//! │  unit price                 ◄── resolve_unit_price                      │
//! │       │  × (1 − combo discount %)          round half-up                │
//! │       ▼                                                                 │
//! │  combo price                ◄── resolve_combo_price                     │
//! │       │  × quantity, Σ lines                                            │
//! │       ▼                                                                 │
//! │  order subtotal             ◄── resolve_order_subtotal                  │
//! │       │  − voucher discount (order level, never on shipping)            │
//! │       │  + shipping fee                                                 │
//! │       ▼                                                                 │
//! │  order total                ◄── resolve_order_total                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every screen that shows a price and every checkout path that charges one
//! goes through these functions; there is exactly one place where the
//! composition order lives.
//!
//! ## Purity
//! No I/O, no state, no clock. Safe to call repeatedly and concurrently.

use crate::error::{PricingError, PricingResult};
use crate::money::Money;
use crate::types::{OrderLine, Variant, Voucher, VoucherKind};

// =============================================================================
// Input Checks
// =============================================================================

/// Validates a whole-percent discount value.
fn check_percent(field: &str, percent: u8) -> PricingResult<()> {
    if percent > 100 {
        return Err(PricingError::invalid_input(field, "must be at most 100"));
    }
    Ok(())
}

// =============================================================================
// Unit & Combo Prices
// =============================================================================

/// Resolves the displayed unit price of a variant:
/// `(base + modifier) × (1 − discount%)`, rounded half-up, floored at zero.
///
/// ## Errors
/// - `discount_percent > 100`
/// - effective price (base + modifier) below zero — corrupt catalog data,
///   reported rather than clamped
///
/// ## Example
/// ```rust
/// use promo_core::pricing::resolve_unit_price;
/// use promo_core::types::Variant;
///
/// let variant = Variant {
///     base_price_cents: 1000,
///     price_modifier_cents: 0,
///     discount_percent: 10,
/// };
/// assert_eq!(resolve_unit_price(&variant).unwrap().cents(), 900);
/// ```
pub fn resolve_unit_price(variant: &Variant) -> PricingResult<Money> {
    check_percent("discount_percent", variant.discount_percent)?;

    let effective = variant.effective_price();
    if effective.is_negative() {
        return Err(PricingError::invalid_input(
            "price_modifier",
            "effective price must not be negative",
        ));
    }

    Ok(effective
        .apply_percent_discount(variant.discount_percent)
        .clamp_non_negative())
}

/// Resolves the unit price of a variant inside a combo:
/// the variant's own discounted price, further discounted by the combo
/// percentage. Multiplicative with the variant discount, not additive.
///
/// ## Example
/// ```rust
/// use promo_core::pricing::resolve_combo_price;
/// use promo_core::types::Variant;
///
/// let variant = Variant {
///     base_price_cents: 1000,
///     price_modifier_cents: 0,
///     discount_percent: 10,
/// };
/// // 1000 → 900 (variant 10%) → 720 (combo 20%)
/// assert_eq!(resolve_combo_price(&variant, 20).unwrap().cents(), 720);
/// ```
pub fn resolve_combo_price(variant: &Variant, combo_discount_percent: u8) -> PricingResult<Money> {
    check_percent("combo_discount_percent", combo_discount_percent)?;

    let unit = resolve_unit_price(variant)?;
    Ok(unit
        .apply_percent_discount(combo_discount_percent)
        .clamp_non_negative())
}

// =============================================================================
// Line & Order Totals
// =============================================================================

/// Resolves a line total: resolved unit (or combo) price × quantity.
///
/// ## Errors
/// `InvalidQuantity` when `quantity <= 0`.
pub fn resolve_line_total(unit_price: Money, quantity: i64) -> PricingResult<Money> {
    if quantity <= 0 {
        return Err(PricingError::InvalidQuantity {
            requested: quantity,
        });
    }
    Ok(unit_price.multiply_quantity(quantity))
}

/// Resolves an order's merchandise subtotal: the sum of its line totals,
/// before shipping fee and before any voucher discount.
pub fn resolve_order_subtotal(lines: &[OrderLine]) -> PricingResult<Money> {
    let mut subtotal = Money::zero();
    for line in lines {
        subtotal += resolve_line_total(line.unit_price(), line.quantity)?;
    }
    Ok(subtotal)
}

/// Computes the discount a voucher grants on a merchandise subtotal.
///
/// PERCENT vouchers take a percentage of the subtotal only — the shipping
/// fee is never discounted. FIXED vouchers are capped at the subtotal so a
/// large voucher can zero the merchandise but never eat into shipping.
fn voucher_discount(voucher: &Voucher, subtotal: Money) -> PricingResult<Money> {
    if voucher.value < 0 {
        return Err(PricingError::invalid_input(
            "voucher.value",
            "must not be negative",
        ));
    }

    match voucher.kind {
        VoucherKind::Percent => {
            if voucher.value > 100 {
                return Err(PricingError::invalid_input(
                    "voucher.value",
                    "percent must be at most 100",
                ));
            }
            Ok(subtotal.percent_of(voucher.value as u8))
        }
        VoucherKind::Fixed => Ok(Money::from_cents(voucher.value).min(subtotal)),
    }
}

/// Resolves the final payable order total:
/// `(subtotal − voucher discount) + shipping fee`.
///
/// With no voucher this is exactly `subtotal + shipping_fee`.
///
/// ## Example
/// ```text
/// subtotal $10.00, shipping $0.50, PERCENT-10 voucher
///   discount = $1.00 (10% of subtotal, shipping untouched)
///   total    = $10.00 − $1.00 + $0.50 = $9.50
/// ```
pub fn resolve_order_total(
    subtotal: Money,
    shipping_fee: Money,
    voucher: Option<&Voucher>,
) -> PricingResult<Money> {
    if subtotal.is_negative() {
        return Err(PricingError::invalid_input(
            "subtotal",
            "must not be negative",
        ));
    }
    if shipping_fee.is_negative() {
        return Err(PricingError::invalid_input(
            "shipping_fee",
            "must not be negative",
        ));
    }

    let discount = match voucher {
        Some(v) => voucher_discount(v, subtotal)?,
        None => Money::zero(),
    };

    // discount is capped at subtotal, so merchandise never goes negative
    Ok((subtotal - discount).clamp_non_negative() + shipping_fee)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::VoucherStatus;
    use chrono::{NaiveDate, Utc};

    fn variant(base: i64, modifier: i64, discount: u8) -> Variant {
        Variant {
            base_price_cents: base,
            price_modifier_cents: modifier,
            discount_percent: discount,
        }
    }

    fn voucher(kind: VoucherKind, value: i64) -> Voucher {
        Voucher {
            id: "v-1".to_string(),
            code: "TEST".to_string(),
            kind,
            value,
            start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            available_quantity: 10,
            min_order_value_cents: 500,
            status: VoucherStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_unit_price_scenario() {
        // base 1000, no modifier, 10% off → 900
        let v = variant(1000, 0, 10);
        assert_eq!(resolve_unit_price(&v).unwrap().cents(), 900);
    }

    #[test]
    fn test_unit_price_with_modifier() {
        // base 1000 + 200 upgrade, 10% off → 1080
        let v = variant(1000, 200, 10);
        assert_eq!(resolve_unit_price(&v).unwrap().cents(), 1080);

        // negative modifier (cheaper configuration)
        let v = variant(1000, -100, 0);
        assert_eq!(resolve_unit_price(&v).unwrap().cents(), 900);
    }

    #[test]
    fn test_unit_price_rejects_bad_input() {
        assert!(matches!(
            resolve_unit_price(&variant(1000, 0, 101)),
            Err(PricingError::InvalidInput { .. })
        ));
        // modifier drags effective price below zero
        assert!(matches!(
            resolve_unit_price(&variant(100, -200, 0)),
            Err(PricingError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_unit_price_non_negative_and_monotonic() {
        // holding base + modifier fixed, raising the discount never raises
        // the price, and the price never goes negative
        let mut previous = i64::MAX;
        for discount in 0..=100u8 {
            let price = resolve_unit_price(&variant(999, 0, discount)).unwrap();
            assert!(price.cents() >= 0);
            assert!(price.cents() <= previous);
            previous = price.cents();
        }
    }

    #[test]
    fn test_combo_price_scenario() {
        // 1000 → 900 (variant 10%) → 720 (combo 20%)
        let v = variant(1000, 0, 10);
        assert_eq!(resolve_combo_price(&v, 20).unwrap().cents(), 720);
    }

    #[test]
    fn test_combo_never_exceeds_unit_price() {
        let v = variant(1234, 66, 15);
        let unit = resolve_unit_price(&v).unwrap();
        for combo in 0..=100u8 {
            let price = resolve_combo_price(&v, combo).unwrap();
            assert!(price <= unit);
            assert!(price.cents() >= 0);
        }
    }

    #[test]
    fn test_combo_is_multiplicative_not_additive() {
        // 50% then 50% = 25% of original, not 0
        let v = variant(1000, 0, 50);
        assert_eq!(resolve_combo_price(&v, 50).unwrap().cents(), 250);
    }

    #[test]
    fn test_line_total() {
        let unit = Money::from_cents(720);
        assert_eq!(resolve_line_total(unit, 3).unwrap().cents(), 2160);

        assert_eq!(
            resolve_line_total(unit, 0),
            Err(PricingError::InvalidQuantity { requested: 0 })
        );
        assert_eq!(
            resolve_line_total(unit, -2),
            Err(PricingError::InvalidQuantity { requested: -2 })
        );
    }

    #[test]
    fn test_order_subtotal() {
        let lines = vec![
            OrderLine {
                unit_price_cents: 900,
                quantity: 2,
            },
            OrderLine {
                unit_price_cents: 720,
                quantity: 1,
            },
        ];
        assert_eq!(resolve_order_subtotal(&lines).unwrap().cents(), 2520);
    }

    #[test]
    fn test_order_subtotal_propagates_bad_quantity() {
        let lines = vec![OrderLine {
            unit_price_cents: 900,
            quantity: 0,
        }];
        assert!(resolve_order_subtotal(&lines).is_err());
    }

    #[test]
    fn test_order_total_without_voucher_round_trips() {
        let subtotal = Money::from_cents(1000);
        let fee = Money::from_cents(50);
        assert_eq!(
            resolve_order_total(subtotal, fee, None).unwrap(),
            subtotal + fee
        );
    }

    #[test]
    fn test_order_total_percent_voucher_scenario() {
        // 1000 − 10% + 50 shipping = 950
        let v = voucher(VoucherKind::Percent, 10);
        let total =
            resolve_order_total(Money::from_cents(1000), Money::from_cents(50), Some(&v)).unwrap();
        assert_eq!(total.cents(), 950);
    }

    #[test]
    fn test_percent_voucher_never_discounts_shipping() {
        // 100% voucher zeroes the merchandise; shipping survives
        let v = voucher(VoucherKind::Percent, 100);
        let total =
            resolve_order_total(Money::from_cents(1000), Money::from_cents(50), Some(&v)).unwrap();
        assert_eq!(total.cents(), 50);
    }

    #[test]
    fn test_fixed_voucher_capped_at_subtotal() {
        // $50 voucher on a $10 order: discount caps at the subtotal
        let v = voucher(VoucherKind::Fixed, 5000);
        let total =
            resolve_order_total(Money::from_cents(1000), Money::from_cents(50), Some(&v)).unwrap();
        assert_eq!(total.cents(), 50);
    }

    #[test]
    fn test_fixed_voucher_plain() {
        let v = voucher(VoucherKind::Fixed, 300);
        let total =
            resolve_order_total(Money::from_cents(1000), Money::from_cents(50), Some(&v)).unwrap();
        assert_eq!(total.cents(), 750);
    }

    #[test]
    fn test_order_total_rejects_bad_voucher_value() {
        let v = voucher(VoucherKind::Percent, 101);
        assert!(
            resolve_order_total(Money::from_cents(1000), Money::zero(), Some(&v)).is_err()
        );

        let v = voucher(VoucherKind::Fixed, -5);
        assert!(
            resolve_order_total(Money::from_cents(1000), Money::zero(), Some(&v)).is_err()
        );
    }

    #[test]
    fn test_order_total_rejects_negative_inputs() {
        assert!(resolve_order_total(Money::from_cents(-1), Money::zero(), None).is_err());
        assert!(resolve_order_total(Money::zero(), Money::from_cents(-1), None).is_err());
    }
}
