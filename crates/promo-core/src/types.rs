//! # Domain Types
//!
//! Core domain types for the promotional pricing and voucher engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Variant      │   │     Voucher     │   │   Redemption    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  base_price     │   │  id (UUID)      │   │  order_id (PK)  │       │
//! │  │  price_modifier │   │  code (unique)  │   │  voucher_id(PK) │       │
//! │  │  discount_pct   │   │  kind, value    │   │  user_id        │       │
//! │  └─────────────────┘   │  date window    │   │  redeemed_at    │       │
//! │                        │  quantity       │   └─────────────────┘       │
//! │  ┌─────────────────┐   │  min_order      │   ┌─────────────────┐       │
//! │  │   ComboOffer    │   │  status         │   │    OrderLine    │       │
//! │  │  ─────────────  │   └─────────────────┘   │  ─────────────  │       │
//! │  │  discount_pct   │                         │  unit_price     │       │
//! │  │  category slot  │                         │  quantity       │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read Model vs Owned State
//! `Variant`, `ComboOffer`, and `OrderLine` are read-only inputs supplied by
//! the catalog/order services. `Voucher` and `Redemption` are owned by the
//! ledger, which is the only component allowed to mutate them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Pricing Read Model
// =============================================================================

/// A purchasable SKU of a product, as seen by the pricing resolver.
///
/// This is a read-only snapshot supplied by the catalog service. The
/// resolver never looks up or mutates catalog state.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Variant {
    /// Catalog base price of the parent product, in cents. Never negative.
    pub base_price_cents: i64,

    /// Per-variant adjustment on the base price, in cents.
    /// May be negative (cheaper configuration) or positive (upgrade).
    pub price_modifier_cents: i64,

    /// Per-variant percentage discount, whole percent 0-100.
    pub discount_percent: u8,
}

impl Variant {
    /// Returns the effective unit price before any discount:
    /// base price plus the variant's modifier.
    #[inline]
    pub fn effective_price(&self) -> Money {
        Money::from_cents(self.base_price_cents + self.price_modifier_cents)
    }
}

/// A promotional bundle discount applying when a complementary variant is
/// selected alongside a primary one.
///
/// At most one selected variant per category slot is active at a time; the
/// caller resolves slot selection and passes the winning offer's percentage
/// to the pricing resolver. The combo discount stacks multiplicatively on
/// top of the variant's own discount, never additively.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ComboOffer {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Category slot this offer is scoped to.
    pub category_id: String,

    /// Additional discount, whole percent 0-100, applied after the
    /// variant's own discount.
    pub discount_percent: u8,
}

/// A line item in an order, after unit (or combo) price resolution.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderLine {
    /// Resolved unit price (variant or combo price), in cents.
    pub unit_price_cents: i64,

    /// Quantity ordered. Must be positive.
    pub quantity: i64,
}

impl OrderLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Voucher Kind
// =============================================================================

/// How a voucher's `value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoucherKind {
    /// `value` is a fixed amount in cents, subtracted from the subtotal.
    Fixed,
    /// `value` is a whole percentage (1-100) of the subtotal.
    Percent,
}

// =============================================================================
// Voucher Status
// =============================================================================

/// Stored lifecycle flag of a voucher.
///
/// Vouchers are never physically deleted; an administrator soft-deletes
/// (status 1) and may later restore (status 0). Expiry and exhaustion are
/// derived at validation time, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", repr(i32))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum VoucherStatus {
    /// Redeemable (subject to window, quantity, and usage checks).
    Active = 0,
    /// Soft-deleted by an administrator; restorable.
    Deleted = 1,
}

impl Default for VoucherStatus {
    fn default() -> Self {
        VoucherStatus::Active
    }
}

// =============================================================================
// Voucher
// =============================================================================

/// A discount code redeemable once per user, with a date window, quantity
/// cap, and minimum order value.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Voucher {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Unique redemption code, case-sensitive.
    /// Generated (10 digits) when not supplied at creation.
    pub code: String,

    /// Fixed-amount or percentage discount.
    pub kind: VoucherKind,

    /// Cents for `Fixed`, whole percent for `Percent`.
    pub value: i64,

    /// First day (inclusive) the voucher may be redeemed.
    #[ts(as = "String")]
    pub start_date: NaiveDate,

    /// Last day (inclusive) the voucher may be redeemed.
    /// Always strictly after `start_date`.
    #[ts(as = "String")]
    pub end_date: NaiveDate,

    /// Remaining redemption allotment. Monotonically non-increasing over
    /// the voucher's life except explicit administrative restock.
    pub available_quantity: i64,

    /// Minimum merchandise subtotal (cents) required to redeem.
    pub min_order_value_cents: i64,

    /// Soft-delete flag (0 = active, 1 = deleted).
    pub status: VoucherStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Voucher {
    /// Returns the minimum order value as Money.
    #[inline]
    pub fn min_order_value(&self) -> Money {
        Money::from_cents(self.min_order_value_cents)
    }

    /// Checks whether the voucher has been soft-deleted.
    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.status == VoucherStatus::Deleted
    }

    /// Checks whether `day` falls inside the redeemable window and the
    /// window itself is well-formed (`start_date` strictly before
    /// `end_date`). A stored window that fails the ordering check is a
    /// data-integrity fault, not a user error, but both surface the same.
    pub fn is_within_window(&self, day: NaiveDate) -> bool {
        self.start_date < self.end_date && self.start_date <= day && day <= self.end_date
    }
}

// =============================================================================
// Redemption
// =============================================================================

/// The permanent record that a voucher was applied to a specific order.
///
/// Created exactly once per successful redemption and immutable afterward.
/// Two uniqueness constraints back it: `(order_id, voucher_id)` (one
/// redemption per order per voucher) and `(user_id, voucher_id)` (one
/// redemption per user per voucher, across all of their orders).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Redemption {
    pub order_id: String,
    pub voucher_id: String,
    pub user_id: String,
    #[ts(as = "String")]
    pub redeemed_at: DateTime<Utc>,
}

// =============================================================================
// Data Transfer Objects
// =============================================================================

/// Input for creating a voucher (admin operation).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewVoucher {
    /// Explicit code; a unique 10-digit code is generated when absent.
    pub code: Option<String>,
    pub kind: VoucherKind,
    pub value: i64,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub available_quantity: i64,
    pub min_order_value_cents: i64,
}

/// Partial update for a voucher (admin operation).
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VoucherUpdate {
    pub code: Option<String>,
    pub kind: Option<VoucherKind>,
    pub value: Option<i64>,
    #[ts(as = "Option<String>")]
    pub start_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,
    /// Explicit restock; the only sanctioned way quantity increases.
    pub available_quantity: Option<i64>,
    pub min_order_value_cents: Option<i64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn voucher_with_window(start: NaiveDate, end: NaiveDate) -> Voucher {
        Voucher {
            id: "v-1".to_string(),
            code: "SPRING10".to_string(),
            kind: VoucherKind::Percent,
            value: 10,
            start_date: start,
            end_date: end,
            available_quantity: 5,
            min_order_value_cents: 0,
            status: VoucherStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_effective_price() {
        let variant = Variant {
            base_price_cents: 1000,
            price_modifier_cents: -100,
            discount_percent: 0,
        };
        assert_eq!(variant.effective_price().cents(), 900);
    }

    #[test]
    fn test_window_inclusive_bounds() {
        let v = voucher_with_window(date(2026, 1, 1), date(2026, 1, 31));
        assert!(v.is_within_window(date(2026, 1, 1)));
        assert!(v.is_within_window(date(2026, 1, 31)));
        assert!(!v.is_within_window(date(2025, 12, 31)));
        assert!(!v.is_within_window(date(2026, 2, 1)));
    }

    #[test]
    fn test_inverted_window_never_valid() {
        // start >= end should never validate, even for days "inside"
        let v = voucher_with_window(date(2026, 1, 31), date(2026, 1, 1));
        assert!(!v.is_within_window(date(2026, 1, 15)));
    }

    #[test]
    fn test_status_default() {
        assert_eq!(VoucherStatus::default(), VoucherStatus::Active);
    }
}
