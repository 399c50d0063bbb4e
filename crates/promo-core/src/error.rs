//! # Error Types
//!
//! Domain-specific error types for promo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  promo-core errors (this file)                                         │
//! │  ├── PricingError  - Malformed pricing input                           │
//! │  └── VoucherError  - Voucher eligibility / lifecycle failures          │
//! │                                                                         │
//! │  promo-ledger errors (separate crate)                                  │
//! │  └── LedgerError   - Wraps VoucherError + persistence failures         │
//! │                                                                         │
//! │  Flow: VoucherError → LedgerError → API layer → user-facing message    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, amounts, dates)
//! 3. Errors are enum variants, never String
//! 4. Every variant is terminal and user-facing; nothing here is retried
//!    internally — a failed validation or redemption needs different input

use thiserror::Error;

// =============================================================================
// Pricing Error
// =============================================================================

/// Malformed input to the pricing resolver.
///
/// All resolver operations are total over well-formed input; these errors
/// fire instead of silently clamping, except where clamping-to-zero is the
/// stated policy (a discount never inverts the sign of a price).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Line quantity must be a positive integer.
    #[error("Quantity must be positive, got {requested}")]
    InvalidQuantity { requested: i64 },

    /// Catch-all for out-of-range pricing input (percent above 100,
    /// negative effective price, negative voucher value).
    #[error("Invalid pricing input: {field} {reason}")]
    InvalidInput { field: String, reason: String },
}

impl PricingError {
    /// Creates an InvalidInput error for a named field.
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PricingError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Voucher Error
// =============================================================================

/// Voucher eligibility and lifecycle failures.
///
/// ## When These Occur
/// ```text
/// validate / redeem                      create / update
/// ├── NotFound       (bad code)          ├── DuplicateCode
/// ├── Disabled       (soft-deleted)      ├── InvalidType
/// ├── DateInvalid    (outside window)    └── DateInvalid
/// ├── AlreadyUsed    (per-user cap)
/// ├── Exhausted      (quantity spent)    redeem only
/// └── BelowMinimum   (subtotal too low)  └── AlreadyRedeemedForOrder
/// ```
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VoucherError {
    /// No voucher exists with the given code.
    #[error("Invalid voucher code: {code}")]
    NotFound { code: String },

    /// Voucher has been soft-deleted by an administrator.
    #[error("Voucher '{code}' is disabled")]
    Disabled { code: String },

    /// Current date is outside the voucher's `[start_date, end_date]`
    /// window, or the stored window itself is inverted (start >= end).
    #[error("Voucher '{code}' is not valid on this date")]
    DateInvalid { code: String },

    /// The user already redeemed this voucher on a previous order.
    /// A voucher may be redeemed at most once per user.
    #[error("Voucher '{code}' has already been used")]
    AlreadyUsed { code: String },

    /// No redemption allotment remains.
    ///
    /// Also the outcome for every losing side of a concurrent race on the
    /// last remaining unit.
    #[error("Voucher '{code}' is no longer available")]
    Exhausted { code: String },

    /// Order subtotal does not meet the voucher's minimum.
    #[error("Order subtotal {subtotal_cents} does not meet the voucher minimum of {minimum_cents}")]
    BelowMinimum {
        minimum_cents: i64,
        subtotal_cents: i64,
    },

    /// This order already carries a redemption of this voucher.
    #[error("Voucher '{code}' has already been applied to order {order_id}")]
    AlreadyRedeemedForOrder { order_id: String, code: String },

    /// A voucher with the supplied code already exists.
    #[error("Voucher code '{code}' already exists")]
    DuplicateCode { code: String },

    /// Voucher value contradicts its kind (PERCENT outside 1-100, FIXED
    /// not positive). An out-of-set kind string never reaches this point:
    /// it is rejected when deserializing into `VoucherKind`.
    #[error("Invalid voucher type: {reason}")]
    InvalidType { reason: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for pricing results.
pub type PricingResult<T> = Result<T, PricingError>;

/// Convenience type alias for voucher rule results.
pub type VoucherResult<T> = Result<T, VoucherError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_error_messages() {
        let err = PricingError::InvalidQuantity { requested: -3 };
        assert_eq!(err.to_string(), "Quantity must be positive, got -3");

        let err = PricingError::invalid_input("discount_percent", "must be at most 100");
        assert_eq!(
            err.to_string(),
            "Invalid pricing input: discount_percent must be at most 100"
        );
    }

    #[test]
    fn test_voucher_error_messages() {
        let err = VoucherError::NotFound {
            code: "NOPE".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid voucher code: NOPE");

        let err = VoucherError::BelowMinimum {
            minimum_cents: 5000,
            subtotal_cents: 1200,
        };
        assert_eq!(
            err.to_string(),
            "Order subtotal 1200 does not meet the voucher minimum of 5000"
        );
    }
}
