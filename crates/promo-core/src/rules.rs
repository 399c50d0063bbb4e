//! # Voucher Rules
//!
//! Pure voucher eligibility and admin-input rules.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (TypeScript)                                        │
//! │  ├── Basic format checks (empty code, date pickers)                    │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (pure rules)                                     │
//! │  ├── Eligibility: status, window, usage, quantity, minimum             │
//! │  └── Admin input: kind/value agreement, date ordering, code shape      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite, promo-ledger)                              │
//! │  ├── UNIQUE(code), UNIQUE(user_id, voucher_id)                         │
//! │  ├── PRIMARY KEY(order_id, voucher_id)                                 │
//! │  └── CHECK(available_quantity >= 0)                                    │
//! │                                                                         │
//! │  Defense in depth: the database constraints are the backstop; these    │
//! │  rules exist to fail fast with a precise, user-facing error.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purity
//! Nothing here touches a clock or a database. The caller supplies `today`
//! and the already-used flag, which keeps every branch directly testable
//! and makes `validate` trivially idempotent.

use chrono::NaiveDate;

use crate::error::{VoucherError, VoucherResult};
use crate::money::Money;
use crate::types::{NewVoucher, Voucher, VoucherKind, VoucherUpdate};

/// Generated voucher codes are 10 digits.
pub const GENERATED_CODE_LEN: usize = 10;

// =============================================================================
// Eligibility
// =============================================================================

/// Checks every redeemability rule for a voucher against an order.
///
/// ## Check Order
/// 1. `Disabled` — soft-deleted by an administrator
/// 2. `DateInvalid` — `today` outside the window, or the stored window is
///    inverted (start >= end, a data-integrity fault)
/// 3. `AlreadyUsed` — the user redeemed this voucher on a previous order
/// 4. `Exhausted` — no allotment remains
/// 5. `BelowMinimum` — subtotal does not exceed the voucher minimum
///
/// Read-only: calling this twice with unchanged inputs yields the same
/// result. The ledger re-runs it inside the redemption transaction, so a
/// stale earlier `validate` can never authorize a redemption.
pub fn check_redeemable(
    voucher: &Voucher,
    today: NaiveDate,
    already_used: bool,
    order_subtotal: Money,
) -> VoucherResult<()> {
    if voucher.is_disabled() {
        return Err(VoucherError::Disabled {
            code: voucher.code.clone(),
        });
    }

    if !voucher.is_within_window(today) {
        return Err(VoucherError::DateInvalid {
            code: voucher.code.clone(),
        });
    }

    if already_used {
        return Err(VoucherError::AlreadyUsed {
            code: voucher.code.clone(),
        });
    }

    if voucher.available_quantity <= 0 {
        return Err(VoucherError::Exhausted {
            code: voucher.code.clone(),
        });
    }

    // strict: a subtotal exactly at the minimum does not qualify
    if order_subtotal <= voucher.min_order_value() {
        return Err(VoucherError::BelowMinimum {
            minimum_cents: voucher.min_order_value_cents,
            subtotal_cents: order_subtotal.cents(),
        });
    }

    Ok(())
}

// =============================================================================
// Admin Input Rules
// =============================================================================

/// Validates that a voucher's value agrees with its kind.
///
/// ## Rules
/// - PERCENT: whole percent in 1-100
/// - FIXED: positive amount in cents
pub fn validate_voucher_value(kind: VoucherKind, value: i64) -> VoucherResult<()> {
    match kind {
        VoucherKind::Percent => {
            if !(1..=100).contains(&value) {
                return Err(VoucherError::InvalidType {
                    reason: format!("PERCENT value must be 1-100, got {value}"),
                });
            }
        }
        VoucherKind::Fixed => {
            if value <= 0 {
                return Err(VoucherError::InvalidType {
                    reason: format!("FIXED value must be positive, got {value}"),
                });
            }
        }
    }
    Ok(())
}

/// Validates that a redemption window is well-formed.
///
/// `start_date` must be strictly before `end_date`.
pub fn validate_date_window(start: NaiveDate, end: NaiveDate) -> VoucherResult<()> {
    if start >= end {
        return Err(VoucherError::DateInvalid {
            code: String::new(),
        });
    }
    Ok(())
}

/// Validates a supplied voucher code.
///
/// ## Rules
/// - Must not be empty or whitespace
/// - Must be at most 50 characters
/// - Alphanumeric only (codes are typed by customers at checkout)
///
/// Case matters: `SPRING10` and `spring10` are distinct codes.
pub fn validate_code(code: &str) -> VoucherResult<()> {
    let trimmed = code.trim();

    if trimmed.is_empty()
        || trimmed.len() > 50
        || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(VoucherError::InvalidType {
            reason: format!("code '{code}' must be 1-50 alphanumeric characters"),
        });
    }

    Ok(())
}

/// Validates a complete creation request.
///
/// Code uniqueness is the ledger's job (it needs storage); everything shape-
/// level is checked here.
pub fn validate_new_voucher(dto: &NewVoucher) -> VoucherResult<()> {
    if let Some(code) = &dto.code {
        validate_code(code)?;
    }
    validate_voucher_value(dto.kind, dto.value)?;
    validate_date_window(dto.start_date, dto.end_date)?;

    if dto.available_quantity < 0 {
        return Err(VoucherError::InvalidType {
            reason: format!(
                "available_quantity must not be negative, got {}",
                dto.available_quantity
            ),
        });
    }
    if dto.min_order_value_cents < 0 {
        return Err(VoucherError::InvalidType {
            reason: format!(
                "min_order_value must not be negative, got {}",
                dto.min_order_value_cents
            ),
        });
    }

    Ok(())
}

/// Validates an update request against the voucher's current state.
///
/// Only the supplied fields are re-checked, but the date window is checked
/// across the merge: changing either endpoint must leave
/// `start_date < end_date` for the resulting pair.
pub fn validate_voucher_update(current: &Voucher, dto: &VoucherUpdate) -> VoucherResult<()> {
    if let Some(code) = &dto.code {
        validate_code(code)?;
    }

    let kind = dto.kind.unwrap_or(current.kind);
    let value = dto.value.unwrap_or(current.value);
    if dto.kind.is_some() || dto.value.is_some() {
        validate_voucher_value(kind, value)?;
    }

    if dto.start_date.is_some() || dto.end_date.is_some() {
        let start = dto.start_date.unwrap_or(current.start_date);
        let end = dto.end_date.unwrap_or(current.end_date);
        validate_date_window(start, end)?;
    }

    if let Some(quantity) = dto.available_quantity {
        if quantity < 0 {
            return Err(VoucherError::InvalidType {
                reason: format!("available_quantity must not be negative, got {quantity}"),
            });
        }
    }
    if let Some(minimum) = dto.min_order_value_cents {
        if minimum < 0 {
            return Err(VoucherError::InvalidType {
                reason: format!("min_order_value must not be negative, got {minimum}"),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
