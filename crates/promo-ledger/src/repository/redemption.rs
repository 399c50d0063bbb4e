//! # Redemption Repository
//!
//! Voucher validation and the atomic redeem path.
//!
//! ## Redeem Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               redeem(order, code) — ONE TRANSACTION                     │
//! │                                                                         │
//! │  BEGIN IMMEDIATE  (writers serialize here, not at first write)         │
//! │    │                                                                    │
//! │    ├── SELECT voucher by code            → VoucherNotFound              │
//! │    ├── redemption (order, voucher)?      → AlreadyRedeemedForOrder      │
//! │    ├── redemption (user, voucher)?       → feeds AlreadyUsed            │
//! │    ├── check_redeemable (pure rules)     → Disabled / DateInvalid /     │
//! │    │                                       AlreadyUsed / Exhausted /    │
//! │    │                                       OrderBelowMinimum            │
//! │    ├── INSERT redemption row                                            │
//! │    └── UPDATE vouchers                                                  │
//! │           SET available_quantity = available_quantity - 1               │
//! │           WHERE id = ? AND available_quantity > 0                       │
//! │        │                                                                │
//! │        ├── 1 row  → COMMIT (row + decrement land together)              │
//! │        └── 0 rows → ROLLBACK, VoucherExhausted                          │
//! │                     (a concurrent redeem won the last unit)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The guarded decrement is what makes over-redemption impossible: however
//! many transactions race past the SELECT with quantity = 1 in view, only
//! one UPDATE can match `available_quantity > 0` for the last unit. Everyone
//! else rolls back with nothing written. A plain read-then-write here would
//! oversell the voucher.
//!
//! Redemption is always re-validated from scratch inside the transaction;
//! a prior `validate` call is a UI courtesy, never an authorization.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use promo_core::money::Money;
use promo_core::rules::check_redeemable;
use promo_core::{Redemption, Voucher, VoucherError};

/// All voucher columns, in struct order, for `query_as`.
const VOUCHER_COLUMNS: &str = "id, code, kind, value, start_date, end_date, \
     available_quantity, min_order_value_cents, status, created_at, updated_at";

/// The order against which a voucher is validated or redeemed.
///
/// The ledger does not own orders; the caller fetches the order and passes
/// its identity and merchandise subtotal (before shipping, before voucher).
#[derive(Debug, Clone)]
pub struct OrderContext {
    pub order_id: String,
    pub user_id: String,
    pub subtotal: Money,
}

/// Repository for voucher validation and redemption.
#[derive(Debug, Clone)]
pub struct RedemptionRepository {
    pool: SqlitePool,
}

impl RedemptionRepository {
    /// Creates a new RedemptionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RedemptionRepository { pool }
    }

    /// Validates a voucher code against a user and order subtotal.
    ///
    /// Read-only and idempotent: no state changes, same inputs give the
    /// same answer. On success returns the voucher unchanged, so the
    /// storefront can preview the discount before checkout commits.
    pub async fn validate(
        &self,
        user_id: &str,
        code: &str,
        order_subtotal: Money,
    ) -> LedgerResult<Voucher> {
        let voucher = sqlx::query_as::<_, Voucher>(&format!(
            "SELECT {VOUCHER_COLUMNS} FROM vouchers WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| VoucherError::NotFound {
            code: code.to_string(),
        })?;

        let already_used: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM redemptions WHERE user_id = ?1 AND voucher_id = ?2",
        )
        .bind(user_id)
        .bind(&voucher.id)
        .fetch_one(&self.pool)
        .await?;

        check_redeemable(
            &voucher,
            Utc::now().date_naive(),
            already_used > 0,
            order_subtotal,
        )?;

        Ok(voucher)
    }

    /// Redeems a voucher for an order: re-validates, records the
    /// `(order, voucher)` redemption, and decrements the allotment — all in
    /// one transaction.
    ///
    /// On success returns the voucher with its post-redemption quantity.
    /// On any failure the transaction rolls back and neither the counter
    /// nor the redemption table changes.
    pub async fn redeem(&self, order: &OrderContext, code: &str) -> LedgerResult<Voucher> {
        // IMMEDIATE, not DEFERRED: redeem always writes, so take the write
        // lock at BEGIN. A deferred transaction on a multi-connection pool
        // would read a pre-race snapshot and its INSERT would then fail
        // with SQLITE_BUSY_SNAPSHOT, surfacing a persistence error where
        // the caller must see Exhausted. With IMMEDIATE, losers queue
        // under busy_timeout, re-read committed state, and hit the
        // Exhausted branch deterministically.
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let mut voucher = sqlx::query_as::<_, Voucher>(&format!(
            "SELECT {VOUCHER_COLUMNS} FROM vouchers WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| VoucherError::NotFound {
            code: code.to_string(),
        })?;

        let for_order: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM redemptions WHERE order_id = ?1 AND voucher_id = ?2",
        )
        .bind(&order.order_id)
        .bind(&voucher.id)
        .fetch_one(&mut *tx)
        .await?;
        if for_order > 0 {
            return Err(VoucherError::AlreadyRedeemedForOrder {
                order_id: order.order_id.clone(),
                code: code.to_string(),
            }
            .into());
        }

        let already_used: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM redemptions WHERE user_id = ?1 AND voucher_id = ?2",
        )
        .bind(&order.user_id)
        .bind(&voucher.id)
        .fetch_one(&mut *tx)
        .await?;

        check_redeemable(
            &voucher,
            Utc::now().date_naive(),
            already_used > 0,
            order.subtotal,
        )?;

        let redeemed_at = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO redemptions (order_id, voucher_id, user_id, redeemed_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&order.order_id)
        .bind(&voucher.id)
        .bind(&order.user_id)
        .bind(redeemed_at)
        .execute(&mut *tx)
        .await
        .map_err(|err| map_redemption_conflict(err.into(), order, code))?;

        // The guard closes the race window: whoever loses the last unit
        // matches zero rows and rolls back.
        let result = sqlx::query(
            r#"
            UPDATE vouchers SET
                available_quantity = available_quantity - 1,
                updated_at = ?2
            WHERE id = ?1 AND available_quantity > 0
            "#,
        )
        .bind(&voucher.id)
        .bind(redeemed_at)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // tx dropped here → rollback, the redemption row never lands
            return Err(VoucherError::Exhausted {
                code: code.to_string(),
            }
            .into());
        }

        tx.commit().await?;

        debug!(
            order_id = %order.order_id,
            code = %code,
            remaining = voucher.available_quantity - 1,
            "Voucher redeemed"
        );

        voucher.available_quantity -= 1;
        voucher.updated_at = redeemed_at;
        Ok(voucher)
    }

    /// Gets the redemption record for an (order, voucher) pair, if any.
    pub async fn find(
        &self,
        order_id: &str,
        voucher_id: &str,
    ) -> LedgerResult<Option<Redemption>> {
        let redemption = sqlx::query_as::<_, Redemption>(
            r#"
            SELECT order_id, voucher_id, user_id, redeemed_at
            FROM redemptions
            WHERE order_id = ?1 AND voucher_id = ?2
            "#,
        )
        .bind(order_id)
        .bind(voucher_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(redemption)
    }

    /// Counts redemptions recorded for a voucher.
    pub async fn count_for_voucher(&self, voucher_id: &str) -> LedgerResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM redemptions WHERE voucher_id = ?1")
                .bind(voucher_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

/// Maps UNIQUE violations on the redemption indexes to their domain
/// meaning. The in-transaction pre-checks normally fire first; the indexes
/// are the backstop when two transactions race.
fn map_redemption_conflict(err: LedgerError, order: &OrderContext, code: &str) -> LedgerError {
    match &err {
        LedgerError::UniqueViolation { field } if field.contains("redemptions.user_id") => {
            VoucherError::AlreadyUsed {
                code: code.to_string(),
            }
            .into()
        }
        LedgerError::UniqueViolation { field } if field.contains("redemptions.order_id") => {
            VoucherError::AlreadyRedeemedForOrder {
                order_id: order.order_id.clone(),
                code: code.to_string(),
            }
            .into()
        }
        _ => err,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
