//! # Voucher Repository
//!
//! Administrative voucher lifecycle: create, read, update, soft-delete,
//! restore.
//!
//! ## Voucher Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Voucher Lifecycle                                  │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── create() → Voucher { status: Active, code: supplied|generated }│
//! │                                                                         │
//! │  2. REDEEM (RedemptionRepository, not here)                            │
//! │     └── available_quantity decremented, redemption row written         │
//! │                                                                         │
//! │  3. ADMIN EDITS                                                        │
//! │     └── update() → field merge with revalidation                       │
//! │                                                                         │
//! │  4. SOFT DELETE / RESTORE                                              │
//! │     └── soft_delete() → status 1     restore() → status 0              │
//! │         (never physically deleted; historical orders keep their link)  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use rand::Rng;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};
use promo_core::rules::{self, GENERATED_CODE_LEN};
use promo_core::{NewVoucher, Voucher, VoucherError, VoucherStatus, VoucherUpdate};

/// All voucher columns, in struct order, for `query_as`.
const VOUCHER_COLUMNS: &str = "id, code, kind, value, start_date, end_date, \
     available_quantity, min_order_value_cents, status, created_at, updated_at";

/// Repository for voucher administrative operations.
#[derive(Debug, Clone)]
pub struct VoucherRepository {
    pool: SqlitePool,
}

impl VoucherRepository {
    /// Creates a new VoucherRepository.
    pub fn new(pool: SqlitePool) -> Self {
        VoucherRepository { pool }
    }

    /// Creates a voucher.
    ///
    /// ## Code Resolution
    /// - Supplied code: checked for uniqueness first (`DuplicateCode`),
    ///   with the UNIQUE index as the backstop under concurrency.
    /// - No code: a random 10-digit code is generated; the odds of a
    ///   collision are negligible but the generator re-rolls on one anyway.
    pub async fn create(&self, dto: NewVoucher) -> LedgerResult<Voucher> {
        rules::validate_new_voucher(&dto)?;

        let code = match &dto.code {
            Some(code) => {
                if self.code_exists(code, None).await? {
                    return Err(VoucherError::DuplicateCode { code: code.clone() }.into());
                }
                code.clone()
            }
            None => self.generate_unique_code().await?,
        };

        let now = Utc::now();
        let voucher = Voucher {
            id: Uuid::new_v4().to_string(),
            code,
            kind: dto.kind,
            value: dto.value,
            start_date: dto.start_date,
            end_date: dto.end_date,
            available_quantity: dto.available_quantity,
            min_order_value_cents: dto.min_order_value_cents,
            status: VoucherStatus::Active,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %voucher.id, code = %voucher.code, "Creating voucher");

        sqlx::query(
            r#"
            INSERT INTO vouchers (
                id, code, kind, value,
                start_date, end_date,
                available_quantity, min_order_value_cents, status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&voucher.id)
        .bind(&voucher.code)
        .bind(voucher.kind)
        .bind(voucher.value)
        .bind(voucher.start_date)
        .bind(voucher.end_date)
        .bind(voucher.available_quantity)
        .bind(voucher.min_order_value_cents)
        .bind(voucher.status)
        .bind(voucher.created_at)
        .bind(voucher.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| map_code_conflict(err.into(), &voucher.code))?;

        Ok(voucher)
    }

    /// Gets a voucher by ID.
    pub async fn get_by_id(&self, id: &str) -> LedgerResult<Option<Voucher>> {
        let voucher = sqlx::query_as::<_, Voucher>(&format!(
            "SELECT {VOUCHER_COLUMNS} FROM vouchers WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(voucher)
    }

    /// Gets a voucher by its (case-sensitive) code.
    pub async fn get_by_code(&self, code: &str) -> LedgerResult<Option<Voucher>> {
        let voucher = sqlx::query_as::<_, Voucher>(&format!(
            "SELECT {VOUCHER_COLUMNS} FROM vouchers WHERE code = ?1"
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(voucher)
    }

    /// Lists all vouchers, newest first. Includes soft-deleted ones; the
    /// admin table shows and restores those.
    pub async fn list(&self) -> LedgerResult<Vec<Voucher>> {
        let vouchers = sqlx::query_as::<_, Voucher>(&format!(
            "SELECT {VOUCHER_COLUMNS} FROM vouchers ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(vouchers)
    }

    /// Updates a voucher: plain field merge, with revalidation of any
    /// supplied kind/value pair, code, and the merged date window.
    pub async fn update(&self, id: &str, dto: VoucherUpdate) -> LedgerResult<Voucher> {
        let current = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Voucher", id))?;

        rules::validate_voucher_update(&current, &dto)?;

        if let Some(code) = &dto.code {
            // the voucher keeping its own code is not a conflict
            if code != &current.code && self.code_exists(code, Some(id)).await? {
                return Err(VoucherError::DuplicateCode { code: code.clone() }.into());
            }
        }

        let updated = Voucher {
            id: current.id.clone(),
            code: dto.code.unwrap_or(current.code),
            kind: dto.kind.unwrap_or(current.kind),
            value: dto.value.unwrap_or(current.value),
            start_date: dto.start_date.unwrap_or(current.start_date),
            end_date: dto.end_date.unwrap_or(current.end_date),
            available_quantity: dto.available_quantity.unwrap_or(current.available_quantity),
            min_order_value_cents: dto
                .min_order_value_cents
                .unwrap_or(current.min_order_value_cents),
            status: current.status,
            created_at: current.created_at,
            updated_at: Utc::now(),
        };

        debug!(id = %updated.id, code = %updated.code, "Updating voucher");

        sqlx::query(
            r#"
            UPDATE vouchers SET
                code = ?2,
                kind = ?3,
                value = ?4,
                start_date = ?5,
                end_date = ?6,
                available_quantity = ?7,
                min_order_value_cents = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(&updated.id)
        .bind(&updated.code)
        .bind(updated.kind)
        .bind(updated.value)
        .bind(updated.start_date)
        .bind(updated.end_date)
        .bind(updated.available_quantity)
        .bind(updated.min_order_value_cents)
        .bind(updated.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| map_code_conflict(err.into(), &updated.code))?;

        Ok(updated)
    }

    /// Soft-deletes a voucher (status → 1).
    ///
    /// Idempotent from the caller's perspective: deleting an already
    /// deleted voucher is a no-op state-wise.
    pub async fn soft_delete(&self, id: &str) -> LedgerResult<()> {
        self.set_status(id, VoucherStatus::Deleted).await
    }

    /// Restores a soft-deleted voucher (status → 0). Idempotent.
    pub async fn restore(&self, id: &str) -> LedgerResult<()> {
        self.set_status(id, VoucherStatus::Active).await
    }

    async fn set_status(&self, id: &str, status: VoucherStatus) -> LedgerResult<()> {
        let now = Utc::now();

        debug!(id = %id, ?status, "Setting voucher status");

        let result = sqlx::query("UPDATE vouchers SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LedgerError::not_found("Voucher", id));
        }

        Ok(())
    }

    /// Checks whether a code is taken, optionally ignoring one voucher
    /// (so an update can keep its own code).
    async fn code_exists(&self, code: &str, exclude_id: Option<&str>) -> LedgerResult<bool> {
        let count: i64 = match exclude_id {
            Some(id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM vouchers WHERE code = ?1 AND id != ?2")
                    .bind(code)
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM vouchers WHERE code = ?1")
                    .bind(code)
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        Ok(count > 0)
    }

    /// Generates a fresh 10-digit code, re-rolling on collision.
    async fn generate_unique_code(&self) -> LedgerResult<String> {
        // 10^10 codes; a handful of attempts is already paranoid
        for _ in 0..8 {
            let code = generate_code();
            if !self.code_exists(&code, None).await? {
                return Ok(code);
            }
        }

        Err(LedgerError::Internal(
            "could not generate a unique voucher code".to_string(),
        ))
    }
}

/// Generates a random numeric voucher code of [`GENERATED_CODE_LEN`] digits.
///
/// ## Example
/// `4719380256`
fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..GENERATED_CODE_LEN)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Maps a UNIQUE violation on `vouchers.code` to its domain error.
///
/// The uniqueness pre-check is a fast path; a concurrent create can still
/// hit the index, and the caller should see the same error either way.
fn map_code_conflict(err: LedgerError, code: &str) -> LedgerError {
    match &err {
        LedgerError::UniqueViolation { field } if field.contains("vouchers.code") => {
            VoucherError::DuplicateCode {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use promo_core::VoucherKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_voucher(code: Option<&str>) -> NewVoucher {
        NewVoucher {
            code: code.map(str::to_string),
            kind: VoucherKind::Percent,
            value: 10,
            start_date: date(2020, 1, 1),
            end_date: date(2099, 12, 31),
            available_quantity: 5,
            min_order_value_cents: 500,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_with_generated_code() {
        let db = test_db().await;
        let voucher = db.vouchers().create(new_voucher(None)).await.unwrap();

        assert_eq!(voucher.code.len(), GENERATED_CODE_LEN);
        assert!(voucher.code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(voucher.status, VoucherStatus::Active);

        let fetched = db.vouchers().get_by_code(&voucher.code).await.unwrap();
        assert_eq!(fetched.unwrap().id, voucher.id);
    }

    #[tokio::test]
    async fn test_create_with_supplied_code() {
        let db = test_db().await;
        let voucher = db
            .vouchers()
            .create(new_voucher(Some("SPRING10")))
            .await
            .unwrap();
        assert_eq!(voucher.code, "SPRING10");
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let db = test_db().await;
        db.vouchers()
            .create(new_voucher(Some("SPRING10")))
            .await
            .unwrap();

        let err = db
            .vouchers()
            .create(new_voucher(Some("SPRING10")))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_voucher_error(),
            Some(VoucherError::DuplicateCode { .. })
        ));
    }

    #[tokio::test]
    async fn test_codes_are_case_sensitive() {
        let db = test_db().await;
        db.vouchers()
            .create(new_voucher(Some("SPRING10")))
            .await
            .unwrap();

        // different case = different code
        let voucher = db
            .vouchers()
            .create(new_voucher(Some("spring10")))
            .await
            .unwrap();
        assert_eq!(voucher.code, "spring10");
    }

    #[tokio::test]
    async fn test_soft_delete_and_restore() {
        let db = test_db().await;
        let voucher = db.vouchers().create(new_voucher(None)).await.unwrap();

        db.vouchers().soft_delete(&voucher.id).await.unwrap();
        let fetched = db.vouchers().get_by_id(&voucher.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, VoucherStatus::Deleted);

        // second delete is a state-wise no-op, not an error
        db.vouchers().soft_delete(&voucher.id).await.unwrap();

        db.vouchers().restore(&voucher.id).await.unwrap();
        let fetched = db.vouchers().get_by_id(&voucher.id).await.unwrap().unwrap();
        assert_eq!(fetched.status, VoucherStatus::Active);
    }

    #[tokio::test]
    async fn test_soft_delete_missing_voucher() {
        let db = test_db().await;
        let err = db.vouchers().soft_delete("no-such-id").await.unwrap_err();
        assert!(matches!(err, LedgerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let db = test_db().await;
        let voucher = db
            .vouchers()
            .create(new_voucher(Some("SPRING10")))
            .await
            .unwrap();

        let updated = db
            .vouchers()
            .update(
                &voucher.id,
                VoucherUpdate {
                    value: Some(25),
                    available_quantity: Some(50), // explicit restock
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.value, 25);
        assert_eq!(updated.available_quantity, 50);
        // untouched fields survive the merge
        assert_eq!(updated.code, "SPRING10");
        assert_eq!(updated.kind, VoucherKind::Percent);
    }

    #[tokio::test]
    async fn test_update_keeping_own_code_is_not_a_conflict() {
        let db = test_db().await;
        let voucher = db
            .vouchers()
            .create(new_voucher(Some("SPRING10")))
            .await
            .unwrap();

        let updated = db
            .vouchers()
            .update(
                &voucher.id,
                VoucherUpdate {
                    code: Some("SPRING10".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.code, "SPRING10");
    }

    #[tokio::test]
    async fn test_update_to_taken_code_rejected() {
        let db = test_db().await;
        db.vouchers()
            .create(new_voucher(Some("SPRING10")))
            .await
            .unwrap();
        let other = db
            .vouchers()
            .create(new_voucher(Some("SUMMER20")))
            .await
            .unwrap();

        let err = db
            .vouchers()
            .update(
                &other.id,
                VoucherUpdate {
                    code: Some("SPRING10".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_voucher_error(),
            Some(VoucherError::DuplicateCode { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_rejects_inverted_window() {
        let db = test_db().await;
        let voucher = db.vouchers().create(new_voucher(None)).await.unwrap();

        let err = db
            .vouchers()
            .update(
                &voucher.id,
                VoucherUpdate {
                    end_date: Some(date(2019, 1, 1)),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_voucher_error(),
            Some(VoucherError::DateInvalid { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_returns_all_vouchers() {
        let db = test_db().await;
        db.vouchers().create(new_voucher(Some("A1"))).await.unwrap();
        let second = db.vouchers().create(new_voucher(Some("B2"))).await.unwrap();
        db.vouchers().soft_delete(&second.id).await.unwrap();

        let all = db.vouchers().list().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_generated_code_shape() {
        let code = generate_code();
        assert_eq!(code.len(), GENERATED_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }
}
