//! # Ledger Error Types
//!
//! Error types for voucher ledger operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)          Domain rule (promo-core)          │
//! │       │                                   │                             │
//! │       ▼                                   ▼                             │
//! │  LedgerError ← Adds context; carries VoucherError transparently        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  API layer (external) serializes for the storefront                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Frontend displays user-friendly message                               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is terminal: the ledger never retries internally, and a
//! failed redemption leaves both the quantity counter and the redemption
//! table unchanged.

use promo_core::VoucherError;
use thiserror::Error;

/// Voucher ledger operation errors.
///
/// Domain failures (`Voucher`) pass through unchanged so callers can match
/// on the precise voucher condition; the remaining variants wrap sqlx
/// errors with additional context.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A voucher eligibility or lifecycle rule failed.
    #[error(transparent)]
    Voucher(#[from] VoucherError),

    /// Entity not found by its primary key.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation not covered by a domain error.
    #[error("Duplicate {field}: already exists")]
    UniqueViolation { field: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a redemption for a voucher id that no longer exists
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Returns the inner voucher error, if this is one.
    pub fn as_voucher_error(&self) -> Option<&VoucherError> {
        match self {
            LedgerError::Voucher(err) => Some(err),
            _ => None,
        }
    }
}

/// Convert sqlx errors to LedgerError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → LedgerError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → LedgerError::PoolExhausted
/// Other                       → LedgerError::Internal
/// ```
///
/// UNIQUE violations on the redemption table are translated to their domain
/// meaning at the call site, where the voucher code and order id are known;
/// this blanket impl only categorizes.
impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => LedgerError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite error messages for constraints:
                // UNIQUE constraint: "UNIQUE constraint failed: <table>.<column>"
                // FK constraint: "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    LedgerError::UniqueViolation { field }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    LedgerError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    LedgerError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => LedgerError::PoolExhausted,

            sqlx::Error::PoolClosed => LedgerError::ConnectionFailed("Pool is closed".to_string()),

            _ => LedgerError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for LedgerError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        LedgerError::MigrationFailed(err.to_string())
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voucher_error_passes_through() {
        let domain = VoucherError::Exhausted {
            code: "SPRING10".to_string(),
        };
        let wrapped: LedgerError = domain.into();
        assert_eq!(
            wrapped.to_string(),
            "Voucher 'SPRING10' is no longer available"
        );
        assert!(matches!(
            wrapped.as_voucher_error(),
            Some(VoucherError::Exhausted { .. })
        ));
    }

    #[test]
    fn test_not_found_helper() {
        let err = LedgerError::not_found("Voucher", "v-1");
        assert_eq!(err.to_string(), "Voucher not found: v-1");
    }
}
