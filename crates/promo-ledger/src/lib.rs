//! # promo-ledger: Voucher Ledger for the Promo Engine
//!
//! This crate provides durable voucher storage and the redemption path.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Promo Engine Data Flow                             │
//! │                                                                         │
//! │  Checkout / Admin API                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   promo-ledger (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐ │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │ │   │
//! │  │   │               │    │ VoucherRepo    │    │              │ │   │
//! │  │   │ SqlitePool    │◄───│ RedemptionRepo │    │ 001_vouchers │ │   │
//! │  │   │ Connection    │    │                │    │     .sql     │ │   │
//! │  │   │ Management    │    │                │    │              │ │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘ │   │
//! │  │                                                                 │   │
//! │  │   Eligibility rules come from promo-core; this crate adds     │   │
//! │  │   persistence, uniqueness enforcement, and the transactional  │   │
//! │  │   quantity decrement.                                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │        vouchers / redemptions / _sqlx_migrations               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Ledger error types
//! - [`repository`] - Repository implementations (voucher, redemption)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use promo_ledger::{Database, DbConfig, OrderContext};
//! use promo_core::money::Money;
//!
//! let db = Database::new(DbConfig::new("path/to/promo.db")).await?;
//!
//! // Preview eligibility, then commit at checkout
//! let voucher = db.redemptions().validate("user-1", "SPRING10", subtotal).await?;
//! let order = OrderContext {
//!     order_id: "order-1".into(),
//!     user_id: "user-1".into(),
//!     subtotal,
//! };
//! let redeemed = db.redemptions().redeem(&order, "SPRING10").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{LedgerError, LedgerResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::redemption::{OrderContext, RedemptionRepository};
pub use repository::voucher::VoucherRepository;
