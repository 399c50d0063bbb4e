//! # promo-core: Pure Business Logic for the Promo Engine
//!
//! This crate is the **heart** of the promotional pricing and voucher
//! engine. It contains all business logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Promo Engine Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront (web + mobile clients)               │   │
//! │  │    Product pages ──► Cart ──► Checkout ──► Admin vouchers      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ API layer (external)                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ promo-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │   rules   │  │   │
//! │  │   │  Variant  │  │   Money   │  │  resolver │  │eligibility│  │   │
//! │  │   │  Voucher  │  │ rounding  │  │ functions │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  promo-ledger (Voucher Ledger)                  │   │
//! │  │        SQLite vouchers + redemptions, atomic redemption         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Variant, ComboOffer, Voucher, Redemption)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - The pricing resolver: one home for discount composition
//! - [`rules`] - Voucher eligibility and admin-input rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, clock access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use promo_core::pricing::{resolve_combo_price, resolve_unit_price};
//! use promo_core::types::Variant;
//!
//! let variant = Variant {
//!     base_price_cents: 1000,
//!     price_modifier_cents: 0,
//!     discount_percent: 10,
//! };
//!
//! // variant discount first, combo discount stacked multiplicatively
//! assert_eq!(resolve_unit_price(&variant).unwrap().cents(), 900);
//! assert_eq!(resolve_combo_price(&variant, 20).unwrap().cents(), 720);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod rules;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use promo_core::Money` instead of
// `use promo_core::money::Money`

pub use error::{PricingError, VoucherError};
pub use money::Money;
pub use types::*;
