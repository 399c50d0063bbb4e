//! # Repository Layer
//!
//! Data access objects for the voucher ledger.
//!
//! ## Design
//! Each repository owns a pool handle and exposes async methods returning
//! `LedgerResult`. Repositories hold no caches and no state beyond the
//! pool, so they are cheap to clone and safe to share across tasks.
//!
//! - [`voucher`] — admin lifecycle: create, update, soft delete, restore,
//!   lookups
//! - [`redemption`] — checkout path: validate and the atomic redeem

pub mod redemption;
pub mod voucher;
