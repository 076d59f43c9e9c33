//! storeprobe fixtures - randomized payloads for scenario scripts.
//!
//! Every generator is a builder: fields set on the builder are used as-is,
//! everything else is generated from the supplied [`rand::Rng`]. There is no
//! other precedence rule and no business validation; the platform decides
//! what it accepts.
//!
//! Pass a seeded RNG for reproducible data, or use the `*_random`
//! convenience functions which draw from the thread RNG.
//!
//! # Modules
//!
//! - [`customer`] - Registrations, optionally with an address
//! - [`address`] - US postal addresses
//! - [`product`] - Simple, virtual and configurable products, stock items
//! - [`invalid`] - Payloads the platform must reject
//! - [`words`] - Word lists and sampling helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address;
pub mod customer;
pub mod invalid;
pub mod product;
pub mod words;

pub use address::AddressFixture;
pub use customer::{CUSTOMER_PASSWORD_PREFIX, CustomerFixture};
pub use product::{ProductFixture, StockItemFixture};

use storeprobe_core::{EmailError, SkuError};
use thiserror::Error;

/// Errors a generator can hit when an override or generated value fails
/// the core type checks.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),
    #[error("invalid sku: {0}")]
    Sku(#[from] SkuError),
}
