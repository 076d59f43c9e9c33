//! storeprobe core - shared records for the commerce REST API harness.
//!
//! This crate provides the types used across all storeprobe components:
//! - `client` - HTTP client wrapper and typed API calls
//! - `fixtures` - randomized payload generators
//! - `integration-tests` - scenario scripts
//! - `cli` - test runner wrapper
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! randomness. The records mirror what the platform sends and accepts; the
//! harness never owns or manages them.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, SKUs, emails, tokens, and statuses
//! - [`models`] - Request/response records (customers, products, carts, orders)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod types;

pub use models::*;
pub use types::*;
