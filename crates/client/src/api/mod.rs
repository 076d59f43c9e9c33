//! Typed calls, one module per resource.
//!
//! Each module adds methods to [`crate::ApiClient`]; the scope (storefront
//! or admin) of every call is fixed by the method, never by the caller.

mod auth;
mod carts;
mod customers;
mod orders;
mod products;

pub use carts::{CartTarget, NewCartItem};
pub use products::{ProductPatch, StockPatch};
