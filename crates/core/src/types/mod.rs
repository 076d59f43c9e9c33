//! Core types for storeprobe.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod sku;
pub mod status;

pub use credential::{AuthToken, Credential, TokenScope};
pub use email::{Email, EmailError};
pub use id::*;
pub use sku::{Sku, SkuError};
pub use status::*;
