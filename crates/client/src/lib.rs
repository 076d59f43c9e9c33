//! storeprobe client - talks to the commerce platform under test.
//!
//! # Modules
//!
//! - [`config`] - Environment configuration ([`HarnessConfig`])
//! - [`endpoints`] - Storefront/admin URL building and search criteria
//! - [`client`] - [`ApiClient`], the JSON request wrapper
//! - [`api`] - Typed calls for customers, products, carts and orders
//! - [`error`] - [`ApiError`] and the platform's error body
//!
//! # Example
//!
//! ```rust,no_run
//! use storeprobe_client::{ApiClient, HarnessConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HarnessConfig::from_env()?;
//! let client = ApiClient::new(&config)?;
//! let admin = client.admin_login(&config.platform).await?;
//! let order = admin.order(storeprobe_core::OrderId::new(1)).await?;
//! println!("{}", order.grand_total);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;

pub use api::{CartTarget, NewCartItem, ProductPatch, StockPatch};
pub use client::{ApiClient, RequestOptions};
pub use config::{CartItemShape, ConfigError, GapPolicy, HarnessConfig, PlatformConfig, RunSettings};
pub use endpoints::{EndpointError, Endpoints, Filter, Scope, SearchCriteria};
pub use error::{ApiError, ErrorBody, ErrorDetail};
pub use reqwest::{Method, StatusCode};
