//! Catalog calls (admin scope).

use rust_decimal::Decimal;
use serde::Serialize;
use storeprobe_core::{Product, ProductSearchResults, ProductStatus, Sku, Visibility};
use tracing::instrument;

use crate::client::{ApiClient, RequestOptions};
use crate::endpoints::SearchCriteria;
use crate::error::ApiError;

#[derive(Serialize)]
struct ProductEnvelope<'a, P: Serialize> {
    product: &'a P,
}

/// Partial product update sent to `PUT /products/{sku}`.
///
/// Only fields that are set are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension_attributes: Option<PatchExtension>,
}

/// `extension_attributes` of a [`ProductPatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchExtension {
    pub stock_item: StockPatch,
}

/// New stock level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockPatch {
    #[serde(with = "rust_decimal::serde::float")]
    pub qty: Decimal,
    pub is_in_stock: bool,
}

impl ProductPatch {
    #[must_use]
    pub fn price(price: Decimal) -> Self {
        Self {
            price: Some(price),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn status(status: ProductStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Set the stock quantity, in stock when `qty > 0`.
    #[must_use]
    pub fn stock(qty: Decimal) -> Self {
        Self {
            extension_attributes: Some(PatchExtension {
                stock_item: StockPatch {
                    qty,
                    is_in_stock: qty > Decimal::ZERO,
                },
            }),
            ..Self::default()
        }
    }
}

impl ApiClient {
    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns error on a duplicate SKU or URL key (400/422) or invalid payload.
    #[instrument(skip(self, product), fields(sku = %product.sku))]
    pub async fn create_product(&self, product: &Product) -> Result<Product, ApiError> {
        let url = self.endpoints().admin(["products"]);
        self.post(url, &ProductEnvelope { product }).await
    }

    /// Post an arbitrary product payload (for rejection tests).
    ///
    /// # Errors
    ///
    /// Returns error if the platform rejects the payload.
    #[instrument(skip(self, payload))]
    pub async fn create_product_raw(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoints().admin(["products"]);
        self.post(url, payload).await
    }

    /// Fetch a product by SKU.
    ///
    /// # Errors
    ///
    /// Returns error if no product has this SKU (404).
    #[instrument(skip(self, sku), fields(sku = %sku))]
    pub async fn product(&self, sku: &Sku) -> Result<Product, ApiError> {
        let url = self.endpoints().admin(["products", sku.as_str()]);
        self.get(url).await
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns error if the product does not exist or the update is rejected.
    #[instrument(skip(self, patch), fields(sku = %sku))]
    pub async fn update_product(
        &self,
        sku: &Sku,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError> {
        let url = self.endpoints().admin(["products", sku.as_str()]);
        self.put(url, &ProductEnvelope { product: patch }).await
    }

    /// Delete a product.
    ///
    /// The platform answers `true`, or with an empty body on some
    /// installations; both count as deleted.
    ///
    /// # Errors
    ///
    /// Returns error if the product does not exist (404) or cannot be removed.
    #[instrument(skip(self, sku), fields(sku = %sku))]
    pub async fn delete_product(&self, sku: &Sku) -> Result<bool, ApiError> {
        let url = self.endpoints().admin(["products", sku.as_str()]);
        let deleted: Option<bool> = self.delete(url).await?;
        Ok(deleted.unwrap_or(true))
    }

    /// Search the catalog.
    ///
    /// # Errors
    ///
    /// Returns error if the criteria are rejected.
    #[instrument(skip(self, criteria))]
    pub async fn search_products(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<ProductSearchResults, ApiError> {
        let url = self.endpoints().admin(["products"]);
        let options = RequestOptions::new().query_pairs(criteria.to_query());
        self.get_with(url, &options).await
    }
}
