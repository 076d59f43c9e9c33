//! Catalog products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, ProductStatus, ProductType, Sku, Visibility};

/// Default attribute set shipped with the platform.
pub const DEFAULT_ATTRIBUTE_SET_ID: i64 = 4;

/// A catalog entry as sent to and returned from `/products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub sku: Sku,
    pub name: String,
    #[serde(default = "default_attribute_set")]
    pub attribute_set_id: i64,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub visibility: Visibility,
    pub type_id: ProductType,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub weight: Option<Decimal>,
    #[serde(default, skip_serializing_if = "ProductExtension::is_empty")]
    pub extension_attributes: ProductExtension,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_attributes: Vec<CustomAttribute>,
}

const fn default_attribute_set() -> i64 {
    DEFAULT_ATTRIBUTE_SET_ID
}

impl Product {
    /// Look up a custom attribute value by code.
    #[must_use]
    pub fn custom_attribute(&self, code: &str) -> Option<&serde_json::Value> {
        self.custom_attributes
            .iter()
            .find(|a| a.attribute_code == code)
            .map(|a| &a.value)
    }

    /// Stock item, if the platform returned one.
    #[must_use]
    pub const fn stock_item(&self) -> Option<&StockItem> {
        self.extension_attributes.stock_item.as_ref()
    }
}

/// `extension_attributes` block of a product.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductExtension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_item: Option<StockItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configurable_product_options: Vec<ConfigurableOption>,
}

impl ProductExtension {
    /// `true` when there is nothing to send.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stock_item.is_none() && self.configurable_product_options.is_empty()
    }
}

/// Inventory for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    #[serde(with = "rust_decimal::serde::float")]
    pub qty: Decimal,
    pub is_in_stock: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manage_stock: Option<bool>,
}

/// A free-form `{attribute_code, value}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomAttribute {
    pub attribute_code: String,
    pub value: serde_json::Value,
}

impl CustomAttribute {
    /// Attribute with a string value.
    #[must_use]
    pub fn text(code: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute_code: code.into(),
            value: serde_json::Value::String(value.into()),
        }
    }
}

/// One configurable axis (color, size, ...) of a configurable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurableOption {
    pub attribute_id: String,
    pub label: String,
    pub position: u32,
    pub is_use_default: bool,
    pub values: Vec<ConfigurableValue>,
}

/// One selectable value of a configurable option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurableValue {
    pub value_index: i64,
}

/// Result page of `GET /products?searchCriteria...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSearchResults {
    #[serde(default)]
    pub items: Vec<Product>,
    #[serde(default)]
    pub total_count: u64,
}
