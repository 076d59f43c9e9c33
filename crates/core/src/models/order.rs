//! Orders, the terminal artifact of a checkout. Read-only from the harness.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderState, Sku};

/// An order as returned by `GET /orders/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub entity_id: OrderId,
    #[serde(default)]
    pub increment_id: Option<String>,
    pub state: OrderState,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub grand_total: Decimal,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_firstname: Option<String>,
    #[serde(default)]
    pub customer_lastname: Option<String>,
}

impl Order {
    /// The line for `sku`, if ordered.
    #[must_use]
    pub fn item(&self, sku: &Sku) -> Option<&OrderItem> {
        self.items.iter().find(|item| &item.sku == sku)
    }
}

/// A line of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub sku: Sku,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub qty_ordered: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub product_type: Option<String>,
}
