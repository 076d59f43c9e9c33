//! Cart and checkout calls (storefront scope).
//!
//! A registered customer's cart lives under `/carts/mine`, a guest cart
//! under `/guest-carts/{masked id}`. [`CartTarget`] selects between the two
//! so the checkout steps are written once.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storeprobe_core::{
    AddressId, Cart, CartId, CartItem, CartItemId, CheckoutAddress, GuestCartId, OrderId,
    PaymentInformation, PaymentMethod, ShippingInformation, ShippingInformationResult,
    ShippingMethod, Sku,
};
use tracing::instrument;

use crate::client::ApiClient;
use crate::config::CartItemShape;
use crate::error::ApiError;

/// The cart a checkout call acts on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CartTarget {
    /// The logged-in customer's active cart.
    Mine(CartId),
    /// A guest cart addressed by its masked id.
    Guest(GuestCartId),
}

impl CartTarget {
    fn segments(&self, tail: &[&str]) -> Vec<String> {
        let mut segments = match self {
            Self::Mine(_) => vec!["carts".to_string(), "mine".to_string()],
            Self::Guest(id) => vec!["guest-carts".to_string(), id.to_string()],
        };
        segments.extend(tail.iter().map(ToString::to_string));
        segments
    }

    /// Value the platform expects in a `quote_id` field.
    #[must_use]
    pub fn quote_id(&self) -> String {
        match self {
            Self::Mine(id) => id.to_string(),
            Self::Guest(id) => id.to_string(),
        }
    }
}

/// A line to add to a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub sku: Sku,
    pub qty: Decimal,
}

impl NewCartItem {
    #[must_use]
    pub fn new(sku: Sku, qty: impl Into<Decimal>) -> Self {
        Self {
            sku,
            qty: qty.into(),
        }
    }
}

#[derive(Serialize)]
struct CartItemEnvelope<'a> {
    #[serde(rename = "cartItem")]
    cart_item: CartItemPayload<'a>,
}

#[derive(Serialize)]
struct CartItemPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    item_id: Option<CartItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sku: Option<&'a Sku>,
    #[serde(with = "rust_decimal::serde::float")]
    qty: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    quote_id: Option<String>,
}

#[derive(Serialize)]
struct AddressEnvelope<'a> {
    address: &'a CheckoutAddress,
}

#[derive(Deserialize)]
#[serde(transparent)]
struct LenientAddressId(#[serde(deserialize_with = "AddressId::deserialize_lenient")] AddressId);

#[derive(Deserialize)]
#[serde(transparent)]
struct LenientOrderId(#[serde(deserialize_with = "OrderId::deserialize_lenient")] OrderId);

impl ApiClient {
    /// Create (or return) the logged-in customer's active cart.
    ///
    /// # Errors
    ///
    /// Returns error if no customer token is set.
    #[instrument(skip(self))]
    pub async fn create_cart(&self) -> Result<CartId, ApiError> {
        let url = self.endpoints().storefront(["carts", "mine"]);
        self.post_empty(url).await
    }

    /// Create a guest cart.
    ///
    /// # Errors
    ///
    /// Returns error if guest carts are disabled.
    #[instrument(skip(self))]
    pub async fn create_guest_cart(&self) -> Result<GuestCartId, ApiError> {
        let url = self.endpoints().storefront(["guest-carts"]);
        self.post_empty(url).await
    }

    /// The logged-in customer's active cart.
    ///
    /// # Errors
    ///
    /// Returns error if no customer token is set or there is no active cart.
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<Cart, ApiError> {
        let url = self.endpoints().storefront(["carts", "mine"]);
        self.get(url).await
    }

    /// Add a line to `target`.
    ///
    /// Whether `quote_id` is sent follows the configured [`CartItemShape`].
    ///
    /// # Errors
    ///
    /// Returns error if the SKU is unknown, out of stock or blocked by an extension.
    #[instrument(skip(self, item), fields(sku = %item.sku, qty = %item.qty))]
    pub async fn add_cart_item(
        &self,
        target: &CartTarget,
        item: &NewCartItem,
    ) -> Result<CartItem, ApiError> {
        let url = self.endpoints().storefront(target.segments(&["items"]));
        let quote_id = match self.cart_item_shape() {
            CartItemShape::Bare => None,
            CartItemShape::WithQuoteId => Some(target.quote_id()),
        };
        let body = CartItemEnvelope {
            cart_item: CartItemPayload {
                item_id: None,
                sku: Some(&item.sku),
                qty: item.qty,
                quote_id,
            },
        };
        self.post(url, &body).await
    }

    /// Lines currently in `target`.
    ///
    /// # Errors
    ///
    /// Returns error if the cart cannot be read.
    #[instrument(skip(self))]
    pub async fn cart_items(&self, target: &CartTarget) -> Result<Vec<CartItem>, ApiError> {
        let url = self.endpoints().storefront(target.segments(&["items"]));
        self.get(url).await
    }

    /// Change the quantity of a line.
    ///
    /// Updates always carry `quote_id`; the platform needs it to locate the
    /// line regardless of the add-to-cart shape.
    ///
    /// # Errors
    ///
    /// Returns error if the line does not exist or the quantity is rejected.
    #[instrument(skip(self, target), fields(item_id = %item_id, qty = %qty))]
    pub async fn update_cart_item(
        &self,
        target: &CartTarget,
        item_id: CartItemId,
        qty: Decimal,
    ) -> Result<CartItem, ApiError> {
        let item = item_id.to_string();
        let url = self
            .endpoints()
            .storefront(target.segments(&["items", &item]));
        let body = CartItemEnvelope {
            cart_item: CartItemPayload {
                item_id: Some(item_id),
                sku: None,
                qty,
                quote_id: Some(target.quote_id()),
            },
        };
        self.put(url, &body).await
    }

    /// Set the billing address, returning its quote address id.
    ///
    /// # Errors
    ///
    /// Returns error if the address fails validation.
    #[instrument(skip(self, address))]
    pub async fn set_billing_address(
        &self,
        target: &CartTarget,
        address: &CheckoutAddress,
    ) -> Result<AddressId, ApiError> {
        let url = self
            .endpoints()
            .storefront(target.segments(&["billing-address"]));
        let id: LenientAddressId = self.post(url, &AddressEnvelope { address }).await?;
        Ok(id.0)
    }

    /// Shipping rates available for `address`.
    ///
    /// # Errors
    ///
    /// Returns error if the address is rejected.
    #[instrument(skip(self, address))]
    pub async fn estimate_shipping_methods(
        &self,
        target: &CartTarget,
        address: &CheckoutAddress,
    ) -> Result<Vec<ShippingMethod>, ApiError> {
        let url = self
            .endpoints()
            .storefront(target.segments(&["estimate-shipping-methods"]));
        self.post(url, &AddressEnvelope { address }).await
    }

    /// Commit shipping and billing addresses plus the carrier choice.
    ///
    /// # Errors
    ///
    /// Returns error if the carrier is unavailable or the addresses are rejected.
    #[instrument(skip(self, information))]
    pub async fn set_shipping_information(
        &self,
        target: &CartTarget,
        information: &ShippingInformation,
    ) -> Result<ShippingInformationResult, ApiError> {
        let url = self
            .endpoints()
            .storefront(target.segments(&["shipping-information"]));
        self.post(url, information).await
    }

    /// Payment methods available for the cart.
    ///
    /// # Errors
    ///
    /// Returns error if the cart cannot be read.
    #[instrument(skip(self))]
    pub async fn payment_methods(
        &self,
        target: &CartTarget,
    ) -> Result<Vec<PaymentMethod>, ApiError> {
        let url = self
            .endpoints()
            .storefront(target.segments(&["payment-methods"]));
        self.get(url).await
    }

    /// Place the order.
    ///
    /// # Errors
    ///
    /// Returns error if the cart is incomplete or the payment method is unavailable.
    #[instrument(skip(self, payment))]
    pub async fn place_order(
        &self,
        target: &CartTarget,
        payment: &PaymentInformation,
    ) -> Result<OrderId, ApiError> {
        let url = self
            .endpoints()
            .storefront(target.segments(&["payment-information"]));
        let id: LenientOrderId = self.put(url, payment).await?;
        Ok(id.0)
    }
}
