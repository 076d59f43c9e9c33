//! Carts (quotes) and the checkout records exchanged on the way to an order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::address::CheckoutAddress;
use crate::types::{CartId, CartItemId, Email, Sku};

/// A registered customer's cart as returned by `GET /carts/mine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub items_count: u32,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub items_qty: Decimal,
    #[serde(default)]
    pub customer: CartCustomer,
}

/// Customer summary embedded in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartCustomer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
}

/// A line in a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub item_id: CartItemId,
    pub sku: Sku,
    #[serde(with = "rust_decimal::serde::float")]
    pub qty: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<String>,
}

/// A shipping rate offered for an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingMethod {
    pub carrier_code: String,
    pub method_code: String,
    #[serde(default)]
    pub carrier_title: Option<String>,
    #[serde(default)]
    pub method_title: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(default)]
    pub available: Option<bool>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// A payment method offered for a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub code: String,
    pub title: String,
}

/// Body of `POST .../shipping-information`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingInformation {
    #[serde(rename = "addressInformation")]
    pub address_information: AddressInformation,
}

/// Address and carrier choice for a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressInformation {
    pub shipping_address: CheckoutAddress,
    pub billing_address: CheckoutAddress,
    pub shipping_carrier_code: String,
    pub shipping_method_code: String,
}

impl ShippingInformation {
    /// Ship and bill to `address` using `method`.
    #[must_use]
    pub fn new(address: CheckoutAddress, method: &ShippingMethod) -> Self {
        Self {
            address_information: AddressInformation {
                shipping_address: address.clone(),
                billing_address: address,
                shipping_carrier_code: method.carrier_code.clone(),
                shipping_method_code: method.method_code.clone(),
            },
        }
    }
}

/// Response of `POST .../shipping-information`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingInformationResult {
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    pub totals: CartTotals,
}

/// Cart totals after shipping has been chosen.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartTotals {
    #[serde(default, with = "rust_decimal::serde::float")]
    pub grand_total: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub shipping_amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub tax_amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount_amount: Decimal,
}

/// Body of `PUT .../payment-information`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentInformation {
    #[serde(rename = "paymentMethod")]
    pub payment_method: PaymentMethodChoice,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

/// `{ "method": "checkmo" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentMethodChoice {
    pub method: String,
}

impl PaymentInformation {
    /// Check / money order, available on stock installations.
    pub const CHECK_MONEY_ORDER: &'static str = "checkmo";

    /// Pay with the given method code.
    #[must_use]
    pub fn method(code: impl Into<String>) -> Self {
        Self {
            payment_method: PaymentMethodChoice {
                method: code.into(),
            },
            email: None,
        }
    }

    /// Guest carts must carry the contact email.
    #[must_use]
    pub fn with_email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }
}
