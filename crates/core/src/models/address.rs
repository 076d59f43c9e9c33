//! Postal addresses.

use serde::{Deserialize, Serialize};

use crate::types::{AddressId, CustomerId, Email};

/// Region (state/province) attached to an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub region_code: String,
    pub region: String,
    pub region_id: i64,
}

/// A structured postal address as stored on a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AddressId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,
    pub firstname: String,
    pub lastname: String,
    pub street: Vec<String>,
    pub city: String,
    pub postcode: String,
    pub country_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<i64>,
    pub telephone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_shipping: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_billing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

/// The reduced address shape accepted by checkout endpoints.
///
/// Checkout rejects the nested `region` object and the customer-address
/// flags, so addresses are flattened to this shape before use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutAddress {
    pub firstname: String,
    pub lastname: String,
    pub street: Vec<String>,
    pub city: String,
    pub postcode: String,
    pub country_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<i64>,
    pub telephone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

impl CheckoutAddress {
    /// Attach the contact email checkout needs for billing/shipping.
    #[must_use]
    pub fn with_email(mut self, email: Email) -> Self {
        self.email = Some(email);
        self
    }
}

impl From<&Address> for CheckoutAddress {
    fn from(address: &Address) -> Self {
        Self {
            firstname: address.firstname.clone(),
            lastname: address.lastname.clone(),
            street: address.street.clone(),
            city: address.city.clone(),
            postcode: address.postcode.clone(),
            country_id: address.country_id.clone(),
            region_id: address
                .region
                .as_ref()
                .map(|r| r.region_id)
                .or(address.region_id),
            telephone: address.telephone.clone(),
            email: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Address {
        Address {
            id: None,
            customer_id: None,
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            street: vec!["12 Analytical Way".to_string()],
            city: "Springfield".to_string(),
            postcode: "12345".to_string(),
            country_id: "US".to_string(),
            region: Some(Region {
                region_code: "TX".to_string(),
                region: "Texas".to_string(),
                region_id: 57,
            }),
            region_id: Some(3),
            telephone: "555-0100".to_string(),
            default_shipping: Some(true),
            default_billing: Some(true),
            email: None,
        }
    }

    #[test]
    fn test_checkout_address_prefers_nested_region() {
        let checkout = CheckoutAddress::from(&sample());
        assert_eq!(checkout.region_id, Some(57));
    }

    #[test]
    fn test_checkout_address_falls_back_to_flat_region_id() {
        let mut address = sample();
        address.region = None;
        let checkout = CheckoutAddress::from(&address);
        assert_eq!(checkout.region_id, Some(3));
    }

    #[test]
    fn test_checkout_address_drops_customer_fields() {
        let email = Email::parse("ada@example.com").unwrap();
        let checkout = CheckoutAddress::from(&sample()).with_email(email);
        let json = serde_json::to_value(&checkout).unwrap();
        assert!(json.get("region").is_none());
        assert!(json.get("default_shipping").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }
}
