//! Customer accounts.

use serde::{Deserialize, Serialize};

use super::address::Address;
use crate::types::{CustomerId, Email};

/// A customer record as returned by `/customers` and `/customers/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    pub email: Email,
    pub firstname: String,
    pub lastname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_id: Option<i64>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// The customer half of a registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub email: Email,
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

/// Body of `POST /customers`.
///
/// The password here is generated fixture data, so it is a plain string
/// that serializes into the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRegistration {
    pub customer: NewCustomer,
    pub password: String,
}

/// Body of `PUT /customers/me` (wrapped in `{"customer": ...}` by the client).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerUpdate {
    pub id: CustomerId,
    pub email: Email,
    pub firstname: String,
    pub lastname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<Address>>,
}

impl CustomerUpdate {
    /// Start an update from the current record, keeping identity fields.
    #[must_use]
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            email: customer.email.clone(),
            firstname: customer.firstname.clone(),
            lastname: customer.lastname.clone(),
            website_id: customer.website_id,
            addresses: None,
        }
    }

    /// Replace the name.
    #[must_use]
    pub fn name(mut self, firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
        self.firstname = firstname.into();
        self.lastname = lastname.into();
        self
    }

    /// Replace the full address list.
    #[must_use]
    pub fn addresses(mut self, addresses: Vec<Address>) -> Self {
        self.addresses = Some(addresses);
        self
    }
}
