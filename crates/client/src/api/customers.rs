//! Customer account calls (storefront scope).

use serde::Serialize;
use storeprobe_core::{Customer, CustomerRegistration, CustomerUpdate};
use tracing::instrument;

use crate::client::ApiClient;
use crate::error::ApiError;

#[derive(Serialize)]
struct CustomerEnvelope<'a> {
    customer: &'a CustomerUpdate,
}

impl ApiClient {
    /// Register a new customer account.
    ///
    /// # Errors
    ///
    /// Returns error if the email is taken or a field fails validation (400).
    #[instrument(skip(self, registration), fields(email = %registration.customer.email))]
    pub async fn register_customer(
        &self,
        registration: &CustomerRegistration,
    ) -> Result<Customer, ApiError> {
        let url = self.endpoints().storefront(["customers"]);
        self.post(url, registration).await
    }

    /// Post an arbitrary registration payload (for rejection tests).
    ///
    /// # Errors
    ///
    /// Returns error if the platform rejects the payload.
    #[instrument(skip(self, payload))]
    pub async fn register_customer_raw(
        &self,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoints().storefront(["customers"]);
        self.post(url, payload).await
    }

    /// The customer the current token belongs to.
    ///
    /// # Errors
    ///
    /// Returns error if no customer token is set (401).
    #[instrument(skip(self))]
    pub async fn current_customer(&self) -> Result<Customer, ApiError> {
        let url = self.endpoints().storefront(["customers", "me"]);
        self.get(url).await
    }

    /// Replace the current customer's profile.
    ///
    /// # Errors
    ///
    /// Returns error if no customer token is set or validation fails.
    #[instrument(skip(self, update), fields(customer_id = %update.id))]
    pub async fn update_current_customer(
        &self,
        update: &CustomerUpdate,
    ) -> Result<Customer, ApiError> {
        let url = self.endpoints().storefront(["customers", "me"]);
        self.put(url, &CustomerEnvelope { customer: update }).await
    }
}
