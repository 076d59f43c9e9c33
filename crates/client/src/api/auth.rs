//! Token endpoints.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use storeprobe_core::{AuthToken, Credential};
use tracing::instrument;

use crate::client::ApiClient;
use crate::config::PlatformConfig;
use crate::error::ApiError;

#[derive(Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Exchange admin credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns error if the platform rejects the credentials (401).
    #[instrument(skip(self, password))]
    pub async fn admin_token(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthToken, ApiError> {
        let url = self.endpoints().admin(["integration", "admin", "token"]);
        let body = TokenRequest {
            username,
            password: password.expose_secret(),
        };
        self.anonymous().post(url, &body).await
    }

    /// Exchange customer credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns error if the platform rejects the credentials (401).
    #[instrument(skip(self, password))]
    pub async fn customer_token(&self, email: &str, password: &str) -> Result<AuthToken, ApiError> {
        let url = self
            .endpoints()
            .storefront(["integration", "customer", "token"]);
        let body = TokenRequest {
            username: email,
            password,
        };
        self.anonymous().post(url, &body).await
    }

    /// A client speaking as the configured admin.
    ///
    /// # Errors
    ///
    /// Returns error if the admin token cannot be obtained.
    pub async fn admin_login(&self, platform: &PlatformConfig) -> Result<Self, ApiError> {
        let token = self
            .admin_token(&platform.admin_username, &platform.admin_password)
            .await?;
        Ok(self.with_credential(Credential::admin(token)))
    }

    /// A client speaking as the given customer.
    ///
    /// # Errors
    ///
    /// Returns error if the customer token cannot be obtained.
    pub async fn customer_login(&self, email: &str, password: &str) -> Result<Self, ApiError> {
        let token = self.customer_token(email, password).await?;
        Ok(self.with_credential(Credential::customer(token)))
    }
}
