//! Payloads the platform must reject.
//!
//! These bypass the typed records on purpose: the typed records cannot hold
//! an empty email or a product without a SKU.

use serde_json::{Value, json};

/// Registration with every field blank.
#[must_use]
pub fn customer_registration() -> Value {
    json!({
        "customer": {
            "email": "",
            "firstname": "",
            "lastname": "",
        },
        "password": "",
    })
}

/// Product carrying only a name (no SKU, attribute set, or price).
#[must_use]
pub fn product() -> Value {
    json!({
        "product": {
            "name": "Test Product",
        },
    })
}
