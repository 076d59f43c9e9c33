//! The scenario scripts.
//!
//! Every scenario takes a [`TestContext`], runs to completion or to its first
//! non-passing step, and returns a [`ScenarioReport`]. None of them panics on
//! a platform failure; asserting on the report is up to the caller.

pub mod checkout;
pub mod customer;
pub mod guest;
pub mod product;

pub use checkout::registered_checkout;
pub use customer::customer_lifecycle;
pub use guest::guest_checkout;
pub use product::{product_batch, product_lifecycle};

use rust_decimal::Decimal;
use storeprobe_client::ApiClient;
use storeprobe_core::{PaymentInformation, PaymentMethod, Product, ShippingMethod};

use crate::context::TestContext;
use crate::scenario::{Prerequisite, ScenarioReport, StepError, ensure, ensure_eq};

/// Run every scenario in sequence.
pub async fn run_all(ctx: &TestContext) -> Vec<ScenarioReport> {
    vec![
        customer_lifecycle(ctx).await,
        product_lifecycle(ctx).await,
        product_batch(ctx).await,
        registered_checkout(ctx).await,
        guest_checkout(ctx).await,
    ]
}

async fn admin_login(ctx: &TestContext) -> Result<ApiClient, StepError> {
    Ok(ctx.admin().await?)
}

/// Create `product` and check the platform echoed it back.
async fn create_product(admin: &ApiClient, product: &Product) -> Result<Product, StepError> {
    let saved = admin.create_product(product).await?;
    ensure(saved.id.is_some(), || {
        format!("product {} was saved without an id", saved.sku)
    })?;
    ensure_eq("sku", &saved.sku, &product.sku)?;
    ensure_eq("name", saved.name.as_str(), product.name.as_str())?;
    ensure_eq("price", saved.price, product.price)?;
    Ok(saved)
}

/// The first available shipping rate.
fn choose_shipping(methods: Vec<ShippingMethod>) -> Result<ShippingMethod, StepError> {
    methods
        .into_iter()
        .find(|method| method.available.unwrap_or(true))
        .ok_or_else(|| Prerequisite::ShippingMethods.into())
}

/// Check / money order when offered, otherwise the first method.
fn choose_payment(methods: &[PaymentMethod]) -> Result<String, StepError> {
    methods
        .iter()
        .find(|method| method.code == PaymentInformation::CHECK_MONEY_ORDER)
        .or_else(|| methods.first())
        .map(|method| method.code.clone())
        .ok_or_else(|| Prerequisite::PaymentMethods.into())
}

fn ensure_positive(what: &str, value: Decimal) -> Result<(), StepError> {
    ensure(value > Decimal::ZERO, || {
        format!("{what}: expected a positive amount, got {value}")
    })
}
