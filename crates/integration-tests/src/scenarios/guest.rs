//! Guest checkout: no account, a masked cart id and an email on the payment.

use storeprobe_client::{ApiClient, CartTarget, NewCartItem};
use storeprobe_core::{CheckoutAddress, PaymentInformation, ShippingInformation, Sku};
use storeprobe_fixtures::{AddressFixture, CustomerFixture, ProductFixture};
use tracing::info;

use super::{admin_login, choose_shipping, create_product};
use crate::context::TestContext;
use crate::scenario::{
    Halted, ScenarioReport, ScenarioRunner, StepError, cleanup_products, ensure, ensure_eq,
};

const PLAN: &[&str] = &[
    "log in as admin",
    "create product",
    "create guest cart",
    "add item",
    "set billing address",
    "estimate shipping",
    "set shipping information",
    "place order",
];

/// Buy a product without an account.
pub async fn guest_checkout(ctx: &TestContext) -> ScenarioReport {
    let mut runner = ctx.runner("guest_checkout", PLAN);
    let mut created = Vec::new();
    if let Ok(admin) = runner.step("log in as admin", admin_login(ctx)).await {
        let _ = checkout(ctx, &admin, &mut runner, &mut created).await;
        cleanup_products(ctx, &admin, &created).await;
    }
    runner.finish()
}

async fn checkout(
    ctx: &TestContext,
    admin: &ApiClient,
    runner: &mut ScenarioRunner,
    created: &mut Vec<Sku>,
) -> Result<(), Halted> {
    let guest = &ctx.client;

    let sku = runner
        .step("create product", async {
            let product = ProductFixture::simple().build_random()?;
            let saved = create_product(admin, &product).await?;
            created.push(saved.sku.clone());
            ctx.settle().await;
            Ok::<_, StepError>(saved.sku)
        })
        .await?;

    let target = runner
        .step("create guest cart", async {
            let cart_id = guest.create_guest_cart().await?;
            ensure(!cart_id.as_str().trim().is_empty(), || {
                "guest cart id is empty".into()
            })?;
            Ok::<_, StepError>(CartTarget::Guest(cart_id))
        })
        .await?;

    runner
        .step("add item", async {
            let item = guest
                .add_cart_item(&target, &NewCartItem::new(sku.clone(), 1))
                .await?;
            ensure_eq("item sku", &item.sku, &sku)
        })
        .await?;

    let (address, email) = runner
        .step("set billing address", async {
            let email = CustomerFixture::new().build_random()?.customer.email;
            let address = AddressFixture::new().build_random();
            let address = CheckoutAddress::from(&address).with_email(email.clone());
            guest.set_billing_address(&target, &address).await?;
            Ok::<_, StepError>((address, email))
        })
        .await?;

    let method = runner
        .step("estimate shipping", async {
            let methods = guest.estimate_shipping_methods(&target, &address).await?;
            choose_shipping(methods)
        })
        .await?;

    runner
        .step("set shipping information", async {
            let information = ShippingInformation::new(address.clone(), &method);
            guest.set_shipping_information(&target, &information).await?;
            Ok::<_, StepError>(())
        })
        .await?;

    runner
        .step("place order", async {
            let payment = PaymentInformation::method(PaymentInformation::CHECK_MONEY_ORDER)
                .with_email(email.clone());
            let order_id = guest.place_order(&target, &payment).await?;
            ensure(order_id.as_i64() > 0, || format!("invalid order id {order_id}"))?;
            info!(order_id = %order_id, "guest order placed");
            Ok::<_, StepError>(())
        })
        .await?;

    Ok(())
}
