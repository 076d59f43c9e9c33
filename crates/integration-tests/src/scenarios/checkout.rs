//! Registered customer checkout, from product creation to the admin's view of the order.

use rust_decimal::Decimal;
use storeprobe_client::{ApiClient, CartTarget, NewCartItem};
use storeprobe_core::{
    CheckoutAddress, PaymentInformation, ProductStatus, ShippingInformation, Sku,
};
use storeprobe_fixtures::{AddressFixture, CustomerFixture, ProductFixture};
use tracing::{debug, info};

use super::{admin_login, choose_payment, choose_shipping, create_product, ensure_positive};
use crate::context::TestContext;
use crate::scenario::{
    Halted, Prerequisite, ScenarioReport, ScenarioRunner, StepError, cleanup_products, ensure,
    ensure_eq,
};

const PLAN: &[&str] = &[
    "log in as admin",
    "create product",
    "verify product",
    "register customer",
    "log in customer",
    "create cart",
    "add item",
    "read cart",
    "update quantity",
    "set billing address",
    "estimate shipping",
    "set shipping information",
    "list payment methods",
    "place order",
    "read order",
    "verify order items",
];

const STOCK_QTY: i64 = 1000;
const INITIAL_QTY: i64 = 2;
const UPDATED_QTY: i64 = 3;

fn product_price() -> Decimal {
    Decimal::new(2599, 2)
}

/// Buy a product as a freshly registered customer.
pub async fn registered_checkout(ctx: &TestContext) -> ScenarioReport {
    let mut runner = ctx.runner("registered_checkout", PLAN);
    let mut created = Vec::new();
    if let Ok(admin) = runner.step("log in as admin", admin_login(ctx)).await {
        let _ = checkout(ctx, &admin, &mut runner, &mut created).await;
        cleanup_products(ctx, &admin, &created).await;
    }
    runner.finish()
}

#[allow(clippy::too_many_lines)]
async fn checkout(
    ctx: &TestContext,
    admin: &ApiClient,
    runner: &mut ScenarioRunner,
    created: &mut Vec<Sku>,
) -> Result<(), Halted> {
    let product = runner
        .step("create product", async {
            let product = ProductFixture::simple()
                .price(product_price())
                .stock_qty(STOCK_QTY)
                .build_random()?;
            let saved = create_product(admin, &product).await?;
            created.push(saved.sku.clone());
            Ok::<_, StepError>(saved)
        })
        .await?;
    let sku = product.sku.clone();

    runner
        .step("verify product", async {
            ctx.settle().await;
            let fetched = match admin.product(&sku).await {
                Ok(fetched) => fetched,
                Err(err) if err.is_not_found() => return Err(Prerequisite::ProductIndexed.into()),
                Err(err) => return Err(err.into()),
            };
            ensure_eq("status", fetched.status, ProductStatus::Enabled)?;
            let stock = fetched.stock_item();
            ensure(stock.is_some_and(|s| s.is_in_stock), || {
                format!("product {sku} is not in stock")
            })?;
            ensure_eq(
                "stock qty",
                stock.map(|s| s.qty),
                Some(Decimal::from(STOCK_QTY)),
            )
        })
        .await?;

    let (registration, customer) = runner
        .step("register customer", async {
            let registration = CustomerFixture::new().with_address().build_random()?;
            let customer = ctx.client.register_customer(&registration).await?;
            Ok::<_, StepError>((registration, customer))
        })
        .await?;
    let email = registration.customer.email.clone();

    let shopper = runner
        .step("log in customer", async {
            Ok::<_, StepError>(
                ctx.client
                    .customer_login(email.as_str(), &registration.password)
                    .await?,
            )
        })
        .await?;

    let cart_id = runner
        .step("create cart", async {
            let cart_id = shopper.create_cart().await?;
            ensure(cart_id.as_i64() > 0, || format!("invalid cart id {cart_id}"))?;
            Ok::<_, StepError>(cart_id)
        })
        .await?;
    let target = CartTarget::Mine(cart_id);

    runner
        .step("add item", async {
            let item = shopper
                .add_cart_item(&target, &NewCartItem::new(sku.clone(), INITIAL_QTY))
                .await?;
            ensure_eq("item sku", &item.sku, &sku)?;
            ensure_eq("item qty", item.qty, Decimal::from(INITIAL_QTY))?;
            if let Some(price) = item.price {
                ensure_eq("item price", price, product.price)?;
            }
            Ok::<_, StepError>(())
        })
        .await?;

    let item_id = runner
        .step("read cart", async {
            let cart = shopper.cart().await?;
            ensure_eq("cart id", cart.id, cart_id)?;
            ensure_eq("cart lines", cart.items.len(), 1)?;
            ensure_eq("items_qty", cart.items_qty, Decimal::from(INITIAL_QTY))?;
            let line = cart
                .items
                .iter()
                .find(|line| line.sku == sku)
                .ok_or_else(|| StepError::Assertion(format!("{sku} missing from cart")))?;
            Ok::<_, StepError>(line.item_id)
        })
        .await?;

    runner
        .step("update quantity", async {
            let updated = shopper
                .update_cart_item(&target, item_id, Decimal::from(UPDATED_QTY))
                .await?;
            ensure_eq("item qty", updated.qty, Decimal::from(UPDATED_QTY))
        })
        .await?;

    let address = customer.addresses.first().map_or_else(
        || {
            AddressFixture::new()
                .name(&customer.firstname, &customer.lastname)
                .build_random()
        },
        Clone::clone,
    );
    let address = CheckoutAddress::from(&address).with_email(email.clone());

    runner
        .step("set billing address", async {
            let id = shopper.set_billing_address(&target, &address).await?;
            debug!(address_id = %id, "billing address set");
            Ok::<_, StepError>(())
        })
        .await?;

    let method = runner
        .step("estimate shipping", async {
            let methods = shopper.estimate_shipping_methods(&target, &address).await?;
            choose_shipping(methods)
        })
        .await?;

    runner
        .step("set shipping information", async {
            let information = ShippingInformation::new(address.clone(), &method);
            let result = shopper
                .set_shipping_information(&target, &information)
                .await?;
            debug!(
                grand_total = %result.totals.grand_total,
                payment_methods = result.payment_methods.len(),
                "shipping information accepted"
            );
            Ok::<_, StepError>(())
        })
        .await?;

    let payment_code = runner
        .step("list payment methods", async {
            let methods = shopper.payment_methods(&target).await?;
            choose_payment(&methods)
        })
        .await?;

    let order_id = runner
        .step("place order", async {
            let payment = PaymentInformation::method(payment_code.as_str());
            let order_id = shopper.place_order(&target, &payment).await?;
            ensure(order_id.as_i64() > 0, || format!("invalid order id {order_id}"))?;
            info!(order_id = %order_id, "order placed");
            Ok::<_, StepError>(order_id)
        })
        .await?;

    let order = runner
        .step("read order", async {
            let order = admin.order(order_id).await?;
            ensure_eq("entity_id", order.entity_id, order_id)?;
            ensure(
                order
                    .customer_email
                    .as_deref()
                    .is_some_and(|e| email.matches(e)),
                || format!("order email {:?} is not {email}", order.customer_email),
            )?;
            ensure_eq(
                "customer_firstname",
                order.customer_firstname.as_deref(),
                Some(customer.firstname.as_str()),
            )?;
            ensure_eq(
                "customer_lastname",
                order.customer_lastname.as_deref(),
                Some(customer.lastname.as_str()),
            )?;
            ensure(order.state.is_freshly_placed(), || {
                format!("unexpected order state {:?}", order.state)
            })?;
            ensure_positive("grand_total", order.grand_total)?;
            Ok::<_, StepError>(order)
        })
        .await?;

    runner
        .step("verify order items", async {
            let line = order
                .item(&sku)
                .ok_or_else(|| StepError::Assertion(format!("{sku} missing from order")))?;
            ensure_eq("qty_ordered", line.qty_ordered, Decimal::from(UPDATED_QTY))?;
            ensure_eq("line price", line.price, product.price)
        })
        .await?;

    Ok(())
}
