//! Catalog management through the admin API.

use std::collections::HashSet;

use rust_decimal::Decimal;
use storeprobe_client::{ApiClient, ProductPatch, SearchCriteria};
use storeprobe_core::{Product, ProductStatus, ProductType, Sku};
use storeprobe_fixtures::{FixtureError, ProductFixture, invalid};
use tracing::debug;

use super::{admin_login, create_product};
use crate::context::TestContext;
use crate::scenario::{
    Halted, Prerequisite, ScenarioReport, ScenarioRunner, StepError, cleanup_products, ensure,
    ensure_eq, expect_rejection, fan_out,
};

const LIFECYCLE_PLAN: &[&str] = &[
    "log in as admin",
    "create simple product",
    "reject duplicate sku",
    "create virtual product",
    "reject invalid product",
    "get product by sku",
    "search products by name",
    "reject unknown sku",
    "update price",
    "update stock",
    "disable product",
    "delete product",
    "verify deletion",
];

const BATCH_PLAN: &[&str] = &[
    "log in as admin",
    "create products concurrently",
    "verify distinct ids",
];

const BATCH_SIZE: usize = 3;
const UNKNOWN_SKU: &str = "NONEXISTENT-SKU-000000";
const DUPLICATE_MARKERS: &[&str] = &["already exists", "duplicate", "unique"];

/// Create, read, search, update and delete a product.
pub async fn product_lifecycle(ctx: &TestContext) -> ScenarioReport {
    let mut runner = ctx.runner("product_lifecycle", LIFECYCLE_PLAN);
    let mut created = Vec::new();
    if let Ok(admin) = runner.step("log in as admin", admin_login(ctx)).await {
        let _ = lifecycle(ctx, &admin, &mut runner, &mut created).await;
        cleanup_products(ctx, &admin, &created).await;
    }
    runner.finish()
}

async fn lifecycle(
    ctx: &TestContext,
    admin: &ApiClient,
    runner: &mut ScenarioRunner,
    created: &mut Vec<Sku>,
) -> Result<(), Halted> {
    let simple = runner
        .step("create simple product", async {
            let product = ProductFixture::simple().build_random()?;
            let saved = create_product(admin, &product).await?;
            created.push(saved.sku.clone());
            ensure_eq("type", &saved.type_id, &ProductType::Simple)?;
            Ok::<_, StepError>(saved)
        })
        .await?;
    let sku = simple.sku.clone();

    // Same name and price, so a platform that upserts leaves the product as it was.
    runner
        .probe("reject duplicate sku", async {
            ctx.settle().await;
            let duplicate = ProductFixture::simple()
                .sku(sku.clone())
                .name(simple.name.clone())
                .price(simple.price)
                .build_random()?;
            match admin.create_product(&duplicate).await {
                Ok(_) => Err(Prerequisite::DuplicateSkuAccepted.into()),
                Err(err) => {
                    let err = expect_rejection("duplicate sku", Err::<(), _>(err), &[400, 422])?;
                    ensure(
                        DUPLICATE_MARKERS.iter().any(|m| err.message_contains(m)),
                        || format!("unexpected message: {}", err.message()),
                    )
                }
            }
        })
        .await?;

    runner
        .step("create virtual product", async {
            let product = ProductFixture::virtual_product().build_random()?;
            let saved = create_product(admin, &product).await?;
            created.push(saved.sku.clone());
            ensure_eq("type", &saved.type_id, &ProductType::Virtual)?;
            ensure(saved.weight.is_none(), || {
                format!("virtual product has weight {:?}", saved.weight)
            })
        })
        .await?;

    runner
        .step("reject invalid product", async {
            expect_rejection(
                "product without sku",
                admin.create_product_raw(&invalid::product()).await,
                &[400, 500],
            )?;
            Ok::<_, StepError>(())
        })
        .await?;

    runner
        .step("get product by sku", async {
            let fetched = fetch_indexed(admin, &sku).await?;
            ensure_eq("sku", &fetched.sku, &sku)?;
            ensure_eq("name", fetched.name.as_str(), simple.name.as_str())?;
            ensure_eq("price", fetched.price, simple.price)?;
            ensure_eq("status", fetched.status, ProductStatus::Enabled)
        })
        .await?;

    runner
        .step("search products by name", async {
            ctx.settle().await;
            let criteria = SearchCriteria::like("name", format!("%{}%", simple.name));
            let results = admin.search_products(&criteria).await?;
            debug!(total = results.total_count, "search results");
            if results.total_count == 0 {
                return Err(Prerequisite::ProductIndexed.into());
            }
            ensure(
                results.items.is_empty()
                    || results.items.iter().all(|p| p.name.contains(&simple.name)),
                || "search returned products not matching the name".into(),
            )
        })
        .await?;

    runner
        .step("reject unknown sku", async {
            let unknown = Sku::parse(UNKNOWN_SKU).map_err(FixtureError::from)?;
            expect_rejection("unknown sku", admin.product(&unknown).await, &[404])?;
            Ok::<_, StepError>(())
        })
        .await?;

    runner
        .step("update price", async {
            let price = Decimal::new(9999, 2);
            let updated = admin
                .update_product(&sku, &ProductPatch::price(price))
                .await?;
            ensure_eq("price", updated.price, price)
        })
        .await?;

    runner
        .step("update stock", async {
            let qty = Decimal::from(50);
            let updated = admin
                .update_product(&sku, &ProductPatch::stock(qty))
                .await?;
            ensure_eq(
                "stock qty",
                updated.stock_item().map(|stock| stock.qty),
                Some(qty),
            )
        })
        .await?;

    runner
        .step("disable product", async {
            let updated = admin
                .update_product(&sku, &ProductPatch::status(ProductStatus::Disabled))
                .await?;
            ensure_eq("status", updated.status, ProductStatus::Disabled)
        })
        .await?;

    runner
        .step("delete product", async {
            if !ctx.cleanup_enabled() {
                return Err(Prerequisite::CleanupDisabled.into());
            }
            match admin.delete_product(&sku).await {
                Ok(deleted) => ensure(deleted, || format!("delete of {sku} answered false")),
                Err(err) if err.is_not_found() => Ok(()),
                Err(err) if err.message_contains("couldn't be removed") => {
                    Err(Prerequisite::ProductNotRemovable.into())
                }
                Err(err) => Err(err.into()),
            }
        })
        .await?;

    runner
        .step("verify deletion", async {
            ctx.settle().await;
            expect_rejection("read of deleted product", admin.product(&sku).await, &[404])?;
            Ok::<_, StepError>(())
        })
        .await?;

    Ok(())
}

/// Read a freshly written product; a 404 means the catalog has not caught up.
async fn fetch_indexed(admin: &ApiClient, sku: &Sku) -> Result<Product, StepError> {
    match admin.product(sku).await {
        Ok(product) => Ok(product),
        Err(err) if err.is_not_found() => Err(Prerequisite::ProductIndexed.into()),
        Err(err) => Err(err.into()),
    }
}

/// Create several products at once and check they got distinct ids.
pub async fn product_batch(ctx: &TestContext) -> ScenarioReport {
    let mut runner = ctx.runner("product_batch", BATCH_PLAN);
    let mut created = Vec::new();
    if let Ok(admin) = runner.step("log in as admin", admin_login(ctx)).await {
        let _ = batch(&admin, &mut runner, &mut created).await;
        cleanup_products(ctx, &admin, &created).await;
    }
    runner.finish()
}

async fn batch(
    admin: &ApiClient,
    runner: &mut ScenarioRunner,
    created: &mut Vec<Sku>,
) -> Result<(), Halted> {
    let saved = runner
        .step("create products concurrently", async {
            let products = (0..BATCH_SIZE)
                .map(|_| ProductFixture::simple().build_random())
                .collect::<Result<Vec<_>, _>>()?;
            // Any of them may exist even if the join failed.
            created.extend(products.iter().map(|p| p.sku.clone()));
            let saved = fan_out(products.iter().map(|p| create_product(admin, p))).await?;
            Ok::<_, StepError>(saved)
        })
        .await?;

    runner
        .step("verify distinct ids", async {
            let ids: HashSet<_> = saved.iter().filter_map(|p| p.id).collect();
            ensure_eq("distinct product ids", ids.len(), BATCH_SIZE)
        })
        .await?;

    Ok(())
}
