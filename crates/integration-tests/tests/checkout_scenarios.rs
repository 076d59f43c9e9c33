//! Checkout scenarios against the in-process platform.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

mod support;

use storeprobe_client::{CartItemShape, GapPolicy};
use storeprobe_integration_tests::scenarios::{guest_checkout, registered_checkout, run_all};
use storeprobe_integration_tests::{Outcome, StepOutcome};
use support::{FakePlatform, Knobs};

fn knobs(adjust: impl FnOnce(&mut Knobs)) -> Knobs {
    let mut knobs = Knobs::default();
    adjust(&mut knobs);
    knobs
}

// ============================================================================
// Registered customer
// ============================================================================

#[tokio::test]
async fn test_registered_checkout_places_order() {
    let platform = FakePlatform::start().await;
    let report = registered_checkout(&platform.context()).await;

    report.assert_passed();
    let orders = platform.orders();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order["items"][0]["qty_ordered"], 3.0);
    assert_eq!(order["items"][0]["price"], 25.99);
    assert_eq!(order["customer_is_guest"], false);
    assert_eq!(platform.product_count(), 0);
}

#[tokio::test]
async fn test_wrong_ordered_quantity_fails() {
    let platform = FakePlatform::with_knobs(knobs(|k| k.order_qty_drift = 1.0)).await;
    let report = registered_checkout(&platform.context()).await;

    match &report.outcome {
        Outcome::Failed { step, error } => {
            assert_eq!(*step, "verify order items");
            assert!(error.contains("qty_ordered"), "{error}");
        }
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(
        report.step("read order").unwrap().outcome,
        StepOutcome::Passed
    );
    assert_eq!(platform.orders().len(), 1);
    assert_eq!(platform.product_count(), 0);
}

#[tokio::test]
async fn test_missing_shipping_is_skipped_and_cleaned_up() {
    let platform = FakePlatform::with_knobs(knobs(|k| k.no_shipping = true)).await;
    let report = registered_checkout(&platform.context()).await;

    assert_eq!(
        report.outcome,
        Outcome::Skipped {
            category: "missing-config",
            reason: "no shipping methods are configured for the address".into(),
        }
    );
    assert!(matches!(
        report.step("place order").unwrap().outcome,
        StepOutcome::Skipped { category: None, .. }
    ));
    assert!(platform.orders().is_empty());
    assert_eq!(platform.product_count(), 0);
}

#[tokio::test]
async fn test_missing_shipping_fails_under_strict_policy() {
    let platform = FakePlatform::with_knobs(knobs(|k| k.no_shipping = true)).await;
    let ctx = platform.context_with(|config| config.run.gap_policy = GapPolicy::Strict);
    let report = registered_checkout(&ctx).await;

    assert!(matches!(
        report.outcome,
        Outcome::Failed {
            step: "estimate shipping",
            ..
        }
    ));
}

#[tokio::test]
async fn test_missing_payment_methods_are_a_gap() {
    let platform = FakePlatform::with_knobs(knobs(|k| k.no_payment = true)).await;
    let report = registered_checkout(&platform.context()).await;

    assert!(report.is_skipped(), "{report}");
    assert!(matches!(
        report.step("list payment methods").unwrap().outcome,
        StepOutcome::Skipped {
            category: Some("missing-config"),
            ..
        }
    ));
}

#[tokio::test]
async fn test_vendor_extension_error_is_a_vendor_gap() {
    let platform = FakePlatform::with_knobs(knobs(|k| {
        k.cart_error =
            Some("Error: Call to a member function setFinalPrice() on null".to_string());
    }))
    .await;
    let report = registered_checkout(&platform.context()).await;

    assert!(matches!(
        report.outcome,
        Outcome::Skipped {
            category: "vendor",
            ..
        }
    ));
    assert!(report.to_string().contains("setFinalPrice()"));
}

#[tokio::test]
async fn test_catalog_lag_is_a_gap_before_the_customer_is_created() {
    let platform = FakePlatform::with_knobs(knobs(|k| k.catalog_lag = true)).await;
    let report = registered_checkout(&platform.context()).await;

    assert!(report.is_skipped(), "{report}");
    assert_eq!(platform.customer_count(), 0);
}

// ============================================================================
// Cart item payload shape
// ============================================================================

#[tokio::test]
async fn test_bare_items_fail_where_quote_id_is_required() {
    let platform = FakePlatform::with_knobs(knobs(|k| k.require_quote_id = true)).await;
    let report = registered_checkout(&platform.context()).await;

    assert!(matches!(
        report.outcome,
        Outcome::Failed {
            step: "add item",
            ..
        }
    ));
    assert!(platform.cart_payloads()[0]["cartItem"].get("quote_id").is_none());
}

#[tokio::test]
async fn test_quote_id_shape_satisfies_strict_platforms() {
    let platform = FakePlatform::with_knobs(knobs(|k| k.require_quote_id = true)).await;
    let ctx = platform.context_with(|config| config.run.cart_item_shape = CartItemShape::WithQuoteId);
    let report = registered_checkout(&ctx).await;

    report.assert_passed();
    let payload = &platform.cart_payloads()[0]["cartItem"];
    assert!(payload["quote_id"].is_string());
}

// ============================================================================
// Guest
// ============================================================================

#[tokio::test]
async fn test_guest_checkout_places_order() {
    let platform = FakePlatform::start().await;
    let report = guest_checkout(&platform.context()).await;

    report.assert_passed();
    let orders = platform.orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["customer_is_guest"], true);
    assert!(orders[0]["customer_email"].as_str().unwrap().contains('@'));
}

#[tokio::test]
async fn test_disabled_guest_checkout_is_a_vendor_gap() {
    let platform =
        FakePlatform::with_knobs(knobs(|k| k.guest_checkout_disabled = true)).await;
    let report = guest_checkout(&platform.context()).await;

    assert!(matches!(
        report.outcome,
        Outcome::Skipped {
            category: "vendor",
            ..
        }
    ));
    assert_eq!(platform.product_count(), 0);
}

// ============================================================================
// Whole suite
// ============================================================================

#[tokio::test]
async fn test_every_scenario_passes_on_a_complete_platform() {
    let platform = FakePlatform::start().await;
    let reports = run_all(&platform.context()).await;

    assert_eq!(reports.len(), 5);
    for report in &reports {
        report.assert_passed();
    }
    assert_eq!(platform.product_count(), 0);
}
