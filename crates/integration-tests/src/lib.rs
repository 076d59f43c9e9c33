//! End-to-end scenarios for a Magento-style commerce REST API.
//!
//! Each scenario is a short, linear script of named steps run against a live
//! platform: create the data it needs, exercise the API, assert on what comes
//! back, and optionally clean up. A [`ScenarioRunner`] records each step and
//! stops at the first one that does not pass.
//!
//! # Running Scenarios
//!
//! ```bash
//! # Against a live platform
//! MAGENTO_BASE_URL=https://shop.example.com \
//!     cargo test -p storeprobe-integration-tests --test live -- --ignored --nocapture
//!
//! # Or through the runner wrapper, which condenses the results
//! cargo run -p storeprobe-cli -- run
//! ```
//!
//! The remaining test files run the same scenarios against an in-process fake
//! platform and need no network.
//!
//! # Gaps
//!
//! Platforms under test are often partially configured: no shipping carrier,
//! no payment method, a third-party extension that rejects API carts. Such a
//! step ends in a [`Gap`] rather than a failure. Under
//! [`GapPolicy::Tolerate`](storeprobe_client::GapPolicy) the scenario is
//! reported as skipped with the gap's category; under `Strict` it fails.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod context;
pub mod scenario;
pub mod scenarios;

use std::sync::Once;

use storeprobe_client::RunSettings;
use tracing_subscriber::EnvFilter;

pub use context::{ContextError, TestContext};
pub use scenario::{
    Gap, Halted, Outcome, Prerequisite, ScenarioReport, ScenarioRunner, StepError, StepOutcome,
    StepRecord, cleanup_products, ensure, ensure_eq, expect_rejection, fan_out,
};

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per process with the default level.
///
/// `RUST_LOG` still overrides it.
pub fn init_tracing() {
    init_tracing_for(&RunSettings::default());
}

/// Install a test-writer subscriber once per process.
///
/// The filter comes from `RUST_LOG`, falling back to the configured
/// `LOG_LEVEL`. The first call in a process wins.
pub fn init_tracing_for(settings: &RunSettings) {
    TRACING.call_once(|| {
        let filter = log_filter(std::env::var("RUST_LOG").ok(), &settings.log_level);
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

fn log_filter(rust_log: Option<String>, log_level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(log_level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}
