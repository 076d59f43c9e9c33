//! Step recording, gap classification and the helpers scenarios are written with.

use core::fmt;
use std::fmt::Debug;
use std::future::Future;
use std::time::{Duration, Instant};

use futures::future::try_join_all;
use storeprobe_client::{ApiClient, ApiError, GapPolicy};
use storeprobe_core::Sku;
use storeprobe_fixtures::FixtureError;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::context::TestContext;

// ============================================================================
// Gaps
// ============================================================================

/// Environment prerequisites a scenario may find missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prerequisite {
    ShippingMethods,
    PaymentMethods,
    ProductIndexed,
    CleanupDisabled,
    DuplicateSkuAccepted,
    ProductNotRemovable,
}

impl fmt::Display for Prerequisite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ShippingMethods => "no shipping methods are configured for the address",
            Self::PaymentMethods => "no payment methods are available for the cart",
            Self::ProductIndexed => "product is not visible to reads yet (indexing lag)",
            Self::CleanupDisabled => "cleanup is disabled (set CLEANUP_TEST_DATA=true)",
            Self::DuplicateSkuAccepted => "platform accepted a duplicate SKU",
            Self::ProductNotRemovable => "platform refused to remove the product",
        };
        f.write_str(text)
    }
}

/// Something the platform under test lacks, as opposed to something it got wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gap {
    MissingConfig(Prerequisite),
    /// A third-party extension rejected the call.
    Vendor { message: String },
}

impl Gap {
    /// Error message fragments left by extensions known to interfere with
    /// API checkouts.
    pub const VENDOR_MARKERS: &'static [&'static str] = &[
        "setFinalPrice()",
        "module-cart-limitations",
        "Guest checkout is disabled",
    ];

    /// Classify an API error as a vendor gap.
    #[must_use]
    pub fn from_api_error(err: &ApiError) -> Option<Self> {
        Self::VENDOR_MARKERS
            .iter()
            .any(|marker| err.message_contains(marker))
            .then(|| Self::Vendor {
                message: err.message(),
            })
    }

    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::MissingConfig(_) => "missing-config",
            Self::Vendor { .. } => "vendor",
        }
    }

    /// Gaps tolerated even under [`GapPolicy::Strict`].
    #[must_use]
    pub const fn always_tolerated(&self) -> bool {
        matches!(self, Self::MissingConfig(Prerequisite::CleanupDisabled))
    }

    fn tolerated_under(&self, policy: GapPolicy) -> bool {
        policy == GapPolicy::Tolerate || self.always_tolerated()
    }
}

impl fmt::Display for Gap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingConfig(prerequisite) => write!(f, "{prerequisite}"),
            Self::Vendor { message } => write!(f, "third-party extension: {message}"),
        }
    }
}

// ============================================================================
// Step errors
// ============================================================================

/// Why a step did not pass.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Api(ApiError),
    #[error("assertion failed: {0}")]
    Assertion(String),
    #[error("{0}")]
    Gap(Gap),
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    #[error("{what} was accepted but should have been rejected")]
    UnexpectedSuccess { what: String },
}

impl From<ApiError> for StepError {
    fn from(err: ApiError) -> Self {
        match Gap::from_api_error(&err) {
            Some(gap) => Self::Gap(gap),
            None => Self::Api(err),
        }
    }
}

impl From<Gap> for StepError {
    fn from(gap: Gap) -> Self {
        Self::Gap(gap)
    }
}

impl From<Prerequisite> for StepError {
    fn from(prerequisite: Prerequisite) -> Self {
        Self::Gap(Gap::MissingConfig(prerequisite))
    }
}

/// Fail the step with `message` unless `condition` holds.
///
/// # Errors
///
/// Returns [`StepError::Assertion`] when `condition` is false.
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), StepError> {
    if condition {
        Ok(())
    } else {
        Err(StepError::Assertion(message()))
    }
}

/// # Errors
///
/// Returns [`StepError::Assertion`] naming `what` when the values differ.
pub fn ensure_eq<T: PartialEq + Debug>(what: &str, actual: T, expected: T) -> Result<(), StepError> {
    ensure(actual == expected, || {
        format!("{what}: expected {expected:?}, got {actual:?}")
    })
}

/// Expect `result` to be an HTTP rejection with one of `statuses`.
///
/// Returns the rejection so the caller can inspect its message.
///
/// # Errors
///
/// Returns [`StepError::UnexpectedSuccess`] if the call succeeded, a vendor
/// gap if an extension intervened, and an assertion failure for any other
/// status.
pub fn expect_rejection<T>(
    what: &str,
    result: Result<T, ApiError>,
    statuses: &[u16],
) -> Result<ApiError, StepError> {
    match result {
        Ok(_) => Err(StepError::UnexpectedSuccess {
            what: what.to_string(),
        }),
        Err(err) if err.is_status(statuses) => Ok(err),
        Err(err) => {
            if let Some(gap) = Gap::from_api_error(&err) {
                return Err(StepError::Gap(gap));
            }
            match err.status() {
                Some(status) => Err(StepError::Assertion(format!(
                    "{what}: expected status {statuses:?}, got {}: {}",
                    status.as_u16(),
                    err.message()
                ))),
                None => Err(StepError::Api(err)),
            }
        }
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Result of a single step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Passed,
    Skipped {
        category: Option<&'static str>,
        reason: String,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub name: &'static str,
    pub outcome: StepOutcome,
    pub elapsed: Duration,
}

/// Result of a whole scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Skipped {
        category: &'static str,
        reason: String,
    },
    Failed {
        step: &'static str,
        error: String,
    },
}

/// Returned by [`ScenarioRunner::step`] once the scenario has stopped.
///
/// The reason is already recorded in the runner; callers only propagate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Halted;

impl fmt::Display for Halted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scenario halted")
    }
}

impl std::error::Error for Halted {}

/// Runs a scenario's steps in order and records how each one ended.
///
/// The first step that fails, or ends in a gap, halts the scenario. Planned
/// steps that never ran are reported as skipped with the halting reason.
#[derive(Debug)]
pub struct ScenarioRunner {
    name: &'static str,
    policy: GapPolicy,
    plan: Vec<&'static str>,
    records: Vec<StepRecord>,
    halt: Option<Outcome>,
    soft_gap: Option<Outcome>,
}

impl ScenarioRunner {
    #[must_use]
    pub fn new(name: &'static str, policy: GapPolicy, plan: &[&'static str]) -> Self {
        Self {
            name,
            policy,
            plan: plan.to_vec(),
            records: Vec::with_capacity(plan.len()),
            halt: None,
            soft_gap: None,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Run one step. Any non-passing result halts the scenario.
    ///
    /// # Errors
    ///
    /// Returns [`Halted`] if this step did not pass or the scenario had
    /// already stopped.
    pub async fn step<T, F>(&mut self, name: &'static str, step: F) -> Result<T, Halted>
    where
        F: Future<Output = Result<T, StepError>>,
    {
        if self.halt.is_some() {
            return Err(Halted);
        }
        let started = Instant::now();
        let result = step.await;
        let elapsed = started.elapsed();
        match result {
            Ok(value) => {
                self.pass(name, elapsed);
                Ok(value)
            }
            Err(StepError::Gap(gap)) if gap.tolerated_under(self.policy) => {
                let outcome = self.skip(name, &gap, elapsed);
                self.halt = Some(outcome);
                Err(Halted)
            }
            Err(err) => {
                self.fail(name, &err, elapsed);
                Err(Halted)
            }
        }
    }

    /// Run a check whose gap does not affect later steps.
    ///
    /// A tolerated gap is recorded as a skipped step and the scenario goes
    /// on; it is still reported as skipped at the end. Failures halt as in
    /// [`ScenarioRunner::step`].
    ///
    /// # Errors
    ///
    /// Returns [`Halted`] if the check failed or the scenario had already
    /// stopped.
    pub async fn probe<T, F>(&mut self, name: &'static str, check: F) -> Result<Option<T>, Halted>
    where
        F: Future<Output = Result<T, StepError>>,
    {
        if self.halt.is_some() {
            return Err(Halted);
        }
        let started = Instant::now();
        let result = check.await;
        let elapsed = started.elapsed();
        match result {
            Ok(value) => {
                self.pass(name, elapsed);
                Ok(Some(value))
            }
            Err(StepError::Gap(gap)) if gap.tolerated_under(self.policy) => {
                let outcome = self.skip(name, &gap, elapsed);
                self.soft_gap.get_or_insert(outcome);
                Ok(None)
            }
            Err(err) => {
                self.fail(name, &err, elapsed);
                Err(Halted)
            }
        }
    }

    fn pass(&mut self, name: &'static str, elapsed: Duration) {
        debug!(
            scenario = self.name,
            step = name,
            elapsed_ms = elapsed.as_millis(),
            "step passed"
        );
        self.records.push(StepRecord {
            name,
            outcome: StepOutcome::Passed,
            elapsed,
        });
    }

    fn skip(&mut self, name: &'static str, gap: &Gap, elapsed: Duration) -> Outcome {
        warn!(
            scenario = self.name,
            step = name,
            category = gap.category(),
            "step {name} hit a gap: {gap}"
        );
        self.records.push(StepRecord {
            name,
            outcome: StepOutcome::Skipped {
                category: Some(gap.category()),
                reason: gap.to_string(),
            },
            elapsed,
        });
        Outcome::Skipped {
            category: gap.category(),
            reason: gap.to_string(),
        }
    }

    fn fail(&mut self, name: &'static str, err: &StepError, elapsed: Duration) {
        let error = match err {
            StepError::Gap(gap) => format!("gap not tolerated [{}]: {gap}", gap.category()),
            other => other.to_string(),
        };
        error!(scenario = self.name, step = name, "step {name} failed: {error}");
        self.records.push(StepRecord {
            name,
            outcome: StepOutcome::Failed {
                error: error.clone(),
            },
            elapsed,
        });
        self.halt = Some(Outcome::Failed { step: name, error });
    }

    /// Close the scenario and log its result line.
    #[must_use]
    pub fn finish(mut self) -> ScenarioReport {
        let outcome = self
            .halt
            .take()
            .or_else(|| self.soft_gap.take())
            .unwrap_or(Outcome::Passed);

        let reason = match &outcome {
            Outcome::Passed => None,
            Outcome::Skipped { reason, .. } => Some(reason.clone()),
            Outcome::Failed { step, .. } => Some(format!("halted at step {step}")),
        };
        if let Some(reason) = reason {
            let unreached: Vec<&'static str> = self
                .plan
                .iter()
                .copied()
                .filter(|planned| !self.records.iter().any(|r| r.name == *planned))
                .collect();
            for name in unreached {
                self.records.push(StepRecord {
                    name,
                    outcome: StepOutcome::Skipped {
                        category: None,
                        reason: reason.clone(),
                    },
                    elapsed: Duration::ZERO,
                });
            }
        }

        let name = self.name;
        match &outcome {
            Outcome::Passed => info!("scenario {name} passed ({} steps)", self.records.len()),
            Outcome::Skipped { category, reason } => {
                warn!("scenario {name} skipped [{category}]: {reason}");
            }
            Outcome::Failed { step, error } => {
                error!("scenario {name} failed at step {step}: {error}");
            }
        }

        ScenarioReport {
            name,
            steps: self.records,
            outcome,
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// What a scenario did, step by step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    pub name: &'static str,
    pub steps: Vec<StepRecord>,
    pub outcome: Outcome,
}

impl ScenarioReport {
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self.outcome, Outcome::Passed)
    }

    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self.outcome, Outcome::Skipped { .. })
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }

    /// The record of step `name`, if it was planned or ran.
    #[must_use]
    pub fn step(&self, name: &str) -> Option<&StepRecord> {
        self.steps.iter().find(|r| r.name == name)
    }

    /// # Panics
    ///
    /// Panics with the full report if the scenario failed.
    pub fn assert_not_failed(&self) {
        assert!(!self.is_failed(), "{self}");
    }

    /// # Panics
    ///
    /// Panics with the full report unless every step passed.
    pub fn assert_passed(&self) {
        assert!(self.is_passed(), "{self}");
    }
}

impl fmt::Display for ScenarioReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Passed => writeln!(f, "scenario {} passed", self.name)?,
            Outcome::Skipped { category, reason } => {
                writeln!(f, "scenario {} skipped [{category}]: {reason}", self.name)?;
            }
            Outcome::Failed { step, error } => {
                writeln!(f, "scenario {} failed at step {step}: {error}", self.name)?;
            }
        }
        for record in &self.steps {
            match &record.outcome {
                StepOutcome::Passed => writeln!(
                    f,
                    "  [pass] {} ({}ms)",
                    record.name,
                    record.elapsed.as_millis()
                )?,
                StepOutcome::Skipped { reason, .. } => {
                    writeln!(f, "  [skip] {}: {reason}", record.name)?;
                }
                StepOutcome::Failed { error } => writeln!(f, "  [FAIL] {}: {error}", record.name)?,
            }
        }
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Run independent operations concurrently; all succeed or the first error wins.
///
/// # Errors
///
/// Returns the first error any of the operations produced.
pub async fn fan_out<I, F, T, E>(operations: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    try_join_all(operations).await
}

/// Delete products created by a scenario, when cleanup is enabled.
///
/// Failures never propagate: a product already gone is fine, anything else
/// is logged.
pub async fn cleanup_products(ctx: &TestContext, admin: &ApiClient, skus: &[Sku]) {
    if skus.is_empty() {
        return;
    }
    if !ctx.cleanup_enabled() {
        debug!(count = skus.len(), "cleanup disabled, leaving test products");
        return;
    }
    for sku in skus {
        match admin.delete_product(sku).await {
            Ok(_) => debug!(sku = %sku, "removed test product"),
            Err(err) if err.is_not_found() => {}
            Err(err) => warn!(sku = %sku, error = %err, "failed to remove test product"),
        }
    }
}
