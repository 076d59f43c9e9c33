//! Run the suite and report on it.
//!
//! The configuration is loaded before anything is spawned, so a missing
//! `MAGENTO_BASE_URL` fails fast instead of failing every scenario.

use std::path::Path;

use chrono::Utc;
use storeprobe_client::HarnessConfig;
use tracing::{info, warn};

use crate::runner::{RunnerError, TestRunner};
use crate::summary::{RunReport, SummaryParser};

/// Spawn the test process and return its exit code.
///
/// # Errors
///
/// Returns error if the configuration is invalid, the process cannot be run,
/// or the report cannot be written. A failing test run is not an error; its
/// exit code is returned as is.
pub async fn execute(
    program: String,
    args: Vec<String>,
    report_path: Option<&Path>,
) -> Result<i32, Box<dyn std::error::Error>> {
    let config = HarnessConfig::from_env()?;
    info!(
        base_url = %config.platform.base_url,
        store_code = %config.platform.store_code,
        gap_policy = %config.run.gap_policy,
        cleanup = config.run.cleanup_test_data,
        "configuration loaded"
    );

    let parser = SummaryParser::new().map_err(RunnerError::from)?;
    let runner = TestRunner::new(program, args);

    let started_at = Utc::now();
    let run = runner.execute().await?;
    let finished_at = Utc::now();

    let summary = parser.parse(&run.output);
    if summary.is_empty() {
        warn!("no test summary found in output");
    } else {
        print_summary(&summary);
    }

    if let Some(path) = report_path {
        let report = RunReport {
            started_at,
            finished_at,
            program: runner.program().to_string(),
            args: runner.args().to_vec(),
            exit_code: run.exit_code,
            summary,
        };
        let json = serde_json::to_string_pretty(&report).map_err(RunnerError::from)?;
        tokio::fs::write(path, json)
            .await
            .map_err(RunnerError::from)?;
        info!(path = %path.display(), "report written");
    }

    Ok(run.exit_code)
}

#[allow(clippy::print_stdout)]
fn print_summary(summary: &crate::summary::Summary) {
    println!("\n\n{summary}");
}
