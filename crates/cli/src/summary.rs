//! Condense test output into passing / pending / failing counts.
//!
//! libtest prints one `test result:` line per test binary; those are summed.
//! Scenarios that stopped on an environment gap log a line of the form
//! `scenario <name> skipped [<category>]: <reason>`, which is collected too,
//! so a green run that skipped half its scenarios does not look complete.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

/// Aggregate counts over every test binary in the output.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of `test result:` lines seen
    pub suites: u32,
    pub passing: u64,
    /// Ignored tests
    pub pending: u64,
    pub failing: u64,
    pub skipped_scenarios: Vec<SkippedScenario>,
}

/// A scenario that stopped on a gap instead of running to the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedScenario {
    pub scenario: String,
    pub category: String,
    pub reason: String,
}

impl Summary {
    /// Whether the output contained anything to summarize.
    pub fn is_empty(&self) -> bool {
        self.suites == 0 && self.skipped_scenarios.is_empty()
    }

    /// Skipped scenario counts keyed by gap category.
    pub fn skips_by_category(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for skip in &self.skipped_scenarios {
            *counts.entry(skip.category.as_str()).or_default() += 1;
        }
        counts
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== FINAL TEST SUMMARY ===")?;
        writeln!(f, "Passing: {}", self.passing)?;
        writeln!(f, "Pending: {}", self.pending)?;
        writeln!(f, "Failing: {}", self.failing)?;
        if !self.skipped_scenarios.is_empty() {
            let by_category = self
                .skips_by_category()
                .into_iter()
                .map(|(category, n)| format!("{category}: {n}"))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                f,
                "Skipped scenarios: {} ({by_category})",
                self.skipped_scenarios.len()
            )?;
            for skip in &self.skipped_scenarios {
                writeln!(
                    f,
                    "  {} [{}]: {}",
                    skip.scenario, skip.category, skip.reason
                )?;
            }
        }
        Ok(())
    }
}

/// Compiled patterns for the lines the summary is built from.
#[derive(Debug)]
pub struct SummaryParser {
    result_line: Regex,
    skip_line: Regex,
}

impl SummaryParser {
    /// # Errors
    ///
    /// Returns error if a pattern fails to compile.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            result_line: Regex::new(
                r"test result: \w+\. (\d+) passed; (\d+) failed; (\d+) ignored",
            )?,
            skip_line: Regex::new(r"scenario (\S+) skipped \[([^\]]+)\]: (.*)$")?,
        })
    }

    pub fn parse(&self, output: &str) -> Summary {
        let mut summary = Summary::default();
        for line in output.lines() {
            if let Some(caps) = self.result_line.captures(line) {
                summary.suites += 1;
                summary.passing += count(caps.get(1));
                summary.failing += count(caps.get(2));
                summary.pending += count(caps.get(3));
            } else if let Some(caps) = self.skip_line.captures(line) {
                summary.skipped_scenarios.push(SkippedScenario {
                    scenario: text(&caps, 1).to_string(),
                    category: text(&caps, 2).to_string(),
                    reason: text(&caps, 3).trim_end().to_string(),
                });
            }
        }
        summary
    }
}

fn count(m: Option<regex::Match<'_>>) -> u64 {
    m.and_then(|m| m.as_str().parse().ok()).unwrap_or(0)
}

fn text<'h>(caps: &regex::Captures<'h>, i: usize) -> &'h str {
    caps.get(i).map_or("", |m| m.as_str())
}

/// The JSON report written by `storeprobe run --report`.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub program: String,
    pub args: Vec<String>,
    pub exit_code: i32,
    #[serde(flatten)]
    pub summary: Summary,
}
