//! Spawn the test process and mirror its output while capturing it.

use std::io;
use std::process::Stdio;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, info};

/// Arguments used when `cargo` is spawned without any.
pub const DEFAULT_CARGO_ARGS: &[&str] = &[
    "test",
    "-p",
    "storeprobe-integration-tests",
    "--test",
    "live",
    "--",
    "--ignored",
    "--nocapture",
    "--test-threads=1",
];

/// Exit code reported when the child was killed by a signal.
const SIGNALED_EXIT_CODE: i32 = 1;

/// Errors that can occur while running the test process.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("child {0} was not captured")]
    Pipe(&'static str),

    #[error("I/O error while mirroring output: {0}")]
    Io(#[from] io::Error),

    #[error("invalid summary pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

/// What the child left behind.
#[derive(Debug)]
pub struct ChildRun {
    /// Exit code, or 1 when the child died to a signal
    pub exit_code: i32,
    /// Captured stdout followed by captured stderr
    pub output: String,
}

/// The program to spawn and its arguments.
#[derive(Debug, Clone)]
pub struct TestRunner {
    program: String,
    args: Vec<String>,
}

impl TestRunner {
    /// Build a runner. `cargo` without arguments runs the live suite.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        let program = program.into();
        let args = if args.is_empty() && program == "cargo" {
            DEFAULT_CARGO_ARGS.iter().map(ToString::to_string).collect()
        } else {
            args
        };
        Self { program, args }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run the child with its output mirrored to our stdout and stderr.
    ///
    /// # Errors
    ///
    /// Returns error if the child cannot be spawned or its output cannot be
    /// read or forwarded.
    pub async fn execute(&self) -> Result<ChildRun, RunnerError> {
        self.execute_with(tokio::io::stdout(), tokio::io::stderr())
            .await
    }

    /// Run the child with its output mirrored to the given writers.
    ///
    /// # Errors
    ///
    /// Returns error if the child cannot be spawned or its output cannot be
    /// read or forwarded.
    pub async fn execute_with<O, E>(&self, out: O, err: E) -> Result<ChildRun, RunnerError>
    where
        O: AsyncWrite + Unpin,
        E: AsyncWrite + Unpin,
    {
        info!(program = %self.program, args = ?self.args, "spawning test process");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdout = child.stdout.take().ok_or(RunnerError::Pipe("stdout"))?;
        let stderr = child.stderr.take().ok_or(RunnerError::Pipe("stderr"))?;

        let (captured_out, captured_err) =
            tokio::try_join!(mirror(stdout, out), mirror(stderr, err))?;
        let status = child.wait().await?;
        debug!(%status, "test process exited");

        let mut output = String::from_utf8_lossy(&captured_out).into_owned();
        output.push_str(&String::from_utf8_lossy(&captured_err));

        Ok(ChildRun {
            exit_code: status.code().unwrap_or(SIGNALED_EXIT_CODE),
            output,
        })
    }
}

/// Copy `from` into `to` chunk by chunk, keeping a copy of everything.
async fn mirror<R, W>(mut from: R, mut to: W) -> io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut captured = Vec::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = from.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        let chunk = buf.get(..n).unwrap_or_default();
        to.write_all(chunk).await?;
        to.flush().await?;
        captured.extend_from_slice(chunk);
    }
    Ok(captured)
}
