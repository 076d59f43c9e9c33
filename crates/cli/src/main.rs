//! storeprobe CLI - runs the end-to-end suite and condenses its output.
//!
//! # Usage
//!
//! ```bash
//! # Run the live scenarios against MAGENTO_BASE_URL
//! storeprobe run
//!
//! # Write the condensed report as JSON as well
//! storeprobe run --report target/storeprobe.json
//!
//! # Run something else and summarize it
//! storeprobe run --program cargo -- test --workspace
//!
//! # Show the resolved configuration (secrets redacted)
//! storeprobe config
//! ```
//!
//! # Commands
//!
//! - `run` - Spawn the test process, mirror its output, print a summary
//! - `config` - Print the harness configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod runner;
mod summary;

#[derive(Parser)]
#[command(name = "storeprobe")]
#[command(author, version, about = "End-to-end test runner for commerce REST APIs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the test suite and print a condensed summary
    Run {
        /// Program to spawn
        #[arg(long, default_value = "cargo")]
        program: String,

        /// Also write the summary as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Arguments passed to the program (defaults to the live suite for cargo)
        #[arg(last = true)]
        args: Vec<String>,
    },
    /// Print the resolved configuration with secrets redacted
    Config,
}

#[tokio::main]
async fn main() {
    // Load .env before the filter so LOG_LEVEL can come from it
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr so the summary on stdout stays clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()))
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Run {
            program,
            report,
            args,
        } => commands::run::execute(program, args, report.as_deref()).await,
        Commands::Config => {
            commands::config::show()?;
            Ok(0)
        }
    }
}
