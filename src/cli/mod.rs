//! CLI module for the testease harness
//!
//! This module provides the command-line interface used by the `testease` binary and by
//! `harness = false` test targets that want the same behavior.
//!
//! ## Flags
//!
//! - `--list` - Print the discovered tests without running them
//! - `--include-skipped` - Also run tests marked `skip`
//! - `-k <EXPR>` - Keep tests whose display name contains `EXPR`
//! - `-j <JOBS>` - Run up to `JOBS` tests at once
//! - `--timeout-ms <MS>` - Per-test time limit
//! - `-v` - Verbose output
//! - `--format text|json` - Output format
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod test_runner;

use std::fmt;
use std::process;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::RunConfig;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
    pub const USAGE: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Create a usage error (exit code 2).
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::USAGE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Output format for test results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// `<name>... PASS|FAIL` lines and a summary
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Run the tests registered in this binary
#[derive(Parser, Debug)]
#[command(name = "testease")]
#[command(version = VERSION)]
#[command(about = "Run the tests registered in this binary", long_about = None)]
pub struct Cli {
    /// List discovered tests without running them
    #[arg(long)]
    pub list: bool,

    /// Also run tests marked `skip`
    #[arg(long, alias = "include-ignored")]
    pub include_skipped: bool,

    /// Filter tests by keyword (substring of the display name)
    #[arg(short = 'k', value_name = "EXPR")]
    pub filter: Option<String>,

    /// Keyword filter given positionally, the way `cargo test <FILTER>` forwards it
    #[arg(value_name = "FILTER")]
    pub pattern: Option<String>,

    /// Number of tests to run at once
    #[arg(short = 'j', long, alias = "test-threads", value_name = "JOBS", default_value_t = 1)]
    pub jobs: usize,

    /// Per-test time limit in milliseconds
    #[arg(long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    // libtest flags `cargo test` may forward to `harness = false` targets; accepted, no effect.
    #[arg(long, short = 'q', hide = true)]
    pub quiet: bool,
    #[arg(long, hide = true)]
    pub nocapture: bool,
    #[arg(long, hide = true)]
    pub show_output: bool,
}

impl Cli {
    /// Translate flags into a [`RunConfig`], rejecting values that make no sense.
    pub fn run_config(&self) -> CliResult<RunConfig> {
        if self.jobs == 0 {
            return Err(CliError::usage("error: -j/--jobs must be at least 1"));
        }
        let mut config = RunConfig::new()
            .with_include_skipped(self.include_skipped)
            .with_jobs(self.jobs);
        if let Some(filter) = self.filter.as_ref().or(self.pattern.as_ref()) {
            config = config.with_filter(filter.clone());
        }
        match self.timeout_ms {
            Some(0) => return Err(CliError::usage("error: --timeout-ms must be greater than 0")),
            Some(ms) => config = config.with_timeout(Duration::from_millis(ms)),
            None => {}
        }
        Ok(config)
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // clap renders help/version and usage errors itself; usage errors exit with 2
        Err(err) => err.exit(),
    };

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the parsed command line and return the exit code.
pub fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.run_config()?;
    if cli.list {
        return test_runner::list_tests(config);
    }
    test_runner::run_tests(config, cli.format, cli.verbose)
}

/// Initialize structured logging with env-based filter, defaulting to info.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

// ============================================================================
// Tests
// ============================================================================
