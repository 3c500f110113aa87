//! Test commands: list or run the registered tests.
//!
//! ## Exit codes
//!
//! - `0`: every executed test passed (an empty run counts as passing).
//! - `1`: at least one test failed or errored.

use std::io::{self, Write};

use crate::config::RunConfig;
use crate::report::{ConsoleReporter, JsonReporter, TestReporter};
use crate::result::RunSummary;
use crate::runner::Runner;

use super::{CliError, CliResult, ExitCode, Format};

/// Run every test selected by `config`, reporting in `format`.
pub fn run_tests(config: RunConfig, format: Format, verbose: bool) -> CliResult<ExitCode> {
    let runner = Runner::new(config);
    let mut reporter: Box<dyn TestReporter> = match format {
        Format::Text => Box::new(ConsoleReporter::stdout(verbose)),
        Format::Json => Box::new(JsonReporter::stdout()),
    };
    Ok(run_with(&runner, reporter.as_mut()))
}

/// Run `runner`'s tests through `reporter` and map the outcome to an exit code.
pub fn run_with(runner: &Runner, reporter: &mut dyn TestReporter) -> ExitCode {
    let results = runner.run_reported(None, reporter);
    if RunSummary::from_results(&results, Default::default()).all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Print the display names of the tests `config` selects, one per line.
pub fn list_tests(config: RunConfig) -> CliResult<ExitCode> {
    let runner = Runner::new(config);
    let stdout = io::stdout();
    list_to(&runner, &mut stdout.lock())
        .map_err(|e| CliError::failure(format!("Error writing test list: {}", e)))?;
    Ok(ExitCode::SUCCESS)
}

fn list_to(runner: &Runner, out: &mut impl Write) -> io::Result<()> {
    let tests = runner.find_tests();
    for test in &tests {
        let skip = if test.skip() { " (skip)" } else { "" };
        writeln!(out, "{}{}", test, skip)?;
    }
    writeln!(out, "\n{} test(s)", tests.len())
}
