//! Console reporter.

use std::io::{self, IsTerminal, Write};

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};

use super::TestReporter;
use crate::descriptor::TestDescriptor;
use crate::failure::Failure;
use crate::result::{RunSummary, TestResult};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Prints one `"<name>... PASS|FAIL"` line per test and a summary line.
///
/// In verbose mode each line also carries the duration, and failures are followed by their
/// diagnostic (message, code and help).
///
/// Write errors are ignored: reporting never affects the run.
pub struct ConsoleReporter<W: Write = io::Stdout> {
    out: W,
    verbose: bool,
    color: bool,
}

impl ConsoleReporter<io::Stdout> {
    /// Reporter on stdout, colored when stdout is a terminal.
    pub fn stdout(verbose: bool) -> Self {
        let out = io::stdout();
        let color = out.is_terminal();
        Self::new(out, verbose).with_color(color)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn render_failure(&self, failure: &Failure) -> String {
        let theme = if self.color {
            GraphicalTheme::unicode()
        } else {
            GraphicalTheme::unicode_nocolor()
        };
        let mut rendered = String::new();
        let handler = GraphicalReportHandler::new_themed(theme);
        if handler.render_report(&mut rendered, failure as &dyn Diagnostic).is_err() {
            rendered = failure.to_string();
        }
        let location = match failure {
            Failure::Raised(raised) => raised.location(),
            _ => None,
        };
        if let Some(location) = location {
            rendered.push_str("\n  at ");
            rendered.push_str(location);
        }
        rendered
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_collection_complete(&mut self, test_count: usize) {
        if test_count == 0 {
            let _ = writeln!(self.out, "No tests collected");
        } else if self.verbose {
            let _ = writeln!(self.out, "collected {test_count} test(s)\n");
        }
    }

    fn on_test_complete(&mut self, test: &TestDescriptor, result: &TestResult) {
        let status = if result.pass() {
            self.paint("PASS", GREEN)
        } else {
            self.paint("FAIL", RED)
        };

        if self.verbose {
            let millis = result.duration().as_millis();
            let _ = writeln!(self.out, "{test}... {status} ({millis}ms)");
            if let Some(failure) = result.failure() {
                let detail = self.render_failure(failure);
                for line in detail.lines() {
                    let _ = writeln!(self.out, "    {line}");
                }
            }
        } else {
            let _ = writeln!(self.out, "{test}... {status}");
        }
    }

    fn on_run_complete(&mut self, summary: &RunSummary) {
        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(self.paint(&format!("{} passed", summary.passed), GREEN));
        }
        if summary.assertion_failures > 0 {
            parts.push(self.paint(&format!("{} failed", summary.assertion_failures), RED));
        }
        if summary.errors > 0 {
            parts.push(self.paint(&format!("{} errors", summary.errors), YELLOW));
        }
        if parts.is_empty() {
            parts.push("no tests ran".to_string());
        }

        let _ = writeln!(
            self.out,
            "\n====== {} in {:.2}s ======",
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
        let _ = self.out.flush();
    }
}
