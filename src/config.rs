//! Run configuration.

use std::time::Duration;

/// Configuration for a [`Runner`](crate::Runner).
///
/// The default is the sequential mode: one test at a time on the caller's thread, no timeout,
/// skipped tests excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Keep tests whose marker sets `skip`.
    pub include_skipped: bool,
    /// Keep only tests whose display name contains this substring.
    pub filter: Option<String>,
    /// Maximum number of tests running at once.
    pub jobs: usize,
    /// Per-test wall-clock limit.
    pub timeout: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            include_skipped: false,
            filter: None,
            jobs: 1,
            timeout: None,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include_skipped(mut self, include_skipped: bool) -> Self {
        self.include_skipped = include_skipped;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Values below 1 are clamped to 1.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether the run needs the async scheduler (parallelism or a timeout).
    pub fn is_concurrent(&self) -> bool {
        self.jobs > 1 || self.timeout.is_some()
    }

    /// Whether `display_name` passes the keyword filter.
    pub fn matches(&self, display_name: &str) -> bool {
        self.filter
            .as_deref()
            .is_none_or(|keyword| display_name.contains(keyword))
    }
}
