//! Runner: finds tests, executes them and collects results.
//!
//! ## Modes
//!
//! - **Sequential** (default): one test at a time on the caller's thread.
//! - **Concurrent** (`jobs > 1` or a timeout): each test runs on a blocking worker of a `tokio`
//!   runtime. A semaphore bounds how many run at once and each may be wrapped in a timeout.
//!
//! In both modes every input descriptor yields exactly one result, results come back in input
//! order, and reporter callbacks fire in input order.
//!
//! ## Notes
//!
//! - A test that exceeds the timeout is reported as a `TimeoutError`. Its worker thread cannot be
//!   interrupted; it is detached and the runtime is shut down without waiting for it. Until its
//!   body returns it still counts against `jobs`, so later tests wait for the slot.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Runtime;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::descriptor::TestDescriptor;
use crate::discovery::{InventoryDiscovery, TestDiscovery};
use crate::executor;
use crate::report::{NullReporter, TestReporter};
use crate::result::{RunSummary, TestResult};

/// Finds and runs tests according to a [`RunConfig`].
pub struct Runner {
    config: RunConfig,
    discovery: Box<dyn TestDiscovery>,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(RunConfig::default())
    }
}

impl Runner {
    /// Runner over every test registered in this process.
    pub fn new(config: RunConfig) -> Self {
        Self::with_discovery(config, InventoryDiscovery)
    }

    /// Runner over an explicit test source.
    pub fn with_discovery(config: RunConfig, discovery: impl TestDiscovery + 'static) -> Self {
        Self {
            config,
            discovery: Box::new(discovery),
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Discover tests, honouring `include_skipped` and the keyword filter.
    pub fn find_tests(&self) -> Vec<TestDescriptor> {
        self.discovery
            .find_tests(self.config.include_skipped)
            .into_iter()
            .filter(|descriptor| self.config.matches(descriptor.display_name()))
            .collect()
    }

    /// Run `descriptors` (or everything [`Runner::find_tests`] returns when `None`).
    ///
    /// ## Returns
    /// One result per descriptor, in input order.
    pub fn run_all(&self, descriptors: Option<Vec<TestDescriptor>>) -> Vec<TestResult> {
        self.run_reported(descriptors, &mut NullReporter)
    }

    /// Run a single test. Honours the configured timeout.
    pub fn run_one(&self, descriptor: &TestDescriptor) -> TestResult {
        if self.config.timeout.is_none() {
            return executor::run_one(descriptor);
        }
        let descriptors = std::slice::from_ref(descriptor);
        match self.run_concurrent(descriptors, &mut NullReporter) {
            Ok(mut results) => results.pop().unwrap_or_else(|| executor::run_one(descriptor)),
            Err(err) => {
                warn!(%err, "async runtime unavailable, running without timeout");
                executor::run_one(descriptor)
            }
        }
    }

    /// Same as [`Runner::run_all`], driving `reporter` along the way.
    pub fn run_reported(
        &self,
        descriptors: Option<Vec<TestDescriptor>>,
        reporter: &mut dyn TestReporter,
    ) -> Vec<TestResult> {
        let descriptors = descriptors.unwrap_or_else(|| self.find_tests());
        reporter.on_collection_complete(descriptors.len());
        info!(
            tests = descriptors.len(),
            jobs = self.config.jobs,
            timeout_ms = self.config.timeout.map(|t| t.as_millis() as u64),
            "starting test run"
        );

        let started = Instant::now();
        let results = if self.config.is_concurrent() {
            match self.run_concurrent(&descriptors, reporter) {
                Ok(results) => results,
                Err(err) => {
                    warn!(%err, "async runtime unavailable, running sequentially");
                    run_sequential(&descriptors, reporter)
                }
            }
        } else {
            run_sequential(&descriptors, reporter)
        };

        let summary = RunSummary::from_results(&results, started.elapsed());
        info!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            duration_ms = summary.duration.as_millis() as u64,
            "test run finished"
        );
        reporter.on_run_complete(&summary);
        results
    }

    fn run_concurrent(
        &self,
        descriptors: &[TestDescriptor],
        reporter: &mut dyn TestReporter,
    ) -> std::io::Result<Vec<TestResult>> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.jobs.clamp(1, 64))
            .thread_name("testease-worker")
            .enable_time()
            .build()?;
        let results = run_scheduled(&runtime, descriptors, &self.config, reporter);
        runtime.shutdown_background();
        Ok(results)
    }
}

// ============================================================================
// Scheduling
// ============================================================================

fn run_sequential(descriptors: &[TestDescriptor], reporter: &mut dyn TestReporter) -> Vec<TestResult> {
    descriptors
        .iter()
        .map(|descriptor| {
            reporter.on_test_start(descriptor);
            let result = executor::run_one(descriptor);
            reporter.on_test_complete(descriptor, &result);
            result
        })
        .collect()
}

fn run_scheduled(
    runtime: &Runtime,
    descriptors: &[TestDescriptor],
    config: &RunConfig,
    reporter: &mut dyn TestReporter,
) -> Vec<TestResult> {
    let permits = Arc::new(Semaphore::new(config.jobs.max(1)));
    let handles: Vec<JoinHandle<TestResult>> = descriptors
        .iter()
        .cloned()
        .map(|descriptor| runtime.spawn(run_task(descriptor, Arc::clone(&permits), config.timeout)))
        .collect();

    runtime.block_on(async {
        let mut results = Vec::with_capacity(handles.len());
        for (descriptor, handle) in descriptors.iter().zip(handles) {
            reporter.on_test_start(descriptor);
            let result = handle
                .await
                .unwrap_or_else(|err| executor::aborted(descriptor, err.to_string(), Duration::ZERO));
            reporter.on_test_complete(descriptor, &result);
            results.push(result);
        }
        results
    })
}

async fn run_task(descriptor: TestDescriptor, permits: Arc<Semaphore>, timeout: Option<Duration>) -> TestResult {
    let Ok(permit) = permits.acquire_owned().await else {
        return executor::aborted(&descriptor, "scheduler closed before the test started", Duration::ZERO);
    };

    // The permit lives on the worker: a timed-out test keeps its slot until its body returns.
    let started = Instant::now();
    let worker = {
        let descriptor = descriptor.clone();
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            executor::run_one(&descriptor)
        })
    };

    let joined = match timeout {
        Some(limit) => match tokio::time::timeout(limit, worker).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(test = %descriptor, limit_ms = limit.as_millis() as u64, "test timed out");
                return executor::timed_out(&descriptor, limit);
            }
        },
        None => worker.await,
    };

    joined.unwrap_or_else(|err| executor::aborted(&descriptor, err.to_string(), started.elapsed()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Target, TestEntry, TestMarker, TestMethod};
    use crate::discovery::Registry;
    use crate::failure::Outcome;
    use crate::{assert, kinds};

    fn ok() -> Outcome {
        assert::is_true(true)
    }

    fn bad() -> Outcome {
        assert::equal("a", "b")
    }

    fn entry(name: &'static str, body: fn() -> Outcome, marker: TestMarker) -> TestEntry {
        TestEntry::new(TestMethod::new("runner", name, Target::Free(body)), marker)
    }

    fn registry() -> Registry {
        Registry::new()
            .with(entry("first", ok, TestMarker::new()))
            .with(entry("second", bad, TestMarker::new().named("Second one")))
            .with(entry("third", ok, TestMarker::new().skipped(true)))
    }

    #[test]
    fn test_find_tests_excludes_skipped() {
        let runner = Runner::with_discovery(RunConfig::default(), registry());
        let names: Vec<_> = runner
            .find_tests()
            .iter()
            .map(|d| d.display_name().to_string())
            .collect();
        assert_eq!(names, ["runner.first", "Second one"]);
    }

    #[test]
    fn test_find_tests_filter() {
        let config = RunConfig::default().with_include_skipped(true).with_filter("third");
        let runner = Runner::with_discovery(config, registry());
        assert_eq!(runner.find_tests().len(), 1);
    }

    #[test]
    fn test_run_all_defaults_to_discovery() {
        let runner = Runner::with_discovery(RunConfig::default(), registry());
        let results = runner.run_all(None);
        assert_eq!(results.len(), 2);
        assert!(results[0].pass());
        assert!(results[1].assertion_failed());
    }

    #[test]
    fn test_concurrent_run_preserves_order() {
        let config = RunConfig::default().with_include_skipped(true).with_jobs(3);
        let runner = Runner::with_discovery(config, registry());
        let results = runner.run_all(None);
        let names: Vec<_> = results.iter().map(|r| r.descriptor().method().name).collect();
        assert_eq!(names, ["first", "second", "third"]);
        assert!(results[2].pass());
    }

    #[test]
    fn test_run_one_with_timeout() {
        fn slow() -> Outcome {
            std::thread::sleep(Duration::from_millis(500));
            Ok(())
        }
        let config = RunConfig::default().with_timeout(Duration::from_millis(20));
        let runner = Runner::with_discovery(config, Registry::new());
        let descriptor = entry("slow", slow, TestMarker::new()).descriptor();
        let result = runner.run_one(&descriptor);
        assert_eq!(result.failure().map(|f| f.kind()), Some(&kinds::TIMEOUT));
    }
}
