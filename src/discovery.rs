//! Test discovery.
//!
//! Turns registered [`TestEntry`] records into an ordered list of [`TestDescriptor`]s.
//!
//! ## Sources
//!
//! - [`InventoryDiscovery`]: every entry registered at link time by `#[testease::test]` and
//!   `#[testease::fixture]`. The link-time list has no meaningful order, so it is sorted by
//!   source location.
//! - [`Registry`]: an explicit list built at run time; keeps insertion order.
//!
//! Discovery performs no shape validation: malformed methods are still discovered and reported
//! by the executor.

use tracing::debug;

use crate::descriptor::{TestDescriptor, TestEntry};

// ============================================================================
// Discovery interface
// ============================================================================

/// A source of test entries.
pub trait TestDiscovery: Send + Sync {
    /// All entries, in discovery order.
    fn entries(&self) -> Vec<TestEntry>;

    /// Descriptors for the entries, excluding skipped ones unless `include_skipped`.
    fn find_tests(&self, include_skipped: bool) -> Vec<TestDescriptor> {
        find_tests_in(self.entries(), include_skipped)
    }
}

/// Entries registered with `inventory` by the marker macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryDiscovery;

impl TestDiscovery for InventoryDiscovery {
    fn entries(&self) -> Vec<TestEntry> {
        let mut entries: Vec<TestEntry> = inventory::iter::<TestEntry>.into_iter().copied().collect();
        entries.sort_by(|a, b| {
            a.method
                .location
                .cmp(&b.method.location)
                .then_with(|| a.method.name.cmp(b.method.name))
        });
        entries
    }
}

/// An explicit, ordered set of test entries.
///
/// ## Example
///
/// ```rust
/// use testease::{Registry, Target, TestDiscovery, TestEntry, TestMarker, TestMethod};
///
/// fn smoke() -> testease::Outcome {
///     testease::assert::is_true(true)
/// }
///
/// let registry = Registry::new().with(TestEntry::new(
///     TestMethod::new(module_path!(), "smoke", Target::Free(smoke)),
///     TestMarker::new(),
/// ));
/// assert_eq!(registry.find_tests(false).len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<TestEntry>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: TestEntry) {
        self.entries.push(entry);
    }

    /// Builder form of [`Registry::register`].
    pub fn with(mut self, entry: TestEntry) -> Self {
        self.register(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TestDiscovery for Registry {
    fn entries(&self) -> Vec<TestEntry> {
        self.entries.clone()
    }
}

impl FromIterator<TestEntry> for Registry {
    fn from_iter<I: IntoIterator<Item = TestEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Free functions
// ============================================================================

/// Discover every test registered in this process.
pub fn find_tests(include_skipped: bool) -> Vec<TestDescriptor> {
    InventoryDiscovery.find_tests(include_skipped)
}

/// Resolve `entries` into descriptors, preserving their order.
///
/// ## Parameters
/// - `entries`: the candidate entries.
/// - `include_skipped`: keep entries whose marker sets `skip`.
pub fn find_tests_in(entries: impl IntoIterator<Item = TestEntry>, include_skipped: bool) -> Vec<TestDescriptor> {
    let mut skipped = 0usize;
    let descriptors: Vec<TestDescriptor> = entries
        .into_iter()
        .filter(|entry| {
            let keep = include_skipped || !entry.marker.skip;
            if !keep {
                skipped += 1;
            }
            keep
        })
        .map(|entry| entry.descriptor())
        .collect();

    debug!(found = descriptors.len(), skipped, include_skipped, "discovered tests");
    descriptors
}
