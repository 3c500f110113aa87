//! Test-method descriptor model.
//!
//! - [`TestMarker`]: the declarative tag (`name` override, `skip` flag) attached by
//!   `#[testease::test]` / `#[test]` inside `#[testease::fixture]`.
//! - [`TestMethod`]: the callable reference plus the shape the runner needs to validate before
//!   invoking it. Const-constructible so the marker macros can register it at link time.
//! - [`TestEntry`]: a method and its marker, as stored in the registry.
//! - [`TestDescriptor`]: the resolved, immutable record handed to the runner.

use std::any::Any;
use std::fmt;

use crate::failure::{Failure, Outcome};

// ============================================================================
// Marker
// ============================================================================

/// Declarative test tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TestMarker {
    /// Display-name override.
    pub name: Option<&'static str>,
    /// Exclude from default discovery.
    pub skip: bool,
}

impl TestMarker {
    pub const fn new() -> Self {
        Self { name: None, skip: false }
    }

    pub const fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub const fn skipped(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }
}

// ============================================================================
// Method shape
// ============================================================================

/// What a test method returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Returns {
    /// `()`
    Unit,
    /// [`Outcome`]: no value on success.
    Outcome,
    /// Anything else, by type spelling. Not invocable.
    Value(&'static str),
}

/// Parameter and return shape of a test method, recorded at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    /// Parameter type spellings (receiver excluded).
    pub params: &'static [&'static str],
    pub returns: Returns,
}

impl Signature {
    /// `fn()`
    pub const UNIT: Signature = Signature::new(&[], Returns::Unit);

    /// `fn() -> Outcome`
    pub const OUTCOME: Signature = Signature::new(&[], Returns::Outcome);

    pub const fn new(params: &'static [&'static str], returns: Returns) -> Self {
        Self { params, returns }
    }

    /// Whether the runner can invoke a method of this shape.
    pub fn is_invocable(&self) -> bool {
        self.params.is_empty() && !matches!(self.returns, Returns::Value(_))
    }
}

/// Static (scope-independent) test body.
pub type StaticFn = fn() -> Outcome;

/// Builds a fresh fixture instance.
pub type Factory = fn() -> Result<Box<dyn Any>, Failure>;

/// Invokes a test method on a fixture instance.
pub type InstanceFn = fn(&mut dyn Any) -> Outcome;

/// How to invoke a test method.
#[derive(Clone, Copy)]
pub enum Target {
    /// Free function or associated function without a receiver.
    Free(StaticFn),
    /// Method with a `&self` / `&mut self` receiver.
    Instance {
        /// `None` when the owning type has no zero-argument constructor.
        factory: Option<Factory>,
        call: InstanceFn,
    },
    /// The method's shape does not allow a zero-argument call.
    Unbound,
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Free(_) => f.write_str("Free"),
            Target::Instance { factory, .. } => f
                .debug_struct("Instance")
                .field("has_factory", &factory.is_some())
                .finish_non_exhaustive(),
            Target::Unbound => f.write_str("Unbound"),
        }
    }
}

/// Source position of a test method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
}

// ============================================================================
// Test method
// ============================================================================

/// Reference to one test method.
#[derive(Debug, Clone, Copy)]
pub struct TestMethod {
    /// `module_path!()` of the declaration.
    pub module: &'static str,
    /// Path of the owning type for methods declared in an `impl` block.
    pub owner: Option<&'static str>,
    pub name: &'static str,
    pub location: Location,
    pub signature: Signature,
    pub target: Target,
}

impl TestMethod {
    /// A free `fn()`/`fn() -> Outcome` test. Refine with the builder methods.
    pub const fn new(module: &'static str, name: &'static str, target: Target) -> Self {
        Self {
            module,
            owner: None,
            name,
            location: Location { file: "", line: 0 },
            signature: Signature::OUTCOME,
            target,
        }
    }

    pub const fn owned_by(mut self, owner: &'static str) -> Self {
        self.owner = Some(owner);
        self
    }

    pub const fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = signature;
        self
    }

    pub const fn at(mut self, file: &'static str, line: u32) -> Self {
        self.location = Location { file, line };
        self
    }

    /// Path of the owning type, or the module path for free functions.
    pub fn owner_path(&self) -> &'static str {
        self.owner.unwrap_or(self.module)
    }

    /// `"<module>.<name>"`, for free functions and methods alike.
    pub fn default_display_name(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }
}

// ============================================================================
// Registry entry
// ============================================================================

/// A registered test: the method and the marker attached to it.
#[derive(Debug, Clone, Copy)]
pub struct TestEntry {
    pub method: TestMethod,
    pub marker: TestMarker,
}

impl TestEntry {
    pub const fn new(method: TestMethod, marker: TestMarker) -> Self {
        Self { method, marker }
    }

    pub fn descriptor(&self) -> TestDescriptor {
        TestDescriptor::new(self.method, self.marker)
    }
}

inventory::collect!(TestEntry);

// ============================================================================
// Descriptor
// ============================================================================

/// Resolved, immutable identification of one test.
#[derive(Debug, Clone)]
pub struct TestDescriptor {
    method: TestMethod,
    display_name: String,
    skip: bool,
}

impl TestDescriptor {
    /// Resolve a descriptor. A missing or blank name override falls back to
    /// [`TestMethod::default_display_name`], so the display name is never empty.
    pub fn new(method: TestMethod, marker: TestMarker) -> Self {
        let display_name = match marker.name {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => method.default_display_name(),
        };
        Self {
            method,
            display_name,
            skip: marker.skip,
        }
    }

    pub fn method(&self) -> &TestMethod {
        &self.method
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn skip(&self) -> bool {
        self.skip
    }
}

impl fmt::Display for TestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

// ============================================================================
// Fixture construction probe
// ============================================================================

/// Picks `Default::default` as a fixture factory when the type implements it, and a
/// [`ContractViolation::MissingConstructor`](crate::ContractViolation::MissingConstructor)
/// otherwise. Used by `#[testease::fixture]`; resolution happens by method lookup on
/// `&Probe<T>`, so both traits must be in scope.
#[doc(hidden)]
pub mod probe {
    use std::any::Any;
    use std::marker::PhantomData;

    use crate::failure::{ContractViolation, Failure};

    pub struct Probe<T>(PhantomData<T>);

    impl<T> Probe<T> {
        pub const fn new() -> Self {
            Probe(PhantomData)
        }
    }

    impl<T> Default for Probe<T> {
        fn default() -> Self {
            Self::new()
        }
    }

    pub trait ViaDefault {
        fn construct(&self) -> Result<Box<dyn Any>, Failure>;
    }

    impl<T: Default + 'static> ViaDefault for Probe<T> {
        fn construct(&self) -> Result<Box<dyn Any>, Failure> {
            Ok(Box::new(T::default()))
        }
    }

    pub trait ViaMissing {
        fn construct(&self) -> Result<Box<dyn Any>, Failure>;
    }

    impl<T> ViaMissing for &Probe<T> {
        fn construct(&self) -> Result<Box<dyn Any>, Failure> {
            let owner = std::any::type_name::<T>().to_string();
            Err(ContractViolation::MissingConstructor { owner }.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> Outcome {
        Ok(())
    }

    const METHOD: TestMethod = TestMethod::new("sample", "example", Target::Free(noop));

    #[test]
    fn test_default_display_name_uses_module() {
        let descriptor = TestDescriptor::new(METHOD, TestMarker::new());
        assert_eq!(descriptor.display_name(), "sample.example");
        assert!(!descriptor.skip());
    }

    #[test]
    fn test_default_display_name_ignores_owner() {
        let method = METHOD.owned_by("sample::Sample");
        let descriptor = TestDescriptor::new(method, TestMarker::new());
        assert_eq!(descriptor.display_name(), "sample.example");
        assert_eq!(method.owner_path(), "sample::Sample");
        assert_eq!(METHOD.owner_path(), "sample");
    }

    #[test]
    fn test_name_override() {
        let descriptor = TestDescriptor::new(METHOD, TestMarker::new().named("Example of Assert.Equal"));
        assert_eq!(descriptor.to_string(), "Example of Assert.Equal");
    }

    #[test]
    fn test_blank_override_falls_back() {
        let descriptor = TestDescriptor::new(METHOD, TestMarker::new().named("  "));
        assert_eq!(descriptor.display_name(), "sample.example");
    }

    #[test]
    fn test_skip_flag_carried() {
        let descriptor = TestDescriptor::new(METHOD, TestMarker::new().skipped(true));
        assert!(descriptor.skip());
    }

    #[test]
    fn test_signature_invocable() {
        assert!(Signature::UNIT.is_invocable());
        assert!(Signature::OUTCOME.is_invocable());
        assert!(!Signature::new(&["i32"], Returns::Unit).is_invocable());
        assert!(!Signature::new(&[], Returns::Value("i32")).is_invocable());
    }

    #[derive(Default)]
    struct WithDefault;

    struct WithoutDefault;

    #[test]
    #[allow(clippy::needless_borrow)]
    fn test_probe_prefers_default() {
        use probe::{Probe, ViaDefault as _, ViaMissing as _};
        use crate::failure::ContractViolation;

        let built = (&Probe::<WithDefault>::new()).construct().unwrap();
        assert!(built.is::<WithDefault>());

        let missing = (&Probe::<WithoutDefault>::new()).construct();
        assert!(matches!(
            missing,
            Err(Failure::Contract(ContractViolation::MissingConstructor { owner })) if owner.ends_with("WithoutDefault")
        ));
    }

    #[test]
    fn test_marker_builder_is_const() {
        const MARKER: TestMarker = TestMarker::new().named("x").skipped(true);
        assert_eq!(MARKER, TestMarker { name: Some("x"), skip: true });
    }
}
