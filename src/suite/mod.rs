//! Declaration-time suite builder: named setup parts, scoped blocks, and
//! test-case registration.
//!
//! A [`Suite`] owns one declaration stack exclusively; blocks nest lexically
//! and push/pop is single-threaded, so no locking is involved. The stack
//! discipline is scoped acquisition with guaranteed release: a part pushed on
//! block entry is popped on exit even when the block body panics, so a
//! failing nested declaration never corrupts sibling registration.

use std::fmt;
use std::sync::Arc;

use im::Vector;
use tracing::debug;

pub mod case;

pub use case::TestCase;

// ============================================================================
// SETUP PARTS
// ============================================================================

/// One named state-transform step.
///
/// Immutable once created; shared (not owned) by every test case whose
/// declaration nests inside its block.
pub struct SetupPart<S> {
    name: String,
    transform: Arc<dyn Fn(S) -> S + Send + Sync>,
}

impl<S> Clone for SetupPart<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            transform: Arc::clone(&self.transform),
        }
    }
}

impl<S: 'static> SetupPart<S> {
    pub fn new(
        name: impl Into<String>,
        transform: impl Fn(S) -> S + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            transform: Arc::new(transform),
        }
    }

    /// A pure grouping part: carries a name, leaves the state untouched.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, |state| state)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn apply(&self, state: S) -> S {
        (self.transform)(state)
    }
}

impl<S> fmt::Debug for SetupPart<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetupPart").field("name", &self.name).finish()
    }
}

// ============================================================================
// SUITE BUILDER
// ============================================================================

/// Declaration-time builder for one test suite over a state type `S`.
///
/// Declarations build a tree of named setup blocks; each leaf `test`
/// declaration snapshots the current chain into an immutable [`TestCase`].
/// The stack is empty again whenever declaration returns to the top level.
pub struct Suite<S> {
    init: Arc<dyn Fn() -> S + Send + Sync>,
    stack: Vector<SetupPart<S>>,
    cases: Vec<TestCase<S>>,
}

impl<S: 'static> Suite<S> {
    /// A suite whose initial state is `S::default()`.
    pub fn new() -> Self
    where
        S: Default,
    {
        Self::with_state(S::default)
    }

    /// A suite with an explicit initial-state constructor, invoked once per
    /// test-case run.
    pub fn with_state(init: impl Fn() -> S + Send + Sync + 'static) -> Self {
        Self {
            init: Arc::new(init),
            stack: Vector::new(),
            cases: Vec::new(),
        }
    }

    /// Opens a named, non-transforming block: pure grouping.
    pub fn group(&mut self, name: impl Into<String>, decls: impl FnOnce(&mut Self)) {
        self.scoped(SetupPart::named(name), decls);
    }

    /// Opens a named block whose transform is applied to the state of every
    /// test declared inside it.
    pub fn given(
        &mut self,
        name: impl Into<String>,
        transform: impl Fn(S) -> S + Send + Sync + 'static,
        decls: impl FnOnce(&mut Self),
    ) {
        self.scoped(SetupPart::new(name, transform), decls);
    }

    /// The same composite as [`Suite::given`] with the arguments in
    /// transform-first order. Both normalize to the identical setup part.
    pub fn via(
        &mut self,
        transform: impl Fn(S) -> S + Send + Sync + 'static,
        name: impl Into<String>,
        decls: impl FnOnce(&mut Self),
    ) {
        self.scoped(SetupPart::new(name, transform), decls);
    }

    fn scoped(&mut self, part: SetupPart<S>, decls: impl FnOnce(&mut Self)) {
        self.stack.push_back(part);
        let guard = StackGuard { suite: self };
        decls(&mut *guard.suite);
    }

    /// Declares a test: snapshots the current setup chain and registers an
    /// immutable case. Terminal leaf; the stack is untouched.
    pub fn test(&mut self, name: impl Into<String>, body: impl Fn(S) + Send + Sync + 'static) {
        self.register(name.into(), body, false);
    }

    /// Declares a test that is registered but marked skipped; the runner
    /// decides how to surface it.
    pub fn skip(&mut self, name: impl Into<String>, body: impl Fn(S) + Send + Sync + 'static) {
        self.register(name.into(), body, true);
    }

    fn register(&mut self, name: String, body: impl Fn(S) + Send + Sync + 'static, skipped: bool) {
        debug!(case = %name, chain_depth = self.stack.len(), skipped, "registered test case");
        self.cases.push(TestCase::new(
            self.stack.clone(),
            name,
            Arc::new(body),
            Arc::clone(&self.init),
            skipped,
        ));
    }

    /// Current nesting depth of open setup blocks. Zero at the top level.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn cases(&self) -> &[TestCase<S>] {
        &self.cases
    }

    /// Hands the registered cases to the runner.
    pub fn into_cases(self) -> Vec<TestCase<S>> {
        self.cases
    }
}

impl<S: Default + 'static> Default for Suite<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for Suite<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("depth", &self.stack.len())
            .field("cases", &self.cases.len())
            .finish()
    }
}

/// Pops the part pushed by the enclosing block, even when the block body
/// unwinds.
struct StackGuard<'a, S> {
    suite: &'a mut Suite<S>,
}

impl<S> Drop for StackGuard<'_, S> {
    fn drop(&mut self) {
        self.suite.stack.pop_back();
    }
}
