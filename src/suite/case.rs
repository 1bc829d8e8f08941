//! The registered test-case record: a name path derived from its setup chain
//! and the run entry point the external runner invokes.

use std::fmt;
use std::sync::Arc;

use im::Vector;
use tracing::debug_span;

use super::SetupPart;

/// An immutable, registered test case.
///
/// Created at declaration time and held by the declaring suite until the
/// runner consumes it. The chain is a structural-sharing snapshot of the
/// declaration stack; later declarations cannot retroactively affect it.
pub struct TestCase<S> {
    chain: Vector<SetupPart<S>>,
    name: String,
    body: Arc<dyn Fn(S) + Send + Sync>,
    init: Arc<dyn Fn() -> S + Send + Sync>,
    skipped: bool,
}

impl<S> Clone for TestCase<S> {
    fn clone(&self) -> Self {
        Self {
            chain: self.chain.clone(),
            name: self.name.clone(),
            body: Arc::clone(&self.body),
            init: Arc::clone(&self.init),
            skipped: self.skipped,
        }
    }
}

impl<S: 'static> TestCase<S> {
    pub(crate) fn new(
        chain: Vector<SetupPart<S>>,
        name: String,
        body: Arc<dyn Fn(S) + Send + Sync>,
        init: Arc<dyn Fn() -> S + Send + Sync>,
        skipped: bool,
    ) -> Self {
        Self {
            chain,
            name,
            body,
            init,
            skipped,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered names of the enclosing setup chain at declaration time, for
    /// the runner to build a hierarchical display name from.
    pub fn name_parts(&self) -> Vec<&str> {
        self.chain.iter().map(SetupPart::name).collect()
    }

    /// Chain names and the case name, joined for display.
    pub fn full_name(&self) -> String {
        let mut parts = self.name_parts();
        parts.push(&self.name);
        parts.join(" ")
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    /// Replays the setup chain left-to-right (outer to inner) over a fresh
    /// initial state, then invokes the body with the folded state.
    ///
    /// Panics while folding or inside the body propagate uncaught: catching
    /// and classifying them is the runner's responsibility.
    pub fn run(&self) {
        let _span = debug_span!("run", case = %self.name).entered();
        let state = self
            .chain
            .iter()
            .fold((self.init)(), |state, part| part.apply(state));
        (self.body)(state);
    }
}

impl<S> fmt::Debug for TestCase<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase")
            .field("name", &self.name)
            .field("chain_depth", &self.chain.len())
            .field("skipped", &self.skipped)
            .finish()
    }
}
