//! Expectation handles and their deferred evaluation protocol.
//!
//! An [`Expect`] wraps a value source (a deferred closure or an asynchronous
//! computation) together with a negation flag. The matchers in [`matchers`]
//! bind per-type strategies at construction time and produce an
//! [`Expectation`], an opaque judgment whose `evaluate()` resolves to exactly
//! one [`ExpectationResult`] per call.
//!
//! The engine imposes no timeout or cancellation of its own; a caller that
//! needs a deadline supplies it externally.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};

use crate::errors::Fault;
use crate::strategy::{default_registry, StrategyRegistry};

pub mod matchers;

/// Default number of formatted elements a containment failure lists before
/// truncating.
pub const DEFAULT_LISTING_CAP: usize = 32;

// ============================================================================
// OUTCOMES
// ============================================================================

/// Terminal outcome of one expectation evaluation. Never retried by the
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpectationResult {
    /// The judgment held.
    Passed,
    /// The judgment did not hold; the message carries formatted actual and
    /// expected values (or collection contents for containment).
    Failed(String),
    /// Materializing the actual value itself failed.
    Errored(Fault),
}

impl ExpectationResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, ExpectationResult::Passed)
    }

    /// Failure message, when the outcome is `Failed`.
    pub fn message(&self) -> Option<&str> {
        match self {
            ExpectationResult::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Captured fault, when the outcome is `Errored`.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            ExpectationResult::Errored(fault) => Some(fault),
            _ => None,
        }
    }

    /// Panics unless the outcome is `Passed`.
    ///
    /// The bridge from outcome data to the panic channel: a test body that
    /// wants a non-passing expectation to abort the case calls this, and the
    /// external runner catches and classifies the unwind.
    pub fn assert_passed(&self) {
        match self {
            ExpectationResult::Passed => {}
            ExpectationResult::Failed(message) => panic!("{message}"),
            ExpectationResult::Errored(fault) => panic!("{fault}"),
        }
    }
}

// ============================================================================
// VALUE SOURCES
// ============================================================================

/// Where an actual value comes from. Factories are re-invoked on every
/// evaluation; the engine adds no idempotence guarantee of its own.
enum Source<T> {
    /// A deferred synchronous computation.
    Deferred(Arc<dyn Fn() -> Result<T, Fault> + Send + Sync>),
    /// A factory for an asynchronous computation.
    Async(Arc<dyn Fn() -> BoxFuture<'static, Result<T, Fault>> + Send + Sync>),
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        match self {
            Source::Deferred(f) => Source::Deferred(Arc::clone(f)),
            Source::Async(f) => Source::Async(Arc::clone(f)),
        }
    }
}

impl<T: Send + 'static> Source<T> {
    /// Starts one materialization of the actual value.
    fn materialize(&self) -> BoxFuture<'static, Result<T, Fault>> {
        match self {
            Source::Deferred(f) => {
                let f = Arc::clone(f);
                async move { f() }.boxed()
            }
            Source::Async(f) => f(),
        }
    }
}

// ============================================================================
// EXPECT HANDLE
// ============================================================================

/// Handle over a deferred computation of `T` plus a negation flag.
///
/// Immutable: [`Expect::not`] returns a new handle with the flag flipped and
/// never forces the underlying computation.
pub struct Expect<T> {
    source: Source<T>,
    negated: bool,
    registry: Arc<StrategyRegistry>,
    listing_cap: usize,
}

impl<T> Clone for Expect<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            negated: self.negated,
            registry: Arc::clone(&self.registry),
            listing_cap: self.listing_cap,
        }
    }
}

/// Expectation over an already-computed value.
pub fn expect<T>(value: T) -> Expect<T>
where
    T: Clone + Send + Sync + 'static,
{
    expect_with(move || Ok(value.clone()))
}

/// Expectation over a deferred computation, forced only at evaluation time.
/// An `Err` during materialization becomes an `Errored` outcome (or the
/// completion matcher's rejection handling), never an uncaught fault.
pub fn expect_with<T, F>(deferred: F) -> Expect<T>
where
    F: Fn() -> Result<T, Fault> + Send + Sync + 'static,
{
    Expect {
        source: Source::Deferred(Arc::new(deferred)),
        negated: false,
        registry: default_registry(),
        listing_cap: DEFAULT_LISTING_CAP,
    }
}

/// Expectation over an asynchronous computation. The factory is invoked once
/// per evaluation, yielding a fresh future each time.
pub fn expect_future<T, F, Fut>(factory: F) -> Expect<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, Fault>> + Send + 'static,
{
    Expect {
        source: Source::Async(Arc::new(move || factory().boxed())),
        negated: false,
        registry: default_registry(),
        listing_cap: DEFAULT_LISTING_CAP,
    }
}

impl<T> Expect<T> {
    /// Flips the negation flag. Pure and chainable; does not force the
    /// deferred computation.
    pub fn not(self) -> Self {
        Self {
            negated: !self.negated,
            ..self
        }
    }

    /// Swaps the strategy registry the matchers will bind against.
    pub fn with_registry(self, registry: Arc<StrategyRegistry>) -> Self {
        Self { registry, ..self }
    }

    /// Overrides how many formatted elements a containment failure lists.
    pub fn listing_cap(self, cap: usize) -> Self {
        Self {
            listing_cap: cap,
            ..self
        }
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl<T> fmt::Debug for Expect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expect")
            .field("negated", &self.negated)
            .field("listing_cap", &self.listing_cap)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// EXPECTATION
// ============================================================================

/// An opaque, deferred, asynchronously evaluated judgment.
pub struct Expectation {
    eval: Arc<dyn Fn() -> BoxFuture<'static, ExpectationResult> + Send + Sync>,
}

impl Expectation {
    /// Wraps a factory producing one fresh evaluation future per call.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, ExpectationResult> + Send + Sync + 'static,
    {
        Self {
            eval: Arc::new(factory),
        }
    }

    /// Runs one evaluation to its single resolution.
    pub async fn evaluate(&self) -> ExpectationResult {
        (self.eval)().await
    }

    /// Compound expectation over several inner judgments.
    ///
    /// Aggregation policy: every inner expectation is evaluated (wait-for-all,
    /// no short-circuit). The first `Errored` in declaration order dominates;
    /// otherwise all failure messages are joined with newlines into a single
    /// `Failed`; otherwise the compound passes. Exactly one result is
    /// resolved, and no inner outcome is dropped.
    pub fn all(inner: Vec<Expectation>) -> Expectation {
        Expectation::new(move || {
            let pending: Vec<_> = inner.iter().map(|e| (e.eval)()).collect();
            async move {
                let results = futures::future::join_all(pending).await;
                let mut failures = Vec::new();
                for result in results {
                    match result {
                        ExpectationResult::Passed => {}
                        ExpectationResult::Failed(message) => failures.push(message),
                        ExpectationResult::Errored(fault) => {
                            return ExpectationResult::Errored(fault)
                        }
                    }
                }
                if failures.is_empty() {
                    ExpectationResult::Passed
                } else {
                    ExpectationResult::Failed(failures.join("\n"))
                }
            }
            .boxed()
        })
    }
}

impl Clone for Expectation {
    fn clone(&self) -> Self {
        Self {
            eval: Arc::clone(&self.eval),
        }
    }
}

impl fmt::Debug for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Expectation")
    }
}
