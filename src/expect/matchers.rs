//! The three matcher forms: equality, async completion, containment.
//!
//! Every matcher follows the same protocol: bind strategies out of the
//! registry (fallible, at construction), then build an [`Expectation`] that
//! materializes the actual value, compares with the bound equality, applies
//! negation, and formats a failure message with the bound formatter.

use std::sync::Arc;

use futures::future::FutureExt;

use super::{Expect, Expectation, ExpectationResult, Source};
use crate::errors::{Fault, StrategyError};
use crate::strategy::{EqualityFn, FormatterFn};

impl<T> Expect<T>
where
    T: Send + Sync + 'static,
{
    /// Binds the equality matcher.
    ///
    /// Evaluation yields `Passed`, `Failed` with
    /// `"Expected {expected} but found {actual}"` (or
    /// `"Expected {actual} to not equal {expected}"` when negated), or
    /// `Errored` when materializing the actual value fails.
    pub fn equals(&self, expected: T) -> Result<Expectation, StrategyError> {
        let eq = self.registry.equality::<T>()?;
        let fmt = self.registry.formatter::<T>()?;
        let negated = self.negated;
        Ok(bind(&self.source, move |outcome| match outcome {
            Err(fault) => ExpectationResult::Errored(fault),
            Ok(actual) => judge_equality(&eq, &fmt, &actual, &expected, negated),
        }))
    }

    /// Binds the async-completion matcher.
    ///
    /// A rejected computation is an expected, recoverable outcome of this
    /// matcher, never a fault of the engine: negated, the rejection trivially
    /// satisfies "does not complete with"; otherwise it yields `Failed`
    /// citing the cause through the fault formatter.
    pub fn completes_with(&self, expected: T) -> Result<Expectation, StrategyError> {
        let eq = self.registry.equality::<T>()?;
        let fmt = self.registry.formatter::<T>()?;
        let fault_fmt = self.registry.formatter::<Fault>()?;
        let negated = self.negated;
        Ok(bind(&self.source, move |outcome| match outcome {
            Err(fault) => {
                if negated {
                    ExpectationResult::Passed
                } else {
                    ExpectationResult::Failed(format!(
                        "Expected completion with {} but the computation failed: {}",
                        fmt.render(&expected),
                        fault_fmt.render(&fault),
                    ))
                }
            }
            Ok(actual) => judge_equality(&eq, &fmt, &actual, &expected, negated),
        }))
    }
}

impl<T> Expect<Vec<T>>
where
    T: Send + Sync + 'static,
{
    /// Binds the containment matcher over a finite sequence.
    ///
    /// The sequence is iterated fully; negation flips whether "found" counts
    /// as a pass. Failure messages list the formatted elements, capped at the
    /// handle's listing cap.
    pub fn contains(&self, expected: T) -> Result<Expectation, StrategyError> {
        let eq = self.registry.equality::<T>()?;
        let fmt = self.registry.formatter::<T>()?;
        let negated = self.negated;
        let cap = self.listing_cap;
        Ok(bind(&self.source, move |outcome| match outcome {
            Err(fault) => ExpectationResult::Errored(fault),
            Ok(items) => judge_containment(&eq, &fmt, &items, &expected, negated, cap),
        }))
    }
}

/// Couples one value source with one judgment closure into an `Expectation`.
fn bind<T, J>(source: &Source<T>, judge: J) -> Expectation
where
    T: Send + 'static,
    J: Fn(Result<T, Fault>) -> ExpectationResult + Send + Sync + 'static,
{
    let source = source.clone();
    let judge = Arc::new(judge);
    Expectation::new(move || {
        let pending = source.materialize();
        let judge = Arc::clone(&judge);
        async move { judge(pending.await) }.boxed()
    })
}

fn judge_equality<T>(
    eq: &EqualityFn<T>,
    fmt: &FormatterFn<T>,
    actual: &T,
    expected: &T,
    negated: bool,
) -> ExpectationResult {
    let matched = eq.check(actual, expected);
    if matched != negated {
        return ExpectationResult::Passed;
    }
    let message = if negated {
        format!(
            "Expected {} to not equal {}",
            fmt.render(actual),
            fmt.render(expected),
        )
    } else {
        format!(
            "Expected {} but found {}",
            fmt.render(expected),
            fmt.render(actual),
        )
    };
    ExpectationResult::Failed(message)
}

fn judge_containment<T>(
    eq: &EqualityFn<T>,
    fmt: &FormatterFn<T>,
    items: &[T],
    expected: &T,
    negated: bool,
    cap: usize,
) -> ExpectationResult {
    let mut found = false;
    let mut listed = Vec::new();
    // Membership is always decided over the full sequence; only the
    // diagnostic listing is capped.
    for item in items {
        if eq.check(item, expected) {
            found = true;
        }
        if listed.len() < cap {
            listed.push(fmt.render(item));
        }
    }
    if found != negated {
        return ExpectationResult::Passed;
    }
    let mut listing = listed.join(", ");
    let overflow = items.len().saturating_sub(cap);
    if overflow > 0 {
        listing.push_str(&format!(", and {overflow} more"));
    }
    let message = if negated {
        format!("Expected [{listing}] to not contain {}", fmt.render(expected))
    } else {
        format!("Expected [{listing}] to contain {}", fmt.render(expected))
    };
    ExpectationResult::Failed(message)
}
