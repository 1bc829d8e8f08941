//! Error and fault types for the assertion engine.
//!
//! Two failure channels exist and must never be confused:
//!
//! - [`StrategyError`] is a binding-time failure raised while a matcher is
//!   being constructed. A matcher whose value type has no registered strategy
//!   must never come into existence, so these surface at the assertion call
//!   site, not during evaluation.
//! - [`Fault`] is a captured error value from the computation under test. A
//!   fault is data carried inside an evaluation outcome, not a raised error.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which strategy table a lookup targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Equality,
    Formatter,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Equality => "equality",
            StrategyKind::Formatter => "formatter",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Binding-time failure: matcher construction could not resolve a strategy.
///
/// Returned by the matcher constructors (`equals`, `contains`,
/// `completes_with`) and by composite registration. Once an `Expectation`
/// exists, strategy resolution can no longer fail.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("no {kind} strategy registered for `{type_name}`")]
#[diagnostic(
    code(specfold::strategy::unbound),
    help("register a {kind} strategy for `{type_name}` on the registry before constructing the matcher")
)]
pub struct StrategyError {
    pub kind: StrategyKind,
    pub type_name: &'static str,
}

impl StrategyError {
    pub fn unbound(kind: StrategyKind, type_name: &'static str) -> Self {
        Self { kind, type_name }
    }
}

/// A captured error value from a failing computation under test.
///
/// Renders as `"<kind>: <message>"`, which is also the built-in formatter
/// strategy for faults. Convertible from any [`std::error::Error`] via
/// [`Fault::of`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[error("{kind}: {message}")]
pub struct Fault {
    pub kind: String,
    pub message: String,
}

impl Fault {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Captures an error value, using the error type's unqualified name as the
    /// fault kind.
    pub fn of<E: std::error::Error>(err: &E) -> Self {
        Self::new(short_type_name::<E>(), err.to_string())
    }
}

/// Last path segment of a type name; `std::io::Error` becomes `Error`.
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}
