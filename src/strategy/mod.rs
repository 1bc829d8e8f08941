//! Per-type equality and formatting strategies.
//!
//! Matchers never compare or print values directly: they bind an
//! [`EqualityFn`] and a [`FormatterFn`] out of a [`StrategyRegistry`] at
//! construction time. A type with no registered strategy fails the binding
//! with a [`StrategyError`] before any evaluation can happen, which keeps
//! type errors local to the assertion call site.
//!
//! Registry invariant: lookups are pure. A registry handed to a matcher is
//! never mutated behind its back; callers extend a cloned registry instead of
//! patching the shared default.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::errors::{StrategyError, StrategyKind};

pub mod builtins;

pub use builtins::{build_default_strategy_registry, default_registry};

// ============================================================================
// STRATEGY HANDLES
// ============================================================================

/// A per-type equality strategy: `(&T, &T) -> bool`.
///
/// Cheap to clone; every matcher bound against it shares the same closure.
pub struct EqualityFn<T: ?Sized>(Arc<dyn Fn(&T, &T) -> bool + Send + Sync>);

impl<T: ?Sized> EqualityFn<T> {
    pub fn new(check: impl Fn(&T, &T) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(check))
    }

    pub fn check(&self, actual: &T, expected: &T) -> bool {
        (self.0)(actual, expected)
    }
}

impl<T: ?Sized> Clone for EqualityFn<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> std::fmt::Debug for EqualityFn<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EqualityFn").finish_non_exhaustive()
    }
}

/// A per-type formatting strategy: `(&T) -> String`.
pub struct FormatterFn<T: ?Sized>(Arc<dyn Fn(&T) -> String + Send + Sync>);

impl<T: ?Sized> FormatterFn<T> {
    pub fn new(render: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(render))
    }

    pub fn render(&self, value: &T) -> String {
        (self.0)(value)
    }
}

impl<T: ?Sized> Clone for FormatterFn<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> std::fmt::Debug for FormatterFn<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterFn").finish_non_exhaustive()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Type-indexed lookup table of equality and formatting strategies.
///
/// Open for extension: user code registers strategies for its own types, or
/// derives composite strategies (`Option<T>`, `Vec<T>`) from already
/// registered inner ones, without touching existing entries.
#[derive(Default, Clone)]
pub struct StrategyRegistry {
    equalities: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    formatters: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_equality<T: 'static>(
        &mut self,
        check: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
    ) {
        trace!(value_type = type_name::<T>(), "registering equality strategy");
        self.equalities
            .insert(TypeId::of::<T>(), Arc::new(EqualityFn::new(check)));
    }

    pub fn register_formatter<T: 'static>(
        &mut self,
        render: impl Fn(&T) -> String + Send + Sync + 'static,
    ) {
        trace!(value_type = type_name::<T>(), "registering formatter strategy");
        self.formatters
            .insert(TypeId::of::<T>(), Arc::new(FormatterFn::new(render)));
    }

    /// Registers both strategies for a type whose `PartialEq` and `Display`
    /// impls are authoritative.
    pub fn register_native<T>(&mut self)
    where
        T: PartialEq + fmt::Display + 'static,
    {
        self.register_equality::<T>(|a, b| a == b);
        self.register_formatter::<T>(|v| v.to_string());
    }

    /// Looks up the equality strategy for `T`, or fails the binding.
    pub fn equality<T: 'static>(&self) -> Result<EqualityFn<T>, StrategyError> {
        self.equalities
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<EqualityFn<T>>())
            .cloned()
            .ok_or_else(|| StrategyError::unbound(StrategyKind::Equality, type_name::<T>()))
    }

    /// Looks up the formatter strategy for `T`, or fails the binding.
    pub fn formatter<T: 'static>(&self) -> Result<FormatterFn<T>, StrategyError> {
        self.formatters
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<FormatterFn<T>>())
            .cloned()
            .ok_or_else(|| StrategyError::unbound(StrategyKind::Formatter, type_name::<T>()))
    }

    pub fn has_equality<T: 'static>(&self) -> bool {
        self.equalities.contains_key(&TypeId::of::<T>())
    }

    pub fn has_formatter<T: 'static>(&self) -> bool {
        self.formatters.contains_key(&TypeId::of::<T>())
    }

    pub fn is_empty(&self) -> bool {
        self.equalities.is_empty() && self.formatters.is_empty()
    }

    // ------------------------------------------------------------------------
    // Composite strategies
    // ------------------------------------------------------------------------

    /// Derives `Option<T>` strategies by wrapping the registered strategies
    /// for `T`.
    ///
    /// Present values format as `Some(<inner>)`, absent ones as the literal
    /// `None`. Fails at registration time when `T` itself is unbound.
    pub fn register_option_of<T: 'static>(&mut self) -> Result<(), StrategyError> {
        let inner_eq = self.equality::<T>()?;
        let inner_fmt = self.formatter::<T>()?;
        self.register_equality::<Option<T>>(move |a, b| match (a, b) {
            (Some(x), Some(y)) => inner_eq.check(x, y),
            (None, None) => true,
            _ => false,
        });
        self.register_formatter::<Option<T>>(move |value| match value {
            Some(inner) => format!("Some({})", inner_fmt.render(inner)),
            None => "None".to_string(),
        });
        Ok(())
    }

    /// Derives `Vec<T>` strategies from the registered strategies for `T`:
    /// elementwise equality and `[a, b, c]` formatting.
    pub fn register_sequence_of<T: 'static>(&mut self) -> Result<(), StrategyError> {
        let inner_eq = self.equality::<T>()?;
        let inner_fmt = self.formatter::<T>()?;
        self.register_equality::<Vec<T>>(move |a, b| {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| inner_eq.check(x, y))
        });
        self.register_formatter::<Vec<T>>(move |items| {
            let rendered: Vec<String> = items.iter().map(|i| inner_fmt.render(i)).collect();
            format!("[{}]", rendered.join(", "))
        });
        Ok(())
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("equalities", &self.equalities.len())
            .field("formatters", &self.formatters.len())
            .finish()
    }
}
