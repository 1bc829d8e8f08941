//! Canonical built-in strategy set.
//!
//! Single source of truth for the default registry. All entrypoints that do
//! not supply their own registry share the one built here; never construct a
//! hidden partial registry elsewhere.

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::StrategyRegistry;
use crate::errors::Fault;

macro_rules! register_natives {
    ($registry:expr, $($ty:ty),* $(,)?) => {
        $( $registry.register_native::<$ty>(); )*
    };
}

/// Builds a fully populated registry with all built-in strategies registered.
///
/// Covers the primitive numerics, `bool`, `char`, `String`, and [`Fault`]
/// (rendered `"<kind>: <message>"` through its own `Display`). Composite
/// strategies are not pre-bound; callers derive them per inner type with
/// [`StrategyRegistry::register_option_of`] and
/// [`StrategyRegistry::register_sequence_of`].
pub fn build_default_strategy_registry() -> StrategyRegistry {
    let mut registry = StrategyRegistry::new();
    register_natives!(
        registry, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool,
        char, String,
    );
    registry.register_native::<Fault>();
    registry
}

static DEFAULT_REGISTRY: Lazy<Arc<StrategyRegistry>> =
    Lazy::new(|| Arc::new(build_default_strategy_registry()));

/// Shared canonical registry, used by `expect()` when no registry is supplied.
///
/// The shared instance is immutable; to extend it, clone and register on the
/// copy.
pub fn default_registry() -> Arc<StrategyRegistry> {
    Arc::clone(&DEFAULT_REGISTRY)
}
