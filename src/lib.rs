//! specfold: a composable test-specification and assertion engine.
//!
//! Two subsystems make up the core:
//!
//! - The **suite builder** ([`suite`]): nested, named setup steps that fold
//!   into a per-test state, and registration of immutable, runnable test
//!   cases snapshotting the setup chain in effect at declaration time.
//! - The **expectation engine** ([`expect`]): deferred, possibly-asynchronous
//!   judgments produced by matchers (`equals`, `contains`, `completes_with`),
//!   negatable, and parameterized by per-type equality and formatting
//!   strategies looked up in a [`strategy::StrategyRegistry`].
//!
//! Discovery, scheduling, and report rendering belong to an external runner;
//! this crate hands it test cases (`name_parts()` + `run()`) and outcome data.
//!
//! ```rust
//! use specfold::prelude::*;
//!
//! let mut suite: Suite<i32> = Suite::new();
//! suite.given("a counter at one", |_| 1, |s| {
//!     s.test("stays one", |state| {
//!         let verdict = futures::executor::block_on(
//!             expect(state)
//!                 .equals(1)
//!                 .expect("i32 strategies are built in")
//!                 .evaluate(),
//!         );
//!         verdict.assert_passed();
//!     });
//! });
//! for case in suite.into_cases() {
//!     case.run();
//! }
//! ```

pub mod errors;
pub mod expect;
pub mod report;
pub mod strategy;
pub mod suite;

pub use errors::{Fault, StrategyError, StrategyKind};
pub use expect::{
    expect, expect_future, expect_with, Expect, Expectation, ExpectationResult,
    DEFAULT_LISTING_CAP,
};
pub use report::TestSummary;
pub use strategy::{
    build_default_strategy_registry, default_registry, EqualityFn, FormatterFn, StrategyRegistry,
};
pub use suite::{SetupPart, Suite, TestCase};

/// One-stop imports for test authors.
pub mod prelude {
    pub use crate::errors::Fault;
    pub use crate::expect::{expect, expect_future, expect_with, Expectation, ExpectationResult};
    pub use crate::report::TestSummary;
    pub use crate::strategy::{build_default_strategy_registry, StrategyRegistry};
    pub use crate::suite::{Suite, TestCase};
}
