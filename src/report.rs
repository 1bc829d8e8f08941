//! Run-summary data for the external runner/reporter.
//!
//! The core never renders results; it only accumulates the counts a reporter
//! serializes or displays.

use serde::{Deserialize, Serialize};

use crate::expect::ExpectationResult;

/// Accumulated outcome counts for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
}

impl TestSummary {
    pub fn record(&mut self, result: &ExpectationResult) {
        match result {
            ExpectationResult::Passed => self.passed += 1,
            ExpectationResult::Failed(_) => self.failed += 1,
            ExpectationResult::Errored(_) => self.errored += 1,
        }
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.errored > 0
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.errored + self.skipped
    }

    pub fn success_rate(&self) -> f64 {
        let judged = self.passed + self.failed + self.errored;
        if judged == 0 {
            return 0.0;
        }
        (self.passed as f64 / judged as f64) * 100.0
    }

    pub fn merge(&mut self, other: &TestSummary) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.errored += other.errored;
        self.skipped += other.skipped;
    }
}
