//! # Types Module
//!
//! Counts extracted from tool output, shared by the parsers, the scorer and
//! the feedback builder.

use serde::Serialize;

/// Result line of one test run.
///
/// `failures + errors <= total_tests` always holds for parsed values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    pub total_tests: u32,
    pub failures: u32,
    pub errors: u32,
}

impl TestOutcome {
    pub fn total_errors(&self) -> u32 {
        self.failures + self.errors
    }
}

/// Style audit findings for the submitted source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditOutcome {
    pub finding_count: u32,
    pub raw_text: String,
}

impl AuditOutcome {
    /// Finding count saturated to `[0, max]`.
    pub fn clamped(&self, max: u32) -> u32 {
        self.finding_count.min(max)
    }
}
