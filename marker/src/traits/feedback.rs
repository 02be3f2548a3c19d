//! # Feedback Trait
//!
//! Pluggable feedback strategies. A strategy turns a graded submission into
//! the plain-text feedback that is stored for the attempt.

use async_trait::async_trait;

use crate::error::MarkerError;
use crate::scorer::Score;
use crate::types::{AuditOutcome, TestOutcome};
use code_runner::FeedbackLevel;

/// Everything known about a submission whose tests ran to completion.
#[derive(Debug, Clone)]
pub struct FeedbackContext<'a> {
    pub level: FeedbackLevel,
    pub tests: TestOutcome,
    pub audit: &'a AuditOutcome,
    pub score: Score,
    pub audit_weight: f64,
    pub max_audit_findings: u32,
    pub junit_output: &'a str,
    pub compile_time: f64,
    pub test_run_time: f64,
}

#[async_trait]
pub trait Feedback {
    async fn assemble_feedback(&self, ctx: &FeedbackContext<'_>) -> Result<String, MarkerError>;
}
