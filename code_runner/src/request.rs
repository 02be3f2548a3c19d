use serde::{Deserialize, Serialize};
use util::execution_config::ExecutionConfig;

/// How much detail the generated feedback contains. Each level includes
/// everything of the levels below it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLevel {
    /// Compile and run timings only.
    #[default]
    OnlyTimes,
    /// Timings plus the number of tests, failures and errors.
    TimesCountOfTests,
    /// Adds the test runner output without stack traces.
    AllExceptStacktrace,
    /// Adds the itemized audit and unit test breakdown and runtime fault hints.
    All,
}

/// One submission to be graded. Immutable once built.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GradingRequest {
    pub submission_source: String,
    pub test_class_name: String,
    pub test_source: String,
    #[serde(default)]
    pub feedback_level: FeedbackLevel,
    /// Share of the grade decided by the style audit, in `[0, 1]`.
    pub audit_weight: f64,
}

impl GradingRequest {
    pub fn new(
        submission_source: impl Into<String>,
        test_class_name: impl Into<String>,
        test_source: impl Into<String>,
        feedback_level: FeedbackLevel,
        audit_weight: f64,
    ) -> Self {
        let audit_weight = if audit_weight.is_finite() {
            audit_weight.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            submission_source: submission_source.into(),
            test_class_name: test_class_name.into(),
            test_source: test_source.into(),
            feedback_level,
            audit_weight,
        }
    }

    /// A request for a question that does not set its own audit weight.
    pub fn with_default_weight(
        submission_source: impl Into<String>,
        test_class_name: impl Into<String>,
        test_source: impl Into<String>,
        feedback_level: FeedbackLevel,
        config: &ExecutionConfig,
    ) -> Self {
        Self::new(
            submission_source,
            test_class_name,
            test_source,
            feedback_level,
            config.scoring.default_audit_weight,
        )
    }
}
