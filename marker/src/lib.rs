//! # Marker Library
//!
//! Turns the raw output of a compile/test/audit cycle into a grade and
//! feedback text.
//!
//! ## Key Concepts
//! - **MarkingJob**: grades one submission end to end.
//! - **Parsers**: extract test counts and audit findings from tool output.
//! - **Scorer**: weighted combination of unit tests and style audit.
//! - **Feedback**: text rendered by [`TieredFeedback`] behind the [`Feedback`] trait.
//! - **FeedbackStore**: where the feedback of each attempt is kept.

pub mod error;
pub mod feedback;
pub mod parsers;
pub mod report;
pub mod scorer;
pub mod store;
pub mod traits;
pub mod types;

use std::sync::Arc;

use code_runner::{ExecutionBackend, ExecutionResult, GradingRequest, select_backend};
use tracing::{info, warn};
use util::execution_config::ExecutionConfig;

use crate::error::MarkerError;
use crate::feedback::tiered_feedback::{self, TieredFeedback};
use crate::parsers::audit_parser::AuditParser;
use crate::parsers::test_output_parser::TestOutputParser;
use crate::report::{ErrorKind, GradeResult};
use crate::scorer::compute_score;
use crate::store::{FeedbackStore, InMemoryFeedbackStore};
use crate::traits::feedback::{Feedback, FeedbackContext};
use crate::traits::parser::Parser;

/// A marking job for a single submission.
///
/// # Fields
/// - `request`: the submission, test class and grading options.
/// - `request_id`: stable id of the attempt; names the workspace and keys the stored feedback.
/// - `backend`: where the code is executed. Chosen from `config` unless overridden.
/// - `store`: receives the feedback text.
/// - `feedback`: strategy that renders the feedback text.
pub struct MarkingJob<'a> {
    request: GradingRequest,
    request_id: String,
    config: ExecutionConfig,
    backend: Option<Box<dyn ExecutionBackend + 'a>>,
    store: Arc<dyn FeedbackStore + 'a>,
    feedback: Box<dyn Feedback + Send + Sync + 'a>,
}

impl<'a> MarkingJob<'a> {
    pub fn new(request: GradingRequest, request_id: impl Into<String>, config: ExecutionConfig) -> Self {
        Self {
            request,
            request_id: request_id.into(),
            config,
            backend: None,
            store: Arc::new(InMemoryFeedbackStore::new()),
            feedback: Box::new(TieredFeedback),
        }
    }

    /// Run on this backend instead of the one selected from configuration.
    pub fn with_backend<B: ExecutionBackend + 'a>(mut self, backend: B) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    pub fn with_store(mut self, store: Arc<dyn FeedbackStore + 'a>) -> Self {
        self.store = store;
        self
    }

    /// Executes, parses, scores and stores feedback for the submission.
    ///
    /// # Returns
    /// * `Ok(GradeResult)` for every outcome the submission is graded on,
    ///   including compile errors and timeouts (fraction 0, `error_kind` set).
    /// * `Err(MarkerError)` when the request cannot be graded at all
    ///   (bad configuration, spawn or I/O failure, store failure).
    pub async fn mark(self) -> Result<GradeResult, MarkerError> {
        let backend: Box<dyn ExecutionBackend + 'a> = match self.backend {
            Some(backend) => backend,
            None => select_backend(&self.config)?,
        };

        let result = backend.execute(&self.request, &self.request_id).await?;

        let grade = match result {
            ExecutionResult::Success {
                junit_output,
                audit_output,
                compile_time,
                test_run_time,
            } => match TestOutputParser.parse(junit_output.as_str(), &self.config) {
                Ok(tests) => {
                    let audit = AuditParser.parse(audit_output.as_str(), &self.config)?;
                    let max_findings = self.config.scoring.max_audit_findings;
                    let score = compute_score(&tests, &audit, self.request.audit_weight, max_findings);
                    let ctx = FeedbackContext {
                        level: self.request.feedback_level,
                        tests,
                        audit: &audit,
                        score,
                        audit_weight: self.request.audit_weight,
                        max_audit_findings: max_findings,
                        junit_output: &junit_output,
                        compile_time,
                        test_run_time,
                    };
                    GradeResult {
                        fraction: score.fraction,
                        error_kind: None,
                        feedback: self.feedback.assemble_feedback(&ctx).await?,
                    }
                }
                Err(MarkerError::ParseFailure(reason)) => {
                    warn!(request_id = %self.request_id, reason = %reason, "Unusable test output");
                    GradeResult::failed(
                        ErrorKind::ParseFailure,
                        tiered_feedback::render_parse_failure(&junit_output),
                    )
                }
                Err(e) => return Err(e),
            },
            other => {
                let kind = ErrorKind::from_execution(&other).unwrap_or(ErrorKind::RemoteServerError);
                GradeResult::failed(kind, tiered_feedback::render_error(&other))
            }
        };

        self.store.upsert(&self.request_id, &grade.feedback).await?;
        info!(
            request_id = %self.request_id,
            backend = backend.name(),
            fraction = grade.fraction,
            failed = grade.is_error(),
            error_kind = ?grade.error_kind,
            "Graded submission"
        );
        Ok(grade)
    }
}
