//! # TieredFeedback Strategy
//!
//! Renders plain-text feedback in four levels of detail. Each level contains
//! everything of the level below it:
//!
//! 1. [`FeedbackLevel::OnlyTimes`]: compile and run timings.
//! 2. [`FeedbackLevel::TimesCountOfTests`]: adds the test counts.
//! 3. [`FeedbackLevel::AllExceptStacktrace`]: adds the runner output,
//!    including the numbered failures and their messages, with the `at ...)`
//!    stack frames removed.
//! 4. [`FeedbackLevel::All`]: adds the grade breakdown for the audit and the
//!    unit tests and hints for known runtime faults. The runner output of
//!    level 3 moves into the unit test section.
//!
//! The verdict phrase closes the feedback at every level.

use std::fmt::Write;

use async_trait::async_trait;
use code_runner::{ExecutionResult, FeedbackLevel};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{messages, runtime_faults};
use crate::error::MarkerError;
use crate::report::Verdict;
use crate::traits::feedback::{Feedback, FeedbackContext};

static STACK_FRAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*at .*\)\r?\n").expect("valid stack frame regex"));

#[derive(Debug, Default)]
pub struct TieredFeedback;

#[async_trait]
impl Feedback for TieredFeedback {
    async fn assemble_feedback(&self, ctx: &FeedbackContext<'_>) -> Result<String, MarkerError> {
        Ok(render(ctx))
    }
}

/// Builds the feedback text for a submission whose tests ran.
pub fn render(ctx: &FeedbackContext<'_>) -> String {
    let mut out = String::new();
    let findings = ctx.audit.clamped(ctx.max_audit_findings);
    let verdict = Verdict::decide(ctx.tests.total_tests, ctx.tests.total_errors(), findings);

    let _ = writeln!(out, "{}", messages::compiling(ctx.compile_time));
    let _ = writeln!(out, "{}", messages::running(ctx.test_run_time));

    if ctx.level >= FeedbackLevel::TimesCountOfTests {
        let _ = writeln!(
            out,
            "{}",
            messages::test_counts(ctx.tests.total_tests, ctx.tests.failures, ctx.tests.errors)
        );
    }

    if ctx.level == FeedbackLevel::AllExceptStacktrace {
        out.push('\n');
        out.push_str(&strip_stack_frames(ctx.junit_output));
        ensure_newline(&mut out);
    }

    if ctx.level >= FeedbackLevel::All {
        out.push('\n');
        let _ = writeln!(out, "{}", verdict_phrase(verdict));
        let _ = writeln!(out, "{}", messages::global_grade(ctx.score.fraction));
        out.push('\n');
        write_audit_section(&mut out, ctx, findings);
        out.push('\n');
        write_unit_test_section(&mut out, ctx);

        let faults = runtime_faults::detect(ctx.junit_output);
        if !faults.is_empty() {
            out.push('\n');
            for fault in faults {
                let _ = writeln!(out, "{}", fault.hint);
            }
        }
    }

    out.push('\n');
    out.push_str(verdict_phrase(verdict));
    out.push('\n');
    out
}

/// Feedback for a submission that never reached a test result.
pub fn render_error(result: &ExecutionResult) -> String {
    match result {
        ExecutionResult::CompileStudentError { compiler_output } => {
            format!("{}\n{}", messages::COMPILE_STUDENT_ERROR, compiler_output)
        }
        ExecutionResult::CompileTestError { compiler_output } => test_definition_error(compiler_output),
        ExecutionResult::TimeoutRunning => messages::TIMEOUT_RUNNING.to_string(),
        ExecutionResult::RemoteServerError { message } => {
            format!("{}: {}", messages::REMOTE_SERVER_ERROR, message)
        }
        ExecutionResult::Success { .. } => String::new(),
    }
}

/// Feedback for a test run whose output could not be parsed.
pub fn render_parse_failure(junit_output: &str) -> String {
    test_definition_error(junit_output)
}

fn test_definition_error(details: &str) -> String {
    format!(
        "{}\n\n{}\n\n{}\n{}",
        messages::COMPILE_TEST_ERROR,
        messages::TEST_DEFINITION_ERROR,
        messages::EXECUTION_DETAILS,
        details
    )
}

fn verdict_phrase(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::FullyCorrect => messages::FULLY_CORRECT,
        Verdict::PartiallyCorrect => messages::PARTIALLY_CORRECT,
        Verdict::WrongAnswer => messages::WRONG_ANSWER,
    }
}

fn strip_stack_frames(output: &str) -> String {
    STACK_FRAME.replace_all(output, "").into_owned()
}

fn write_audit_section(out: &mut String, ctx: &FeedbackContext<'_>, findings: u32) {
    let weight = messages::percent(ctx.audit_weight);
    let _ = writeln!(out, "== Results of Code Audit ==");
    let _ = writeln!(out, "Value of Code Audit in question grade: {weight}%");
    let _ = writeln!(out, "The first {} errors give bad points", ctx.max_audit_findings);
    let _ = writeln!(out, "Number of errors made by the student: {findings}");
    let _ = writeln!(
        out,
        "Grade for section Code Audit: {}% / {weight}%",
        messages::percent(ctx.score.style_points(ctx.audit_weight) / 100.0)
    );
    let _ = writeln!(out, "Details of audit hereafter:");
    out.push_str(&ctx.audit.raw_text);
    ensure_newline(out);
}

fn write_unit_test_section(out: &mut String, ctx: &FeedbackContext<'_>) {
    let tests = ctx.tests;
    let weight = messages::percent(1.0 - ctx.audit_weight);
    let _ = writeln!(out, "== Results of Unit Tests ==");
    let _ = writeln!(out, "Number of evaluated tests: {}", tests.total_tests);
    let _ = writeln!(out, "Number of observed failures: {} / {}", tests.failures, tests.total_tests);
    let _ = writeln!(out, "Number of observed errors: {} / {}", tests.errors, tests.total_tests);
    let _ = writeln!(
        out,
        "Grade for section Unit Tests: {}% / {weight}%",
        messages::percent(ctx.score.code_points(ctx.audit_weight) / 100.0)
    );
    let _ = writeln!(out, "Details of unit tests hereafter:");
    out.push_str(&strip_stack_frames(ctx.junit_output));
    ensure_newline(out);
}

fn ensure_newline(out: &mut String) {
    if !out.ends_with('\n') {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::compute_score;
    use crate::types::{AuditOutcome, TestOutcome};

    const FAILING_RUN: &str = "JUnit version 4.13\n.F.E\nTime: 0.02\nThere were 2 failures:\n\
1) testAdd(CalcTest)\njava.lang.AssertionError: expected:<4> but was:<5>\n\
\tat org.junit.Assert.fail(Assert.java:89)\n\
\tat CalcTest.testAdd(CalcTest.java:9)\n\
2) testDiv(CalcTest)\njava.lang.NullPointerException\n\
\tat Calc.div(Calc.java:4)\n\
\nFAILURES!!!\nTests run: 2,  Failures: 2\n";

    fn context<'a>(level: FeedbackLevel, audit: &'a AuditOutcome, output: &'a str) -> FeedbackContext<'a> {
        let tests = TestOutcome {
            total_tests: 4,
            failures: 1,
            errors: 1,
        };
        FeedbackContext {
            level,
            tests,
            audit,
            score: compute_score(&tests, audit, 0.1, 6),
            audit_weight: 0.1,
            max_audit_findings: 6,
            junit_output: output,
            compile_time: 0.44,
            test_run_time: 0.21,
        }
    }

    fn clean_audit() -> AuditOutcome {
        AuditOutcome {
            finding_count: 0,
            raw_text: "Starting audit...\nAudit done.\n".into(),
        }
    }

    #[test]
    fn test_only_times() {
        let audit = clean_audit();
        let text = render(&context(FeedbackLevel::OnlyTimes, &audit, FAILING_RUN));
        assert_eq!(
            text,
            "Compiling: 0.4 s\nRunning tests: 0.2 s\n\nYour answer is partially correct.\n"
        );
    }

    #[test]
    fn test_counts_tier_adds_summary() {
        let audit = clean_audit();
        let text = render(&context(FeedbackLevel::TimesCountOfTests, &audit, FAILING_RUN));
        assert!(text.contains("Tests: 4, Failures: 1, Errors: 1\n"));
        assert!(!text.contains("JUnit version"));
    }

    #[test]
    fn test_except_stacktrace_lists_failures_without_frames() {
        let audit = clean_audit();
        let text = render(&context(FeedbackLevel::AllExceptStacktrace, &audit, FAILING_RUN));
        assert!(text.contains("JUnit version 4.13\n.F.E\nTime: 0.02\n"));
        assert!(text.contains("There were 2 failures:\n1) testAdd(CalcTest)\n"));
        assert!(text.contains("java.lang.AssertionError: expected:<4> but was:<5>\n2) testDiv(CalcTest)\n"));
        assert!(text.contains("java.lang.NullPointerException\n"));
        assert!(text.contains("FAILURES!!!\nTests run: 2,  Failures: 2\n"));
        assert!(!text.contains("at org.junit.Assert.fail"));
        assert!(!text.contains("at Calc.div"));
        assert!(!text.contains("== Results of Unit Tests =="));
    }

    #[test]
    fn test_except_stacktrace_keeps_output_without_failures() {
        let audit = clean_audit();
        let output = "JUnit version 4.13\n..\nTime: 0.01\n\nOK (2 tests)\n";
        let text = render(&context(FeedbackLevel::AllExceptStacktrace, &audit, output));
        assert!(text.contains("OK (2 tests)"));
    }

    #[test]
    fn test_all_tier_has_breakdown_and_hints() {
        let audit = clean_audit();
        let text = render(&context(FeedbackLevel::All, &audit, FAILING_RUN));
        assert!(text.contains("Global grade for the current question: 55% / 100%"));
        assert!(text.contains("== Results of Code Audit =="));
        assert!(text.contains("Value of Code Audit in question grade: 10%"));
        assert!(text.contains("Grade for section Code Audit: 10% / 10%"));
        assert!(text.contains("Number of observed failures: 1 / 4"));
        assert!(text.contains("Grade for section Unit Tests: 45% / 90%"));
        assert!(text.contains("java.lang.AssertionError: expected:<4> but was:<5>"));
        assert!(text.contains("There were 2 failures:"));
        assert!(!text.contains("at CalcTest.testAdd"));
        assert_eq!(text.matches("There were 2 failures:").count(), 1);
        assert!(text.contains("NullPointerException occurred"));
        assert!(text.ends_with("Your answer is partially correct.\n"));
    }

    #[test]
    fn test_tiers_are_additive() {
        let audit = clean_audit();
        let levels = [
            FeedbackLevel::OnlyTimes,
            FeedbackLevel::TimesCountOfTests,
            FeedbackLevel::AllExceptStacktrace,
            FeedbackLevel::All,
        ];
        let texts: Vec<String> = levels
            .iter()
            .map(|level| render(&context(*level, &audit, FAILING_RUN)))
            .collect();
        for pair in texts.windows(2) {
            for line in pair[0].lines().filter(|l| !l.is_empty()) {
                assert!(pair[1].contains(line), "missing {line:?} in higher tier");
            }
        }
    }

    #[test]
    fn test_error_feedback() {
        let text = render_error(&ExecutionResult::RemoteServerError {
            message: "502 Bad Gateway".into(),
        });
        assert_eq!(text, "REMOTE_SERVER_ERROR: 502 Bad Gateway");

        let text = render_error(&ExecutionResult::CompileStudentError {
            compiler_output: "/Calc.java:2: error: ';' expected".into(),
        });
        assert!(text.starts_with(messages::COMPILE_STUDENT_ERROR));
        assert!(text.contains("';' expected"));

        let text = render_error(&ExecutionResult::CompileTestError {
            compiler_output: "cannot find symbol".into(),
        });
        assert!(text.contains(messages::TEST_DEFINITION_ERROR));
        assert!(text.ends_with("cannot find symbol"));
    }
}
