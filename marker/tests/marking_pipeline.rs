#![cfg(unix)]

use std::sync::Arc;

use code_runner::{FeedbackLevel, GradingRequest};
use marker::MarkingJob;
use marker::error::MarkerError;
use marker::report::ErrorKind;
use marker::store::{FeedbackStore, InMemoryFeedbackStore};
use tempfile::tempdir;
use util::test_helpers::{fake_toolchain_config, workspaces_of, write_script};

const STUDENT: &str = "public class Greeter {\n  String greet() { return \"hi\"; }\n}\n";
const TESTS: &str = "public class GreeterTest {}\n";

fn request(level: FeedbackLevel) -> GradingRequest {
    GradingRequest::new(STUDENT, "GreeterTest", TESTS, level, 0.2)
}

#[tokio::test]
async fn test_passing_submission_gets_full_marks() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let config = fake_toolchain_config(tools.path(), root.path());
    let store = Arc::new(InMemoryFeedbackStore::new());

    let grade = MarkingJob::new(request(FeedbackLevel::All), "21_1", config)
        .with_store(store.clone())
        .mark()
        .await
        .unwrap();

    assert!((grade.fraction - 1.0).abs() < 1e-9);
    assert_eq!(grade.error_kind, None);
    assert!(grade.feedback.ends_with("Your answer is fully correct.\n"));
    assert_eq!(store.get("21_1").await.unwrap(), Some(grade.feedback));
    assert!(workspaces_of(root.path(), "21_1").is_empty());
}

#[tokio::test]
async fn test_style_findings_reduce_the_grade() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let config = fake_toolchain_config(tools.path(), root.path());
    write_script(
        tools.path(),
        "checkstyle",
        "for last; do :; done; echo \"$last:1: Missing a Javadoc comment.\"; echo \"$last:2:3: Line is longer than 80 characters.\"; echo \"$last:3: '}' at column 1.\"",
    );

    let grade = MarkingJob::new(request(FeedbackLevel::All), "21_2", config)
        .mark()
        .await
        .unwrap();

    // code 1.0 * 0.8 + style 0.5 * 0.2
    assert!((grade.fraction - 0.9).abs() < 1e-9);
    assert!(grade.feedback.contains("Number of errors made by the student: 3"));
    assert!(grade.feedback.ends_with("Your answer is partially correct.\n"));
}

#[tokio::test]
async fn test_compile_error_is_graded_zero() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let config = fake_toolchain_config(tools.path(), root.path());
    write_script(
        tools.path(),
        "javac",
        "for last; do :; done; echo \"$last:2: error: missing return statement\"",
    );

    let grade = MarkingJob::new(request(FeedbackLevel::OnlyTimes), "21_3", config)
        .mark()
        .await
        .unwrap();

    assert_eq!(grade.fraction, 0.0);
    assert_eq!(grade.error_kind, Some(ErrorKind::CompileStudentError));
    assert!(grade.feedback.contains("/Greeter.java:2: error: missing return statement"));
}

#[tokio::test]
async fn test_runner_without_result_line_is_parse_failure() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let config = fake_toolchain_config(tools.path(), root.path());
    write_script(tools.path(), "java", "echo 'Could not find class: GreeterTest'");

    let grade = MarkingJob::new(request(FeedbackLevel::All), "21_4", config)
        .mark()
        .await
        .unwrap();

    assert_eq!(grade.error_kind, Some(ErrorKind::ParseFailure));
    assert!(grade.feedback.contains("Could not find class: GreeterTest"));
}

#[tokio::test]
async fn test_invalid_test_class_name_is_not_graded() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let config = fake_toolchain_config(tools.path(), root.path());
    let req = GradingRequest::new(STUDENT, "Greeter Test", TESTS, FeedbackLevel::All, 0.2);
    let store = Arc::new(InMemoryFeedbackStore::new());

    let err = MarkingJob::new(req, "21_5", config)
        .with_store(store.clone())
        .mark()
        .await
        .unwrap_err();

    assert!(matches!(err, MarkerError::Configuration(_)));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_regrading_is_idempotent() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let config = fake_toolchain_config(tools.path(), root.path());
    write_script(
        tools.path(),
        "java",
        "printf 'JUnit version 4.13.2\\n..F.\\nTime: 0.01\\n'",
    );

    let first = MarkingJob::new(request(FeedbackLevel::TimesCountOfTests), "21_6", config.clone())
        .mark()
        .await
        .unwrap();
    let second = MarkingJob::new(request(FeedbackLevel::TimesCountOfTests), "21_6", config)
        .mark()
        .await
        .unwrap();

    assert_eq!(first.fraction, second.fraction);
    assert_eq!(first.error_kind, second.error_kind);
    let without_times = |text: &str| text.lines().skip(2).collect::<Vec<_>>().join("\n");
    assert_eq!(without_times(&first.feedback), without_times(&second.feedback));
}
