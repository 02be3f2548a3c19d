#![cfg(unix)]

use std::fs;
use std::time::Duration;

use code_runner::{ExecutionBackend, ExecutionResult, FeedbackLevel, GradingRequest, LocalBackend, RunnerError};
use tempfile::tempdir;
use util::test_helpers::{fake_toolchain_config, retained_workspace, workspaces_of, write_script};

const STUDENT: &str = "public class Calc {\n  int add(int a, int b) { return a + b; }\n}\n";
const TESTS: &str = "public class CalcTest {}\n";

fn request() -> GradingRequest {
    GradingRequest::new(STUDENT, "CalcTest", TESTS, FeedbackLevel::All, 0.1)
}

#[tokio::test]
async fn test_successful_run_returns_outputs_and_cleans_up() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let config = fake_toolchain_config(tools.path(), root.path());

    let result = LocalBackend::new(config).execute(&request(), "1_1").await.unwrap();

    match result {
        ExecutionResult::Success { junit_output, audit_output, .. } => {
            assert!(junit_output.contains("OK (3 tests)"));
            assert!(audit_output.contains("Audit done."));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(workspaces_of(root.path(), "1_1").is_empty());
}

#[tokio::test]
async fn test_student_compile_error_short_circuits() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let mut config = fake_toolchain_config(tools.path(), root.path());
    let ran = tools.path().join("java-ran");
    let audited = tools.path().join("checkstyle-ran");
    write_script(
        tools.path(),
        "javac",
        "for last; do :; done; echo \"$last:2: error: ';' expected\"; exit 1",
    );
    config.toolchain.java = write_script(tools.path(), "java2", &format!("touch {}", ran.display()))
        .display()
        .to_string();
    config.toolchain.checkstyle =
        write_script(tools.path(), "checkstyle2", &format!("touch {}", audited.display()))
            .display()
            .to_string();

    let result = LocalBackend::new(config).execute(&request(), "2_1").await.unwrap();

    match result {
        ExecutionResult::CompileStudentError { compiler_output } => {
            assert_eq!(compiler_output, "/Calc.java:2: error: ';' expected\n");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(!ran.exists());
    assert!(!audited.exists());
    assert!(workspaces_of(root.path(), "2_1").is_empty());
}

#[tokio::test]
async fn test_test_class_compile_error() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let config = fake_toolchain_config(tools.path(), root.path());
    write_script(
        tools.path(),
        "javac",
        "for last; do :; done; case \"$last\" in *CalcTest.java) echo 'cannot find symbol'; exit 1;; esac",
    );

    let result = LocalBackend::new(config).execute(&request(), "3_1").await.unwrap();

    assert_eq!(
        result,
        ExecutionResult::CompileTestError {
            compiler_output: "cannot find symbol\n".into()
        }
    );
}

#[tokio::test]
async fn test_hanging_tests_time_out() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let mut config = fake_toolchain_config(tools.path(), root.path());
    config.limits.timeout_secs = 1;
    write_script(tools.path(), "java", "echo 'JUnit version 4.13'; sleep 10");

    let result = LocalBackend::new(config).execute(&request(), "4_1").await.unwrap();

    assert_eq!(result, ExecutionResult::TimeoutRunning);
    assert!(workspaces_of(root.path(), "4_1").is_empty());
}

#[tokio::test]
async fn test_audit_output_has_workspace_path_stripped() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let config = fake_toolchain_config(tools.path(), root.path());
    write_script(
        tools.path(),
        "checkstyle",
        "for last; do :; done; echo 'Starting audit...'; echo \"$last:1:1: Missing a Javadoc comment.\"; echo 'Audit done.'",
    );

    let result = LocalBackend::new(config).execute(&request(), "5_1").await.unwrap();

    match result {
        ExecutionResult::Success { audit_output, .. } => {
            assert!(audit_output.contains("\n/Calc.java:1:1: Missing a Javadoc comment.\n"));
            assert!(!audit_output.contains(&root.path().display().to_string()));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_nocleanup_keeps_workspace_and_debug_logs() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let mut config = fake_toolchain_config(tools.path(), root.path());
    config.debug.nocleanup = true;
    config.debug.logfile = true;

    LocalBackend::new(config).execute(&request(), "6_1").await.unwrap();

    let ws = retained_workspace(root.path(), "6_1");
    assert!(ws.join("Calc.java").is_file());
    assert!(ws.join("CalcTest.java").is_file());
    let log = fs::read_to_string(ws.join("CalcTest.java_junitout.txt")).unwrap();
    assert!(log.contains("OK (3 tests)"));
}

#[tokio::test]
async fn test_unnamed_submission_uses_fallback_class() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let mut config = fake_toolchain_config(tools.path(), root.path());
    config.debug.nocleanup = true;
    let req = GradingRequest::new("int x;", "CalcTest", TESTS, FeedbackLevel::OnlyTimes, 0.0);

    LocalBackend::new(config).execute(&req, "7_1").await.unwrap();

    assert!(retained_workspace(root.path(), "7_1").join("Xy.java").is_file());
}

#[tokio::test]
async fn test_bad_test_class_name_is_a_configuration_error() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let config = fake_toolchain_config(tools.path(), root.path());
    let req = GradingRequest::new(STUDENT, "Calc-Test", TESTS, FeedbackLevel::All, 0.1);

    let err = LocalBackend::new(config).execute(&req, "8_1").await.unwrap_err();

    assert!(matches!(err, RunnerError::Configuration(_)));
    assert!(workspaces_of(root.path(), "8_1").is_empty());
}

#[tokio::test]
async fn test_missing_compiler_is_a_spawn_error() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let mut config = fake_toolchain_config(tools.path(), root.path());
    config.toolchain.javac = tools.path().join("no-javac").display().to_string();

    let err = LocalBackend::new(config).execute(&request(), "9_1").await.unwrap_err();

    assert!(matches!(err, RunnerError::Spawn { .. }));
    assert!(workspaces_of(root.path(), "9_1").is_empty());
}

#[tokio::test]
async fn test_overlapping_runs_of_one_attempt_do_not_share_a_workspace() {
    let tools = tempdir().unwrap();
    let root = tempdir().unwrap();
    let config = fake_toolchain_config(tools.path(), root.path());
    write_script(
        tools.path(),
        "java",
        "sleep 1; echo 'JUnit version 4.13'; echo '.'; ls",
    );
    let backend = LocalBackend::new(config);
    let req = request();

    let first = backend.execute(&req, "31_2");
    let second = async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        backend.execute(&req, "31_2").await
    };
    let (first, second) = tokio::join!(first, second);

    for result in [first.unwrap(), second.unwrap()] {
        match result {
            ExecutionResult::Success { junit_output, audit_output, .. } => {
                assert!(junit_output.contains("Calc.java"), "sources missing: {junit_output:?}");
                assert!(junit_output.contains("CalcTest.java"));
                assert!(audit_output.contains("Audit done."));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
    assert!(workspaces_of(root.path(), "31_2").is_empty());
}
