//! English message catalogue used in generated feedback.

pub const COMPILE_STUDENT_ERROR: &str = "Your code could not be compiled:";
pub const COMPILE_TEST_ERROR: &str =
    "The unit tests of this question could not be run. Please inform your teacher.";
pub const TEST_DEFINITION_ERROR: &str = "Error in Unit Test Definition";
pub const EXECUTION_DETAILS: &str = "Details of the execution:";
pub const TIMEOUT_RUNNING: &str =
    "The tests did not finish in time. Check your code for endless loops or excessive recursion.";
pub const REMOTE_SERVER_ERROR: &str = "REMOTE_SERVER_ERROR";

pub const FULLY_CORRECT: &str = "Your answer is fully correct.";
pub const PARTIALLY_CORRECT: &str = "Your answer is partially correct.";
pub const WRONG_ANSWER: &str = "Your answer is wrong.";

pub fn compiling(seconds: f64) -> String {
    format!("Compiling: {seconds:.1} s")
}

pub fn running(seconds: f64) -> String {
    format!("Running tests: {seconds:.1} s")
}

pub fn test_counts(tests: u32, failures: u32, errors: u32) -> String {
    format!("Tests: {tests}, Failures: {failures}, Errors: {errors}")
}

pub fn global_grade(fraction: f64) -> String {
    format!("Global grade for the current question: {}% / 100%", percent(fraction))
}

/// Percentage with at most two decimals, without trailing zeros.
pub fn percent(fraction: f64) -> String {
    let value = (fraction * 10000.0).round() / 100.0;
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
