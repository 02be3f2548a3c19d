//! # Scorer Module
//!
//! Combines the unit test result and the style audit into one fraction.
//!
//! ```text
//! style = (max - clamped_findings) / max
//! code  = 1 - round2(total_errors / total_tests)
//! final = clamp01(code * (1 - audit_weight) + style * audit_weight)
//! ```

use serde::Serialize;

use crate::types::{AuditOutcome, TestOutcome};

/// Round a float to two decimal places.
#[inline]
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    pub code_fraction: f64,
    pub style_fraction: f64,
    /// Final grade in `[0, 1]`.
    pub fraction: f64,
}

impl Score {
    /// Weighted contribution of the unit tests, as a percentage of the whole grade.
    pub fn code_points(&self, audit_weight: f64) -> f64 {
        self.code_fraction * (1.0 - audit_weight) * 100.0
    }

    /// Weighted contribution of the audit, as a percentage of the whole grade.
    pub fn style_points(&self, audit_weight: f64) -> f64 {
        self.style_fraction * audit_weight * 100.0
    }
}

/// 1.0 with no findings, 0.0 at or beyond `max_findings`.
///
/// A ceiling of zero disables style scoring (always 1.0).
pub fn style_fraction(audit: &AuditOutcome, max_findings: u32) -> f64 {
    if max_findings == 0 {
        return 1.0;
    }
    let clamped = audit.clamped(max_findings);
    f64::from(max_findings - clamped) / f64::from(max_findings)
}

/// Share of passing tests, with the error ratio rounded to two decimals.
///
/// Callers must not pass a zero-test outcome; the parser rejects those.
pub fn code_fraction(tests: &TestOutcome) -> f64 {
    if tests.total_tests == 0 {
        return 0.0;
    }
    let ratio = f64::from(tests.total_errors()) / f64::from(tests.total_tests);
    1.0 - round2(ratio)
}

pub fn compute_score(tests: &TestOutcome, audit: &AuditOutcome, audit_weight: f64, max_findings: u32) -> Score {
    let code = code_fraction(tests);
    let style = style_fraction(audit, max_findings);
    let fraction = (code * (1.0 - audit_weight) + style * audit_weight).clamp(0.0, 1.0);

    Score {
        code_fraction: code,
        style_fraction: style,
        fraction,
    }
}
