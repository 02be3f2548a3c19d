//! Audit Parser
//!
//! Checkstyle reports one finding per line, each prefixed with the offending
//! file (`/Calc.java:12:5: ...`). Every `.java:` occurrence counts as one
//! finding.

use util::execution_config::ExecutionConfig;

use crate::error::MarkerError;
use crate::traits::parser::Parser;
use crate::types::AuditOutcome;

const FINDING_MARKER: &str = ".java:";

pub struct AuditParser;

impl<'a> Parser<&'a str, AuditOutcome> for AuditParser {
    fn parse(&self, raw: &'a str, _config: &ExecutionConfig) -> Result<AuditOutcome, MarkerError> {
        Ok(AuditOutcome {
            finding_count: raw.matches(FINDING_MARKER).count() as u32,
            raw_text: raw.to_string(),
        })
    }
}
